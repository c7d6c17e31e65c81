// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Error;
use crate::snowflake::DecomposedSnowflake;

/// default bit length of time
pub const DEFAULT_BIT_LEN_TIME: u8 = 41;
/// default bit length of the data center id
pub const DEFAULT_BIT_LEN_DATA_CENTER_ID: u8 = 5;
/// default bit length of machine id
pub const DEFAULT_BIT_LEN_MACHINE_ID: u8 = 5;
/// default bit length of sequence number
pub const DEFAULT_BIT_LEN_SEQUENCE: u8 = 12;

/// Usable bits of an ID; the sign bit is always 0.
const USABLE_BITS: u8 = 63;

/// Node ids are handed over as `u16`, so a node field is at most 16 bits wide.
pub const MAX_BIT_LEN_NODE_FIELD: u8 = 16;

/// The bit layout of a Snowflake ID, most-significant field first:
///
/// ```text
/// | sign (1) | time | data center | machine | sequence |
/// ```
///
/// A layout without a data center field (`bit_len_data_center_id == 0`)
/// gives a single flat node identifier, see [`Layout::single_node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLayout"))]
pub struct Layout {
    bit_len_time: u8,
    bit_len_data_center_id: u8,
    bit_len_machine_id: u8,
    bit_len_sequence: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            bit_len_time: DEFAULT_BIT_LEN_TIME,
            bit_len_data_center_id: DEFAULT_BIT_LEN_DATA_CENTER_ID,
            bit_len_machine_id: DEFAULT_BIT_LEN_MACHINE_ID,
            bit_len_sequence: DEFAULT_BIT_LEN_SEQUENCE,
        }
    }
}

impl Layout {
    /// Create a layout from explicit field widths.
    /// Fails if time, machine or sequence is zero bits wide, if a node field
    /// is wider than 16 bits, or if the widths add up to more than 63.
    pub fn new(
        bit_len_time: u8,
        bit_len_data_center_id: u8,
        bit_len_machine_id: u8,
        bit_len_sequence: u8,
    ) -> Result<Self, Error> {
        let layout = Self {
            bit_len_time,
            bit_len_data_center_id,
            bit_len_machine_id,
            bit_len_sequence,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Create a layout with one flat node identifier and no data center field.
    pub fn single_node(
        bit_len_time: u8,
        bit_len_node_id: u8,
        bit_len_sequence: u8,
    ) -> Result<Self, Error> {
        Self::new(bit_len_time, 0, bit_len_node_id, bit_len_sequence)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let total = self.bit_len_time as u16
            + self.bit_len_data_center_id as u16
            + self.bit_len_machine_id as u16
            + self.bit_len_sequence as u16;
        if self.bit_len_time == 0
            || self.bit_len_machine_id == 0
            || self.bit_len_sequence == 0
            || self.bit_len_data_center_id > MAX_BIT_LEN_NODE_FIELD
            || self.bit_len_machine_id > MAX_BIT_LEN_NODE_FIELD
            || total > USABLE_BITS as u16
        {
            return Err(Error::InvalidBitLength(
                self.bit_len_time,
                self.bit_len_data_center_id,
                self.bit_len_machine_id,
                self.bit_len_sequence,
            ));
        }
        Ok(())
    }

    pub fn bit_len_time(&self) -> u8 {
        self.bit_len_time
    }

    pub fn bit_len_data_center_id(&self) -> u8 {
        self.bit_len_data_center_id
    }

    pub fn bit_len_machine_id(&self) -> u8 {
        self.bit_len_machine_id
    }

    pub fn bit_len_sequence(&self) -> u8 {
        self.bit_len_sequence
    }

    /// Largest timestamp the time field can hold.
    pub fn max_time(&self) -> u64 {
        mask(self.bit_len_time)
    }

    /// Largest accepted data center id.
    pub fn max_data_center_id(&self) -> u64 {
        mask(self.bit_len_data_center_id)
    }

    /// Largest accepted machine id.
    pub fn max_machine_id(&self) -> u64 {
        mask(self.bit_len_machine_id)
    }

    /// Largest sequence number; one millisecond holds `max_sequence() + 1` IDs.
    pub fn max_sequence(&self) -> u64 {
        mask(self.bit_len_sequence)
    }

    fn shift_machine_id(&self) -> u8 {
        self.bit_len_sequence
    }

    fn shift_data_center_id(&self) -> u8 {
        self.bit_len_sequence + self.bit_len_machine_id
    }

    fn shift_time(&self) -> u8 {
        self.bit_len_sequence + self.bit_len_machine_id + self.bit_len_data_center_id
    }

    /// Pack the fields into an ID. Every field is masked to its width first,
    /// so oversized values are truncated instead of bleeding into neighbours.
    pub fn pack(&self, time: u64, data_center_id: u64, machine_id: u64, sequence: u64) -> u64 {
        (time & self.max_time()) << self.shift_time()
            | (data_center_id & self.max_data_center_id()) << self.shift_data_center_id()
            | (machine_id & self.max_machine_id()) << self.shift_machine_id()
            | (sequence & self.max_sequence())
    }

    /// Break an ID up into its parts. Exact inverse of [`Layout::pack`].
    pub fn decompose(&self, id: u64) -> DecomposedSnowflake {
        DecomposedSnowflake {
            id,
            msb: id >> USABLE_BITS,
            time: (id >> self.shift_time()) & self.max_time(),
            data_center_id: (id >> self.shift_data_center_id()) & self.max_data_center_id(),
            machine_id: (id >> self.shift_machine_id()) & self.max_machine_id(),
            sequence: id & self.max_sequence(),
            layout: *self,
        }
    }
}

/// All-ones mask of `bits` width; `bits` never exceeds 63 for a valid layout.
fn mask(bits: u8) -> u64 {
    if bits == 0 { 0 } else { (1u64 << bits) - 1 }
}

/// Unvalidated wire form of [`Layout`]; missing widths take their defaults.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default)]
struct RawLayout {
    bit_len_time: u8,
    bit_len_data_center_id: u8,
    bit_len_machine_id: u8,
    bit_len_sequence: u8,
}

#[cfg(feature = "serde")]
impl Default for RawLayout {
    fn default() -> Self {
        Self {
            bit_len_time: DEFAULT_BIT_LEN_TIME,
            bit_len_data_center_id: DEFAULT_BIT_LEN_DATA_CENTER_ID,
            bit_len_machine_id: DEFAULT_BIT_LEN_MACHINE_ID,
            bit_len_sequence: DEFAULT_BIT_LEN_SEQUENCE,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawLayout> for Layout {
    type Error = Error;

    fn try_from(raw: RawLayout) -> Result<Self, Error> {
        Layout::new(
            raw.bit_len_time,
            raw.bit_len_data_center_id,
            raw.bit_len_machine_id,
            raw.bit_len_sequence,
        )
    }
}
