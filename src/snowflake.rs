// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::base62;
use crate::builder::Builder;
use crate::clock::TimeSource;
use crate::error::*;
use crate::layout::Layout;
use chrono::prelude::*;
use std::{
    fmt, hint,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::{trace, warn};

/// Default epoch: 2024-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const DEFAULT_EPOCH_MILLIS: i64 = 1_704_067_200_000;

/// Internals of Snowflake.
/// This struct is not exposed to the public.
#[derive(Debug)]
pub(crate) struct Internals {
    /// milliseconds since the epoch of the last issued ID
    pub(crate) last_timestamp: i64,
    pub(crate) sequence: u64,
}

/// SharedSnowflake is shared between Snowflake instances.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake {
    pub(crate) epoch: i64,
    pub(crate) data_center_id: u16,
    pub(crate) machine_id: u16,
    pub(crate) layout: Layout,
    pub(crate) spin_timeout: Option<Duration>,
    pub(crate) clock: Box<dyn TimeSource>,
    pub(crate) internals: Mutex<Internals>,
}

impl SharedSnowflake {
    /// Milliseconds elapsed since the epoch according to the configured clock.
    fn elapsed_millis(&self) -> Result<i64, Error> {
        let millis = self.clock.current_millis();
        millis
            .checked_sub(self.epoch)
            .ok_or(Error::ClockOutOfRange(millis))
    }

    /// Spin until the clock moves past `last`.
    /// Gives up with [`Error::SpinTimeout`] once the configured timeout passes.
    fn wait_next_millis(&self, last: i64) -> Result<i64, Error> {
        let started = Instant::now();
        loop {
            let now = self.elapsed_millis()?;
            if now > last {
                return Ok(now);
            }
            if let Some(timeout) = self.spin_timeout
                && started.elapsed() >= timeout
            {
                warn!(last_timestamp = last, ?timeout, "gave up waiting for the next millisecond");
                return Err(Error::SpinTimeout(timeout));
            }
            hint::spin_loop();
        }
    }
}

/// Snowflake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads;
/// clones share one clock and one sequence.
pub struct Snowflake(pub(crate) Arc<SharedSnowflake>);

impl Snowflake {
    /// Create a new Snowflake with the default configuration.
    /// A machine id is always required, so this only succeeds when a
    /// builder supplies one; see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }

    pub(crate) fn new_inner(shared: Arc<SharedSnowflake>) -> Self {
        Self(shared)
    }

    /// Generate the next unique id.
    ///
    /// IDs from one generator strictly increase as long as the clock does not
    /// go backwards. If it does, the call fails with
    /// [`Error::ClockRegression`] and the generator state is left untouched.
    /// When the sequence for the current millisecond is used up, the call
    /// spins until the clock reaches the next millisecond.
    pub fn next_id(&self) -> Result<u64, Error> {
        let shared = &*self.0;
        let mut internals = shared.internals.lock().map_err(|_| Error::MutexPoisoned)?;

        let mut now = shared.elapsed_millis()?;
        if now < internals.last_timestamp {
            warn!(
                last_timestamp = internals.last_timestamp,
                now, "clock moved backwards, refusing to generate id"
            );
            return Err(Error::ClockRegression {
                last: internals.last_timestamp,
                now,
            });
        }

        let mut sequence = 0;
        if now == internals.last_timestamp {
            sequence = (internals.sequence + 1) & shared.layout.max_sequence();
            if sequence == 0 {
                trace!(last_timestamp = now, "sequence exhausted, waiting for next millisecond");
                now = shared.wait_next_millis(internals.last_timestamp)?;
            }
        }

        internals.last_timestamp = now;
        internals.sequence = sequence;

        Ok(shared.layout.pack(
            now as u64,
            shared.data_center_id as u64,
            shared.machine_id as u64,
            sequence,
        ))
    }

    /// Generate the next id together with its base62 form, ready to be used
    /// as a short textual handle.
    pub fn next_code(&self) -> Result<(u64, String), Error> {
        let id = self.next_id()?;
        Ok((id, base62::encode(id)))
    }

    /// Break an id produced by this generator up into its parts.
    pub fn decompose(&self, id: u64) -> DecomposedSnowflake {
        self.0.layout.decompose(id)
    }

    /// Wall-clock time at which `id` was generated.
    /// Returns `None` if the result is not representable.
    pub fn timestamp_of(&self, id: u64) -> Option<DateTime<Utc>> {
        let elapsed = i64::try_from(self.decompose(id).time).ok()?;
        DateTime::from_timestamp_millis(self.0.epoch.checked_add(elapsed)?)
    }

    pub fn data_center_id(&self) -> u16 {
        self.0.data_center_id
    }

    pub fn machine_id(&self) -> u16 {
        self.0.machine_id
    }

    pub fn layout(&self) -> Layout {
        self.0.layout
    }

    /// The epoch in milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.0.epoch
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Snowflake {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snowflake")
            .field("epoch", &self.0.epoch)
            .field("data_center_id", &self.0.data_center_id)
            .field("machine_id", &self.0.machine_id)
            .field("layout", &self.0.layout)
            .finish_non_exhaustive()
    }
}

/// DecomposedSnowflake is the parts of a Snowflake ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedSnowflake {
    pub id: u64,
    pub msb: u64,
    /// milliseconds since the epoch
    pub time: u64,
    pub data_center_id: u64,
    pub machine_id: u64,
    pub sequence: u64,
    pub layout: Layout,
}

impl DecomposedSnowflake {
    /// The data center and machine fields as one node identifier.
    pub fn node_id(&self) -> u64 {
        self.data_center_id << self.layout.bit_len_machine_id() | self.machine_id
    }
}

/// Renders the bit fields of the ID as a table.
impl fmt::Display for DecomposedSnowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = &self.layout;
        let columns = [
            ("sign", 1usize, self.msb),
            ("time", layout.bit_len_time() as usize, self.time),
            (
                "data center",
                layout.bit_len_data_center_id() as usize,
                self.data_center_id,
            ),
            ("machine", layout.bit_len_machine_id() as usize, self.machine_id),
            ("sequence", layout.bit_len_sequence() as usize, self.sequence),
        ];

        writeln!(f, "id: {}", self.id)?;
        for &(name, width, value) in columns.iter().filter(|(_, width, _)| *width > 0) {
            let label = format!("{name}({width})");
            writeln!(f, "| {label:<16} | {value:0width$b} ({value})")?;
        }
        Ok(())
    }
}
