// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::Snowflake;
use crate::clock::{SystemClock, TimeSource};
use crate::error::{BoxDynError, Error, NodeField};
use crate::layout::Layout;
use crate::snowflake::{DEFAULT_EPOCH_MILLIS, Internals, SharedSnowflake};
use chrono::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Where a node identifier sub-field comes from.
enum IdSource<'a> {
    Value(u16),
    Provider(&'a dyn Fn() -> Result<u16, BoxDynError>),
}

/// A builder for building the [`Snowflake`] generator.
///
/// ```
/// use nodeflake::{Layout, Snowflake};
///
/// let sf = Snowflake::builder()
///     .layout(Layout::single_node(41, 10, 12).unwrap())
///     .machine_id(1)
///     .finalize()
///     .unwrap();
/// assert!(sf.next_id().is_ok());
/// ```
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder<'a> {
    epoch: i64,
    machine_id: Option<IdSource<'a>>,
    data_center_id: Option<IdSource<'a>>,
    check_machine_id: Option<&'a dyn Fn(u16) -> bool>,
    check_data_center_id: Option<&'a dyn Fn(u16) -> bool>,
    layout: Layout,
    spin_timeout: Option<Duration>,
    clock: Box<dyn TimeSource>,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of [`Snowflake`].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            epoch: DEFAULT_EPOCH_MILLIS,
            machine_id: None,
            data_center_id: None,
            check_machine_id: None,
            check_data_center_id: None,
            layout: Layout::default(),
            spin_timeout: None,
            clock: Box::new(SystemClock),
        }
    }

    /// Set the start time.
    /// If the time is set later than the current time, 'finalize' will fail.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.epoch = start_time.timestamp_millis();
        self
    }

    /// Set the start time in milliseconds since the Unix epoch.
    pub fn epoch_millis(mut self, epoch: i64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Set the machine ID.
    pub fn machine_id(mut self, machine_id: u16) -> Self {
        self.machine_id = Some(IdSource::Value(machine_id));
        self
    }

    /// Set a provider for the machine ID.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn machine_id_with(
        mut self,
        machine_id: &'a dyn Fn() -> Result<u16, BoxDynError>,
    ) -> Self {
        self.machine_id = Some(IdSource::Provider(machine_id));
        self
    }

    /// Set the data center ID.
    pub fn data_center_id(mut self, data_center_id: u16) -> Self {
        self.data_center_id = Some(IdSource::Value(data_center_id));
        self
    }

    /// Set a provider for the data center ID.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn data_center_id_with(
        mut self,
        data_center_id: &'a dyn Fn() -> Result<u16, BoxDynError>,
    ) -> Self {
        self.data_center_id = Some(IdSource::Provider(data_center_id));
        self
    }

    /// Set up a function to check the machine ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_machine_id(mut self, check_machine_id: &'a dyn Fn(u16) -> bool) -> Self {
        self.check_machine_id = Some(check_machine_id);
        self
    }

    /// Set up a function to check the data center ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_data_center_id(mut self, check_data_center_id: &'a dyn Fn(u16) -> bool) -> Self {
        self.check_data_center_id = Some(check_data_center_id);
        self
    }

    /// Set all field widths at once.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Bound the wait for the next millisecond once a millisecond's sequence
    /// is used up. Without a timeout `next_id` spins until the clock advances.
    pub fn spin_timeout(mut self, spin_timeout: Duration) -> Self {
        self.spin_timeout = Some(spin_timeout);
        self
    }

    /// Use a custom time source instead of the system clock.
    pub fn clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Finish building and create a Snowflake instance.
    /// This method will return an error if any of the configured functions return an error or if validation fails.
    pub fn finalize(self) -> Result<Snowflake, Error> {
        self.layout.validate()?;

        match self.clock.current_millis().checked_sub(self.epoch) {
            None => return Err(Error::EpochOutOfRange(self.epoch)),
            Some(elapsed) if elapsed < 0 => {
                let start_time = DateTime::from_timestamp_millis(self.epoch)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                return Err(Error::StartTimeAheadOfCurrentTime(start_time));
            }
            Some(_) => {}
        }

        let machine_id = match self.machine_id {
            Some(IdSource::Value(machine_id)) => machine_id,
            Some(IdSource::Provider(machine_id_fn)) => {
                machine_id_fn().map_err(Error::MachineIdFailed)?
            }
            None => return Err(Error::MachineIdFailed("Machine ID not provided".into())),
        };
        check_range(NodeField::MachineId, machine_id, self.layout.max_machine_id())?;

        if let Some(check_machine_id) = self.check_machine_id
            && !check_machine_id(machine_id)
        {
            return Err(Error::CheckMachineIdFailed);
        }

        let data_center_id = match self.data_center_id {
            Some(IdSource::Value(data_center_id)) => data_center_id,
            Some(IdSource::Provider(data_center_id_fn)) => {
                data_center_id_fn().map_err(Error::DataCenterIdFailed)?
            }
            None if self.layout.bit_len_data_center_id() == 0 => 0,
            None => {
                return Err(Error::DataCenterIdFailed(
                    "Data Center ID not provided".into(),
                ));
            }
        };
        check_range(
            NodeField::DataCenterId,
            data_center_id,
            self.layout.max_data_center_id(),
        )?;

        if let Some(check_data_center_id) = self.check_data_center_id
            && !check_data_center_id(data_center_id)
        {
            return Err(Error::CheckDataCenterIdFailed);
        }

        debug!(
            epoch = self.epoch,
            data_center_id,
            machine_id,
            layout = ?self.layout,
            "snowflake generator configured"
        );

        let shared = Arc::new(SharedSnowflake {
            epoch: self.epoch,
            data_center_id,
            machine_id,
            layout: self.layout,
            spin_timeout: self.spin_timeout,
            clock: self.clock,
            internals: Mutex::new(Internals {
                last_timestamp: 0,
                sequence: 0,
            }),
        });
        Ok(Snowflake::new_inner(shared))
    }
}

fn check_range(field: NodeField, value: u16, max: u64) -> Result<(), Error> {
    if value as u64 > max {
        return Err(Error::NodeIdOutOfRange { field, value, max });
    }
    Ok(())
}
