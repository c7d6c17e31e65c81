// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Convenience type alias for usage within nodeflake.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The node identifier sub-field an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    DataCenterId,
    MachineId,
}

impl fmt::Display for NodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeField::DataCenterId => f.write_str("data_center_id"),
            NodeField::MachineId => f.write_str("machine_id"),
        }
    }
}

/// The error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("start_time `{0}` is ahead of current time")]
    StartTimeAheadOfCurrentTime(DateTime<Utc>),
    #[error("machine_id returned an error: {0}")]
    MachineIdFailed(#[source] BoxDynError),
    #[error("data_center_id returned an error: {0}")]
    DataCenterIdFailed(#[source] BoxDynError),
    #[error("{field} `{value}` is out of range, valid range is 0..={max}")]
    NodeIdOutOfRange { field: NodeField, value: u16, max: u64 },
    #[error("check_machine_id returned false")]
    CheckMachineIdFailed,
    #[error("check_data_center_id returned false")]
    CheckDataCenterIdFailed,
    #[error(
        "invalid bit length configuration: time({0}) + data_center({1}) + machine({2}) + sequence({3}) must be at most 63, with non-zero time, machine and sequence, and node fields of at most 16 bits"
    )]
    InvalidBitLength(u8, u8, u8, u8),
    #[error("epoch `{0}` is too far from the current time to measure elapsed milliseconds")]
    EpochOutOfRange(i64),
    #[error("clock reading `{0}` is too far from the epoch to measure elapsed milliseconds")]
    ClockOutOfRange(i64),
    #[error("clock moved backwards: last timestamp {last}, current timestamp {now}")]
    ClockRegression { last: i64, now: i64 },
    #[error("sequence exhausted and clock did not advance within {0:?}")]
    SpinTimeout(Duration),
    #[error("mutex is poisoned (i.e. a panic happened while it was locked)")]
    MutexPoisoned,
    #[error("base62 input is empty")]
    EmptyBase62,
    #[error("invalid base62 character `{ch}` at position {position}")]
    InvalidBase62Char { ch: char, position: usize },
    #[error("base62 value does not fit in 64 bits")]
    Base62Overflow,
}
