// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::Utc;
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// The generator reads its clock once per ID (and repeatedly while waiting
/// for an exhausted millisecond to pass). Plug in a [`ManualClock`] to drive
/// it deterministically.
///
/// ```
/// use nodeflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1_704_067_200_123
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_704_067_200_123);
/// ```
pub trait TimeSource: Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
/// Clones share the same time, so a test can hold one handle and give
/// another to the generator.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn new(millis: i64) -> Self {
        Self(Arc::new(AtomicI64::new(millis)))
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::Release);
    }

    /// Move the clock by `delta` milliseconds (negative moves it backwards).
    pub fn advance(&self, delta: i64) {
        self.0.fetch_add(delta, Ordering::AcqRel);
    }
}

impl TimeSource for ManualClock {
    fn current_millis(&self) -> i64 {
        self.get()
    }
}
