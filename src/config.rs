// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::Snowflake;
use crate::builder::Builder;
use crate::error::Error;
use crate::layout::Layout;
use crate::snowflake::DEFAULT_EPOCH_MILLIS;
use std::time::Duration;

/// Plain-data generator settings, e.g. read from a deployment's config file.
///
/// With the `serde` feature every field is optional in the serialized form
/// and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// milliseconds since the Unix epoch
    pub epoch_millis: i64,
    pub data_center_id: u16,
    pub machine_id: u16,
    pub layout: Layout,
    pub spin_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epoch_millis: DEFAULT_EPOCH_MILLIS,
            data_center_id: 0,
            machine_id: 0,
            layout: Layout::default(),
            spin_timeout_ms: None,
        }
    }
}

impl Config {
    /// A builder preloaded with these settings.
    /// Further options (clock, check functions) can be chained before `finalize`.
    pub fn builder<'a>(&self) -> Builder<'a> {
        let builder = Builder::new()
            .epoch_millis(self.epoch_millis)
            .layout(self.layout)
            .machine_id(self.machine_id)
            .data_center_id(self.data_center_id);
        match self.spin_timeout_ms {
            Some(ms) => builder.spin_timeout(Duration::from_millis(ms)),
            None => builder,
        }
    }

    pub fn finalize(&self) -> Result<Snowflake, Error> {
        self.builder().finalize()
    }
}
