//! A coordination-free unique ID generator inspired by [Twitter's Snowflake].
//!
//! Every node is given a small, externally assigned identifier (a data center
//! id and a machine id). IDs are 64-bit integers packed from the time since a
//! fixed epoch, the node identifier and a per-millisecond sequence, so nodes
//! with disjoint identifiers never collide and IDs sort roughly by time.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! nodeflake = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use nodeflake::Snowflake;
//!
//! let sf = Snowflake::builder()
//!     .data_center_id(1)
//!     .machine_id(7)
//!     .finalize()
//!     .unwrap();
//! let next_id = sf.next_id().unwrap();
//! let parts = sf.decompose(next_id);
//! assert_eq!(parts.machine_id, 7);
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is thread safe. `clone` it before moving to another thread:
//! ```
//! use nodeflake::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::builder()
//!     .data_center_id(0)
//!     .machine_id(1)
//!     .finalize()
//!     .unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! ## Clock regression
//!
//! If the clock reports a time earlier than the last issued ID, `next_id`
//! returns [`Error::ClockRegression`] for that call and keeps its state, so
//! it recovers once the clock catches up again.
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

pub mod base62;
mod builder;
mod clock;
mod config;
mod error;
mod layout;
mod snowflake;

pub use crate::snowflake::*;
pub use builder::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use layout::*;
