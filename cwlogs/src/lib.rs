/*!
Ship CloudWatch Logs subscription batches as flattened records.

The pipeline is split into a few main components, in order of where they appear in the processing of a batch:

- **Receive**: Decodes the base64 encoded, gzip compressed envelope into a batch of raw log events.
- **Process**: Normalizes each raw event. Timestamps and levels are inferred, Lambda runtime lines are
split into their parts, batch metadata is merged in, and JSON embedded in the message is expanded.
Platform housekeeping and ignored levels are dropped here.
- **Flatten**: Turns a normalized event into a flat record of primitive values that's safe to ship.
- **Ship**: Accumulates flattened records and delivers them when flushed.

The `handler` ties these together for a single batch.
*/

#![deny(unsafe_code)]

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate anyhow;

#[macro_use]
pub mod diagnostics;

pub mod config;
pub mod context;
pub mod handler;
pub mod process;
pub mod receive;
pub mod ship;

pub use self::{anyhow::Error, config::Config};
