//! # Contracts
//!
//! Frozen interface contracts (ICD) between the captor, followers and their
//! collaborators. All business crates can only depend on this crate, reverse
//! dependencies are prohibited.
//!
//! ## Time Model
//! - Stamps are any [`Stamp`]; the sensor pipeline uses [`SimTime`]
//!   (simulation seconds, f64) as primary clock
//! - Followers shift the driving range by a fixed delay of type
//!   [`Stamp::Offset`]

mod dispatch;
mod error;
mod follower_config;
mod queue;
mod range;
mod report;
mod sensor;
mod sink;
mod state;
mod time;

pub use dispatch::*;
pub use error::*;
pub use follower_config::*;
pub use queue::*;
pub use range::CaptureRange;
pub use report::CaptureReport;
pub use sensor::*;
pub use sink::*;
pub use state::State;
pub use time::{SimTime, Stamp};
