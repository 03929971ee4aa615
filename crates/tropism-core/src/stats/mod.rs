//! Statistics over an action's instance history.
//!
//! - **aggregate**: per-factor count/sum/mean/max/min over raw values or deltas
//! - **profile**: groups comparison events by their trend signature
//! - **summary**: pairs each profile with the deltas observed under it
//!
//! Everything here is a pure function of the instance slice it is given.

mod aggregate;
mod profile;
mod summary;

pub use self::aggregate::{Aggregate, AggregateEntry, AggregateMode, AggregateOptions, aggregate};
pub use self::profile::{Profile, ProfileGranularity, profile};
pub use self::summary::{SummaryEntry, summarize};
