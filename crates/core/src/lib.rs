//! Domain logic for the MedLearn validation backend.
//!
//! Everything in this crate is pure with respect to I/O: the normalizer,
//! jurisdiction lookup, report builder, and status resolution operate on
//! plain values and can be tested without a database or network. The only
//! async piece is the bounded polling loop in [`polling`], which suspends
//! on the tokio clock and nothing else.

pub mod error;
pub mod jurisdiction;
pub mod normalize;
pub mod polling;
pub mod record_status;
pub mod report;
pub mod types;
