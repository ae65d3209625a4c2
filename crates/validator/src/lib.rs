//! HTTP client for the external validation workflow engine.
//!
//! Submitted notes are handed off to an external engine over a single
//! webhook URL; results come back asynchronously through this service's
//! own webhook endpoint. This crate owns the outbound half: request
//! shaping, dispatch, and tolerant decoding of whatever acknowledgement
//! the engine returns.

pub mod client;
pub mod config;

pub use client::{
    DispatchError, ValidationRequest, ValidationResponse, ValidatorClient, FILE_UPLOAD_SENTINEL,
};
pub use config::ValidatorConfig;
