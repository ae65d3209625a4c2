//! HTTP request handlers, one module per route group.

pub mod admin;
pub mod validation;
pub mod validator_proxy;
pub mod webhook;
