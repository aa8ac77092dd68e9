//! Authentication server for a single-operator console.
//!
//! Wires the [`operator_auth`] core to an HTTP surface: a login endpoint
//! that exchanges credentials for a signed session token, a session endpoint
//! that validates and rolls tokens, and an origin-pinned redirect endpoint.

pub mod api;
pub mod config;
pub mod logging;
