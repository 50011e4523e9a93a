//! API handlers for sessiongate.
//!
//! `auth` owns the session lifecycle and the authorization gate; the other
//! modules are thin handlers on top of it.

pub mod auth;
pub mod health;
pub mod me;
