//! # Sessiongate (cookie sessions backed by Redis)
//!
//! `sessiongate` issues, validates and revokes opaque session identifiers.
//! Each identifier is the key of a Redis record that wraps a signed token, so a
//! leaked cookie carries no identity by itself and a tampered record still has
//! to pass signature verification.
//!
//! ## Session lifecycle
//!
//! - **Sign-in:** credentials are checked against the user store (Argon2 PHC
//!   hashes), a token is minted, the session record is written with a TTL equal
//!   to the token lifetime, the user is marked online and the `session_id`
//!   cookie is set.
//! - **Gate:** every protected route resolves the cookie through the store and
//!   re-verifies the embedded token before the handler runs.
//! - **Sign-out:** the session and presence entries are deleted and the cookie
//!   is cleared.
//!
//! ## Presence
//!
//! `presence:<session id>` entries shadow live sessions and back the
//! "who is online" listing. They share the session TTL, so a client that never
//! signs out still drops off the list.

pub mod api;
pub mod cli;
pub mod store;
pub mod users;

#[cfg(test)]
mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
