//! Session authentication handlers and supporting modules.
//!
//! A session is an opaque, random identifier carried in the `session_id`
//! cookie. The identifier keys a store record holding the signed token and the
//! user id; the token is verified again on every protected request.
//!
//! ## Session lifetime
//!
//! The token lifetime, the store TTL of the session and presence entries, and
//! the cookie `Max-Age` are the same value (`AuthConfig::session_ttl`). A
//! session therefore disappears from the store at the moment its token would
//! stop verifying.
//!
//! ## Presence
//!
//! Sign-in writes `presence:<session id>` next to the session record and
//! sign-out removes it. Presence is auxiliary: a failed presence write never
//! fails sign-in.

mod credentials;
mod error;
pub(crate) mod gate;
pub(crate) mod presence;
pub(crate) mod session;
pub(crate) mod sign_in;
pub(crate) mod sign_out;
pub(crate) mod sign_up;
mod state;
mod token;
pub(crate) mod types;
mod utils;

pub use credentials::{hash_password, verify_password, CredentialError, PasswordHashError};
pub use error::AuthError;
pub use gate::{authorize, require_session, AuthenticatedUser};
pub use presence::PresenceRegistry;
pub use session::{SessionError, SessionRecord, SessionStore};
pub use state::{AuthConfig, AuthState};
pub use token::{Claims, IssuedToken, TokenError, TokenSigner};
