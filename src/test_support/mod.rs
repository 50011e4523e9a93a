//! Containers for backend integration tests.
//!
//! Tests call [`runtime::ensure_container_runtime`] first and skip when no
//! Docker or Podman socket is reachable.

pub mod postgres;
pub mod redis;
pub mod runtime;

use uuid::Uuid;

pub(crate) fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
