//! # Secret Discovery
//!
//! Workload identities that SDS certificates are issued for.

pub mod identity;

pub use identity::{resolve_identity, Identity, SPIFFE_SCHEME};
