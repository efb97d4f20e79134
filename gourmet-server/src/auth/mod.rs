//! Anonymous identity
//!
//! There are no accounts: a client mints an opaque token once, keeps it in
//! a cookie, and sends it on every request. The token is a convenience
//! identity, not a security boundary.

mod token;

pub use token::{ListingToken, OWNER_TOKEN_HEADER, OwnerToken};
