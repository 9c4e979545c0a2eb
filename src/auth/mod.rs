//! Authentication module
//!
//! Username/password credentials with bcrypt hashing and
//! signed, time-bounded bearer tokens (access + refresh pair).

mod middleware;
mod passwords;
mod tokens;

pub use middleware::{require_auth, CurrentUser, MaybeUser};
pub use passwords::{hash_password, verify_password};
pub use tokens::{issue_token_pair, verify_access_token, verify_refresh_token, TokenPair};
