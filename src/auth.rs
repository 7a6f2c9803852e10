//! Auth-domain values: scope sets, CSRF state tokens, redacted secrets, and
//! exchanged tokens.

pub mod scope;
pub mod secret;
pub mod state;
pub mod token;

pub use scope::*;
pub use secret::*;
pub use state::*;
pub use token::*;
