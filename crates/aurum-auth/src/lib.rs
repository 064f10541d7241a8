//! Authentication types for the Aurum storefront client.
//!
//! Passwords are checked by the API; this crate models what the client
//! holds on to afterwards: the user, their role, the bearer token and the
//! session that is persisted between runs.

mod credentials;
mod error;
mod session;
mod token;
mod user;

pub use aurum_commerce::customer::Role;
pub use credentials::{Credentials, LoginResponse};
pub use error::AuthError;
pub use session::{AuthSession, SessionId};
pub use token::AuthToken;
pub use user::User;
