//! Users and onboarding validation.

mod error;
mod types;

pub use error::UserError;
pub use types::{NewUser, User};
