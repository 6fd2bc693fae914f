//! External collaborators for the site.
//!
//! # Services
//!
//! - `resend` - Resend transactional email API (newsletter confirmations)

pub mod resend;

pub use resend::{ResendClient, ResendError};
