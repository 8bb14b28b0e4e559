//! # Blog Client
//!
//! Counterpart of the web frontend.
//!
//! - [`api`]: one method per REST endpoint, cookie-based session
//! - [`forms`]: register/login form state driven by actions through a reducer
//! - [`smoke`]: uses both to walk a running server end to end
pub mod api;
pub mod forms;
pub mod smoke;

pub use api::{ApiClient, ClientError};
