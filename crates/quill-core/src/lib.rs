//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! Posts, their query scopes, pagination, the share form and the services
//! built on top of them. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
