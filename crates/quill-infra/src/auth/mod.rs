//! Bearer token verification.

mod jwt;

pub use jwt::{DisabledTokenService, JwtConfig, JwtTokenService};
