//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 tokens from the storefront's identity provider
//! - `mock` - Test implementation that doesn't need real tokens

mod jwt;
mod mock;

pub use jwt::{Audience, JwtSessionValidator, SessionClaims};
pub use mock::MockSessionValidator;
