pub mod error;
pub mod identity;
pub mod jwt;

pub use error::IdentityError;
pub use identity::{bearer_token, AuthUser, IdentityProvider};
pub use jwt::{Claims, JwtIdentityProvider};
