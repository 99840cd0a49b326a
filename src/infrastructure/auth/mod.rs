pub mod middleware;
pub mod request_id;

pub use crate::domain::auth::AuthUser;
pub use middleware::auth_middleware;
pub use request_id::{request_id_middleware, RequestId};
