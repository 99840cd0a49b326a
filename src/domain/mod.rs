pub mod auth;
pub mod proposal;
pub mod subscription;
