pub mod health;
pub mod proposal;
pub mod subscription;
