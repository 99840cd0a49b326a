pub mod memory;
pub mod subscription_repository;
pub mod usage_repository;

pub use memory::{InMemorySubscriptionRepository, InMemoryUsageRepository};
pub use subscription_repository::{PgSubscriptionRepository, SubscriptionRepository};
pub use usage_repository::{GenerationRecord, PgUsageRepository, UsageRepository};
