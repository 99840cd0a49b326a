pub mod catalog;
pub mod dto;
pub mod model;
pub mod service;

pub use catalog::{PlanCatalog, PlanOffer};
pub use dto::{PlanSummary, PlansResponse, SubscriptionStatusResponse};
pub use model::{Plan, SubscriptionRecord, SubscriptionState, SubscriptionStatus};
pub use service::{effective_plan, Entitlement, SubscriptionService, UsageReservation};
