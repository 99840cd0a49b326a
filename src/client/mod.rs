//! Client-side helpers for applications talking to the proposal API

pub mod api;
pub mod session;
pub mod subscription_monitor;

pub use api::{ClientError, ProposalApiClient};
pub use session::{SessionEvent, SessionEvents};
pub use subscription_monitor::{
    SubscriptionMonitor, SubscriptionSnapshot, SubscriptionSource, DEFAULT_REFRESH_INTERVAL,
};
