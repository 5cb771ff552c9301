mod core;
mod modal;
mod observability;
mod slack;

pub use self::core::{Config, ReliabilityConfig};
pub use modal::{BroadcastConfig, ModalConfig};
pub use observability::{LogLevel, ObservabilityConfig};
pub use slack::SlackConfig;
