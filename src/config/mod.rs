pub mod schema;

pub use schema::{
    BroadcastConfig, Config, LogLevel, ModalConfig, ObservabilityConfig, ReliabilityConfig,
    SlackConfig,
};
