pub mod schema;

pub use schema::{BackendConfig, Config, GovernanceConfig, ReliabilityConfig, SinkConfig};
