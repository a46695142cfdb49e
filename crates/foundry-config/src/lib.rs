//! Configuration for the Foundry workspace gateway.
//!
//! Settings are layered: built-in defaults, then an optional KDL file,
//! then environment variables.

pub mod error;
pub mod system;

pub use error::{ConfigError, ConfigResult};
pub use system::{GatewayConfig, ToolsConfig, parse_gateway_config};
