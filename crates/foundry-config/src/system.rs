//! Gateway configuration parsing.

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode, KdlValue};
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Process-wide settings handed to the gateway at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to.
    pub bind: IpAddr,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Directory holding one subdirectory per project. Must already exist.
    pub workspace_root: PathBuf,
    /// External tools the gateway shells out to.
    pub tools: ToolsConfig,
    /// Kill external processes that run longer than this. `None` waits forever.
    pub process_timeout: Option<Duration>,
    /// Serialize operations that name the same project.
    pub serialize_projects: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolsConfig {
    /// Version-control client.
    pub git: String,
    /// Engine binary used for tests and exports.
    pub godot: String,
    /// Rendering driver forced on every engine run.
    pub rendering_driver: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            godot: "godot".to_string(),
            rendering_driver: "opengl3".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            workspace_root: PathBuf::from("/workspace"),
            tools: ToolsConfig::default(),
            process_timeout: None,
            serialize_projects: true,
        }
    }
}

impl GatewayConfig {
    /// Load defaults, then the optional KDL file, then the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "Reading gateway config");
                let content = std::fs::read_to_string(path)?;
                parse_gateway_config(&content)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override settings from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", format!("not a port number: {}", port)))?;
        }

        if let Some(bind) = lookup("FOUNDRY_BIND") {
            self.bind = bind.trim().parse().map_err(|_| {
                ConfigError::invalid("FOUNDRY_BIND", format!("not an IP address: {}", bind))
            })?;
        }

        if let Some(root) = lookup("FOUNDRY_WORKSPACE_DIR") {
            self.workspace_root = PathBuf::from(root);
        }

        if let Some(git) = lookup("GIT_BIN") {
            self.tools.git = git;
        }

        if let Some(godot) = lookup("GODOT_BIN") {
            self.tools.godot = godot;
        }

        if let Some(driver) = lookup("GODOT_RENDERING_DRIVER") {
            self.tools.rendering_driver = driver;
        }

        if let Some(secs) = lookup("FOUNDRY_PROCESS_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ConfigError::invalid(
                    "FOUNDRY_PROCESS_TIMEOUT_SECS",
                    format!("not a number of seconds: {}", secs),
                )
            })?;
            self.process_timeout = timeout_from_secs(secs);
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Parse a gateway configuration from KDL text, on top of the defaults.
pub fn parse_gateway_config(kdl: &str) -> ConfigResult<GatewayConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = GatewayConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "server" => {
                if let Some(port) = node.get("port") {
                    config.port = parse_port(port)?;
                }
                if let Some(bind) = node.get("bind") {
                    let bind = bind
                        .as_string()
                        .ok_or_else(|| ConfigError::invalid("server bind", "expected a string"))?;
                    config.bind = bind.parse().map_err(|_| {
                        ConfigError::invalid("server bind", format!("not an IP address: {}", bind))
                    })?;
                }
            }
            "workspace" => {
                let root = get_first_string_arg(node)
                    .ok_or_else(|| ConfigError::invalid("workspace", "expected a path string"))?;
                config.workspace_root = PathBuf::from(root);
            }
            "tools" => {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        let field = child.name().value();
                        let value = get_first_string_arg(child).ok_or_else(|| {
                            ConfigError::invalid(&format!("tools {}", field), "expected a string")
                        })?;
                        match field {
                            "git" => config.tools.git = value,
                            "godot" => config.tools.godot = value,
                            "rendering-driver" => config.tools.rendering_driver = value,
                            _ => {}
                        }
                    }
                }
            }
            "process-timeout" => {
                let secs = get_first_arg(node)
                    .and_then(KdlValue::as_integer)
                    .ok_or_else(|| ConfigError::invalid("process-timeout", "expected seconds"))?;
                let secs = u64::try_from(secs).map_err(|_| {
                    ConfigError::invalid("process-timeout", "must not be negative")
                })?;
                config.process_timeout = timeout_from_secs(secs);
            }
            "serialize-projects" => {
                config.serialize_projects = get_first_arg(node)
                    .and_then(KdlValue::as_bool)
                    .ok_or_else(|| {
                        ConfigError::invalid("serialize-projects", "expected #true or #false")
                    })?;
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(config)
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_port(value: &KdlValue) -> ConfigResult<u16> {
    value
        .as_integer()
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| ConfigError::invalid("server port", format!("not a port number: {}", value)))
}

fn get_first_arg(node: &KdlNode) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    get_first_arg(node)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}
