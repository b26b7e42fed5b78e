//! Circuit configuration files.
//!
//! A circuit can be described declaratively in YAML or JSON and built into a
//! ready-to-run [`Board`].
//!
//! # Configuration File Structure
//!
//! ```yaml
//! simulation:
//!   step: 1
//!   tick_interval_ms: 100
//!   log_level: info
//!
//! components:
//!   - name: a
//!     part: Switch
//!     value: 1
//!   - name: b
//!     part: Switch
//!   - name: and
//!     part: And
//!     inputs: 2
//!     delay: 2
//!   - name: lamp
//!     part: Bulb
//!
//! connections:
//!   - from: a.0
//!     to: and.0
//!   - from: b.0
//!     to: and.1
//!   - from: and.0
//!     to: lamp.0
//! ```
//!
//! Connection endpoints are `<component name>.<pin index>`: an output index
//! on the `from` side and an input index on the `to` side.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::board::Board;
use crate::error::SimResult;
use crate::registry::{PartParams, PartRegistry};
use crate::types::{ComponentId, SimTime};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Session parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Simulation time added per step
    #[serde(default = "default_step")]
    pub step: SimTime,

    /// Wall-clock interval between ticks of a driver
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_step() -> SimTime {
    1
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            step: default_step(),
            tick_interval_ms: default_tick_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

impl SimulationParams {
    /// The tick interval as a duration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// One placed part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Unique name, used by connection endpoints
    pub name: String,

    /// Registered part name (e.g. "And", "Clock")
    pub part: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Number of gate inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<SimTime>,

    /// Initial value of a switch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

impl ComponentConfig {
    pub fn new(name: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            part: part.into(),
            width: None,
            inputs: None,
            delay: None,
            value: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_inputs(mut self, inputs: u32) -> Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn with_delay(mut self, delay: SimTime) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }

    /// Factory parameters for this entry.
    pub fn params(&self) -> PartParams {
        PartParams {
            width: self.width,
            inputs: self.inputs,
            delay: self.delay,
            value: self.value,
            label: Some(self.name.clone()),
        }
    }
}

/// A wire between two named endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// `<component>.<output index>`
    pub from: String,
    /// `<component>.<input index>`
    pub to: String,
}

/// Splits `name.index` into its parts.
pub fn parse_endpoint(endpoint: &str) -> ConfigResult<(&str, usize)> {
    let (name, index) = endpoint
        .rsplit_once('.')
        .ok_or_else(|| ConfigError::Validation(format!("Malformed endpoint: {endpoint}")))?;
    let index = index
        .parse()
        .map_err(|_| ConfigError::Validation(format!("Malformed pin index in endpoint: {endpoint}")))?;
    if name.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Missing component name in endpoint: {endpoint}"
        )));
    }
    Ok((name, index))
}

/// Complete circuit configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitConfig {
    /// Session parameters
    #[serde(default)]
    pub simulation: SimulationParams,

    /// Placed parts
    #[serde(default)]
    pub components: Vec<ComponentConfig>,

    /// Wires
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

/// A board built from a configuration.
#[derive(Debug)]
pub struct Circuit {
    pub board: Board,
    /// Component ids by configured name
    pub names: HashMap<String, ComponentId>,
    /// Suggested wall-clock tick interval
    pub tick_interval: Duration,
}

impl Circuit {
    /// Looks up a component by its configured name.
    pub fn component(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }
}

impl CircuitConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: CircuitConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: CircuitConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, auto-detecting format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnknownFormat(ext.to_string())),
        }
    }

    /// Validates the configuration without consulting a registry.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.simulation.step == 0 {
            return Err(ConfigError::Validation(
                "Simulation step must be positive".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for component in &self.components {
            if !names.insert(component.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate component name: {}",
                    component.name
                )));
            }
            if component.value.is_some() && component.part != "Switch" {
                warn!(
                    "Component {} is a {} but has a switch value set (ignored)",
                    component.name, component.part
                );
            }
        }

        for connection in &self.connections {
            for endpoint in [&connection.from, &connection.to] {
                let (name, _) = parse_endpoint(endpoint)?;
                if !names.contains(name) {
                    return Err(ConfigError::Validation(format!(
                        "Connection references unknown component: {name}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Instantiates every component through `registry` and wires the
    /// connections.
    ///
    /// Unknown parts and out-of-range widths fail with the registry's error;
    /// a refused connection is reported as a validation error.
    pub fn build(&self, registry: &PartRegistry) -> SimResult<Circuit> {
        self.validate()?;

        let mut board = Board::new(self.simulation.step);
        let mut names = HashMap::new();

        for component in &self.components {
            let spec = registry.create(&component.part, &component.params())?;
            let id = board.add_component(spec)?;
            names.insert(component.name.clone(), id);
        }

        let lookup = |endpoint: &str| -> ConfigResult<(ComponentId, usize)> {
            let (name, index) = parse_endpoint(endpoint)?;
            let id = names.get(name).copied().ok_or_else(|| {
                ConfigError::Validation(format!("Connection references unknown component: {name}"))
            })?;
            Ok((id, index))
        };

        for connection in &self.connections {
            let (from, output) = lookup(&connection.from)?;
            let (to, input) = lookup(&connection.to)?;

            let source = board.output(from, output).map_err(|e| {
                ConfigError::Validation(format!("Bad endpoint {}: {e}", connection.from))
            })?;
            let sink = board.input(to, input).map_err(|e| {
                ConfigError::Validation(format!("Bad endpoint {}: {e}", connection.to))
            })?;
            board.connect(source, sink).map_err(|e| {
                ConfigError::Validation(format!(
                    "Cannot connect {} to {}: {e}",
                    connection.from, connection.to
                ))
            })?;
        }

        info!(
            components = self.components.len(),
            connections = self.connections.len(),
            "circuit built"
        );

        Ok(Circuit {
            board,
            names,
            tick_interval: self.simulation.tick_interval(),
        })
    }

    /// Saves configuration to a YAML file.
    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Saves configuration to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Converts to YAML string.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Converts to JSON string.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the number of components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Returns the number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Finds a component configuration by name.
    pub fn find_component(&self, name: &str) -> Option<&ComponentConfig> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Builder for creating a CircuitConfig programmatically.
#[derive(Default)]
pub struct CircuitConfigBuilder {
    config: CircuitConfig,
}

impl CircuitConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulation step.
    pub fn step(mut self, step: SimTime) -> Self {
        self.config.simulation.step = step;
        self
    }

    /// Sets the driver tick interval.
    pub fn tick_interval_ms(mut self, ms: u64) -> Self {
        self.config.simulation.tick_interval_ms = ms;
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.simulation.log_level = level.into();
        self
    }

    /// Adds a part with default parameters.
    pub fn add_part(self, name: impl Into<String>, part: impl Into<String>) -> Self {
        self.add_component(ComponentConfig::new(name, part))
    }

    /// Adds a fully specified component.
    pub fn add_component(mut self, component: ComponentConfig) -> Self {
        self.config.components.push(component);
        self
    }

    /// Adds a connection between two endpoints.
    pub fn connect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.config.connections.push(ConnectionConfig {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ConfigResult<CircuitConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
