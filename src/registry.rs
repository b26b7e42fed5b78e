//! Part factory registry.
//!
//! The registry maps palette names to factories producing a
//! [`ComponentSpec`], enabling configuration-driven circuit setup.
//!
//! # Example
//!
//! ```
//! use logicboard::registry::{create_default_registry, PartParams};
//! use logicboard::Board;
//!
//! let registry = create_default_registry();
//! let spec = registry
//!     .create("And", &PartParams::default().with_width(8).with_inputs(3))
//!     .unwrap();
//!
//! let mut board = Board::new(1);
//! let and = board.add_component(spec).unwrap();
//! assert_eq!(board.component(and).unwrap().inputs.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::component::{ComponentKind, ComponentSpec};
use crate::error::{SimError, SimResult};
use crate::parts::{AdderKind, GateKind};
use crate::types::SimTime;

/// Optional overrides passed to a factory. Unset fields keep the part's
/// defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartParams {
    pub width: Option<u32>,
    /// Field width (number of gate inputs)
    pub inputs: Option<u32>,
    pub delay: Option<SimTime>,
    /// Initial switch value
    pub value: Option<u64>,
    pub label: Option<String>,
}

impl PartParams {
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

    /// Applies the overrides to a default spec.
    pub fn apply(&self, mut spec: ComponentSpec) -> ComponentSpec {
        if let Some(width) = self.width {
            spec.width = width;
        }
        if let Some(inputs) = self.inputs {
            spec.field_width = inputs;
        }
        if let Some(delay) = self.delay {
            spec.delay = delay;
        }
        if let Some(label) = &self.label {
            spec.label = Some(label.clone());
        }
        spec
    }
}

/// Type alias for part factory functions.
pub type PartFactory = Arc<dyn Fn(&PartParams) -> ComponentSpec + Send + Sync>;

/// A registry of part factories.
#[derive(Default)]
pub struct PartRegistry {
    factories: HashMap<String, PartFactory>,
}

impl PartRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&PartParams) -> ComponentSpec + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Builds a validated spec for the named part.
    ///
    /// Fails with [`SimError::UnsupportedPart`] for unregistered names and
    /// with a width error if the parameters are out of range.
    pub fn create(&self, name: &str, params: &PartParams) -> SimResult<ComponentSpec> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| SimError::UnsupportedPart(name.to_string()))?;
        let spec = factory(params);
        spec.validate()?;
        Ok(spec)
    }

    /// Returns true if a part is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the number of registered parts.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no parts are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered part names, sorted.
    pub fn part_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Unregisters a part.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    /// Clears all registered parts.
    pub fn clear(&mut self) {
        self.factories.clear();
    }
}

impl std::fmt::Debug for PartRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartRegistry")
            .field("parts", &self.part_names())
            .finish()
    }
}

/// Creates a registry with every built-in part.
///
/// Gates are registered as `And`, `Nand`, `Or`, `Nor`, `Xor`, `Xnor`, `Buf`
/// and `Not`; the rest as `HalfAdder`, `Adder`, `Clock`, `Switch`, `Ground`
/// and `Bulb`.
pub fn create_default_registry() -> PartRegistry {
    let mut registry = PartRegistry::new();

    for gate in GateKind::ALL {
        let name = format!("{gate:?}");
        registry.register(name, move |params| params.apply(ComponentSpec::gate(gate)));
    }

    registry.register("HalfAdder", |params| {
        params.apply(ComponentSpec::adder(AdderKind::Half))
    });
    registry.register("Adder", |params| {
        params.apply(ComponentSpec::adder(AdderKind::Full))
    });
    registry.register("Clock", |params| params.apply(ComponentSpec::new(ComponentKind::Clock)));
    registry.register("Switch", |params| {
        params.apply(ComponentSpec::switch(params.value.unwrap_or(0)))
    });
    registry.register("Ground", |params| params.apply(ComponentSpec::ground()));
    registry.register("Bulb", |params| params.apply(ComponentSpec::bulb()));

    registry
}
