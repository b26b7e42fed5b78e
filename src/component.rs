//! Component definitions.
//!
//! A [`Component`] is a placed part on the board: a [`ComponentKind`] plus
//! its width, field width, delay and the ids of its ordered input and output
//! pins. The board owns the pins; a component only refers to them.
//!
//! Components never write their outputs directly. [`Component::operate`]
//! returns the states each output should take, and the board schedules them
//! after the component's delay.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimError, SimResult};
use crate::parts::{adder, io, AdderKind, GateKind};
use crate::state::{bit_mask, LogicState, MAX_WIDTH};
use crate::types::{ComponentId, PinId, SimTime};

/// Default propagation delay of gates, adders and clocks.
pub const DEFAULT_DELAY: SimTime = 1;

/// What a component is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Gate(GateKind),
    Adder(AdderKind),
    Clock,
    /// A user-operated source holding a per-bit value
    Switch { value: u64 },
    Ground,
    /// A terminal sink, lit by a clean driven 1
    Bulb { lit: bool },
}

impl ComponentKind {
    /// Interaction metadata for this kind.
    pub fn info(&self) -> PartInfo {
        match self {
            ComponentKind::Gate(gate) => PartInfo {
                adjustable_width: true,
                adjustable_field_width: !gate.is_unary(),
                min_width: 1,
                max_width: MAX_WIDTH,
                min_field_width: gate.min_inputs(),
                max_field_width: gate.max_inputs(),
                has_delay: true,
                min_delay: 0,
            },
            ComponentKind::Adder(_) => PartInfo {
                adjustable_width: true,
                max_width: MAX_WIDTH,
                has_delay: true,
                ..PartInfo::fixed()
            },
            ComponentKind::Switch { .. } => PartInfo {
                adjustable_width: true,
                max_width: MAX_WIDTH,
                ..PartInfo::fixed()
            },
            // a zero period would toggle at the same instant forever
            ComponentKind::Clock => PartInfo {
                has_delay: true,
                min_delay: 1,
                ..PartInfo::fixed()
            },
            ComponentKind::Ground | ComponentKind::Bulb { .. } => PartInfo::fixed(),
        }
    }

    /// Input count of a freshly placed part.
    pub fn default_field_width(&self) -> u32 {
        match self {
            ComponentKind::Gate(gate) => gate.default_inputs(),
            _ => 0,
        }
    }

    /// Pin layout at the given widths.
    pub fn pin_layout(&self, width: u32, field_width: u32) -> PinLayout {
        let mut layout = PinLayout::default();
        match self {
            ComponentKind::Gate(gate) => {
                let count = if gate.is_unary() { 1 } else { field_width };
                for i in 0..count {
                    layout.inputs.push(PinTemplate::new(width, input_label(i)));
                }
                layout.outputs.push(PinTemplate::new(width, "Y"));
            }
            ComponentKind::Adder(kind) => {
                layout.inputs.push(PinTemplate::new(width, "A"));
                layout.inputs.push(PinTemplate::new(width, "B"));
                if *kind == AdderKind::Full {
                    layout.inputs.push(PinTemplate::new(1, "Cin"));
                }
                layout.outputs.push(PinTemplate::new(width, "S"));
                layout.outputs.push(PinTemplate::new(1, "Cout"));
            }
            ComponentKind::Clock => layout.outputs.push(PinTemplate::new(1, "CLK")),
            ComponentKind::Switch { .. } => layout.outputs.push(PinTemplate::new(width, "Q")),
            ComponentKind::Ground => layout.outputs.push(PinTemplate::new(width, "GND")),
            ComponentKind::Bulb { .. } => layout.inputs.push(PinTemplate::new(1, "L")),
        }
        layout
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Gate(gate) => write!(f, "{gate} gate"),
            ComponentKind::Adder(kind) => write!(f, "{kind}"),
            ComponentKind::Clock => f.write_str("clock"),
            ComponentKind::Switch { .. } => f.write_str("switch"),
            ComponentKind::Ground => f.write_str("ground"),
            ComponentKind::Bulb { .. } => f.write_str("bulb"),
        }
    }
}

fn input_label(index: u32) -> String {
    char::from_u32('A' as u32 + index)
        .map(String::from)
        .unwrap_or_else(|| format!("I{index}"))
}

/// Which properties of a part the user may change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartInfo {
    pub adjustable_width: bool,
    pub adjustable_field_width: bool,
    pub min_width: u32,
    pub max_width: u32,
    pub min_field_width: u32,
    pub max_field_width: u32,
    pub has_delay: bool,
    /// Smallest accepted propagation delay
    pub min_delay: SimTime,
}

impl PartInfo {
    /// A single-bit part with nothing adjustable.
    pub const fn fixed() -> Self {
        Self {
            adjustable_width: false,
            adjustable_field_width: false,
            min_width: 1,
            max_width: 1,
            min_field_width: 0,
            max_field_width: 0,
            has_delay: false,
            min_delay: 0,
        }
    }

    /// Checks a requested width and field width against this part's ranges.
    pub fn check(&self, width: u32, field_width: u32) -> SimResult<()> {
        let max_width = if self.adjustable_width {
            self.max_width
        } else {
            self.min_width
        };
        if width < self.min_width || width > max_width {
            return Err(SimError::InvalidWidth {
                width,
                min: self.min_width,
                max: max_width,
            });
        }
        if field_width < self.min_field_width || field_width > self.max_field_width {
            return Err(SimError::InvalidFieldWidth {
                field_width,
                min: self.min_field_width,
                max: self.max_field_width,
            });
        }
        Ok(())
    }

    /// Checks a requested propagation delay.
    pub fn check_delay(&self, delay: SimTime) -> SimResult<()> {
        if self.has_delay && delay < self.min_delay {
            return Err(SimError::InvalidDelay {
                delay,
                min: self.min_delay,
            });
        }
        Ok(())
    }
}

/// Width and label of one pin to be created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinTemplate {
    pub width: u32,
    pub label: String,
}

impl PinTemplate {
    fn new(width: u32, label: impl Into<String>) -> Self {
        Self {
            width,
            label: label.into(),
        }
    }
}

/// Ordered pin templates for a component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinLayout {
    pub inputs: Vec<PinTemplate>,
    pub outputs: Vec<PinTemplate>,
}

/// Everything needed to place a component on a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub kind: ComponentKind,
    /// Bit-width of the data pins
    pub width: u32,
    /// Number of gate inputs (0 for parts without a field width)
    pub field_width: u32,
    /// Propagation delay in simulation time units
    pub delay: SimTime,
    /// Optional display name
    pub label: Option<String>,
}

impl ComponentSpec {
    /// Creates a spec with the kind's defaults: width 1, default field width,
    /// and [`DEFAULT_DELAY`] for parts that have a delay.
    pub fn new(kind: ComponentKind) -> Self {
        let delay = if kind.info().has_delay {
            DEFAULT_DELAY
        } else {
            0
        };
        Self {
            kind,
            width: 1,
            field_width: kind.default_field_width(),
            delay,
            label: None,
        }
    }

    pub fn gate(gate: GateKind) -> Self {
        Self::new(ComponentKind::Gate(gate))
    }

    pub fn adder(kind: AdderKind) -> Self {
        Self::new(ComponentKind::Adder(kind))
    }

    pub fn clock(delay: SimTime) -> Self {
        Self::new(ComponentKind::Clock).with_delay(delay)
    }

    pub fn switch(value: u64) -> Self {
        Self::new(ComponentKind::Switch { value })
    }

    pub fn ground() -> Self {
        Self::new(ComponentKind::Ground)
    }

    pub fn bulb() -> Self {
        Self::new(ComponentKind::Bulb { lit: false })
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_inputs(mut self, field_width: u32) -> Self {
        self.field_width = field_width;
        self
    }

    pub fn with_delay(mut self, delay: SimTime) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Checks widths and delay against the part's ranges.
    pub fn validate(&self) -> SimResult<()> {
        let info = self.kind.info();
        info.check(self.width, self.field_width)?;
        info.check_delay(self.delay)
    }
}

/// A part placed on the board.
#[derive(Clone, Debug)]
pub struct Component {
    /// Unique identifier
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub width: u32,
    pub field_width: u32,
    pub delay: SimTime,
    pub label: Option<String>,
    /// Input pins in order
    pub inputs: Vec<PinId>,
    /// Output pins in order
    pub outputs: Vec<PinId>,
}

impl Component {
    /// Creates a component with no pins yet.
    pub fn new(id: ComponentId, spec: ComponentSpec) -> Self {
        let delay = if spec.kind.info().has_delay {
            spec.delay
        } else {
            0
        };
        let kind = match spec.kind {
            ComponentKind::Switch { value } => ComponentKind::Switch {
                value: value & bit_mask(spec.width),
            },
            kind => kind,
        };
        Self {
            id,
            kind,
            width: spec.width,
            field_width: spec.field_width,
            delay,
            label: spec.label,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Interaction metadata.
    pub fn info(&self) -> PartInfo {
        self.kind.info()
    }

    /// Whether a bulb is lit. `None` for anything that is not a bulb.
    pub fn lit(&self) -> Option<bool> {
        match self.kind {
            ComponentKind::Bulb { lit } => Some(lit),
            _ => None,
        }
    }

    /// The stored value of a switch.
    pub fn switch_value(&self) -> Option<u64> {
        match self.kind {
            ComponentKind::Switch { value } => Some(value),
            _ => None,
        }
    }

    /// Display name: the label if set, otherwise kind and id.
    pub fn name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{} {}", self.kind, self.id),
        }
    }

    /// Evaluates the transfer function.
    ///
    /// `inputs` and `outputs` are the current states of this component's pins
    /// in order. Returns `(output index, state)` pairs to be scheduled after
    /// the component's delay. A bulb updates its lit flag and returns nothing.
    pub fn operate(
        &mut self,
        inputs: &[LogicState],
        outputs: &[LogicState],
    ) -> Vec<(usize, LogicState)> {
        let width = self.width;
        let input = |i: usize| {
            inputs
                .get(i)
                .copied()
                .unwrap_or_else(|| LogicState::high_z(width))
        };

        match &mut self.kind {
            ComponentKind::Gate(gate) => vec![(0, gate.evaluate(inputs, width))],
            ComponentKind::Adder(AdderKind::Half) => {
                let out = adder::half_add(input(0), input(1), width);
                vec![(0, out.sum), (1, out.carry)]
            }
            ComponentKind::Adder(AdderKind::Full) => {
                let carry_in = inputs
                    .get(2)
                    .copied()
                    .unwrap_or_else(|| LogicState::high_z(1));
                let out = adder::full_add(input(0), input(1), carry_in, width);
                vec![(0, out.sum), (1, out.carry)]
            }
            ComponentKind::Clock => {
                let current = outputs.first().copied().unwrap_or_default();
                vec![(0, io::clock_next(current))]
            }
            ComponentKind::Switch { value } => vec![(0, io::switch_output(*value, width))],
            ComponentKind::Ground => vec![(0, io::ground_output())],
            ComponentKind::Bulb { lit } => {
                *lit = io::bulb_lit(input(0));
                Vec::new()
            }
        }
    }
}
