//! The board: circuit graph and discrete-event scheduler.
//!
//! A [`Board`] owns every component, pin and connection of one circuit, the
//! ordered event queue and the simulation clock. All mutation goes through
//! `&mut Board`, so propagation and transfer-function evaluation always run
//! on a single logical thread.
//!
//! # Propagation
//!
//! Writing a pin is synchronous:
//! - writing an input pin operates its component, which schedules new output
//!   states after the component's delay;
//! - writing an output pin propagates to every connected input.
//!
//! Scheduled writes are applied when the board advances past their time, in
//! `(time, pin, sequence)` order.
//!
//! # Sessions
//!
//! ```
//! use logicboard::{Board, ComponentSpec, LogicState};
//!
//! let mut board = Board::new(1);
//! let clock = board.add_component(ComponentSpec::clock(10)).unwrap();
//! let out = board.output(clock, 0).unwrap();
//!
//! board.start();
//! for _ in 0..10 {
//!     board.tick().unwrap();
//! }
//! assert_eq!(board.pin_state(out), Some(LogicState::driven(1)));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, trace, warn};

use crate::component::{Component, ComponentKind, ComponentSpec, PinTemplate};
use crate::error::{ConnectError, SimError, SimResult};
use crate::event::ScheduledEvent;
use crate::observer::{BoardEvent, Observers};
use crate::parts::io;
use crate::pin::{Connection, Pin, PinDirection};
use crate::queue::EventQueue;
use crate::state::{bit_mask, LogicState};
use crate::stats::BoardStats;
use crate::types::{ComponentId, ConnectionId, ListenerId, PinId, SimTime};

/// Default amount of simulation time per step.
pub const DEFAULT_STEP: SimTime = 1;

/// Session state of a board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Time is zero and nothing is pending
    #[default]
    Stopped,
    /// Every tick advances one step
    Running,
    /// Ticks are ignored; single steps still work
    Paused,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Stopped => f.write_str("stopped"),
            RunMode::Running => f.write_str("running"),
            RunMode::Paused => f.write_str("paused"),
        }
    }
}

/// A circuit and its scheduler.
#[derive(Debug)]
pub struct Board {
    components: BTreeMap<ComponentId, Component>,
    pins: BTreeMap<PinId, Pin>,
    connections: BTreeMap<ConnectionId, Connection>,
    queue: EventQueue<ScheduledEvent>,
    /// Current simulation time
    current_time: SimTime,
    /// Time added by each step
    step: SimTime,
    mode: RunMode,
    /// Shared counter for component, pin and connection ids
    next_id: u64,
    /// Scheduling counter used to break ties between events
    next_seq: u64,
    /// Set by `stop`; the next advance re-evaluates every component
    needs_prime: bool,
    observers: Observers,
    stats: BoardStats,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl Board {
    /// Creates an empty, stopped board advancing `step` time units per step.
    pub fn new(step: SimTime) -> Self {
        Self {
            components: BTreeMap::new(),
            pins: BTreeMap::new(),
            connections: BTreeMap::new(),
            queue: EventQueue::new(),
            current_time: 0,
            step,
            mode: RunMode::Stopped,
            next_id: 0,
            next_seq: 0,
            needs_prime: false,
            observers: Observers::new(),
            stats: BoardStats::new(),
        }
    }

    /// Returns the current simulation time.
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Returns the time step.
    pub fn step(&self) -> SimTime {
        self.step
    }

    /// Changes the time step used by later steps.
    pub fn set_step(&mut self, step: SimTime) {
        self.step = step;
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == RunMode::Running
    }

    /// The pending event queue.
    pub fn queue(&self) -> &EventQueue<ScheduledEvent> {
        &self.queue
    }

    /// Number of pending events.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> &BoardStats {
        &self.stats
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// All components in creation order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(&id)
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Current state of a pin.
    pub fn pin_state(&self, id: PinId) -> Option<LogicState> {
        self.pins.get(&id).map(|p| p.state)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// All connections, feedback connections included.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// The `index`-th input pin of a component.
    pub fn input(&self, component: ComponentId, index: usize) -> SimResult<PinId> {
        let c = self
            .components
            .get(&component)
            .ok_or(SimError::UnknownComponent(component))?;
        c.inputs
            .get(index)
            .copied()
            .ok_or(SimError::PinIndex { component, index })
    }

    /// The `index`-th output pin of a component.
    pub fn output(&self, component: ComponentId, index: usize) -> SimResult<PinId> {
        let c = self
            .components
            .get(&component)
            .ok_or(SimError::UnknownComponent(component))?;
        c.outputs
            .get(index)
            .copied()
            .ok_or(SimError::PinIndex { component, index })
    }

    /// Whether a bulb is lit. `None` if `id` is not a bulb.
    pub fn bulb_lit(&self, id: ComponentId) -> Option<bool> {
        self.components.get(&id).and_then(Component::lit)
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn state_of(&self, pin: PinId) -> LogicState {
        self.pins.get(&pin).map(|p| p.state).unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Places a component, creates its pins and resets it.
    pub fn add_component(&mut self, spec: ComponentSpec) -> SimResult<ComponentId> {
        spec.validate()?;

        let id = ComponentId(self.alloc_id());
        let layout = spec.kind.pin_layout(spec.width, spec.field_width);
        let mut component = Component::new(id, spec);
        component.inputs = layout
            .inputs
            .iter()
            .map(|t| self.create_pin(id, PinDirection::Input, t))
            .collect();
        component.outputs = layout
            .outputs
            .iter()
            .map(|t| self.create_pin(id, PinDirection::Output, t))
            .collect();

        debug!(component = %id, kind = %component.kind, width = component.width, "added component");
        self.components.insert(id, component);
        self.observers.emit(BoardEvent::ComponentAdded { component: id });

        self.reset_component_inner(id);
        Ok(id)
    }

    fn create_pin(&mut self, parent: ComponentId, direction: PinDirection, template: &PinTemplate) -> PinId {
        let id = PinId(self.alloc_id());
        let pin = Pin::new(id, parent, direction, template.width).with_label(template.label.clone());
        self.pins.insert(id, pin);
        id
    }

    /// Removes a component with all its pins and connections.
    ///
    /// Inputs it was driving become floating. Events already queued for its
    /// pins are dropped when they come due.
    pub fn remove_component(&mut self, id: ComponentId) -> SimResult<()> {
        let component = self
            .components
            .remove(&id)
            .ok_or(SimError::UnknownComponent(id))?;

        for pin in component.inputs.iter().chain(&component.outputs) {
            self.destroy_pin(*pin);
        }

        debug!(component = %id, "removed component");
        self.observers.emit(BoardEvent::ComponentRemoved { component: id });
        Ok(())
    }

    fn destroy_pin(&mut self, pin: PinId) {
        let Some(p) = self.pins.get(&pin) else {
            return;
        };
        let connections: Vec<ConnectionId> = p.connections().collect();

        let mut orphans = Vec::new();
        for id in connections {
            if let Some(connection) = self.unlink(id) {
                if connection.sink != pin {
                    orphans.push(connection.sink);
                }
            }
        }
        self.pins.remove(&pin);

        for sink in orphans {
            self.reset_pin_inner(sink);
        }
    }

    /// Changes a component's bit-width and field width.
    ///
    /// A pin survives when its position still exists and its width is
    /// unchanged, so adding gate inputs keeps the existing wiring. Every other
    /// pin is destroyed with its connections and rebuilt. The component is
    /// reset afterwards.
    pub fn resize(&mut self, id: ComponentId, width: u32, field_width: u32) -> SimResult<()> {
        let component = self
            .components
            .get(&id)
            .ok_or(SimError::UnknownComponent(id))?;
        component.info().check(width, field_width)?;
        if component.width == width && component.field_width == field_width {
            return Ok(());
        }

        let layout = component.kind.pin_layout(width, field_width);
        let old_inputs = component.inputs.clone();
        let old_outputs = component.outputs.clone();

        let inputs = self.rebuild_pins(id, PinDirection::Input, old_inputs, &layout.inputs);
        let outputs = self.rebuild_pins(id, PinDirection::Output, old_outputs, &layout.outputs);

        if let Some(component) = self.components.get_mut(&id) {
            component.width = width;
            component.field_width = field_width;
            component.inputs = inputs;
            component.outputs = outputs;
        }

        debug!(component = %id, width, field_width, "resized component");
        self.observers.emit(BoardEvent::ComponentChanged { component: id });
        self.reset_component_inner(id);
        Ok(())
    }

    fn rebuild_pins(
        &mut self,
        parent: ComponentId,
        direction: PinDirection,
        existing: Vec<PinId>,
        templates: &[PinTemplate],
    ) -> Vec<PinId> {
        let mut pins = Vec::with_capacity(templates.len());
        let mut existing = existing.into_iter();

        for template in templates {
            match existing.next() {
                Some(pin) if self.pins.get(&pin).is_some_and(|p| p.width == template.width) => {
                    pins.push(pin);
                }
                Some(pin) => {
                    self.destroy_pin(pin);
                    pins.push(self.create_pin(parent, direction, template));
                }
                None => pins.push(self.create_pin(parent, direction, template)),
            }
        }
        for pin in existing {
            self.destroy_pin(pin);
        }

        pins
    }

    /// Sets the propagation delay. Takes effect for events scheduled later.
    pub fn set_delay(&mut self, id: ComponentId, delay: SimTime) -> SimResult<()> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or(SimError::UnknownComponent(id))?;
        let info = component.info();
        if !info.has_delay {
            return Err(SimError::FixedDelay(id));
        }
        info.check_delay(delay)?;
        component.delay = delay;

        debug!(component = %id, delay, "changed delay");
        self.observers.emit(BoardEvent::ComponentChanged { component: id });
        Ok(())
    }

    /// Sets a switch's value and drives it immediately.
    ///
    /// Bits beyond the switch's width are discarded. The value is kept
    /// across `stop`.
    pub fn set_switch(&mut self, id: ComponentId, value: u64) -> SimResult<()> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or(SimError::UnknownComponent(id))?;
        let width = component.width;
        let ComponentKind::Switch { value: stored } = &mut component.kind else {
            return Err(SimError::NotASwitch(id));
        };
        *stored = value & bit_mask(width);
        let value = *stored;
        let output = component.outputs.first().copied();

        trace!(component = %id, value, "switch set");
        self.observers.emit(BoardEvent::ComponentChanged { component: id });
        if let Some(pin) = output {
            self.drive_output(pin, io::switch_output(value, width));
        }
        Ok(())
    }

    /// Flips one bit of a switch.
    pub fn toggle_switch_bit(&mut self, id: ComponentId, bit: u32) -> SimResult<()> {
        let component = self
            .components
            .get(&id)
            .ok_or(SimError::UnknownComponent(id))?;
        let value = component.switch_value().ok_or(SimError::NotASwitch(id))?;
        let width = component.width;
        self.set_switch(id, io::toggle_bit(value, bit, width))
    }

    // ---------------------------------------------------------------------
    // Wiring
    // ---------------------------------------------------------------------

    /// Connects an output pin to an input pin, in either argument order.
    ///
    /// The input's previous connection, if any, is replaced and the input
    /// immediately takes the output's current state. Connecting a pair that
    /// is already connected returns the existing connection.
    pub fn connect(&mut self, a: PinId, b: PinId) -> Result<ConnectionId, ConnectError> {
        let first = self.pins.get(&a).ok_or(ConnectError::UnknownPin(a))?;
        let second = self.pins.get(&b).ok_or(ConnectError::UnknownPin(b))?;
        first.check_connect(second)?;

        let (source, sink) = if first.is_output() {
            (first, second)
        } else {
            (second, first)
        };

        let previous: Vec<Connection> = sink
            .connections()
            .filter_map(|c| self.connections.get(&c))
            .copied()
            .collect();
        let (source, sink, state) = (source.id, sink.id, source.state);

        if let Some(same) = previous.iter().find(|c| c.source == source) {
            return Ok(same.id);
        }
        for connection in previous {
            self.unlink(connection.id);
        }

        let id = ConnectionId(self.alloc_id());
        self.link(Connection::new(id, source, sink));
        debug!(connection = %id, %source, %sink, "connected");

        self.write_pin(sink, state);
        Ok(id)
    }

    /// Removes a connection. The input it fed becomes floating.
    ///
    /// Returns false if the connection did not exist.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let Some(connection) = self.unlink(id) else {
            return false;
        };
        debug!(connection = %id, "disconnected");
        if !connection.is_feedback() {
            self.reset_pin_inner(connection.sink);
        }
        true
    }

    /// Removes every connection touching `pin`.
    pub fn disconnect_all(&mut self, pin: PinId) -> SimResult<()> {
        let p = self.pins.get(&pin).ok_or(SimError::UnknownPin(pin))?;
        let connections: Vec<ConnectionId> = p.connections().collect();
        for id in connections {
            self.disconnect(id);
        }
        Ok(())
    }

    fn link(&mut self, connection: Connection) {
        let id = connection.id;
        for end in [connection.source, connection.sink] {
            if let Some(pin) = self.pins.get_mut(&end) {
                pin.connections.insert(id);
            }
        }
        self.connections.insert(id, connection);
        self.observers.emit(BoardEvent::Connected { connection: id });
    }

    fn unlink(&mut self, id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(&id)?;
        for end in [connection.source, connection.sink] {
            if let Some(pin) = self.pins.get_mut(&end) {
                pin.connections.remove(&id);
            }
        }
        self.observers.emit(BoardEvent::Disconnected { connection: id });
        Some(connection)
    }

    /// Makes sure `pin` feeds back into itself.
    fn install_feedback(&mut self, pin: PinId) {
        let Some(p) = self.pins.get(&pin) else {
            return;
        };
        let present = p
            .connections()
            .filter_map(|c| self.connections.get(&c))
            .any(Connection::is_feedback);
        if !present {
            let id = ConnectionId(self.alloc_id());
            self.link(Connection::feedback(id, pin));
        }
    }

    // ---------------------------------------------------------------------
    // Propagation
    // ---------------------------------------------------------------------

    /// Writes a pin and propagates synchronously.
    pub fn set_pin_state(&mut self, pin: PinId, state: LogicState) -> SimResult<()> {
        if !self.pins.contains_key(&pin) {
            return Err(SimError::UnknownPin(pin));
        }
        self.write_pin(pin, state);
        Ok(())
    }

    /// Pushes an output pin's state to every connected input.
    ///
    /// With `force`, inputs are rewritten even if they already hold the state.
    /// Calling this on an input pin does nothing.
    pub fn update_next(&mut self, pin: PinId, force: bool) -> SimResult<()> {
        if !self.pins.contains_key(&pin) {
            return Err(SimError::UnknownPin(pin));
        }
        self.propagate(pin, force);
        Ok(())
    }

    /// Applies the reset rule to a single pin.
    pub fn reset_pin(&mut self, pin: PinId) -> SimResult<()> {
        if !self.pins.contains_key(&pin) {
            return Err(SimError::UnknownPin(pin));
        }
        self.reset_pin_inner(pin);
        Ok(())
    }

    /// Resets a component to its power-up state.
    pub fn reset_component(&mut self, id: ComponentId) -> SimResult<()> {
        if !self.components.contains_key(&id) {
            return Err(SimError::UnknownComponent(id));
        }
        self.reset_component_inner(id);
        Ok(())
    }

    /// Evaluates a component and schedules its outputs.
    pub fn operate(&mut self, id: ComponentId) -> SimResult<()> {
        if !self.components.contains_key(&id) {
            return Err(SimError::UnknownComponent(id));
        }
        self.operate_component(id);
        Ok(())
    }

    fn store_state(&mut self, pin: PinId, state: LogicState) -> Option<(PinDirection, ComponentId)> {
        let p = self.pins.get_mut(&pin)?;
        p.state = state;
        let target = (p.direction, p.parent);
        self.observers.emit(BoardEvent::PinChanged { pin, state });
        Some(target)
    }

    fn write_pin(&mut self, pin: PinId, state: LogicState) {
        match self.store_state(pin, state) {
            Some((PinDirection::Input, parent)) => self.operate_component(parent),
            Some((PinDirection::Output, _)) => self.propagate(pin, false),
            None => {}
        }
    }

    /// Stores an output state and force-propagates it.
    fn drive_output(&mut self, pin: PinId, state: LogicState) {
        if self.store_state(pin, state).is_some() {
            self.propagate(pin, true);
        }
    }

    fn propagate(&mut self, pin: PinId, force: bool) {
        let Some(source) = self.pins.get(&pin) else {
            return;
        };
        if !source.is_output() {
            return;
        }
        let state = source.state;
        let sinks: Vec<(PinId, bool)> = source
            .connections()
            .filter_map(|c| self.connections.get(&c))
            .filter(|c| c.source == pin)
            .map(|c| (c.sink, c.is_feedback()))
            .collect();

        // Every sink's parent runs exactly once: through the write when the
        // sink changes, directly otherwise.
        for (sink, feedback) in sinks {
            let Some(sink_pin) = self.pins.get(&sink) else {
                continue;
            };
            let parent = sink_pin.parent;
            if !feedback && (force || sink_pin.state != state) {
                self.write_pin(sink, state);
            } else {
                self.operate_component(parent);
            }
        }
    }

    fn reset_pin_inner(&mut self, pin: PinId) {
        let Some(p) = self.pins.get(&pin) else {
            return;
        };
        let width = p.width;
        match p.direction {
            PinDirection::Input => {
                if !p.is_connected() {
                    self.write_pin(pin, LogicState::high_z(width));
                }
            }
            PinDirection::Output => self.drive_output(pin, LogicState::unknown(width)),
        }
    }

    fn reset_component_inner(&mut self, id: ComponentId) {
        let Some(component) = self.components.get(&id) else {
            return;
        };
        let kind = component.kind;
        let width = component.width;
        let output = component.outputs.first().copied();
        let pins: Vec<PinId> = component
            .inputs
            .iter()
            .chain(&component.outputs)
            .copied()
            .collect();

        match (kind, output) {
            (ComponentKind::Clock, Some(out)) => {
                self.install_feedback(out);
                self.drive_output(out, LogicState::driven(0));
            }
            (ComponentKind::Switch { value }, Some(out)) => {
                self.drive_output(out, io::switch_output(value, width));
            }
            (ComponentKind::Ground, Some(out)) => {
                self.drive_output(out, io::ground_output());
            }
            _ => {
                for pin in pins {
                    self.reset_pin_inner(pin);
                }
            }
        }
    }

    fn operate_component(&mut self, id: ComponentId) {
        let Some(component) = self.components.get(&id) else {
            return;
        };
        let inputs: Vec<LogicState> = component.inputs.iter().map(|p| self.state_of(*p)).collect();
        let outputs: Vec<LogicState> = component.outputs.iter().map(|p| self.state_of(*p)).collect();

        let Some(component) = self.components.get_mut(&id) else {
            return;
        };
        let was_lit = component.lit();
        let drives = component.operate(&inputs, &outputs);
        let lit = component.lit();
        let delay = component.delay;
        let targets: Vec<(PinId, LogicState)> = drives
            .into_iter()
            .filter_map(|(index, state)| component.outputs.get(index).map(|pin| (*pin, state)))
            .collect();

        self.stats.operations += 1;
        trace!(component = %id, time = self.current_time, "operate");

        if let Some(lit) = lit {
            if was_lit != Some(lit) {
                self.observers.emit(BoardEvent::BulbChanged { component: id, lit });
            }
        }
        for (pin, state) in targets {
            self.post_event(pin, state, delay);
        }
    }

    fn post_event(&mut self, pin: PinId, state: LogicState, delay: SimTime) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let time = self.current_time.saturating_add(delay);
        self.queue.insert(ScheduledEvent::new(time, pin, state, seq));
        self.stats.events_scheduled += 1;
        self.stats.observe_queue(self.queue.len());
    }

    // ---------------------------------------------------------------------
    // Session control
    // ---------------------------------------------------------------------

    /// Starts periodic advancement. Does nothing if already running.
    pub fn start(&mut self) {
        if self.mode == RunMode::Running {
            return;
        }
        info!(time = self.current_time, "simulation started");
        self.set_mode(RunMode::Running);
    }

    /// Suspends periodic advancement, keeping the queue as it is.
    ///
    /// Only a running board can be paused.
    pub fn pause(&mut self) {
        if self.mode != RunMode::Running {
            return;
        }
        info!(time = self.current_time, "simulation paused");
        self.set_mode(RunMode::Paused);
    }

    /// Returns time to zero, resets every component and discards all
    /// pending events.
    ///
    /// The next advance re-evaluates every component once so that free
    /// running parts such as clocks start again.
    pub fn stop(&mut self) {
        info!(time = self.current_time, "simulation stopped");
        self.current_time = 0;

        let ids: Vec<ComponentId> = self.components.keys().copied().collect();
        for id in ids {
            self.reset_component_inner(id);
        }
        self.queue.clear();
        self.needs_prime = true;
        self.stats.final_time = 0;

        self.observers.emit(BoardEvent::TimeAdvanced { time: 0 });
        self.set_mode(RunMode::Stopped);
    }

    /// Advances a single step regardless of mode.
    ///
    /// A stopped board becomes paused.
    pub fn advance_one_step(&mut self) -> SimResult<()> {
        if self.mode == RunMode::Stopped {
            self.set_mode(RunMode::Paused);
        }
        self.step_once()
    }

    /// Advances `steps` single steps.
    pub fn run_steps(&mut self, steps: u64) -> SimResult<()> {
        for _ in 0..steps {
            self.advance_one_step()?;
        }
        Ok(())
    }

    /// Timer entry point: advances one step if running.
    ///
    /// Returns whether time moved.
    pub fn tick(&mut self) -> SimResult<bool> {
        if self.mode != RunMode::Running {
            return Ok(false);
        }
        self.step_once()?;
        Ok(true)
    }

    fn step_once(&mut self) -> SimResult<()> {
        let target = self.current_time.saturating_add(self.step);
        self.advance_to(target)?;
        self.stats.steps_executed += 1;
        Ok(())
    }

    /// Applies every event due at or before `target`, then sets the time to
    /// `target`. A target in the past only drains events already due.
    pub fn advance_to(&mut self, target: SimTime) -> SimResult<()> {
        if self.needs_prime {
            self.prime();
        }

        while !self.queue.is_empty() && self.queue.peek_min()?.time <= target {
            let event = self.queue.pop_min()?;
            self.current_time = self.current_time.max(event.time);
            self.apply(event);
        }

        self.current_time = self.current_time.max(target);
        self.stats.final_time = self.current_time;
        self.observers.emit(BoardEvent::TimeAdvanced {
            time: self.current_time,
        });
        Ok(())
    }

    /// Re-evaluates every component from the current pin states.
    ///
    /// Anything queued since `stop` is derived from those same states, so it
    /// is discarded and recomputed.
    fn prime(&mut self) {
        self.needs_prime = false;
        self.queue.clear();
        let ids: Vec<ComponentId> = self.components.keys().copied().collect();
        for id in ids {
            self.operate_component(id);
        }
        debug!(events = self.queue.len(), "primed board");
    }

    fn apply(&mut self, event: ScheduledEvent) {
        if !self.pins.contains_key(&event.pin) {
            warn!(pin = %event.pin, time = event.time, "dropping event for removed pin");
            self.stats.events_dropped += 1;
            return;
        }
        trace!(pin = %event.pin, time = event.time, state = %event.state, "apply");
        self.stats.events_applied += 1;
        self.write_pin(event.pin, event.state);
    }

    fn set_mode(&mut self, mode: RunMode) {
        if self.mode != mode {
            self.mode = mode;
            self.observers.emit(BoardEvent::ModeChanged { mode });
        }
    }

    // ---------------------------------------------------------------------
    // Observers and statistics
    // ---------------------------------------------------------------------

    /// Registers a change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&BoardEvent) + Send + 'static,
    {
        self.observers.subscribe(Box::new(listener))
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Exports board and scheduler statistics.
    pub fn export_stats(&self) -> serde_json::Value {
        serde_json::json!({
            "board": {
                "current_time": self.current_time,
                "step": self.step,
                "mode": self.mode.to_string(),
                "component_count": self.components.len(),
                "pin_count": self.pins.len(),
                "connection_count": self.connections.len(),
                "queue_size": self.queue.len(),
            },
            "stats": self.stats,
        })
    }
}
