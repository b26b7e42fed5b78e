//! Integration tests for configuration-driven circuits.
//!
//! These tests verify:
//! - Loading YAML and JSON circuit files from disk
//! - Building boards through the part registry
//! - Error reporting for bad files, parts and wiring

use std::fs;

use logicboard::config::ComponentConfig;
use logicboard::{
    create_default_registry, CircuitConfig, CircuitConfigBuilder, ComponentKind, ComponentSpec,
    ConfigError, LogicState, PartRegistry, SimError,
};
use tempfile::tempdir;

const ADDER_YAML: &str = r#"
simulation:
  step: 1
  tick_interval_ms: 20

components:
  - name: a
    part: Switch
    width: 4
    value: 5
  - name: b
    part: Switch
    width: 4
    value: 9
  - name: cin
    part: Switch
    value: 1
  - name: add
    part: Adder
    width: 4
    delay: 2
  - name: overflow
    part: Bulb

connections:
  - from: a.0
    to: add.0
  - from: b.0
    to: add.1
  - from: cin.0
    to: add.2
  - from: add.1
    to: overflow.0
"#;

// ============================================================================
// Loading from disk
// ============================================================================

#[test]
fn test_yaml_file_builds_working_adder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("adder.yaml");
    fs::write(&path, ADDER_YAML).unwrap();

    let config = CircuitConfig::from_file(&path).unwrap();
    assert_eq!(config.component_count(), 5);
    assert_eq!(config.connection_count(), 4);

    let mut circuit = config.build(&create_default_registry()).unwrap();
    assert_eq!(circuit.tick_interval.as_millis(), 20);

    let add = circuit.component("add").unwrap();
    let overflow = circuit.component("overflow").unwrap();
    let board = &mut circuit.board;
    assert_eq!(board.component(add).unwrap().delay, 2);

    board.run_steps(2).unwrap();
    let sum = board.output(add, 0).unwrap();
    // 5 + 9 + 1 = 15
    assert_eq!(board.pin_state(sum), Some(LogicState::driven(0b1111)));
    assert_eq!(board.bulb_lit(overflow), Some(false));

    let b = circuit.component("b").unwrap();
    circuit.board.set_switch(b, 10).unwrap();
    circuit.board.run_steps(2).unwrap();
    // 5 + 10 + 1 = 16
    let sum = circuit.board.pin_state(sum).unwrap();
    assert_eq!(sum, LogicState::driven(0));
    assert_eq!(circuit.board.bulb_lit(overflow), Some(true));
}

#[test]
fn test_json_file_round_trip() {
    let dir = tempdir().unwrap();
    let yaml = CircuitConfig::from_yaml(ADDER_YAML).unwrap();

    let path = dir.path().join("adder.json");
    yaml.to_json_file(&path).unwrap();
    let json = CircuitConfig::from_file(&path).unwrap();
    assert_eq!(json, yaml);

    let path = dir.path().join("adder.yml");
    json.to_yaml_file(&path).unwrap();
    assert_eq!(CircuitConfig::from_file(&path).unwrap(), yaml);
}

#[test]
fn test_file_errors() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("circuit.toml");
    fs::write(&path, "step = 1").unwrap();
    assert!(matches!(
        CircuitConfig::from_file(&path),
        Err(ConfigError::UnknownFormat(ext)) if ext == "toml"
    ));

    assert!(matches!(
        CircuitConfig::from_file(dir.path().join("missing.yaml")),
        Err(ConfigError::Io(_))
    ));

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"components\": [").unwrap();
    assert!(matches!(
        CircuitConfig::from_file(&path),
        Err(ConfigError::Json(_))
    ));

    let path = dir.path().join("broken.yaml");
    fs::write(&path, "components: [name: : :").unwrap();
    assert!(matches!(
        CircuitConfig::from_file(&path),
        Err(ConfigError::Yaml(_))
    ));
}

// ============================================================================
// Building
// ============================================================================

#[test]
fn test_builder_clock_to_bulb() {
    let config = CircuitConfigBuilder::new()
        .step(5)
        .add_component(ComponentConfig::new("clk", "Clock").with_delay(5))
        .add_part("lamp", "Bulb")
        .connect("clk.0", "lamp.0")
        .build()
        .unwrap();

    let mut circuit = config.build(&create_default_registry()).unwrap();
    let lamp = circuit.component("lamp").unwrap();

    circuit.board.advance_one_step().unwrap();
    assert_eq!(circuit.board.current_time(), 5);
    assert_eq!(circuit.board.bulb_lit(lamp), Some(true));
    circuit.board.advance_one_step().unwrap();
    assert_eq!(circuit.board.bulb_lit(lamp), Some(false));
}

#[test]
fn test_unknown_part_fails_build() {
    let config = CircuitConfigBuilder::new()
        .add_part("m", "Mux")
        .build()
        .unwrap();

    let err = config.build(&create_default_registry()).unwrap_err();
    assert!(matches!(err, SimError::UnsupportedPart(name) if name == "Mux"));
}

#[test]
fn test_bad_wiring_fails_build() {
    let mismatch = CircuitConfigBuilder::new()
        .add_component(ComponentConfig::new("bus", "Switch").with_width(8))
        .add_part("lamp", "Bulb")
        .connect("bus.0", "lamp.0")
        .build()
        .unwrap();
    assert!(matches!(
        mismatch.build(&create_default_registry()),
        Err(SimError::Config(ConfigError::Validation(_)))
    ));

    let missing_pin = CircuitConfigBuilder::new()
        .add_part("g", "And")
        .add_part("lamp", "Bulb")
        .connect("g.3", "lamp.0")
        .build()
        .unwrap();
    assert!(matches!(
        missing_pin.build(&create_default_registry()),
        Err(SimError::Config(ConfigError::Validation(_)))
    ));

    let too_wide = CircuitConfigBuilder::new()
        .add_component(ComponentConfig::new("g", "Or").with_inputs(9))
        .build()
        .unwrap();
    assert!(matches!(
        too_wide.build(&create_default_registry()),
        Err(SimError::InvalidFieldWidth { field_width: 9, .. })
    ));
}

#[test]
fn test_custom_registry_part() {
    let mut registry = PartRegistry::new();
    registry.register("Vcc", |_| ComponentSpec::switch(1));
    registry.register("Bulb", |_| ComponentSpec::bulb());

    let config = CircuitConfigBuilder::new()
        .add_part("vcc", "Vcc")
        .add_part("lamp", "Bulb")
        .connect("vcc.0", "lamp.0")
        .build()
        .unwrap();

    let circuit = config.build(&registry).unwrap();
    let vcc = circuit.component("vcc").unwrap();
    let lamp = circuit.component("lamp").unwrap();
    assert_eq!(
        circuit.board.component(vcc).unwrap().kind,
        ComponentKind::Switch { value: 1 }
    );
    assert_eq!(circuit.board.bulb_lit(lamp), Some(true));
}
