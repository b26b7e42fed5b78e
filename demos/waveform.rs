//! Waveform example.
//!
//! Two clocks of different periods feed an XOR gate and a half adder. The
//! circuit is loaded from YAML, stepped for a fixed time and every probe is
//! printed as a text waveform, one column per step.

use std::sync::{Arc, Mutex};

use logicboard::{create_default_registry, BoardEvent, CircuitConfig};

const CIRCUIT: &str = r#"
simulation:
  step: 1
  log_level: info

components:
  - name: fast
    part: Clock
    delay: 2
  - name: slow
    part: Clock
    delay: 5
  - name: mix
    part: Xor
  - name: add
    part: HalfAdder
    delay: 2
  - name: carry
    part: Bulb

connections:
  - from: fast.0
    to: mix.0
  - from: slow.0
    to: mix.1
  - from: fast.0
    to: add.0
  - from: slow.0
    to: add.1
  - from: add.1
    to: carry.0
"#;

const SIM_TIME: u64 = 40;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CircuitConfig::from_yaml(CIRCUIT)?;
    logicboard::init_logging(&config.simulation.log_level);

    println!("==== Waveform example ====");
    println!("XOR and half adder driven by clocks of period 4 and 10.\n");

    let mut circuit = config.build(&create_default_registry())?;

    let flashes = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&flashes);
    circuit.board.subscribe(move |event| {
        if let BoardEvent::BulbChanged { lit: true, .. } = event {
            if let Ok(mut count) = counter.lock() {
                *count += 1;
            }
        }
    });

    let mut probes = Vec::new();
    for (label, name, index) in [
        ("fast", "fast", 0),
        ("slow", "slow", 0),
        ("xor", "mix", 0),
        ("sum", "add", 0),
        ("carry", "add", 1),
    ] {
        let id = circuit
            .component(name)
            .ok_or_else(|| format!("missing component {name}"))?;
        probes.push((label, circuit.board.output(id, index)?, String::new()));
    }

    let board = &mut circuit.board;
    board.start();
    for _ in 0..SIM_TIME {
        board.tick()?;
        for (_, pin, trace) in &mut probes {
            let state = board.pin_state(*pin).ok_or("probe pin vanished")?;
            trace.push(state.bit_char(0));
        }
    }

    for (label, _, trace) in &probes {
        println!("{label:>6} | {trace}");
    }

    let stats = board.export_stats();
    println!("\nBoard advanced to time {}", stats["board"]["current_time"]);
    println!("Events applied: {}", stats["stats"]["events_applied"]);
    println!("Carry bulb lit {} times", flashes.lock().map(|c| *c).unwrap_or(0));
    Ok(())
}
