//! Headless path-following run.
//!
//! Usage:
//! ```text
//! cargo run --example follow                                   # demos/paths/loop.yaml
//! cargo run --example follow -- my_path.yaml                   # custom path
//! cargo run --example follow -- my_path.yaml my_config.yaml    # custom tuning
//! ```

use badger_path::actor::Actor;
use badger_path::config::SimulationConfig;
use badger_path::simulation::{DriveInput, DriveSimulator, PathSimulator, Simulator};
use badger_path::BadgerError;
use tracing::info;

const DEFAULT_PATH: &str = "demos/paths/loop.yaml";
const FRAME: f64 = 1.0 / 60.0;

fn main() -> Result<(), BadgerError> {
    // Default: WARN for everything, INFO for badger_path and this demo.
    // Override with RUST_LOG env var (e.g. RUST_LOG=badger_path=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("follow=info".parse().unwrap_or_default())
        .add_directive("badger_path=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let path_file = args.next().unwrap_or_else(|| DEFAULT_PATH.to_owned());
    let config = match args.next() {
        Some(file) => SimulationConfig::from_yaml_file(file)?,
        None => SimulationConfig::default(),
    };

    follow_path(&path_file, &config)?;
    drive_figure(&config)
}

/// Rides one and a half laps of the path, reporting once per second.
fn follow_path(path_file: &str, config: &SimulationConfig) -> Result<(), BadgerError> {
    let mut simulator = PathSimulator::from_yaml_file(path_file, config)?;
    let lap = simulator.follower().time_to_complete().unwrap_or(config.follower.time_to_complete);

    let mut elapsed = 0.0;
    let mut next_report = 0.0;
    while elapsed < lap * 1.5 {
        simulator.update(FRAME)?;
        elapsed += FRAME;

        if elapsed >= next_report {
            let pose = simulator.badger().pose();
            info!(
                t = format!("{elapsed:.2}"),
                segment = simulator.follower().segment_index(),
                x = format!("{:.2}", pose.position.x),
                y = format!("{:.2}", pose.position.y),
                z = format!("{:.2}", pose.position.z),
                "following"
            );
            next_report += 1.0;
        }
    }

    info!(laps = simulator.follower().laps(), "path run finished");
    Ok(())
}

/// Drives forward, turns right, then brakes into reverse.
fn drive_figure(config: &SimulationConfig) -> Result<(), BadgerError> {
    let mut simulator = DriveSimulator::new(config.badger);
    let script = [
        (2.0, DriveInput { forward: true, ..DriveInput::default() }),
        (3.0, DriveInput { forward: true, right: true, ..DriveInput::default() }),
        (2.0, DriveInput { backward: true, ..DriveInput::default() }),
    ];

    for (seconds, input) in script {
        simulator.set_input(input);
        let mut elapsed = 0.0;
        while elapsed < seconds {
            simulator.update(FRAME)?;
            elapsed += FRAME;
        }

        let badger = simulator.badger();
        let heading = badger.pose().forward();
        info!(
            speed = format!("{:.2}", badger.current_speed()),
            heading_x = format!("{:.2}", heading.x),
            heading_z = format!("{:.2}", heading.z),
            "drive step finished"
        );
    }
    Ok(())
}
