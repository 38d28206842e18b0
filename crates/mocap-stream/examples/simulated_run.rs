//! Report a few frames from the built-in demo scene.
//!
//! No capture server required.
//!
//! ```bash
//! cargo run --example simulated_run
//! ```

use mocap_stream::{ClientConfig, Reporter, Shutdown, SimulatedProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::discover(None).unwrap_or_else(|_| {
        println!("No config found, using defaults");
        ClientConfig::default()
    });
    let config = ClientConfig {
        max_frames: 5,
        ..config
    };

    let mut reporter = Reporter::new(SimulatedProvider::demo(), config, std::io::stdout());
    let summary = reporter.run(&Shutdown::new()).await?;

    println!(
        "Reported {} frames in {:?}",
        summary.frames_reported, summary.elapsed
    );
    Ok(())
}
