//! # mocap-stream-cli
//!
//! Connects to a motion-capture server and prints every frame until Enter or
//! Ctrl+C is pressed. Runs against the built-in simulated server, optionally
//! loaded from a scene file.

use std::path::PathBuf;

use clap::Parser;

mod signals;

use mocap_stream::{ClientConfig, MocapError, Reporter, Scene, Shutdown, SimulatedProvider};

/// Print every attribute of each motion-capture frame.
#[derive(Parser)]
#[command(name = "mocap-stream-cli", version, about)]
struct Cli {
    /// Servers as HOST[:PORT]; several are joined with ';' (default localhost:801)
    hosts: Vec<String>,

    /// Path to mocap.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene file for the simulated server (default: built-in demo scene)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Axis mapping preset: ZUp, YUp or XUp
    #[arg(long)]
    axis_mapping: Option<String>,

    /// Client frame buffer size
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Restrict the stream to this subject (repeatable)
    #[arg(long = "subject")]
    subjects: Vec<String>,

    /// Discard frame reports, keep connection diagnostics
    #[arg(short, long)]
    quiet: bool,

    /// Tune the network stack for a wireless link before connecting
    #[arg(long)]
    optimize_wireless: bool,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Do not stop when Enter is pressed
    #[arg(long)]
    no_keypress: bool,

    /// Enable verbose logging (set RUST_LOG for fine-grained control)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Command-line values override the config file.
    fn apply(self, config: &mut ClientConfig) {
        if !self.hosts.is_empty() {
            config.hosts = self.hosts;
        }
        if let Some(mapping) = self.axis_mapping {
            config.axis_mapping = mapping;
        }
        if let Some(size) = self.buffer_size {
            config.buffer_size = size;
        }
        if !self.subjects.is_empty() {
            config.subject_filter = self.subjects;
        }
        if let Some(max) = self.max_frames {
            config.max_frames = max;
        }
        config.quiet |= self.quiet;
        config.optimize_wireless |= self.optimize_wireless;
        if self.no_keypress {
            config.stop_on_keypress = false;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            "mocap_stream=debug,mocap_stream_cli=debug".into()
        } else {
            "mocap_stream=warn,mocap_stream_cli=warn".into()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::discover(cli.config.as_deref())?;
    let scene = match cli.scene.as_deref() {
        Some(path) => Scene::from_file(path)?,
        None => Scene::demo(),
    };
    cli.apply(&mut config);

    let shutdown = Shutdown::new();
    signals::spawn_ctrl_c(shutdown.clone());
    if config.stop_on_keypress {
        signals::spawn_keypress(shutdown.clone());
    }

    let mut reporter = Reporter::new(SimulatedProvider::new(scene), config, std::io::stdout());
    let result = reporter.run(&shutdown).await;
    shutdown.trigger();

    match result {
        Ok(summary) => {
            eprintln!(
                "Reported {} frames in {:.1}s",
                summary.frames_reported,
                summary.elapsed.as_secs_f64()
            );
            Ok(())
        }
        Err(MocapError::Cancelled) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
