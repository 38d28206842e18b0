//! # mocap-stream
//!
//! A motion-capture stream client. It connects to a capture server through a
//! [`CaptureProvider`] (the vendor SDK, or the bundled [`SimulatedProvider`]),
//! configures the stream and prints every attribute of each frame: frame
//! metadata, subjects and segment poses, markers, devices, force plates and
//! eye trackers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mocap_stream::{ClientConfig, Reporter, Shutdown, SimulatedProvider};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> mocap_stream::MocapResult<()> {
//!     // Load config from environment or mocap.toml
//!     let config = ClientConfig::discover(None)?;
//!
//!     let shutdown = Shutdown::new();
//!     let mut reporter = Reporter::new(SimulatedProvider::demo(), config, std::io::stdout());
//!     let summary = reporter.run(&shutdown).await?;
//!     eprintln!("{} frames", summary.frames_reported);
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`provider`] | Capability traits and value types |
//! | [`connection`] | Connect retry loop, stream configuration |
//! | [`acquisition`] | Frame wait loop, subject filter |
//! | [`report`] | Frame report formatting |
//! | [`reporter`] | The whole run |
//! | [`sim`] | Scene-driven provider |
//!
//! ## Configuration
//!
//! See [`ClientConfig`] for the full configuration reference. Hosts can come
//! from the environment:
//!
//! ```bash
//! export MOCAP_HOSTS="vicon-a;vicon-b:801"
//! export MOCAP_AXIS_MAPPING="YUp"
//! ```
//!
//! Or a `mocap.toml` file:
//!
//! ```toml
//! hosts = ["vicon-a", "vicon-b:801"]
//! axis_mapping = "YUp"
//! subject_filter = ["Wand"]
//!
//! [connect]
//! max_attempts = 30
//! ```

pub mod acquisition;
pub mod config;
pub mod connection;
pub mod error;
pub mod poll;
pub mod provider;
pub mod report;
pub mod reporter;
pub mod shutdown;
pub mod sim;

// ─── Public re-exports ──────────────────────────────────────────────────

pub use config::ClientConfig;
pub use error::{MocapError, MocapResult, ProviderError, ProviderResult};
pub use provider::CaptureProvider;
pub use reporter::{Reporter, RunSummary};
pub use shutdown::Shutdown;
pub use sim::{Scene, SimulatedProvider};
