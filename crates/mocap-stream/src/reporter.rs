//! # Reporter
//!
//! Drives a whole client run: connect, configure the stream, then report
//! frames until the run is over.
//!
//! ```no_run
//! use mocap_stream::{ClientConfig, Reporter, Shutdown, SimulatedProvider};
//!
//! # async fn demo() -> mocap_stream::MocapResult<()> {
//! let config = ClientConfig {
//!     max_frames: 10,
//!     ..ClientConfig::default()
//! };
//! let mut reporter = Reporter::new(SimulatedProvider::demo(), config, std::io::stdout());
//! let summary = reporter.run(&Shutdown::new()).await?;
//! println!("{} frames", summary.frames_reported);
//! # Ok(())
//! # }
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::acquisition::{apply_subject_filter, connection_lost, wait_for_frame};
use crate::config::ClientConfig;
use crate::connection::{configure_stream, configure_wireless, connect};
use crate::error::{MocapError, MocapResult};
use crate::provider::CaptureProvider;
use crate::report::write_frame_report;
use crate::shutdown::Shutdown;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_reported: u64,
    pub elapsed: Duration,
}

/// Owns the provider, the run configuration and the console.
///
/// Connection diagnostics always reach the console; frame reports go to a
/// discarding sink when `quiet` is set.
pub struct Reporter<P, W> {
    provider: P,
    config: ClientConfig,
    console: W,
    host_spec: String,
    frames_reported: u64,
    subject_filter_applied: bool,
}

impl<P, W> Reporter<P, W>
where
    P: CaptureProvider,
    W: Write,
{
    #[must_use]
    pub fn new(provider: P, config: ClientConfig, console: W) -> Self {
        let host_spec = config.host_spec();
        Self {
            provider,
            config,
            console,
            host_spec,
            frames_reported: 0,
            subject_filter_applied: false,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn frames_reported(&self) -> u64 {
        self.frames_reported
    }

    #[must_use]
    pub fn subject_filter_applied(&self) -> bool {
        self.subject_filter_applied
    }

    /// Give back the provider and the console.
    #[must_use]
    pub fn into_parts(self) -> (P, W) {
        (self.provider, self.console)
    }

    /// Run until cancelled, until `max_frames` frames were reported, or until
    /// the connection is lost.
    ///
    /// A shutdown during the frame loop ends the run normally. A shutdown
    /// before the connection is up returns [`MocapError::Cancelled`].
    ///
    /// # Errors
    /// Connection timeouts, a lost connection, frame wait timeouts and
    /// console I/O failures.
    pub async fn run(&mut self, shutdown: &Shutdown) -> MocapResult<RunSummary> {
        let started = Instant::now();
        self.connect(shutdown).await?;

        let result = self.report_frames(shutdown).await;

        if let Err(err) = self.provider.disconnect() {
            tracing::debug!(error = %err, "Disconnect failed");
        }
        self.console.flush()?;
        result?;

        let summary = RunSummary {
            frames_reported: self.frames_reported,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            frames = summary.frames_reported,
            elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Run finished"
        );
        Ok(summary)
    }

    /// Connect and configure the stream.
    ///
    /// # Errors
    /// See [`connection::connect`](crate::connection::connect).
    pub async fn connect(&mut self, shutdown: &Shutdown) -> MocapResult<()> {
        if self.config.optimize_wireless {
            configure_wireless(&mut self.provider, &mut self.console)?;
        }
        connect(
            &mut self.provider,
            &self.host_spec,
            &self.config.connect.policy(),
            shutdown,
            &mut self.console,
        )
        .await?;
        configure_stream(&mut self.provider, &self.config, &mut self.console)
    }

    async fn report_frames(&mut self, shutdown: &Shutdown) -> MocapResult<()> {
        loop {
            // Ready frames never await, so stop triggers on a current-thread runtime need this.
            tokio::task::yield_now().await;
            if shutdown.is_triggered() {
                return Ok(());
            }
            if self.config.max_frames > 0 && self.frames_reported >= self.config.max_frames {
                tracing::debug!(max_frames = self.config.max_frames, "Frame limit reached");
                return Ok(());
            }
            match self.report_next_frame(shutdown).await {
                Ok(()) => {}
                Err(MocapError::Cancelled) => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    /// Wait for one frame, apply the subject filter if still pending, and
    /// print the frame report.
    ///
    /// # Errors
    /// [`MocapError::ConnectionLost`] when the provider drops the connection,
    /// plus the errors of [`wait_for_frame`].
    pub async fn report_next_frame(&mut self, shutdown: &Shutdown) -> MocapResult<()> {
        let mut sink = io::sink();
        let out: &mut dyn Write = if self.config.quiet {
            &mut sink
        } else {
            &mut self.console
        };

        wait_for_frame(
            &mut self.provider,
            &self.config.frames.policy(),
            shutdown,
            &mut *out,
        )
        .await
        .map_err(|err| connection_lost(err, &self.host_spec))?;

        if !self.subject_filter_applied {
            self.subject_filter_applied =
                apply_subject_filter(&mut self.provider, &self.config.subject_filter);
        }

        write_frame_report(&self.provider, &mut *out)?;
        out.flush()?;
        self.frames_reported += 1;
        Ok(())
    }
}
