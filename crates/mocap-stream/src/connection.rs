//! # Connection Loop & Stream Configuration
//!
//! [`connect`] keeps calling the provider until it reports a connection,
//! printing a diagnostic line for every failed attempt. [`configure_stream`]
//! then applies the one-shot stream options and prints what the provider
//! ended up with.

use std::io::Write;

use crate::config::ClientConfig;
use crate::error::{ConnectFailure, MocapResult, ProviderResult};
use crate::poll::{PollPolicy, poll_until};
use crate::provider::{AxisMapping, ConnectionCapability, StreamMode};
use crate::shutdown::Shutdown;

/// Connection target used when no host is given.
pub const DEFAULT_HOST: &str = "localhost:801";

/// Join `host[:port]` entries into the provider's `;`-separated host spec.
///
/// ```
/// use mocap_stream::connection::join_hosts;
///
/// assert_eq!(join_hosts(&["a", "b:801"]), "a;b:801");
/// assert_eq!(join_hosts::<&str>(&[]), "localhost:801");
/// ```
#[must_use]
pub fn join_hosts<S: AsRef<str>>(hosts: &[S]) -> String {
    if hosts.is_empty() {
        return DEFAULT_HOST.to_string();
    }
    hosts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(";")
}

/// Connect to `host_spec`, retrying according to `policy`.
///
/// Prints `Connecting to <hosts> ...`, then one
/// `Warning - connect failed... <reason>` line and a progress dot per failed
/// attempt. Returns the number of attempts it took.
///
/// # Errors
/// [`MocapError::TimedOut`](crate::MocapError::TimedOut) when the policy
/// runs out, [`MocapError::Cancelled`](crate::MocapError::Cancelled) on
/// shutdown, [`MocapError::Io`](crate::MocapError::Io) if `out` fails.
pub async fn connect<P, W>(
    provider: &mut P,
    host_spec: &str,
    policy: &PollPolicy,
    shutdown: &Shutdown,
    out: &mut W,
) -> MocapResult<u32>
where
    P: ConnectionCapability + ?Sized,
    W: Write + ?Sized,
{
    write!(out, "Connecting to {host_spec} ...")?;
    out.flush()?;

    let attempts = poll_until(policy, shutdown, "connect", |attempt| {
        if provider.is_connected() {
            return Ok(Some(attempt));
        }
        match provider.connect(host_spec) {
            Ok(()) => Ok(Some(attempt)),
            Err(err) => {
                let failure = ConnectFailure::classify(err);
                tracing::warn!(attempt, hosts = host_spec, reason = %failure, "Connect failed");
                writeln!(out, "Warning - connect failed... {failure}")?;
                write!(out, ".")?;
                out.flush()?;
                Ok(None)
            }
        }
    })
    .await;

    writeln!(out)?;
    let attempts = attempts?;
    writeln!(out)?;
    tracing::info!(hosts = host_spec, attempts, "Connected");
    Ok(attempts)
}

/// Ask the provider to tune the network for a wireless link.
///
/// Must run before [`connect`]. A failure is printed and otherwise ignored.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn configure_wireless<P, W>(provider: &mut P, out: &mut W) -> MocapResult<()>
where
    P: ConnectionCapability + ?Sized,
    W: Write + ?Sized,
{
    if let Err(err) = provider.configure_wireless() {
        writeln!(out, "Wireless Config: {err}")?;
    }
    Ok(())
}

/// Apply the one-shot stream options from `config`.
///
/// Enables segment data, selects server push, sets the axis mapping and the
/// optional buffer size, and prints the resulting axis mapping and provider
/// version. Provider failures are logged, not returned.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn configure_stream<P, W>(
    provider: &mut P,
    config: &ClientConfig,
    out: &mut W,
) -> MocapResult<()>
where
    P: ConnectionCapability + ?Sized,
    W: Write + ?Sized,
{
    log_step("enable segment data", provider.enable_segment_data());
    log_step(
        "set stream mode",
        provider.set_stream_mode(StreamMode::ServerPush),
    );

    log_step("set axis mapping", provider.set_axis_mapping(AxisMapping::Z_UP));
    let requested = config.axis_mapping();
    if requested != AxisMapping::Z_UP {
        log_step("set axis mapping", provider.set_axis_mapping(requested));
    }

    let mapping = provider.axis_mapping().unwrap_or_default();
    writeln!(
        out,
        "Axis Mapping: X-{} Y-{} Z-{}",
        mapping.x, mapping.y, mapping.z
    )?;

    let version = provider.version().unwrap_or_default();
    writeln!(out, "Version: {version}")?;

    if config.buffer_size > 0 {
        log_step(
            "set buffer size",
            provider.set_buffer_size(config.buffer_size),
        );
        writeln!(out, "Setting client buffer size to {}", config.buffer_size)?;
    }

    Ok(())
}

fn log_step(step: &'static str, result: ProviderResult<()>) {
    match result {
        Ok(()) => tracing::debug!(step, "Configured"),
        Err(err) => tracing::warn!(step, error = %err, "Stream configuration step failed"),
    }
}
