//! # Frame Acquisition
//!
//! Waiting for the next frame and the one-shot subject filter that follows
//! the first frame.

use std::io::Write;

use crate::error::{MocapError, MocapResult, ProviderError};
use crate::poll::{PollPolicy, poll_until};
use crate::provider::{FrameCapability, SubjectCapability};
use crate::shutdown::Shutdown;

/// Poll `get_frame` until the provider latches a frame.
///
/// Prints `Waiting for new frame...`, a dot per miss, then a newline.
/// Returns the number of misses.
///
/// # Errors
/// - [`MocapError::Provider`] with [`ProviderError::NotConnected`] if the
///   connection is gone (the caller knows the hosts to report).
/// - [`MocapError::TimedOut`] / [`MocapError::Cancelled`] from the policy
///   and shutdown signal.
pub async fn wait_for_frame<P, W>(
    provider: &mut P,
    policy: &PollPolicy,
    shutdown: &Shutdown,
    out: &mut W,
) -> MocapResult<u32>
where
    P: FrameCapability + ?Sized,
    W: Write + ?Sized,
{
    write!(out, "Waiting for new frame...")?;
    out.flush()?;

    let result = poll_until(policy, shutdown, "wait for frame", |attempt| {
        match provider.get_frame() {
            Ok(()) => Ok(Some(attempt - 1)),
            Err(ProviderError::NotConnected) => Err(ProviderError::NotConnected.into()),
            Err(err) => {
                tracing::trace!(attempt, error = %err, "No frame yet");
                write!(out, ".")?;
                out.flush()?;
                Ok(None)
            }
        }
    })
    .await;

    writeln!(out)?;
    result
}

/// Add every name in `subjects` to the provider's subject filter.
///
/// Returns `true` once at least one name was accepted, which is when the
/// caller should stop re-applying the filter. Rejected names are logged.
#[must_use]
pub fn apply_subject_filter<P>(provider: &mut P, subjects: &[String]) -> bool
where
    P: SubjectCapability + ?Sized,
{
    let mut applied = false;
    for subject in subjects {
        match provider.add_to_subject_filter(subject) {
            Ok(()) => {
                tracing::info!(subject = subject.as_str(), "Subject added to filter");
                applied = true;
            }
            Err(err) => {
                tracing::warn!(subject = subject.as_str(), error = %err, "Subject filter rejected");
            }
        }
    }
    applied
}

/// Map a lost connection onto [`MocapError::ConnectionLost`].
pub(crate) fn connection_lost(err: MocapError, hosts: &str) -> MocapError {
    match err {
        MocapError::Provider(ProviderError::NotConnected) => MocapError::ConnectionLost {
            hosts: hosts.to_string(),
        },
        other => other,
    }
}
