//! Stop triggers for a run: Ctrl+C, and optionally Enter on stdin.

use std::io::BufRead;

use mocap_stream::Shutdown;

/// Trigger `shutdown` on Ctrl+C.
pub fn spawn_ctrl_c(shutdown: Shutdown) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl+C received, stopping");
                shutdown.trigger();
            }
            Err(e) => tracing::warn!(error = %e, "Cannot listen for Ctrl+C"),
        }
    });
}

/// Trigger `shutdown` once a line is entered on stdin.
///
/// The read runs on a detached thread so a pending read never holds up
/// process exit. A closed stdin (piped input, `/dev/null`) never stops the
/// run.
pub fn spawn_keypress(shutdown: Shutdown) {
    let spawned = std::thread::Builder::new()
        .name("keypress".into())
        .spawn(move || stop_on_line(std::io::stdin().lock(), &shutdown));
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "Cannot watch stdin, stop with Ctrl+C");
    }
}

/// Block until one line is read from `reader`, then trigger `shutdown`.
/// End of input leaves `shutdown` untouched.
fn stop_on_line(mut reader: impl BufRead, shutdown: &Shutdown) {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => tracing::debug!("stdin closed, keypress stop disabled"),
        Ok(_) => {
            tracing::info!("Key pressed, stopping");
            shutdown.trigger();
        }
        Err(e) => tracing::warn!(error = %e, "Cannot read stdin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entered_line_stops_run() {
        let shutdown = Shutdown::new();
        stop_on_line(&b"\n"[..], &shutdown);
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_closed_stdin_keeps_running() {
        let shutdown = Shutdown::new();
        stop_on_line(&b""[..], &shutdown);
        assert!(!shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_keypress_thread_triggers_shared_shutdown() {
        let shutdown = Shutdown::new();
        let watcher = shutdown.clone();
        std::thread::spawn(move || stop_on_line(std::io::Cursor::new("q\n"), &watcher));

        tokio::time::timeout(std::time::Duration::from_secs(5), shutdown.triggered())
            .await
            .expect("keypress watcher never triggered shutdown");
    }
}
