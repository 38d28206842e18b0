mod support;

use std::time::Duration;

use mocap_stream::provider::{ConnectionCapability, ProviderError};
use mocap_stream::{
    ClientConfig, MocapError, MocapResult, Reporter, RunSummary, Scene, Shutdown, SimulatedProvider,
};
use tokio::time::timeout;

use support::stub_provider::{STEP_TIMEOUT, StubProvider, fast_config};

async fn run_to_end(
    provider: StubProvider,
    config: ClientConfig,
    shutdown: &Shutdown,
) -> (MocapResult<RunSummary>, StubProvider, String) {
    support::init_tracing();
    let mut reporter = Reporter::new(provider, config, Vec::new());
    let result = timeout(STEP_TIMEOUT, reporter.run(shutdown))
        .await
        .expect("run did not finish in time");
    let (provider, console) = reporter.into_parts();
    let text = String::from_utf8(console).expect("console output is not UTF-8");
    (result, provider, text)
}

fn frames(n: u64) -> ClientConfig {
    ClientConfig {
        max_frames: n,
        ..fast_config()
    }
}

#[tokio::test]
async fn connect_retries_print_one_warning_per_failure() {
    let provider = StubProvider::new().failing_connects(3, ProviderError::ClientConnectionFailed);

    let (result, provider, text) = run_to_end(provider, frames(1), &Shutdown::new()).await;

    assert_eq!(result.unwrap().frames_reported, 1);
    assert_eq!(provider.connect_calls, 4);
    assert_eq!(
        text.matches("Warning - connect failed... Client Connection Failed")
            .count(),
        3
    );
    assert!(text.starts_with("Connecting to localhost:801 ..."));
}

#[tokio::test]
async fn connect_uses_joined_host_list() {
    let config = ClientConfig {
        hosts: vec!["a".into(), "b:801".into()],
        ..frames(1)
    };

    let (result, provider, text) = run_to_end(StubProvider::new(), config, &Shutdown::new()).await;

    result.unwrap();
    assert_eq!(provider.host_specs, vec!["a;b:801".to_string()]);
    assert!(text.contains("Connecting to a;b:801 ..."));
}

#[tokio::test]
async fn frame_wait_prints_one_dot_per_miss() {
    let provider = StubProvider::new().missing_frames(4);

    let (result, provider, text) = run_to_end(provider, frames(1), &Shutdown::new()).await;

    result.unwrap();
    assert_eq!(provider.get_frame_calls, 5);
    let waiting = text
        .lines()
        .find(|line| line.starts_with("Waiting for new frame"))
        .expect("no frame wait line");
    assert_eq!(waiting, "Waiting for new frame.......");
}

#[tokio::test]
async fn single_subject_report_end_to_end() {
    let (result, _provider, text) =
        run_to_end(StubProvider::new(), frames(1), &Shutdown::new()).await;

    result.unwrap();
    assert!(text.contains("Axis Mapping: X-Forward Y-Left Z-Up\n"));
    assert!(text.contains("Version: 1.0.0.7\n"));
    assert!(text.contains("Frame Number: 1\n"));
    assert!(text.contains("Frame rate: 120\n"));
    assert!(text.contains("Subjects (1):\n"));
    assert_eq!(text.matches("Subject #0").count(), 1);
    assert!(!text.contains("Subject #1"));
    assert!(text.contains("    Name: Subject1\n    Root Segment: Root\n    Segments (1):\n"));
    assert!(text.contains("        Global Translation: (100, 200, 1) False\n"));
    assert!(text.contains("        Local Translation: (0, 0, 0) True\n"));
    assert!(text.contains("    Markers (0):\n"));
    assert!(text.contains("  Devices (0):\n"));
    assert!(text.contains("  Force Plates: (0)\n"));
    assert!(text.contains("  Eye Trackers: (0)\n"));

    for entry in ["Marker #", "Device #", "Force Plate #", "Eye Tracker #"] {
        assert!(!text.contains(entry), "unexpected '{entry}' in report");
    }
}

#[tokio::test]
async fn quiet_mode_keeps_connection_diagnostics() {
    let provider = StubProvider::new().failing_connects(1, ProviderError::InvalidHostName);
    let config = ClientConfig {
        quiet: true,
        ..frames(3)
    };

    let (result, provider, text) = run_to_end(provider, config, &Shutdown::new()).await;

    assert_eq!(result.unwrap().frames_reported, 3);
    assert_eq!(provider.frames_delivered(), 3);
    assert!(text.contains("Warning - connect failed... Invalid Host Name"));
    assert!(text.contains("Version: 1.0.0.7"));
    assert!(!text.contains("Frame Number"));
    assert!(!text.contains("Subjects ("));
}

#[tokio::test]
async fn subject_filter_applied_once_after_success() {
    let config = ClientConfig {
        subject_filter: vec!["Subject1".into()],
        ..frames(3)
    };

    let (result, provider, _text) = run_to_end(StubProvider::new(), config, &Shutdown::new()).await;

    result.unwrap();
    assert_eq!(provider.filter_requests, vec!["Subject1".to_string()]);
}

#[tokio::test]
async fn rejected_subject_filter_is_retried_every_frame() {
    let config = ClientConfig {
        subject_filter: vec!["Ghost".into()],
        ..frames(3)
    };

    let (result, provider, _text) = run_to_end(StubProvider::new(), config, &Shutdown::new()).await;

    result.unwrap();
    assert_eq!(provider.filter_requests.len(), 3);
}

#[tokio::test]
async fn shutdown_during_frame_wait_ends_run_cleanly() {
    let provider = StubProvider::new().missing_frames(u32::MAX);
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.trigger();
    });

    let (result, provider, text) = run_to_end(provider, fast_config(), &shutdown).await;

    assert_eq!(result.unwrap().frames_reported, 0);
    assert!(provider.get_frame_calls > 0);
    assert!(!provider.is_connected());
    assert!(text.contains("Waiting for new frame..."));
}

#[tokio::test]
async fn shutdown_during_connect_is_reported_as_cancelled() {
    let provider =
        StubProvider::new().failing_connects(u32::MAX, ProviderError::ClientConnectionFailed);
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.trigger();
    });

    let (result, provider, _text) = run_to_end(provider, fast_config(), &shutdown).await;

    assert!(result.unwrap_err().is_cancellation());
    assert_eq!(provider.get_frame_calls, 0);
}

#[tokio::test]
async fn connect_attempt_limit_times_out() {
    let provider =
        StubProvider::new().failing_connects(u32::MAX, ProviderError::ClientConnectionFailed);
    let mut config = fast_config();
    config.connect.max_attempts = 2;

    let (result, provider, text) = run_to_end(provider, config, &Shutdown::new()).await;

    match result.unwrap_err() {
        MocapError::TimedOut {
            operation,
            attempts,
        } => {
            assert_eq!(operation, "connect");
            assert_eq!(attempts, 2);
        }
        other => panic!("Expected TimedOut, got {other:?}"),
    }
    assert_eq!(provider.connect_calls, 2);
    assert_eq!(text.matches("Warning - connect failed").count(), 2);
}

#[tokio::test]
async fn frame_wait_attempt_limit_times_out() {
    let provider = StubProvider::new().missing_frames(u32::MAX);
    let mut config = fast_config();
    config.frames.max_attempts = 3;

    let (result, provider, _text) = run_to_end(provider, config, &Shutdown::new()).await;

    assert!(matches!(
        result.unwrap_err(),
        MocapError::TimedOut {
            operation: "wait for frame",
            attempts: 3
        }
    ));
    assert_eq!(provider.get_frame_calls, 3);
}

#[tokio::test]
async fn lost_connection_ends_run() {
    let provider = StubProvider::new().dropping_after(2);
    let config = ClientConfig {
        hosts: vec!["rig".into()],
        ..fast_config()
    };

    let (result, provider, text) = run_to_end(provider, config, &Shutdown::new()).await;

    match result.unwrap_err() {
        MocapError::ConnectionLost { hosts } => assert_eq!(hosts, "rig"),
        other => panic!("Expected ConnectionLost, got {other:?}"),
    }
    assert_eq!(provider.frames_delivered(), 2);
    assert_eq!(text.matches("Frame Number: ").count(), 2);
}

#[tokio::test]
async fn simulated_demo_scene_reports_every_category() {
    let scene = Scene {
        frame_rate: 0.0,
        connect_failures: 1,
        ..Scene::demo()
    };
    let config = ClientConfig {
        axis_mapping: "YUp".into(),
        buffer_size: 2,
        ..frames(2)
    };
    support::init_tracing();
    let mut reporter = Reporter::new(SimulatedProvider::new(scene), config, Vec::new());

    let summary = timeout(STEP_TIMEOUT, reporter.run(&Shutdown::new()))
        .await
        .expect("run did not finish in time")
        .unwrap();

    assert_eq!(summary.frames_reported, 2);
    let (provider, console) = reporter.into_parts();
    assert_eq!(provider.buffer_size(), Some(2));
    let text = String::from_utf8(console).unwrap();
    assert!(text.contains("Warning - connect failed... Client Connection Failed"));
    assert!(text.contains("Axis Mapping: X-Forward Y-Up Z-Right"));
    assert!(text.contains("Setting client buffer size to 2"));
    assert!(text.contains("Subject #1"));
    assert!(text.contains("    Quality: 0.98\n"));
    assert!(text.contains("        Static Scale: (1, 1, 1)\n"));
    assert!(text.contains("      Marker #2: Wand3 (240, 0, 1000) True\n"));
    assert!(text.contains("  Unlabeled Markers (1):\n"));
    assert!(text.contains("          'Fz' 702 Newton False\n"));
    assert!(text.contains("    Force Plate #0:\n"));
    assert!(text.contains("      Gaze (1, 0, 0) False\n"));
    assert!(text.contains("Frame Number: 2\n"));
}

#[tokio::test(flavor = "current_thread")]
async fn spawned_stop_trigger_ends_run_when_frames_are_always_ready() {
    let scene = Scene {
        frame_rate: 0.0,
        ..Scene::demo()
    };
    let config = ClientConfig {
        quiet: true,
        ..frames(50_000)
    };
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move { trigger.trigger() });
    support::init_tracing();
    let mut reporter = Reporter::new(SimulatedProvider::new(scene), config, Vec::new());

    let summary = timeout(STEP_TIMEOUT, reporter.run(&shutdown))
        .await
        .expect("run did not finish in time")
        .unwrap();

    assert!(
        summary.frames_reported < 5,
        "stop trigger was not observed: {} frames",
        summary.frames_reported
    );
    let (provider, _console) = reporter.into_parts();
    assert!(!provider.is_connected());
}
