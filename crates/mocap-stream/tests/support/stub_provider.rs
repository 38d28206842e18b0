#![allow(dead_code)]

use std::time::Duration;

use mocap_stream::ClientConfig;
use mocap_stream::provider::{
    ConnectionCapability, DeviceCapability, EyeTrackerCapability, ForcePlateCapability,
    FrameCapability, MarkerCapability, ProviderError, ProviderResult, ReferenceFrame,
    SubjectCapability, Tracked, Vector3, Version,
};

pub const SUBJECT: &str = "Subject1";
pub const ROOT_SEGMENT: &str = "Root";

pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// A scripted provider: one subject with a single segment, no markers,
/// devices, force plates or eye trackers.
pub struct StubProvider {
    connect_failures: u32,
    connect_error: ProviderError,
    misses_per_frame: u32,
    misses_left: u32,
    drop_after_frames: Option<u32>,
    connected: bool,
    frames: u32,
    pub connect_calls: u32,
    pub get_frame_calls: u32,
    pub filter_requests: Vec<String>,
    pub host_specs: Vec<String>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            connect_failures: 0,
            connect_error: ProviderError::ClientConnectionFailed,
            misses_per_frame: 0,
            misses_left: 0,
            drop_after_frames: None,
            connected: false,
            frames: 0,
            connect_calls: 0,
            get_frame_calls: 0,
            filter_requests: Vec::new(),
            host_specs: Vec::new(),
        }
    }

    /// Fail the first `n` connect calls with `error`.
    pub fn failing_connects(mut self, n: u32, error: ProviderError) -> Self {
        self.connect_failures = n;
        self.connect_error = error;
        self
    }

    /// Answer `NoFrame` `n` times before every frame.
    pub fn missing_frames(mut self, n: u32) -> Self {
        self.misses_per_frame = n;
        self.misses_left = n;
        self
    }

    /// Report `NotConnected` once `n` frames were delivered.
    pub fn dropping_after(mut self, n: u32) -> Self {
        self.drop_after_frames = Some(n);
        self
    }

    pub fn frames_delivered(&self) -> u32 {
        self.frames
    }
}

pub fn fast_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.connect.retry_interval_ms = 1;
    config.frames.poll_interval_ms = 1;
    config
}

impl ConnectionCapability for StubProvider {
    fn connect(&mut self, host_spec: &str) -> ProviderResult<()> {
        self.connect_calls += 1;
        self.host_specs.push(host_spec.to_string());
        if self.connect_failures > 0 {
            self.connect_failures -= 1;
            return Err(self.connect_error);
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> ProviderResult<()> {
        self.connected = false;
        Ok(())
    }

    fn enable_segment_data(&mut self) -> ProviderResult<()> {
        Ok(())
    }

    fn version(&self) -> ProviderResult<Version> {
        Ok(Version {
            major: 1,
            minor: 0,
            point: 0,
            revision: 7,
        })
    }
}

impl FrameCapability for StubProvider {
    fn get_frame(&mut self) -> ProviderResult<()> {
        self.get_frame_calls += 1;
        if !self.connected || self.drop_after_frames.is_some_and(|n| self.frames >= n) {
            return Err(ProviderError::NotConnected);
        }
        if self.misses_left > 0 {
            self.misses_left -= 1;
            return Err(ProviderError::NoFrame);
        }
        self.misses_left = self.misses_per_frame;
        self.frames += 1;
        Ok(())
    }

    fn frame_number(&self) -> ProviderResult<u32> {
        Ok(self.frames)
    }

    fn frame_rate(&self) -> ProviderResult<f64> {
        Ok(120.0)
    }
}

impl SubjectCapability for StubProvider {
    fn add_to_subject_filter(&mut self, subject: &str) -> ProviderResult<()> {
        self.filter_requests.push(subject.to_string());
        if subject == SUBJECT {
            Ok(())
        } else {
            Err(ProviderError::InvalidSubjectName)
        }
    }

    fn subject_count(&self) -> ProviderResult<u32> {
        Ok(1)
    }

    fn subject_name(&self, index: u32) -> ProviderResult<String> {
        match index {
            0 => Ok(SUBJECT.into()),
            _ => Err(ProviderError::InvalidIndex),
        }
    }

    fn subject_root_segment_name(&self, _subject: &str) -> ProviderResult<String> {
        Ok(ROOT_SEGMENT.into())
    }

    fn segment_count(&self, _subject: &str) -> ProviderResult<u32> {
        Ok(1)
    }

    fn segment_name(&self, _subject: &str, _index: u32) -> ProviderResult<String> {
        Ok(ROOT_SEGMENT.into())
    }

    fn segment_parent_name(&self, _subject: &str, _segment: &str) -> ProviderResult<String> {
        Ok(String::new())
    }

    fn segment_child_count(&self, _subject: &str, _segment: &str) -> ProviderResult<u32> {
        Ok(0)
    }

    fn segment_translation(
        &self,
        _subject: &str,
        _segment: &str,
        frame: ReferenceFrame,
    ) -> ProviderResult<Tracked<Vector3>> {
        Ok(match frame {
            ReferenceFrame::Local => Tracked::occluded([0.0, 0.0, 0.0]),
            _ => Tracked::visible([100.0, 200.0, f64::from(self.frames)]),
        })
    }
}

impl MarkerCapability for StubProvider {
    fn marker_count(&self, _subject: &str) -> ProviderResult<u32> {
        Ok(0)
    }

    fn unlabeled_marker_count(&self) -> ProviderResult<u32> {
        Ok(0)
    }

    fn labeled_marker_count(&self) -> ProviderResult<u32> {
        Ok(0)
    }
}

impl DeviceCapability for StubProvider {
    fn device_count(&self) -> ProviderResult<u32> {
        Ok(0)
    }
}

impl ForcePlateCapability for StubProvider {
    fn force_plate_count(&self) -> ProviderResult<u32> {
        Ok(0)
    }
}

impl EyeTrackerCapability for StubProvider {
    fn eye_tracker_count(&self) -> ProviderResult<u32> {
        Ok(0)
    }
}
