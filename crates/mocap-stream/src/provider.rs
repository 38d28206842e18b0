//! # Capture Provider Capabilities
//!
//! The vendor SDK that actually talks to the capture server is modelled as a
//! set of narrow capability traits, one per data category. A type that
//! implements all of them is a [`CaptureProvider`] through a blanket impl.
//!
//! Every call is synchronous and returns a [`ProviderResult`], the Rust form
//! of the SDK's (status, payload) pair.
//!
//! Apart from `connect`, `is_connected` and `get_frame`, every method has a
//! default body returning [`ProviderError::NotImplemented`], so a test double
//! only implements the queries its test exercises:
//!
//! ```
//! use mocap_stream::provider::{ForcePlateCapability, ProviderResult};
//!
//! struct OnePlate;
//!
//! impl ForcePlateCapability for OnePlate {
//!     fn force_plate_count(&self) -> ProviderResult<u32> {
//!         Ok(1)
//!     }
//! }
//!
//! assert_eq!(OnePlate.force_plate_count(), Ok(1));
//! assert!(OnePlate.force_plate_subsamples(0).is_err());
//! ```

pub mod types;

pub use crate::error::{ProviderError, ProviderResult};
pub use types::{
    AxisMapping, DeviceInfo, DeviceOutputComponent, DeviceType, Direction, ReferenceFrame,
    Rotation, RotationForm, StreamMode, Timecode, TimecodeStandard, Tracked, Unit, Vector3,
    Version,
};

use ProviderError::NotImplemented;

/// Connection lifecycle and one-shot stream configuration.
pub trait ConnectionCapability {
    /// Connect to a `;`-separated list of `host[:port]` entries.
    fn connect(&mut self, host_spec: &str) -> ProviderResult<()>;

    fn is_connected(&self) -> bool;

    fn disconnect(&mut self) -> ProviderResult<()> {
        Err(NotImplemented)
    }

    /// Tune the host's network stack for a wireless link.
    fn configure_wireless(&mut self) -> ProviderResult<()> {
        Err(NotImplemented)
    }

    fn enable_segment_data(&mut self) -> ProviderResult<()> {
        Err(NotImplemented)
    }

    fn set_stream_mode(&mut self, _mode: StreamMode) -> ProviderResult<()> {
        Err(NotImplemented)
    }

    fn set_axis_mapping(&mut self, _mapping: AxisMapping) -> ProviderResult<()> {
        Err(NotImplemented)
    }

    fn axis_mapping(&self) -> ProviderResult<AxisMapping> {
        Err(NotImplemented)
    }

    fn version(&self) -> ProviderResult<Version> {
        Err(NotImplemented)
    }

    /// Number of frames the client buffers.
    fn set_buffer_size(&mut self, _frames: u32) -> ProviderResult<()> {
        Err(NotImplemented)
    }
}

/// Frame acquisition and per-frame metadata.
pub trait FrameCapability {
    /// Latch the latest frame. Fails with [`ProviderError::NoFrame`] when
    /// none is available yet.
    fn get_frame(&mut self) -> ProviderResult<()>;

    fn frame_number(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    /// System frame rate in Hz.
    fn frame_rate(&self) -> ProviderResult<f64> {
        Err(NotImplemented)
    }

    fn frame_rate_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn frame_rate_name(&self, _index: u32) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    fn frame_rate_value(&self, _name: &str) -> ProviderResult<f64> {
        Err(NotImplemented)
    }

    fn timecode(&self) -> ProviderResult<Timecode> {
        Err(NotImplemented)
    }

    /// Total latency in seconds.
    fn latency_total(&self) -> ProviderResult<f64> {
        Err(NotImplemented)
    }

    fn latency_sample_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn latency_sample_name(&self, _index: u32) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    fn latency_sample_value(&self, _name: &str) -> ProviderResult<f64> {
        Err(NotImplemented)
    }

    fn hardware_frame_number(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }
}

/// Subjects, their segment hierarchy and segment poses.
///
/// Parent/child relations are answered by name lookup on every call; the
/// client never holds a tree of its own.
pub trait SubjectCapability {
    /// Restrict the stream to the named subject. Only meaningful after a
    /// frame has been received, since names resolve against frame data.
    fn add_to_subject_filter(&mut self, _subject: &str) -> ProviderResult<()> {
        Err(NotImplemented)
    }

    fn subject_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn subject_name(&self, _index: u32) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    fn subject_root_segment_name(&self, _subject: &str) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    fn segment_count(&self, _subject: &str) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn segment_name(&self, _subject: &str, _index: u32) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    fn segment_parent_name(&self, _subject: &str, _segment: &str) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    fn segment_child_count(&self, _subject: &str, _segment: &str) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn segment_child_name(
        &self,
        _subject: &str,
        _segment: &str,
        _index: u32,
    ) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    /// Fails with [`ProviderError::NotPresent`] for segments without a
    /// scaled model.
    fn segment_static_scale(&self, _subject: &str, _segment: &str) -> ProviderResult<Vector3> {
        Err(NotImplemented)
    }

    fn segment_translation(
        &self,
        _subject: &str,
        _segment: &str,
        _frame: ReferenceFrame,
    ) -> ProviderResult<Tracked<Vector3>> {
        Err(NotImplemented)
    }

    fn segment_rotation(
        &self,
        _subject: &str,
        _segment: &str,
        _frame: ReferenceFrame,
        _form: RotationForm,
    ) -> ProviderResult<Tracked<Rotation>> {
        Err(NotImplemented)
    }

    /// Tracking quality of a rigid object, when the server reports one.
    fn object_quality(&self, _subject: &str) -> ProviderResult<f64> {
        Err(NotImplemented)
    }
}

/// Subject markers plus the global labeled and unlabeled pools.
pub trait MarkerCapability {
    fn marker_count(&self, _subject: &str) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn marker_name(&self, _subject: &str, _index: u32) -> ProviderResult<String> {
        Err(NotImplemented)
    }

    fn marker_global_translation(
        &self,
        _subject: &str,
        _marker: &str,
    ) -> ProviderResult<Tracked<Vector3>> {
        Err(NotImplemented)
    }

    fn unlabeled_marker_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn unlabeled_marker_global_translation(&self, _index: u32) -> ProviderResult<Vector3> {
        Err(NotImplemented)
    }

    fn labeled_marker_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn labeled_marker_global_translation(&self, _index: u32) -> ProviderResult<Vector3> {
        Err(NotImplemented)
    }
}

/// Generic analog/digital devices and their multi-sample outputs.
pub trait DeviceCapability {
    fn device_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn device_info(&self, _index: u32) -> ProviderResult<DeviceInfo> {
        Err(NotImplemented)
    }

    fn device_output_count(&self, _device: &str) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn device_output_component(
        &self,
        _device: &str,
        _index: u32,
    ) -> ProviderResult<DeviceOutputComponent> {
        Err(NotImplemented)
    }

    fn device_output_subsamples(
        &self,
        _device: &str,
        _output: &str,
        _component: &str,
    ) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn device_output_value(
        &self,
        _device: &str,
        _output: &str,
        _component: &str,
        _subsample: u32,
    ) -> ProviderResult<Tracked<f64>> {
        Err(NotImplemented)
    }
}

/// Force plates, sampled several times per frame.
pub trait ForcePlateCapability {
    fn force_plate_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn force_plate_subsamples(&self, _plate: u32) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn global_force_vector(&self, _plate: u32, _subsample: u32) -> ProviderResult<Vector3> {
        Err(NotImplemented)
    }

    fn global_moment_vector(&self, _plate: u32, _subsample: u32) -> ProviderResult<Vector3> {
        Err(NotImplemented)
    }

    fn global_centre_of_pressure(&self, _plate: u32, _subsample: u32) -> ProviderResult<Vector3> {
        Err(NotImplemented)
    }
}

pub trait EyeTrackerCapability {
    fn eye_tracker_count(&self) -> ProviderResult<u32> {
        Err(NotImplemented)
    }

    fn eye_tracker_global_position(&self, _tracker: u32) -> ProviderResult<Tracked<Vector3>> {
        Err(NotImplemented)
    }

    fn eye_tracker_global_gaze_vector(&self, _tracker: u32) -> ProviderResult<Tracked<Vector3>> {
        Err(NotImplemented)
    }
}

/// Everything the reporter needs from a provider.
pub trait CaptureProvider:
    ConnectionCapability
    + FrameCapability
    + SubjectCapability
    + MarkerCapability
    + DeviceCapability
    + ForcePlateCapability
    + EyeTrackerCapability
{
}

impl<T> CaptureProvider for T where
    T: ConnectionCapability
        + FrameCapability
        + SubjectCapability
        + MarkerCapability
        + DeviceCapability
        + ForcePlateCapability
        + EyeTrackerCapability
{
}
