//! # Simulated Provider
//!
//! [`SimulatedProvider`] answers every capability from a [`Scene`], a plain
//! description of subjects, markers and devices. It is what the CLI runs
//! against when no vendor SDK binding is linked, and what the tests use for
//! end-to-end runs.
//!
//! Nothing is computed: every pose representation is returned exactly as
//! the scene lists it, except that a segment's `velocity` is added to its
//! global translation once per frame.
//!
//! Scenes can be loaded from TOML (feature `config-toml`):
//!
//! ```toml
//! frame_rate = 100.0
//! connect_failures = 2
//!
//! [[subjects]]
//! name = "Wand"
//! quality = 0.98
//!
//! [[subjects.segments]]
//! name = "Wand"
//! velocity = [1.0, 0.0, 0.0]
//!
//! [subjects.segments.global]
//! translation = [0.0, 0.0, 1000.0]
//! rotations = [{ quaternion = [0.0, 0.0, 0.0, 1.0] }]
//!
//! [[subjects.markers]]
//! name = "Wand1"
//! position = [10.0, 0.0, 1000.0]
//! ```

#[cfg(feature = "config-toml")]
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::provider::{
    AxisMapping, ConnectionCapability, DeviceCapability, DeviceInfo, DeviceOutputComponent,
    DeviceType, Direction, EyeTrackerCapability, ForcePlateCapability, FrameCapability,
    MarkerCapability, ProviderError, ProviderResult, ReferenceFrame, Rotation, RotationForm,
    StreamMode, SubjectCapability, Timecode, Tracked, Unit, Vector3, Version,
};
#[cfg(feature = "config-toml")]
use crate::error::{MocapError, MocapResult};

/// Version the simulated provider reports.
pub const SIM_VERSION: Version = Version {
    major: 1,
    minor: 12,
    point: 0,
    revision: 0,
};

const DEFAULT_FRAME_RATE: f64 = 100.0;

// ─── Scene description ──────────────────────────────────────────────────

/// Everything the simulated server streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Frames per second. 0 delivers a frame on every `get_frame` call.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    /// Number of `connect` calls that fail before one succeeds.
    #[serde(default)]
    pub connect_failures: u32,

    /// Additional named rates, e.g. a camera system running at its own rate.
    #[serde(default)]
    pub frame_rates: Vec<NamedValue>,

    /// Latency breakdown in seconds. The total is their sum.
    #[serde(default)]
    pub latency: Vec<NamedValue>,

    #[serde(default)]
    pub timecode: Timecode,

    #[serde(default)]
    pub subjects: Vec<SceneSubject>,

    #[serde(default)]
    pub unlabeled_markers: Vec<Vector3>,

    #[serde(default)]
    pub labeled_markers: Vec<Vector3>,

    #[serde(default)]
    pub devices: Vec<SceneDevice>,

    #[serde(default)]
    pub force_plates: Vec<SceneForcePlate>,

    #[serde(default)]
    pub eye_trackers: Vec<SceneEyeTracker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSubject {
    pub name: String,

    /// Object quality. Absent for subjects that are not rigid objects.
    #[serde(default)]
    pub quality: Option<f64>,

    /// The first segment without a parent is the root.
    #[serde(default)]
    pub segments: Vec<SceneSegment>,

    #[serde(default)]
    pub markers: Vec<SceneMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSegment {
    pub name: String,

    #[serde(default)]
    pub parent: Option<String>,

    /// Static scale of a scaled model. Absent means not present.
    #[serde(default)]
    pub scale: Option<Vector3>,

    #[serde(default, rename = "static")]
    pub static_pose: Pose,

    #[serde(default)]
    pub global: Pose,

    #[serde(default)]
    pub local: Pose,

    /// Added to the global translation every frame.
    #[serde(default)]
    pub velocity: Vector3,

    /// Reports global and local poses as occluded.
    #[serde(default)]
    pub occluded: bool,
}

/// A translation and any number of rotation representations. Forms that
/// are not listed are reported as the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub translation: Vector3,

    #[serde(default)]
    pub rotations: Vec<Rotation>,
}

impl Pose {
    #[must_use]
    pub fn at(translation: Vector3) -> Self {
        Self {
            translation,
            rotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn rotation(&self, form: RotationForm) -> Rotation {
        self.rotations
            .iter()
            .find(|r| r.form() == form)
            .copied()
            .unwrap_or_else(|| Rotation::identity(form))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMarker {
    pub name: String,
    pub position: Vector3,
    #[serde(default)]
    pub occluded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDevice {
    pub name: String,
    #[serde(default)]
    pub device_type: DeviceType,
    #[serde(default)]
    pub outputs: Vec<SceneDeviceOutput>,
}

/// One output component and its subsamples for every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDeviceOutput {
    pub output: String,
    pub component: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub samples: Vec<f64>,
    #[serde(default)]
    pub occluded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneForcePlate {
    #[serde(default)]
    pub samples: Vec<ForcePlateSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForcePlateSample {
    #[serde(default)]
    pub force: Vector3,
    #[serde(default)]
    pub moment: Vector3,
    #[serde(default)]
    pub centre_of_pressure: Vector3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEyeTracker {
    pub position: Vector3,
    pub gaze: Vector3,
    #[serde(default)]
    pub occluded: bool,
}

fn default_frame_rate() -> f64 {
    DEFAULT_FRAME_RATE
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            connect_failures: 0,
            frame_rates: Vec::new(),
            latency: Vec::new(),
            timecode: Timecode::default(),
            subjects: Vec::new(),
            unlabeled_markers: Vec::new(),
            labeled_markers: Vec::new(),
            devices: Vec::new(),
            force_plates: Vec::new(),
            eye_trackers: Vec::new(),
        }
    }
}

impl Scene {
    /// A small scene with one of everything: a wand, a three-segment
    /// skeleton, stray markers, an analog force plate and an eye tracker.
    #[must_use]
    pub fn demo() -> Self {
        let segment = |name: &str, parent: Option<&str>, global: Vector3, local: Vector3| {
            SceneSegment {
                name: name.to_string(),
                parent: parent.map(String::from),
                scale: Some([1.0, 1.0, 1.0]),
                static_pose: Pose::at(local),
                global: Pose::at(global),
                local: Pose::at(local),
                velocity: [0.0; 3],
                occluded: false,
            }
        };
        let marker = |name: &str, position: Vector3| SceneMarker {
            name: name.to_string(),
            position,
            occluded: false,
        };

        let wand = SceneSubject {
            name: "Wand".into(),
            quality: Some(0.98),
            segments: vec![SceneSegment {
                velocity: [2.0, 0.0, 0.0],
                scale: None,
                ..segment("Wand", None, [0.0, 0.0, 1000.0], [0.0, 0.0, 0.0])
            }],
            markers: vec![
                marker("Wand1", [0.0, 0.0, 1000.0]),
                marker("Wand2", [120.0, 0.0, 1000.0]),
                SceneMarker {
                    occluded: true,
                    ..marker("Wand3", [240.0, 0.0, 1000.0])
                },
            ],
        };

        let mut thorax = segment("Thorax", Some("Pelvis"), [0.0, 0.0, 1350.0], [0.0, 0.0, 350.0]);
        thorax.global.rotations = vec![
            Rotation::Quaternion([0.0, 0.0, 0.087_155_7, 0.996_194_7]),
            Rotation::EulerXyz([0.0, 0.0, 0.174_532_9]),
        ];
        let skeleton = SceneSubject {
            name: "Skeleton".into(),
            quality: None,
            segments: vec![
                segment("Pelvis", None, [0.0, 0.0, 1000.0], [0.0, 0.0, 1000.0]),
                thorax,
                SceneSegment {
                    occluded: true,
                    ..segment("Head", Some("Thorax"), [0.0, 0.0, 1650.0], [0.0, 0.0, 300.0])
                },
            ],
            markers: vec![
                marker("LASI", [-120.0, 60.0, 1000.0]),
                marker("RASI", [120.0, 60.0, 1000.0]),
            ],
        };

        let analog = |component: &str, unit: Unit, samples: Vec<f64>| SceneDeviceOutput {
            output: "Force".into(),
            component: component.to_string(),
            unit,
            samples,
            occluded: false,
        };

        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            connect_failures: 0,
            frame_rates: vec![NamedValue {
                name: "Camera".into(),
                value: DEFAULT_FRAME_RATE,
            }],
            latency: vec![
                NamedValue {
                    name: "Camera".into(),
                    value: 0.002,
                },
                NamedValue {
                    name: "Tracker".into(),
                    value: 0.003,
                },
            ],
            timecode: Timecode::default(),
            subjects: vec![wand, skeleton],
            unlabeled_markers: vec![[512.0, -40.0, 3.5]],
            labeled_markers: vec![[0.0, 0.0, 1000.0], [120.0, 0.0, 1000.0]],
            devices: vec![SceneDevice {
                name: "Plate1".into(),
                device_type: DeviceType::ForcePlate,
                outputs: vec![
                    analog("Fx", Unit::Newton, vec![1.5, 1.25]),
                    analog("Fz", Unit::Newton, vec![702.0, 701.5]),
                ],
            }],
            force_plates: vec![SceneForcePlate {
                samples: vec![
                    ForcePlateSample {
                        force: [1.5, 0.0, 702.0],
                        moment: [0.0, 14.0, 0.0],
                        centre_of_pressure: [200.0, 300.0, 0.0],
                    },
                    ForcePlateSample {
                        force: [1.25, 0.0, 701.5],
                        moment: [0.0, 13.5, 0.0],
                        centre_of_pressure: [201.0, 300.0, 0.0],
                    },
                ],
            }],
            eye_trackers: vec![SceneEyeTracker {
                position: [30.0, 0.0, 1700.0],
                gaze: [1.0, 0.0, 0.0],
                occluded: false,
            }],
        }
    }

    /// Parse a scene from TOML.
    ///
    /// # Errors
    /// Returns [`MocapError::ConfigError`] for malformed scenes.
    #[cfg(feature = "config-toml")]
    pub fn from_toml_str(contents: &str) -> MocapResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a scene from a TOML file.
    ///
    /// # Errors
    /// Returns [`MocapError::ConfigError`] when the file cannot be read or
    /// parsed.
    #[cfg(feature = "config-toml")]
    pub fn from_file(path: impl AsRef<Path>) -> MocapResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| MocapError::ConfigError {
            reason: format!("Failed to read scene file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

// ─── Provider ───────────────────────────────────────────────────────────

/// A capture provider backed by a [`Scene`].
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    scene: Scene,
    connected: bool,
    failed_connects: u32,
    host_spec: Option<String>,
    wireless_configured: bool,
    segment_data_enabled: bool,
    stream_mode: StreamMode,
    axis_mapping: AxisMapping,
    buffer_size: Option<u32>,
    frame_number: Option<u32>,
    last_frame_at: Option<Instant>,
    subject_filter: Vec<String>,
}

impl SimulatedProvider {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            connected: false,
            failed_connects: 0,
            host_spec: None,
            wireless_configured: false,
            segment_data_enabled: false,
            stream_mode: StreamMode::ClientPull,
            axis_mapping: AxisMapping::Z_UP,
            buffer_size: None,
            frame_number: None,
            last_frame_at: None,
            subject_filter: Vec::new(),
        }
    }

    #[must_use]
    pub fn demo() -> Self {
        Self::new(Scene::demo())
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Host spec of the last successful `connect`.
    #[must_use]
    pub fn host_spec(&self) -> Option<&str> {
        self.host_spec.as_deref()
    }

    #[must_use]
    pub fn subject_filter(&self) -> &[String] {
        &self.subject_filter
    }

    #[must_use]
    pub fn stream_mode(&self) -> StreamMode {
        self.stream_mode
    }

    #[must_use]
    pub fn segment_data_enabled(&self) -> bool {
        self.segment_data_enabled
    }

    #[must_use]
    pub fn wireless_configured(&self) -> bool {
        self.wireless_configured
    }

    #[must_use]
    pub fn buffer_size(&self) -> Option<u32> {
        self.buffer_size
    }

    fn frame_period(&self) -> Option<Duration> {
        if self.scene.frame_rate > 0.0 {
            Duration::try_from_secs_f64(self.scene.frame_rate.recip()).ok()
        } else {
            None
        }
    }

    fn current_frame(&self) -> ProviderResult<u32> {
        if !self.connected {
            return Err(ProviderError::NotConnected);
        }
        self.frame_number.ok_or(ProviderError::NoFrame)
    }

    fn visible_subjects(&self) -> ProviderResult<Vec<&SceneSubject>> {
        self.current_frame()?;
        Ok(self
            .scene
            .subjects
            .iter()
            .filter(|s| self.subject_filter.is_empty() || self.subject_filter.contains(&s.name))
            .collect())
    }

    fn subject(&self, name: &str) -> ProviderResult<&SceneSubject> {
        self.visible_subjects()?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or(ProviderError::InvalidSubjectName)
    }

    fn segment(&self, subject: &str, segment: &str) -> ProviderResult<&SceneSegment> {
        self.subject(subject)?
            .segments
            .iter()
            .find(|s| s.name == segment)
            .ok_or(ProviderError::InvalidSegmentName)
    }

    fn children<'a>(
        &'a self,
        subject: &str,
        segment: &str,
    ) -> ProviderResult<impl Iterator<Item = &'a SceneSegment>> {
        self.segment(subject, segment)?;
        let segment = segment.to_string();
        Ok(self
            .subject(subject)?
            .segments
            .iter()
            .filter(move |s| s.parent.as_deref() == Some(segment.as_str())))
    }

    fn device(&self, name: &str) -> ProviderResult<&SceneDevice> {
        self.current_frame()?;
        self.scene
            .devices
            .iter()
            .find(|d| d.name == name)
            .ok_or(ProviderError::InvalidDeviceName)
    }

    fn device_output(
        &self,
        device: &str,
        output: &str,
        component: &str,
    ) -> ProviderResult<&SceneDeviceOutput> {
        self.device(device)?
            .outputs
            .iter()
            .find(|o| o.output == output && o.component == component)
            .ok_or(ProviderError::InvalidDeviceOutputName)
    }

    fn force_plate_sample(&self, plate: u32, subsample: u32) -> ProviderResult<&ForcePlateSample> {
        self.current_frame()?;
        self.scene
            .force_plates
            .get(as_index(plate))
            .and_then(|p| p.samples.get(as_index(subsample)))
            .ok_or(ProviderError::InvalidIndex)
    }

    fn eye_tracker(&self, tracker: u32) -> ProviderResult<&SceneEyeTracker> {
        self.current_frame()?;
        self.scene
            .eye_trackers
            .get(as_index(tracker))
            .ok_or(ProviderError::InvalidIndex)
    }
}

fn as_index(i: u32) -> usize {
    usize::try_from(i).unwrap_or(usize::MAX)
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn named_value(values: &[NamedValue], name: &str, missing: ProviderError) -> ProviderResult<f64> {
    values
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.value)
        .ok_or(missing)
}

fn tracked<T>(value: T, occluded: bool) -> Tracked<T> {
    if occluded {
        Tracked::occluded(value)
    } else {
        Tracked::visible(value)
    }
}

/// Two axes pointing along the same world line cannot form a basis.
fn is_colinear(mapping: AxisMapping) -> bool {
    use Direction::{Backward, Down, Forward, Left, Right, Up};
    let line = |d: Direction| match d {
        Forward | Backward => 0,
        Left | Right => 1,
        Up | Down => 2,
    };
    let (x, y, z) = (line(mapping.x), line(mapping.y), line(mapping.z));
    x == y || y == z || x == z
}

impl ConnectionCapability for SimulatedProvider {
    fn connect(&mut self, host_spec: &str) -> ProviderResult<()> {
        if self.connected {
            return Err(ProviderError::ClientAlreadyConnected);
        }
        if host_spec.split(';').any(|host| host.trim().is_empty()) {
            return Err(ProviderError::InvalidHostName);
        }
        if self.failed_connects < self.scene.connect_failures {
            self.failed_connects += 1;
            return Err(ProviderError::ClientConnectionFailed);
        }
        self.connected = true;
        self.host_spec = Some(host_spec.to_string());
        tracing::debug!(host_spec, "Simulated server connected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> ProviderResult<()> {
        if !self.connected {
            return Err(ProviderError::NotConnected);
        }
        self.connected = false;
        self.last_frame_at = None;
        Ok(())
    }

    fn configure_wireless(&mut self) -> ProviderResult<()> {
        self.wireless_configured = true;
        Ok(())
    }

    fn enable_segment_data(&mut self) -> ProviderResult<()> {
        self.segment_data_enabled = true;
        Ok(())
    }

    fn set_stream_mode(&mut self, mode: StreamMode) -> ProviderResult<()> {
        self.stream_mode = mode;
        Ok(())
    }

    fn set_axis_mapping(&mut self, mapping: AxisMapping) -> ProviderResult<()> {
        if is_colinear(mapping) {
            return Err(ProviderError::CoLinearAxes);
        }
        self.axis_mapping = mapping;
        Ok(())
    }

    fn axis_mapping(&self) -> ProviderResult<AxisMapping> {
        Ok(self.axis_mapping)
    }

    fn version(&self) -> ProviderResult<Version> {
        Ok(SIM_VERSION)
    }

    fn set_buffer_size(&mut self, frames: u32) -> ProviderResult<()> {
        self.buffer_size = Some(frames);
        Ok(())
    }
}

impl FrameCapability for SimulatedProvider {
    fn get_frame(&mut self) -> ProviderResult<()> {
        if !self.connected {
            return Err(ProviderError::NotConnected);
        }
        if let (Some(period), Some(last)) = (self.frame_period(), self.last_frame_at) {
            if last.elapsed() < period {
                return Err(ProviderError::NoFrame);
            }
        }
        self.frame_number = Some(self.frame_number.map_or(1, |n| n.wrapping_add(1)));
        self.last_frame_at = Some(Instant::now());
        Ok(())
    }

    fn frame_number(&self) -> ProviderResult<u32> {
        self.current_frame()
    }

    fn frame_rate(&self) -> ProviderResult<f64> {
        self.current_frame()?;
        Ok(self.scene.frame_rate)
    }

    fn frame_rate_count(&self) -> ProviderResult<u32> {
        self.current_frame()?;
        Ok(count(self.scene.frame_rates.len()))
    }

    fn frame_rate_name(&self, index: u32) -> ProviderResult<String> {
        self.current_frame()?;
        self.scene
            .frame_rates
            .get(as_index(index))
            .map(|r| r.name.clone())
            .ok_or(ProviderError::InvalidIndex)
    }

    fn frame_rate_value(&self, name: &str) -> ProviderResult<f64> {
        self.current_frame()?;
        named_value(&self.scene.frame_rates, name, ProviderError::InvalidFrameRateName)
    }

    fn timecode(&self) -> ProviderResult<Timecode> {
        self.current_frame()?;
        Ok(self.scene.timecode)
    }

    fn latency_total(&self) -> ProviderResult<f64> {
        self.current_frame()?;
        Ok(self.scene.latency.iter().map(|s| s.value).sum())
    }

    fn latency_sample_count(&self) -> ProviderResult<u32> {
        self.current_frame()?;
        Ok(count(self.scene.latency.len()))
    }

    fn latency_sample_name(&self, index: u32) -> ProviderResult<String> {
        self.current_frame()?;
        self.scene
            .latency
            .get(as_index(index))
            .map(|s| s.name.clone())
            .ok_or(ProviderError::InvalidIndex)
    }

    fn latency_sample_value(&self, name: &str) -> ProviderResult<f64> {
        self.current_frame()?;
        named_value(&self.scene.latency, name, ProviderError::InvalidLatencySampleName)
    }

    fn hardware_frame_number(&self) -> ProviderResult<u32> {
        self.current_frame()
    }
}

impl SubjectCapability for SimulatedProvider {
    fn add_to_subject_filter(&mut self, subject: &str) -> ProviderResult<()> {
        self.current_frame()?;
        if !self.scene.subjects.iter().any(|s| s.name == subject) {
            return Err(ProviderError::InvalidSubjectName);
        }
        if !self.subject_filter.iter().any(|s| s == subject) {
            self.subject_filter.push(subject.to_string());
        }
        Ok(())
    }

    fn subject_count(&self) -> ProviderResult<u32> {
        Ok(count(self.visible_subjects()?.len()))
    }

    fn subject_name(&self, index: u32) -> ProviderResult<String> {
        self.visible_subjects()?
            .get(as_index(index))
            .map(|s| s.name.clone())
            .ok_or(ProviderError::InvalidIndex)
    }

    fn subject_root_segment_name(&self, subject: &str) -> ProviderResult<String> {
        self.subject(subject)?
            .segments
            .iter()
            .find(|s| s.parent.is_none())
            .map(|s| s.name.clone())
            .ok_or(ProviderError::NotPresent)
    }

    fn segment_count(&self, subject: &str) -> ProviderResult<u32> {
        Ok(count(self.subject(subject)?.segments.len()))
    }

    fn segment_name(&self, subject: &str, index: u32) -> ProviderResult<String> {
        self.subject(subject)?
            .segments
            .get(as_index(index))
            .map(|s| s.name.clone())
            .ok_or(ProviderError::InvalidIndex)
    }

    fn segment_parent_name(&self, subject: &str, segment: &str) -> ProviderResult<String> {
        Ok(self
            .segment(subject, segment)?
            .parent
            .clone()
            .unwrap_or_default())
    }

    fn segment_child_count(&self, subject: &str, segment: &str) -> ProviderResult<u32> {
        Ok(count(self.children(subject, segment)?.count()))
    }

    fn segment_child_name(
        &self,
        subject: &str,
        segment: &str,
        index: u32,
    ) -> ProviderResult<String> {
        self.children(subject, segment)?
            .nth(as_index(index))
            .map(|s| s.name.clone())
            .ok_or(ProviderError::InvalidIndex)
    }

    fn segment_static_scale(&self, subject: &str, segment: &str) -> ProviderResult<Vector3> {
        self.segment(subject, segment)?
            .scale
            .ok_or(ProviderError::NotPresent)
    }

    fn segment_translation(
        &self,
        subject: &str,
        segment: &str,
        frame: ReferenceFrame,
    ) -> ProviderResult<Tracked<Vector3>> {
        let seg = self.segment(subject, segment)?;
        Ok(match frame {
            ReferenceFrame::Static => Tracked::visible(seg.static_pose.translation),
            ReferenceFrame::Global => {
                let frames = f64::from(self.current_frame()?);
                let mut translation = seg.global.translation;
                for (axis, speed) in translation.iter_mut().zip(seg.velocity) {
                    *axis += speed * frames;
                }
                tracked(translation, seg.occluded)
            }
            ReferenceFrame::Local => tracked(seg.local.translation, seg.occluded),
        })
    }

    fn segment_rotation(
        &self,
        subject: &str,
        segment: &str,
        frame: ReferenceFrame,
        form: RotationForm,
    ) -> ProviderResult<Tracked<Rotation>> {
        let seg = self.segment(subject, segment)?;
        Ok(match frame {
            ReferenceFrame::Static => Tracked::visible(seg.static_pose.rotation(form)),
            ReferenceFrame::Global => tracked(seg.global.rotation(form), seg.occluded),
            ReferenceFrame::Local => tracked(seg.local.rotation(form), seg.occluded),
        })
    }

    fn object_quality(&self, subject: &str) -> ProviderResult<f64> {
        self.subject(subject)?
            .quality
            .ok_or(ProviderError::NotSupported)
    }
}

impl MarkerCapability for SimulatedProvider {
    fn marker_count(&self, subject: &str) -> ProviderResult<u32> {
        Ok(count(self.subject(subject)?.markers.len()))
    }

    fn marker_name(&self, subject: &str, index: u32) -> ProviderResult<String> {
        self.subject(subject)?
            .markers
            .get(as_index(index))
            .map(|m| m.name.clone())
            .ok_or(ProviderError::InvalidIndex)
    }

    fn marker_global_translation(
        &self,
        subject: &str,
        marker: &str,
    ) -> ProviderResult<Tracked<Vector3>> {
        self.subject(subject)?
            .markers
            .iter()
            .find(|m| m.name == marker)
            .map(|m| tracked(m.position, m.occluded))
            .ok_or(ProviderError::InvalidMarkerName)
    }

    fn unlabeled_marker_count(&self) -> ProviderResult<u32> {
        self.current_frame()?;
        Ok(count(self.scene.unlabeled_markers.len()))
    }

    fn unlabeled_marker_global_translation(&self, index: u32) -> ProviderResult<Vector3> {
        self.current_frame()?;
        self.scene
            .unlabeled_markers
            .get(as_index(index))
            .copied()
            .ok_or(ProviderError::InvalidIndex)
    }

    fn labeled_marker_count(&self) -> ProviderResult<u32> {
        self.current_frame()?;
        Ok(count(self.scene.labeled_markers.len()))
    }

    fn labeled_marker_global_translation(&self, index: u32) -> ProviderResult<Vector3> {
        self.current_frame()?;
        self.scene
            .labeled_markers
            .get(as_index(index))
            .copied()
            .ok_or(ProviderError::InvalidIndex)
    }
}

impl DeviceCapability for SimulatedProvider {
    fn device_count(&self) -> ProviderResult<u32> {
        self.current_frame()?;
        Ok(count(self.scene.devices.len()))
    }

    fn device_info(&self, index: u32) -> ProviderResult<DeviceInfo> {
        self.current_frame()?;
        self.scene
            .devices
            .get(as_index(index))
            .map(|d| DeviceInfo {
                name: d.name.clone(),
                device_type: d.device_type,
            })
            .ok_or(ProviderError::InvalidIndex)
    }

    fn device_output_count(&self, device: &str) -> ProviderResult<u32> {
        Ok(count(self.device(device)?.outputs.len()))
    }

    fn device_output_component(
        &self,
        device: &str,
        index: u32,
    ) -> ProviderResult<DeviceOutputComponent> {
        self.device(device)?
            .outputs
            .get(as_index(index))
            .map(|o| DeviceOutputComponent {
                output_name: o.output.clone(),
                component_name: o.component.clone(),
                unit: o.unit,
            })
            .ok_or(ProviderError::InvalidIndex)
    }

    fn device_output_subsamples(
        &self,
        device: &str,
        output: &str,
        component: &str,
    ) -> ProviderResult<u32> {
        Ok(count(
            self.device_output(device, output, component)?.samples.len(),
        ))
    }

    fn device_output_value(
        &self,
        device: &str,
        output: &str,
        component: &str,
        subsample: u32,
    ) -> ProviderResult<Tracked<f64>> {
        let output = self.device_output(device, output, component)?;
        output
            .samples
            .get(as_index(subsample))
            .map(|v| tracked(*v, output.occluded))
            .ok_or(ProviderError::InvalidIndex)
    }
}

impl ForcePlateCapability for SimulatedProvider {
    fn force_plate_count(&self) -> ProviderResult<u32> {
        self.current_frame()?;
        Ok(count(self.scene.force_plates.len()))
    }

    fn force_plate_subsamples(&self, plate: u32) -> ProviderResult<u32> {
        self.current_frame()?;
        self.scene
            .force_plates
            .get(as_index(plate))
            .map(|p| count(p.samples.len()))
            .ok_or(ProviderError::InvalidIndex)
    }

    fn global_force_vector(&self, plate: u32, subsample: u32) -> ProviderResult<Vector3> {
        Ok(self.force_plate_sample(plate, subsample)?.force)
    }

    fn global_moment_vector(&self, plate: u32, subsample: u32) -> ProviderResult<Vector3> {
        Ok(self.force_plate_sample(plate, subsample)?.moment)
    }

    fn global_centre_of_pressure(&self, plate: u32, subsample: u32) -> ProviderResult<Vector3> {
        Ok(self.force_plate_sample(plate, subsample)?.centre_of_pressure)
    }
}

impl EyeTrackerCapability for SimulatedProvider {
    fn eye_tracker_count(&self) -> ProviderResult<u32> {
        self.current_frame()?;
        Ok(count(self.scene.eye_trackers.len()))
    }

    fn eye_tracker_global_position(&self, tracker: u32) -> ProviderResult<Tracked<Vector3>> {
        let t = self.eye_tracker(tracker)?;
        Ok(tracked(t.position, t.occluded))
    }

    fn eye_tracker_global_gaze_vector(&self, tracker: u32) -> ProviderResult<Tracked<Vector3>> {
        let t = self.eye_tracker(tracker)?;
        Ok(tracked(t.gaze, t.occluded))
    }
}
