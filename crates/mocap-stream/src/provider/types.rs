//! Value types returned by capture provider queries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 3-component vector (translation, force, gaze, ...), in provider units.
pub type Vector3 = [f64; 3];

/// A value together with its occlusion flag.
///
/// `occluded` means the provider could not observe the value this frame and
/// `value` is a best-effort estimate or stale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tracked<T> {
    pub value: T,
    pub occluded: bool,
}

impl<T> Tracked<T> {
    #[must_use]
    pub fn visible(value: T) -> Self {
        Self {
            value,
            occluded: false,
        }
    }

    #[must_use]
    pub fn occluded(value: T) -> Self {
        Self {
            value,
            occluded: true,
        }
    }
}

/// Frame a segment pose is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFrame {
    /// The calibrated reference pose. Never occluded.
    Static,
    Global,
    /// Relative to the parent segment.
    Local,
}

impl ReferenceFrame {
    pub const ALL: [ReferenceFrame; 3] = [Self::Static, Self::Global, Self::Local];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Global => "Global",
            Self::Local => "Local",
        }
    }
}

/// Rotation representation requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationForm {
    Helical,
    Matrix,
    Quaternion,
    EulerXyz,
}

impl RotationForm {
    pub const ALL: [RotationForm; 4] = [
        Self::Helical,
        Self::Matrix,
        Self::Quaternion,
        Self::EulerXyz,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Helical => "Helical",
            Self::Matrix => "Matrix",
            Self::Quaternion => "Quaternion",
            Self::EulerXyz => "EulerXYZ",
        }
    }
}

/// A rotation in one of the provider's representations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Axis scaled by angle, in radians.
    Helical([f64; 3]),
    /// Row-major 3x3 matrix.
    Matrix([f64; 9]),
    /// `[x, y, z, w]`.
    Quaternion([f64; 4]),
    /// Euler angles about X, Y, Z in radians.
    EulerXyz([f64; 3]),
}

impl Rotation {
    /// The identity rotation in the requested representation.
    #[must_use]
    pub fn identity(form: RotationForm) -> Self {
        match form {
            RotationForm::Helical => Self::Helical([0.0; 3]),
            RotationForm::Matrix => {
                Self::Matrix([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
            }
            RotationForm::Quaternion => Self::Quaternion([0.0, 0.0, 0.0, 1.0]),
            RotationForm::EulerXyz => Self::EulerXyz([0.0; 3]),
        }
    }

    #[must_use]
    pub fn form(&self) -> RotationForm {
        match self {
            Self::Helical(_) => RotationForm::Helical,
            Self::Matrix(_) => RotationForm::Matrix,
            Self::Quaternion(_) => RotationForm::Quaternion,
            Self::EulerXyz(_) => RotationForm::EulerXyz,
        }
    }

    #[must_use]
    pub fn components(&self) -> &[f64] {
        match self {
            Self::Helical(v) | Self::EulerXyz(v) => v,
            Self::Matrix(m) => m,
            Self::Quaternion(q) => q,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity(RotationForm::Quaternion)
    }
}

/// World direction an output axis points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "Forward",
            Self::Backward => "Backward",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
        };
        f.write_str(name)
    }
}

/// Which world direction each of the X, Y and Z output axes points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisMapping {
    pub x: Direction,
    pub y: Direction,
    pub z: Direction,
}

impl AxisMapping {
    pub const Z_UP: AxisMapping = AxisMapping {
        x: Direction::Forward,
        y: Direction::Left,
        z: Direction::Up,
    };

    pub const Y_UP: AxisMapping = AxisMapping {
        x: Direction::Forward,
        y: Direction::Up,
        z: Direction::Right,
    };

    pub const X_UP: AxisMapping = AxisMapping {
        x: Direction::Up,
        y: Direction::Forward,
        z: Direction::Left,
    };

    /// Resolve a preset name. `"YUp"` and `"XUp"` select their presets;
    /// anything else keeps the Z-up default.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "YUp" => Self::Y_UP,
            "XUp" => Self::X_UP,
            "ZUp" => Self::Z_UP,
            other => {
                tracing::debug!(name = other, "Unrecognized axis mapping, keeping Z-up");
                Self::Z_UP
            }
        }
    }
}

impl Default for AxisMapping {
    fn default() -> Self {
        Self::Z_UP
    }
}

/// How frames are delivered from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamMode {
    ClientPull,
    ClientPullPreFetch,
    #[default]
    ServerPush,
}

/// Provider SDK version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub point: u32,
    pub revision: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.point, self.revision
        )
    }
}

/// Timecode standard. Printed as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimecodeStandard {
    #[default]
    None,
    Pal,
    Ntsc,
    NtscDrop,
    Film,
    NtscFilm,
    Atsc,
}

impl TimecodeStandard {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Pal => 1,
            Self::Ntsc => 2,
            Self::NtscDrop => 3,
            Self::Film => 4,
            Self::NtscFilm => 5,
            Self::Atsc => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
    pub sub_frame: u32,
    pub field_flag: bool,
    pub standard: TimecodeStandard,
    pub sub_frames_per_frame: u32,
    pub user_bits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceType {
    ForcePlate,
    #[default]
    Unknown,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForcePlate => f.write_str("ForcePlate"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Unit of a device output component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    Unknown,
    Meter,
    Volt,
    NewtonMeter,
    Newton,
    Kilogram,
    Second,
    Ampere,
    Kelvin,
    Mole,
    Candela,
    Radian,
    Steradian,
    MeterSquared,
    MeterCubed,
    MeterPerSecond,
    MeterPerSecondSquared,
    RadianPerSecond,
    RadianPerSecondSquared,
    Hertz,
    Joule,
    Watt,
    Pascal,
    Lumen,
    Lux,
    Coulomb,
    Ohm,
    Farad,
    Weber,
    Tesla,
    Henry,
    Siemens,
    Becquerel,
    Gray,
    Sievert,
    Katal,
}

impl fmt::Display for Unit {
    // Variant names are the printed unit names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub name: String,
    pub device_type: DeviceType,
}

/// One named output component of a device, e.g. `Fx` of output `Force`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceOutputComponent {
    pub output_name: String,
    pub component_name: String,
    pub unit: Unit,
}
