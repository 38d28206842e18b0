//! # Frame Report
//!
//! A read-only pass over the latched frame that prints every attribute the
//! provider exposes. Queries never abort the report: a failed query is
//! printed with the payload's default value and logged at `trace` level.
//! Static scale and object quality are the exceptions; they are optional
//! and their lines are left out when the query fails.

use std::fmt;
use std::io::{self, Write};

use crate::provider::{
    CaptureProvider, DeviceCapability, EyeTrackerCapability, ForcePlateCapability,
    FrameCapability, MarkerCapability, ProviderResult, ReferenceFrame, Rotation, RotationForm,
    SubjectCapability, Tracked, Vector3,
};

/// `True`/`False`, as printed after occludable values.
#[must_use]
pub fn occlusion_label(occluded: bool) -> &'static str {
    if occluded { "True" } else { "False" }
}

/// Renders a slice as `(a, b, c)`.
struct Components<'a>(&'a [f64]);

impl fmt::Display for Components<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

fn or_default<T: Default>(query: &'static str, result: ProviderResult<T>) -> T {
    result.unwrap_or_else(|err| {
        tracing::trace!(query, error = %err, "Query failed, printing default");
        T::default()
    })
}

/// Write the full report for the frame the provider currently holds.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn write_frame_report<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: CaptureProvider + ?Sized,
    W: Write + ?Sized,
{
    write_frame_info(provider, out)?;
    write_subjects(provider, out)?;
    write_marker_pools(provider, out)?;
    write_devices(provider, out)?;
    write_force_plates(provider, out)?;
    write_eye_trackers(provider, out)
}

/// Frame number, frame rates, timecode, latency and hardware frame number.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn write_frame_info<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: FrameCapability + ?Sized,
    W: Write + ?Sized,
{
    writeln!(
        out,
        "Frame Number: {}",
        or_default("frame_number", provider.frame_number())
    )?;
    writeln!(
        out,
        "Frame rate: {}",
        or_default("frame_rate", provider.frame_rate())
    )?;

    let rate_count = or_default("frame_rate_count", provider.frame_rate_count());
    for index in 0..rate_count {
        let name = or_default("frame_rate_name", provider.frame_rate_name(index));
        let value = or_default("frame_rate_value", provider.frame_rate_value(&name));
        writeln!(out, "{name}: {value}Hz")?;
    }
    writeln!(out)?;

    let tc = or_default("timecode", provider.timecode());
    writeln!(
        out,
        "Timecode: {}h {}m {}s {}f {}sf {} {} {} {}",
        tc.hours,
        tc.minutes,
        tc.seconds,
        tc.frames,
        tc.sub_frame,
        occlusion_label(tc.field_flag),
        tc.standard.code(),
        tc.sub_frames_per_frame,
        tc.user_bits
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "Latency: {}s",
        or_default("latency_total", provider.latency_total())
    )?;
    let sample_count = or_default("latency_sample_count", provider.latency_sample_count());
    for index in 0..sample_count {
        let name = or_default("latency_sample_name", provider.latency_sample_name(index));
        let value = or_default("latency_sample_value", provider.latency_sample_value(&name));
        writeln!(out, "  {name} {value}s")?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Hardware Frame Number: {}",
        or_default("hardware_frame_number", provider.hardware_frame_number())
    )
}

/// Every subject with its segments, quality and markers.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn write_subjects<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: SubjectCapability + MarkerCapability + ?Sized,
    W: Write + ?Sized,
{
    let subject_count = or_default("subject_count", provider.subject_count());
    writeln!(out, "Subjects ({subject_count}):")?;

    for subject_index in 0..subject_count {
        writeln!(out, "  Subject #{subject_index}")?;

        let subject = or_default("subject_name", provider.subject_name(subject_index));
        writeln!(out, "    Name: {subject}")?;

        let root = or_default(
            "subject_root_segment_name",
            provider.subject_root_segment_name(&subject),
        );
        writeln!(out, "    Root Segment: {root}")?;

        let segment_count = or_default("segment_count", provider.segment_count(&subject));
        writeln!(out, "    Segments ({segment_count}):")?;
        for segment_index in 0..segment_count {
            writeln!(out, "      Segment #{segment_index}")?;
            let segment = or_default(
                "segment_name",
                provider.segment_name(&subject, segment_index),
            );
            write_segment(provider, &subject, &segment, out)?;
        }

        if let Ok(quality) = provider.object_quality(&subject) {
            writeln!(out, "    Quality: {quality}")?;
        }

        let marker_count = or_default("marker_count", provider.marker_count(&subject));
        writeln!(out, "    Markers ({marker_count}):")?;
        for marker_index in 0..marker_count {
            let marker = or_default("marker_name", provider.marker_name(&subject, marker_index));
            let position = or_default(
                "marker_global_translation",
                provider.marker_global_translation(&subject, &marker),
            );
            writeln!(
                out,
                "      Marker #{marker_index}: {marker} {} {}",
                Components(&position.value),
                occlusion_label(position.occluded)
            )?;
        }
    }
    Ok(())
}

fn write_segment<P, W>(provider: &P, subject: &str, segment: &str, out: &mut W) -> io::Result<()>
where
    P: SubjectCapability + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "        Name: {segment}")?;

    let parent = or_default(
        "segment_parent_name",
        provider.segment_parent_name(subject, segment),
    );
    writeln!(out, "        Parent: {parent}")?;

    let child_count = or_default(
        "segment_child_count",
        provider.segment_child_count(subject, segment),
    );
    writeln!(out, "        Children ({child_count}):")?;
    for child_index in 0..child_count {
        let child = or_default(
            "segment_child_name",
            provider.segment_child_name(subject, segment, child_index),
        );
        writeln!(out, "          {child}")?;
    }

    if let Ok(scale) = provider.segment_static_scale(subject, segment) {
        writeln!(out, "        Static Scale: {}", Components(&scale))?;
    }

    for frame in ReferenceFrame::ALL {
        let translation = or_default(
            "segment_translation",
            provider.segment_translation(subject, segment, frame),
        );
        write_pose_line(out, frame, "Translation", &translation.value, translation.occluded)?;

        for form in RotationForm::ALL {
            let rotation = provider
                .segment_rotation(subject, segment, frame, form)
                .unwrap_or_else(|err| {
                    tracing::trace!(
                        query = "segment_rotation",
                        error = %err,
                        "Query failed, printing identity"
                    );
                    Tracked::visible(Rotation::identity(form))
                });
            let label = format!("Rotation {}", form.label());
            write_pose_line(out, frame, &label, rotation.value.components(), rotation.occluded)?;
        }
    }
    Ok(())
}

/// Static poses carry no occlusion flag.
fn write_pose_line<W>(
    out: &mut W,
    frame: ReferenceFrame,
    what: &str,
    components: &[f64],
    occluded: bool,
) -> io::Result<()>
where
    W: Write + ?Sized,
{
    write!(out, "        {} {what}: {}", frame.label(), Components(components))?;
    if frame == ReferenceFrame::Static {
        writeln!(out)
    } else {
        writeln!(out, " {}", occlusion_label(occluded))
    }
}

/// The global unlabeled and labeled marker pools.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn write_marker_pools<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: MarkerCapability + ?Sized,
    W: Write + ?Sized,
{
    let unlabeled = or_default("unlabeled_marker_count", provider.unlabeled_marker_count());
    writeln!(out, "  Unlabeled Markers ({unlabeled}):")?;
    for index in 0..unlabeled {
        let position: Vector3 = or_default(
            "unlabeled_marker_global_translation",
            provider.unlabeled_marker_global_translation(index),
        );
        writeln!(out, "    Marker #{index}: {}", Components(&position))?;
    }

    let labeled = or_default("labeled_marker_count", provider.labeled_marker_count());
    writeln!(out, "  Labeled Markers ({labeled}):")?;
    for index in 0..labeled {
        let position: Vector3 = or_default(
            "labeled_marker_global_translation",
            provider.labeled_marker_global_translation(index),
        );
        writeln!(out, "    Marker #{index}: {}", Components(&position))?;
    }
    Ok(())
}

/// Devices, their output components and every subsample.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn write_devices<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: DeviceCapability + ?Sized,
    W: Write + ?Sized,
{
    let device_count = or_default("device_count", provider.device_count());
    writeln!(out, "  Devices ({device_count}):")?;

    for device_index in 0..device_count {
        writeln!(out, "    Device #{device_index}:")?;
        let device = or_default("device_info", provider.device_info(device_index));
        writeln!(out, "      Name: {}", device.name)?;
        writeln!(out, "      Type: {}", device.device_type)?;

        let output_count = or_default(
            "device_output_count",
            provider.device_output_count(&device.name),
        );
        writeln!(out, "      Device Outputs ({output_count}):")?;
        for output_index in 0..output_count {
            writeln!(out, "      Device Output #{output_index}:")?;
            let component = or_default(
                "device_output_component",
                provider.device_output_component(&device.name, output_index),
            );

            let subsamples = or_default(
                "device_output_subsamples",
                provider.device_output_subsamples(
                    &device.name,
                    &component.output_name,
                    &component.component_name,
                ),
            );
            writeln!(out, "      Samples ({subsamples}):")?;
            for subsample in 0..subsamples {
                writeln!(out, "        Sample #{subsample}:")?;
                let value: Tracked<f64> = or_default(
                    "device_output_value",
                    provider.device_output_value(
                        &device.name,
                        &component.output_name,
                        &component.component_name,
                        subsample,
                    ),
                );
                writeln!(
                    out,
                    "          '{}' {} {} {}",
                    component.component_name,
                    value.value,
                    component.unit,
                    occlusion_label(value.occluded)
                )?;
            }
        }
    }
    Ok(())
}

/// Force, moment and centre of pressure for each plate subsample.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn write_force_plates<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: ForcePlateCapability + ?Sized,
    W: Write + ?Sized,
{
    let plate_count = or_default("force_plate_count", provider.force_plate_count());
    writeln!(out, "  Force Plates: ({plate_count})")?;

    for plate in 0..plate_count {
        writeln!(out, "    Force Plate #{plate}:")?;
        let subsamples = or_default(
            "force_plate_subsamples",
            provider.force_plate_subsamples(plate),
        );
        writeln!(out, "    Samples ({subsamples}):")?;
        for subsample in 0..subsamples {
            writeln!(out, "      Sample #{subsample}:")?;
            let force = or_default(
                "global_force_vector",
                provider.global_force_vector(plate, subsample),
            );
            writeln!(out, "        Force {}", Components(&force))?;
            let moment = or_default(
                "global_moment_vector",
                provider.global_moment_vector(plate, subsample),
            );
            writeln!(out, "        Moment {}", Components(&moment))?;
            let cop = or_default(
                "global_centre_of_pressure",
                provider.global_centre_of_pressure(plate, subsample),
            );
            writeln!(out, "        CoP {}", Components(&cop))?;
        }
    }
    Ok(())
}

/// Eye position and gaze direction of each tracker.
///
/// # Errors
/// Only fails if writing to `out` fails.
pub fn write_eye_trackers<P, W>(provider: &P, out: &mut W) -> io::Result<()>
where
    P: EyeTrackerCapability + ?Sized,
    W: Write + ?Sized,
{
    let tracker_count = or_default("eye_tracker_count", provider.eye_tracker_count());
    writeln!(out, "  Eye Trackers: ({tracker_count})")?;

    for tracker in 0..tracker_count {
        writeln!(out, "    Eye Tracker #{tracker}:")?;
        let position = or_default(
            "eye_tracker_global_position",
            provider.eye_tracker_global_position(tracker),
        );
        writeln!(
            out,
            "      Position {} {}",
            Components(&position.value),
            occlusion_label(position.occluded)
        )?;
        let gaze = or_default(
            "eye_tracker_global_gaze_vector",
            provider.eye_tracker_global_gaze_vector(tracker),
        );
        writeln!(
            out,
            "      Gaze {} {}",
            Components(&gaze.value),
            occlusion_label(gaze.occluded)
        )?;
    }
    Ok(())
}
