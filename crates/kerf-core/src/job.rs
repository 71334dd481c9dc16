//! Job model
//!
//! A job is an ordered list of parts; each part is either a vector path or
//! a raster region, carries its own resolution (dots per inch) and a laser
//! property payload. Part and command kinds are tagged enums so that the
//! orchestrator and encoders match on them exhaustively; adding a part kind
//! is a compile-time-checked change.

use crate::error::{JobError, Result};
use crate::units;

/// An integer coordinate in device pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// X coordinate in pixels at the owning part's resolution.
    pub x: i32,
    /// Y coordinate in pixels at the owning part's resolution.
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point shifted by the given pixel offsets
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Laser property payload attached to parts and vector property changes.
///
/// Only power and speed affect command generation; focus and frequency are
/// carried for device profiles that expose them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaserProperty {
    /// Power and speed only
    PowerSpeed {
        /// Laser power in percent (0-100).
        power: u8,
        /// Speed in percent of the configured maximum rate (0-100).
        speed: u8,
    },
    /// Power, speed, and focus offset
    PowerSpeedFocus {
        /// Laser power in percent (0-100).
        power: u8,
        /// Speed in percent of the configured maximum rate (0-100).
        speed: u8,
        /// Focus offset in millimetres.
        focus: f32,
    },
    /// Power, speed, focus offset, and pulse frequency
    PowerSpeedFocusFrequency {
        /// Laser power in percent (0-100).
        power: u8,
        /// Speed in percent of the configured maximum rate (0-100).
        speed: u8,
        /// Focus offset in millimetres.
        focus: f32,
        /// Pulse frequency in Hz.
        frequency: u32,
    },
}

impl LaserProperty {
    /// Create a power/speed property, clamping both to 100%.
    pub fn power_speed(power: u8, speed: u8) -> Self {
        Self::PowerSpeed {
            power: power.min(100),
            speed: speed.min(100),
        }
    }

    /// Laser power in percent (0-100)
    pub fn power(&self) -> u8 {
        match *self {
            Self::PowerSpeed { power, .. }
            | Self::PowerSpeedFocus { power, .. }
            | Self::PowerSpeedFocusFrequency { power, .. } => power,
        }
    }

    /// Speed in percent of the configured maximum rate (0-100)
    pub fn speed(&self) -> u8 {
        match *self {
            Self::PowerSpeed { speed, .. }
            | Self::PowerSpeedFocus { speed, .. }
            | Self::PowerSpeedFocusFrequency { speed, .. } => speed,
        }
    }
}

/// One operation within a vector part, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VectorCommand {
    /// Rapid move without marking
    MoveTo(Point),
    /// Linear marking move to the given point
    LineTo(Point),
    /// Change the active laser property
    SetProperty(LaserProperty),
}

/// An ordered vector path.
#[derive(Debug, Clone)]
pub struct VectorPart {
    /// Resolution in dots per inch.
    pub dpi: f64,
    /// Commands in drawing order; order is preserved exactly.
    pub commands: Vec<VectorCommand>,
}

impl VectorPart {
    /// Create an empty vector part at the given resolution
    pub fn new(dpi: f64) -> Self {
        Self {
            dpi,
            commands: Vec::new(),
        }
    }

    /// Append a rapid move
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.commands.push(VectorCommand::MoveTo(Point::new(x, y)));
    }

    /// Append a marking move
    pub fn line_to(&mut self, x: i32, y: i32) {
        self.commands.push(VectorCommand::LineTo(Point::new(x, y)));
    }

    /// Append a property change
    pub fn set_property(&mut self, property: LaserProperty) {
        self.commands.push(VectorCommand::SetProperty(property));
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        for cmd in &mut self.commands {
            match cmd {
                VectorCommand::MoveTo(p) | VectorCommand::LineTo(p) => {
                    *p = p.translated(dx, dy);
                }
                VectorCommand::SetProperty(_) => {}
            }
        }
    }
}

/// A bilevel raster region: every pixel is either marked or blank.
#[derive(Debug, Clone)]
pub struct RasterPart {
    /// Top-left corner of the region in device pixels.
    pub start: Point,
    /// Resolution in dots per inch.
    pub dpi: f64,
    /// Laser property shared by the whole part.
    pub property: LaserProperty,
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl RasterPart {
    /// Create a blank raster region
    pub fn new(start: Point, width: u32, height: u32, dpi: f64, property: LaserProperty) -> Self {
        Self {
            start,
            dpi,
            property,
            width,
            height,
            pixels: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Region width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Region height in pixels (number of scan lines)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mark the pixel at (x, line) within the region
    pub fn set_black(&mut self, x: u32, line: u32) {
        debug_assert!(x < self.width && line < self.height);
        self.pixels[(line as usize) * (self.width as usize) + x as usize] = true;
    }

    /// Whether the pixel at (x, line) within the region is marked
    pub fn is_black(&self, x: u32, line: u32) -> bool {
        self.pixels[(line as usize) * (self.width as usize) + x as usize]
    }
}

/// A grayscale raster region with an 8-bit intensity per pixel
/// (0 = no mark, 255 = full configured power).
#[derive(Debug, Clone)]
pub struct Raster3dPart {
    /// Top-left corner of the region in device pixels.
    pub start: Point,
    /// Resolution in dots per inch.
    pub dpi: f64,
    /// Laser property shared by the whole part.
    pub property: LaserProperty,
    width: u32,
    samples: Vec<u8>,
}

impl Raster3dPart {
    /// Create a grayscale region from row-major samples.
    ///
    /// `samples.len()` must be a multiple of `width`; the height is derived.
    pub fn from_samples(
        start: Point,
        width: u32,
        dpi: f64,
        property: LaserProperty,
        samples: Vec<u8>,
    ) -> Self {
        assert!(width > 0 && samples.len() % width as usize == 0);
        Self {
            start,
            dpi,
            property,
            width,
            samples,
        }
    }

    /// Region width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Region height in pixels (number of scan lines)
    pub fn height(&self) -> u32 {
        (self.samples.len() / self.width as usize) as u32
    }

    /// One scan line of intensity samples
    pub fn raster_line(&self, line: u32) -> &[u8] {
        let w = self.width as usize;
        let off = line as usize * w;
        &self.samples[off..off + w]
    }
}

/// One drawing unit within a job.
#[derive(Debug, Clone)]
pub enum JobPart {
    /// Ordered vector path
    Vector(VectorPart),
    /// Bilevel raster region
    Raster(RasterPart),
    /// Grayscale raster region
    Raster3d(Raster3dPart),
}

impl JobPart {
    /// Resolution of the part in dots per inch
    pub fn dpi(&self) -> f64 {
        match self {
            JobPart::Vector(p) => p.dpi,
            JobPart::Raster(p) => p.dpi,
            JobPart::Raster3d(p) => p.dpi,
        }
    }
}

/// An ordered sequence of parts submitted as one unit of work.
#[derive(Debug, Clone, Default)]
pub struct Job {
    /// Human-readable job name, used in log output.
    pub name: String,
    /// Parts in submission order.
    pub parts: Vec<JobPart>,
    /// Optional user-chosen origin in millimetres; applied once before
    /// encoding by [`apply_start_point`].
    pub start_point_mm: Option<(f64, f64)>,
}

impl Job {
    /// Create an empty job
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
            start_point_mm: None,
        }
    }

    /// Append a part
    pub fn add_part(&mut self, part: JobPart) {
        self.parts.push(part);
    }
}

/// Normalize part coordinates against the job's start point.
///
/// Translates every part so the user-chosen origin becomes (0, 0), then
/// clears the start point so repeated calls are no-ops.
pub fn apply_start_point(job: &mut Job) {
    let Some((sx_mm, sy_mm)) = job.start_point_mm.take() else {
        return;
    };
    for part in &mut job.parts {
        let dx = -(units::mm_to_px(sx_mm, part.dpi()) as i32);
        let dy = -(units::mm_to_px(sy_mm, part.dpi()) as i32);
        match part {
            JobPart::Vector(p) => p.translate(dx, dy),
            JobPart::Raster(p) => p.start = p.start.translated(dx, dy),
            JobPart::Raster3d(p) => p.start = p.start.translated(dx, dy),
        }
    }
}

/// Pre-flight job validation against the bed dimensions (millimetres).
///
/// Rejects empty jobs and any part whose bounding box leaves the bed.
/// Runs before any bytes are sent; a failed job sends nothing.
pub fn check_job(job: &Job, bed_width_mm: f64, bed_height_mm: f64) -> Result<()> {
    if job.parts.is_empty() {
        return Err(JobError::EmptyJob.into());
    }
    for (index, part) in job.parts.iter().enumerate() {
        let bounds = part_bounds_px(part);
        let Some((min_x, min_y, max_x, max_y)) = bounds else {
            continue; // no geometry, nothing to check
        };
        let dpi = part.dpi();
        let max_x_mm = units::px_to_mm(max_x as f64, dpi);
        let max_y_mm = units::px_to_mm(max_y as f64, dpi);
        let reason = if min_x < 0 || min_y < 0 {
            Some(format!("negative coordinates ({min_x}, {min_y})"))
        } else if max_x_mm > bed_width_mm {
            Some(format!("width {max_x_mm:.2}mm > bed {bed_width_mm:.2}mm"))
        } else if max_y_mm > bed_height_mm {
            Some(format!("height {max_y_mm:.2}mm > bed {bed_height_mm:.2}mm"))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(JobError::OutOfBounds {
                part_index: index,
                reason,
            }
            .into());
        }
    }
    Ok(())
}

fn part_bounds_px(part: &JobPart) -> Option<(i32, i32, i32, i32)> {
    match part {
        JobPart::Vector(p) => {
            let mut bounds: Option<(i32, i32, i32, i32)> = None;
            for cmd in &p.commands {
                let pt = match cmd {
                    VectorCommand::MoveTo(pt) | VectorCommand::LineTo(pt) => pt,
                    VectorCommand::SetProperty(_) => continue,
                };
                bounds = Some(match bounds {
                    None => (pt.x, pt.y, pt.x, pt.y),
                    Some((x0, y0, x1, y1)) => {
                        (x0.min(pt.x), y0.min(pt.y), x1.max(pt.x), y1.max(pt.y))
                    }
                });
            }
            bounds
        }
        JobPart::Raster(p) => Some((
            p.start.x,
            p.start.y,
            p.start.x + p.width() as i32,
            p.start.y + p.height() as i32,
        )),
        JobPart::Raster3d(p) => Some((
            p.start.x,
            p.start.y,
            p.start.x + p.width() as i32,
            p.start.y + p.height() as i32,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector_square(dpi: f64, size: i32) -> VectorPart {
        let mut part = VectorPart::new(dpi);
        part.set_property(LaserProperty::power_speed(80, 100));
        part.move_to(0, 0);
        part.line_to(size, 0);
        part.line_to(size, size);
        part.line_to(0, size);
        part.line_to(0, 0);
        part
    }

    #[test]
    fn property_accessors_cover_all_variants() {
        let props = [
            LaserProperty::PowerSpeed {
                power: 10,
                speed: 20,
            },
            LaserProperty::PowerSpeedFocus {
                power: 10,
                speed: 20,
                focus: 1.5,
            },
            LaserProperty::PowerSpeedFocusFrequency {
                power: 10,
                speed: 20,
                focus: 1.5,
                frequency: 5000,
            },
        ];
        for p in props {
            assert_eq!(p.power(), 10);
            assert_eq!(p.speed(), 20);
        }
    }

    #[test]
    fn power_speed_constructor_clamps() {
        let p = LaserProperty::power_speed(250, 180);
        assert_eq!(p.power(), 100);
        assert_eq!(p.speed(), 100);
    }

    #[test]
    fn raster_part_pixel_addressing() {
        let mut part = RasterPart::new(
            Point::new(5, 5),
            4,
            2,
            500.0,
            LaserProperty::power_speed(80, 100),
        );
        part.set_black(1, 0);
        part.set_black(3, 1);
        assert!(part.is_black(1, 0));
        assert!(!part.is_black(1, 1));
        assert!(part.is_black(3, 1));
    }

    #[test]
    fn raster3d_line_access() {
        let part = Raster3dPart::from_samples(
            Point::new(0, 0),
            3,
            500.0,
            LaserProperty::power_speed(80, 100),
            vec![0, 128, 255, 10, 20, 30],
        );
        assert_eq!(part.height(), 2);
        assert_eq!(part.raster_line(1), &[10, 20, 30]);
    }

    #[test]
    fn apply_start_point_translates_all_parts_once() {
        let mut job = Job::new("test");
        // 254 dpi: 1 mm == 10 px
        job.add_part(JobPart::Vector(vector_square(254.0, 100)));
        job.add_part(JobPart::Raster(RasterPart::new(
            Point::new(50, 50),
            10,
            10,
            254.0,
            LaserProperty::power_speed(80, 100),
        )));
        job.start_point_mm = Some((2.0, 3.0));

        apply_start_point(&mut job);
        match &job.parts[0] {
            JobPart::Vector(p) => {
                assert_eq!(p.commands[1], VectorCommand::MoveTo(Point::new(-20, -30)));
            }
            _ => unreachable!(),
        }
        match &job.parts[1] {
            JobPart::Raster(p) => assert_eq!(p.start, Point::new(30, 20)),
            _ => unreachable!(),
        }

        // second call is a no-op
        apply_start_point(&mut job);
        match &job.parts[1] {
            JobPart::Raster(p) => assert_eq!(p.start, Point::new(30, 20)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn check_job_rejects_empty_jobs() {
        use crate::error::Error;
        let job = Job::new("empty");
        let err = check_job(&job, 250.0, 280.0).unwrap_err();
        assert!(matches!(err, Error::Job(JobError::EmptyJob)));
    }

    #[test]
    fn check_job_rejects_parts_off_the_bed() {
        let mut job = Job::new("too wide");
        // 10000 px at 254 dpi = 1000 mm, far beyond a 250 mm bed
        job.add_part(JobPart::Vector(vector_square(254.0, 10_000)));
        assert!(check_job(&job, 250.0, 280.0).is_err());
    }

    #[test]
    fn check_job_accepts_fitting_parts() {
        let mut job = Job::new("fits");
        job.add_part(JobPart::Vector(vector_square(254.0, 100)));
        assert!(check_job(&job, 250.0, 280.0).is_ok());
    }
}
