//! Boustrophedon raster scan conversion
//!
//! Converts raster scan lines into alternating-direction draw/move command
//! sequences. Runs of equal intensity collapse into a single drawn segment,
//! so only run boundaries cost a command; the scan direction flips after
//! every line (including empty ones) to avoid a separate retrace pass.
//!
//! Two variants share the run walk:
//! - bilevel: on/off pixels, trailing blanks trimmed, entry/exit padded by
//!   a whitespace margin clamped to the bed;
//! - grayscale: 8-bit samples, blanks trimmed at both ends, no margin,
//!   power scaled per run by `power * sample / 255`.

use crate::emitter::{EmitterState, EncoderConfig, GcodeEmitter};
use kerf_core::job::{Point, Raster3dPart, RasterPart};
use kerf_core::units;

/// Encode a bilevel raster part into its G-code stream.
pub fn encode_raster(part: &RasterPart, state: &mut EmitterState, config: &EncoderConfig) -> String {
    let mut em = GcodeEmitter::new(state, config, part.dpi);
    let power = part.property.power();
    em.set_speed(part.property.speed());
    em.set_power(power);

    let margin_px = units::mm_to_px(config.raster_margin_mm, part.dpi) as i32;
    let bed_px = units::bed_width_px(config.bed_width_mm, part.dpi);
    let mut dir_right = true;

    for line in 0..part.height() {
        let y = part.start.y + line as i32;
        let mut start_x = part.start.x;
        let mut samples: Vec<u8> = Vec::new();
        let mut look_for_start = true;
        for x in 0..part.width() {
            if look_for_start {
                if part.is_black(x, line) {
                    look_for_start = false;
                    samples.push(255);
                } else {
                    start_x += 1;
                }
            } else {
                samples.push(if part.is_black(x, line) { 255 } else { 0 });
            }
        }
        while samples.last() == Some(&0) {
            samples.pop();
        }

        if !samples.is_empty() {
            let end_x = start_x + samples.len() as i32 - 1;
            let lead_in = Point::new((start_x - margin_px).max(0), y);
            let lead_out = Point::new((end_x + margin_px).min(bed_px), y);
            if dir_right {
                em.move_to(lead_in);
                walk_right(&mut em, start_x, y, &samples, power);
                em.move_to(lead_out);
            } else {
                em.move_to(lead_out);
                walk_left(&mut em, start_x, y, &samples, power);
                em.move_to(lead_in);
            }
        }
        dir_right = !dir_right;
    }
    em.finish()
}

/// Encode a grayscale raster part into its G-code stream.
///
/// Speed is set once for the whole part; power is emitted per run, scaled
/// by the run's intensity.
pub fn encode_raster3d(
    part: &Raster3dPart,
    state: &mut EmitterState,
    config: &EncoderConfig,
) -> String {
    let mut em = GcodeEmitter::new(state, config, part.dpi);
    em.set_speed(part.property.speed());
    let power = part.property.power();
    let mut dir_right = true;

    for line in 0..part.height() {
        let y = part.start.y + line as i32;
        let mut samples = part.raster_line(line).to_vec();
        let mut start_x = part.start.x;

        // leading blanks shift the line start right
        let lead = samples.iter().take_while(|&&s| s == 0).count();
        samples.drain(..lead);
        start_x += lead as i32;
        while samples.last() == Some(&0) {
            samples.pop();
        }

        if !samples.is_empty() {
            if dir_right {
                walk_right(&mut em, start_x, y, &samples, power);
            } else {
                walk_left(&mut em, start_x, y, &samples, power);
            }
        }
        dir_right = !dir_right;
    }
    em.finish()
}

/// Power percentage for a run of the given intensity.
fn scaled_power(power_percent: u8, sample: u8) -> u8 {
    (power_percent as u32 * sample as u32 / 255) as u8
}

/// Walk a trimmed sample line left to right, drawing each non-blank run.
///
/// The caller guarantees `samples` is non-empty with a non-blank tail.
fn walk_right(em: &mut GcodeEmitter, start_x: i32, y: i32, samples: &[u8], power: u8) {
    em.move_to(Point::new(start_x, y));
    let mut old = samples[0];
    for (pix, &sample) in samples.iter().enumerate() {
        if sample != old {
            if old == 0 {
                em.move_to(Point::new(start_x + pix as i32, y));
            } else {
                em.set_power(scaled_power(power, old));
                em.draw_to(Point::new(start_x + pix as i32 - 1, y));
                em.move_to(Point::new(start_x + pix as i32, y));
            }
            old = sample;
        }
    }
    em.set_power(scaled_power(power, samples[samples.len() - 1]));
    em.draw_to(Point::new(start_x + samples.len() as i32 - 1, y));
}

/// Mirror of [`walk_right`], walking right to left.
fn walk_left(em: &mut GcodeEmitter, start_x: i32, y: i32, samples: &[u8], power: u8) {
    let last = samples.len() - 1;
    em.move_to(Point::new(start_x + last as i32, y));
    let mut old = samples[last];
    for pix in (0..samples.len()).rev() {
        let sample = samples[pix];
        if sample != old || pix == 0 {
            if old == 0 {
                em.move_to(Point::new(start_x + pix as i32, y));
            } else {
                em.set_power(scaled_power(power, old));
                em.draw_to(Point::new(start_x + pix as i32 + 1, y));
                em.move_to(Point::new(start_x + pix as i32, y));
            }
            old = sample;
        }
    }
    em.set_power(scaled_power(power, samples[0]));
    em.draw_to(Point::new(start_x, y));
}
