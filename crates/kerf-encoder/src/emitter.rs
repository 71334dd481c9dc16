//! G-code command emission
//!
//! [`GcodeEmitter`] appends motion and state commands to an owned byte
//! buffer. Power and speed are job-scoped device state: the emitter only
//! writes `S`/`G1 F` commands when the value actually changes, tracked in
//! an [`EmitterState`] that the caller resets exactly once per job so the
//! first part always sets both explicitly. Motion commands are never
//! deduplicated.

use kerf_core::job::Point;
use kerf_core::units;

/// Encoder-facing device configuration.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Bed width in millimetres, used for X mirroring and margin clamping.
    pub bed_width_mm: f64,
    /// Mirror every emitted X coordinate against the bed width.
    pub flip_x_axis: bool,
    /// Maximum marking feed rate in mm/min; speed percentages scale this.
    pub max_laser_rate: f64,
    /// Whitespace margin added per raster line, in millimetres.
    pub raster_margin_mm: f64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            bed_width_mm: 250.0,
            flip_x_axis: false,
            max_laser_rate: 2000.0,
            raster_margin_mm: 0.5,
        }
    }
}

/// Last power/speed values sent to the device, memoized across one job.
///
/// `None` is the undefined sentinel: the next set always emits.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmitterState {
    last_power: Option<u8>,
    last_speed: Option<u8>,
}

impl EmitterState {
    /// Create a fresh state with both memos undefined
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget both memos; the next power and speed commands will be emitted
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Writes G-code commands for one part into an owned buffer.
pub struct GcodeEmitter<'a> {
    out: String,
    state: &'a mut EmitterState,
    config: &'a EncoderConfig,
    dpi: f64,
}

impl<'a> GcodeEmitter<'a> {
    /// Create an emitter for a part at the given resolution
    pub fn new(state: &'a mut EmitterState, config: &'a EncoderConfig, dpi: f64) -> Self {
        Self {
            out: String::new(),
            state,
            config,
            dpi,
        }
    }

    /// Emit `S<0..=255>` if the power percentage differs from the memo
    pub fn set_power(&mut self, percent: u8) {
        if self.state.last_power != Some(percent) {
            let value = (255.0 * percent as f64 / 100.0).round() as u32;
            self.out.push_str(&format!("S{}\n", value));
            self.state.last_power = Some(percent);
        }
    }

    /// Emit `G1 F<rate>` if the speed percentage differs from the memo
    pub fn set_speed(&mut self, percent: u8) {
        if self.state.last_speed != Some(percent) {
            let rate = (percent as f64 * self.config.max_laser_rate / 100.0).round() as u32;
            self.out.push_str(&format!("G1 F{}\n", rate));
            self.state.last_speed = Some(percent);
        }
    }

    /// Emit a rapid (non-marking) move
    pub fn move_to(&mut self, point: Point) {
        let (x, y) = self.physical(point);
        self.out.push_str(&format!("G0 X{:.3} Y{:.3}\n", x, y));
    }

    /// Emit a linear marking move
    pub fn draw_to(&mut self, point: Point) {
        let (x, y) = self.physical(point);
        self.out.push_str(&format!("G1 X{:.3} Y{:.3}\n", x, y));
    }

    fn physical(&self, point: Point) -> (f64, f64) {
        units::to_physical(
            point.x,
            point.y,
            self.dpi,
            self.config.flip_x_axis,
            self.config.bed_width_mm,
        )
    }

    /// Consume the emitter, returning the encoded stream
    pub fn finish(self) -> String {
        tracing::debug!(bytes = self.out.len(), "part encoded");
        self.out
    }
}

/// Expand a `;`-delimited command block into newline-terminated lines.
///
/// Used for the job preamble and postamble, which are sent verbatim.
pub fn expand_command_block(block: &str) -> String {
    format!("{}\n", block.replace(';', "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit<F: FnOnce(&mut GcodeEmitter)>(f: F) -> String {
        let mut state = EmitterState::new();
        let config = EncoderConfig::default();
        let mut em = GcodeEmitter::new(&mut state, &config, 254.0);
        f(&mut em);
        em.finish()
    }

    #[test]
    fn power_is_scaled_to_byte_range() {
        assert_eq!(emit(|em| em.set_power(0)), "S0\n");
        assert_eq!(emit(|em| em.set_power(80)), "S204\n");
        assert_eq!(emit(|em| em.set_power(100)), "S255\n");
    }

    #[test]
    fn speed_scales_the_configured_rate() {
        assert_eq!(emit(|em| em.set_speed(50)), "G1 F1000\n");
        assert_eq!(emit(|em| em.set_speed(100)), "G1 F2000\n");
    }

    #[test]
    fn repeated_power_and_speed_are_suppressed() {
        let out = emit(|em| {
            em.set_power(80);
            em.set_speed(100);
            em.set_power(80);
            em.set_speed(100);
            em.set_power(90);
        });
        assert_eq!(out, "S204\nG1 F2000\nS230\n");
    }

    #[test]
    fn memo_survives_across_parts_until_reset() {
        let mut state = EmitterState::new();
        let config = EncoderConfig::default();

        let mut em = GcodeEmitter::new(&mut state, &config, 254.0);
        em.set_power(80);
        assert_eq!(em.finish(), "S204\n");

        // same job, next part: unchanged power stays silent
        let mut em = GcodeEmitter::new(&mut state, &config, 254.0);
        em.set_power(80);
        assert_eq!(em.finish(), "");

        state.reset();
        let mut em = GcodeEmitter::new(&mut state, &config, 254.0);
        em.set_power(80);
        assert_eq!(em.finish(), "S204\n");
    }

    #[test]
    fn motion_is_never_deduplicated() {
        let out = emit(|em| {
            em.move_to(Point::new(10, 0));
            em.move_to(Point::new(10, 0));
            em.draw_to(Point::new(10, 0));
        });
        assert_eq!(
            out,
            "G0 X1.000 Y0.000\nG0 X1.000 Y0.000\nG1 X1.000 Y0.000\n"
        );
    }

    #[test]
    fn flip_mirrors_emitted_x_only() {
        let mut state = EmitterState::new();
        let config = EncoderConfig {
            flip_x_axis: true,
            ..EncoderConfig::default()
        };
        let mut em = GcodeEmitter::new(&mut state, &config, 254.0);
        em.move_to(Point::new(0, 10));
        // bed is 250 mm = 2500 px at 254 dpi
        assert_eq!(em.finish(), "G0 X250.000 Y1.000\n");
    }

    #[test]
    fn command_block_expands_semicolons() {
        assert_eq!(expand_command_block("G28;G21;G90"), "G28\nG21\nG90\n");
        assert_eq!(expand_command_block("G28"), "G28\n");
    }
}
