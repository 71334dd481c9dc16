//! Vector path encoding
//!
//! Walks the part's command list once, in order. No reordering and no
//! buffering: each command maps directly to its G-code counterpart, with
//! power/speed suppression handled by the emitter.

use crate::emitter::{EmitterState, EncoderConfig, GcodeEmitter};
use kerf_core::job::{VectorCommand, VectorPart};

/// Encode a vector part into its G-code stream.
///
/// Property changes emit power before speed, both through the job-scoped
/// memo in `state`.
pub fn encode_vector(part: &VectorPart, state: &mut EmitterState, config: &EncoderConfig) -> String {
    let mut em = GcodeEmitter::new(state, config, part.dpi);
    for command in &part.commands {
        match command {
            VectorCommand::MoveTo(p) => em.move_to(*p),
            VectorCommand::LineTo(p) => em.draw_to(*p),
            VectorCommand::SetProperty(prop) => {
                em.set_power(prop.power());
                em.set_speed(prop.speed());
            }
        }
    }
    em.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_core::job::LaserProperty;
    use proptest::prelude::*;

    fn encode(part: &VectorPart) -> String {
        let mut state = EmitterState::new();
        encode_vector(part, &mut state, &EncoderConfig::default())
    }

    #[test]
    fn commands_translate_in_order() {
        let mut part = VectorPart::new(254.0);
        part.set_property(LaserProperty::power_speed(80, 50));
        part.move_to(10, 0);
        part.line_to(10, 10);
        assert_eq!(
            encode(&part),
            "S204\nG1 F1000\nG0 X1.000 Y0.000\nG1 X1.000 Y1.000\n"
        );
    }

    #[test]
    fn repeated_identical_properties_emit_once() {
        let mut part = VectorPart::new(254.0);
        let prop = LaserProperty::power_speed(80, 50);
        part.set_property(prop);
        part.line_to(10, 0);
        part.set_property(prop);
        part.line_to(20, 0);
        let out = encode(&part);
        assert_eq!(out.matches("S204").count(), 1);
        assert_eq!(out.matches("F1000").count(), 1);
    }

    #[test]
    fn reencoding_without_reset_emits_motion_only() {
        let mut part = VectorPart::new(254.0);
        part.set_property(LaserProperty::power_speed(80, 50));
        part.move_to(10, 0);
        part.line_to(10, 10);

        let config = EncoderConfig::default();
        let mut state = EmitterState::new();
        let first = encode_vector(&part, &mut state, &config);
        let second = encode_vector(&part, &mut state, &config);

        assert!(first.starts_with("S204\nG1 F1000\n"));
        assert_eq!(second, "G0 X1.000 Y0.000\nG1 X1.000 Y1.000\n");
        // motion commands are identical both times
        assert!(first.ends_with(&second));
    }

    proptest! {
        /// Each power/speed value appears only once until it changes, no
        /// matter how often the same property is repeated in the input.
        #[test]
        fn property_stream_is_change_compressed(values in prop::collection::vec((0u8..=100, 0u8..=100), 1..40)) {
            let mut part = VectorPart::new(254.0);
            for (p, s) in &values {
                part.set_property(LaserProperty::power_speed(*p, *s));
            }
            let out = encode(&part);

            let mut expected = String::new();
            let (mut last_p, mut last_s) = (None, None);
            for (p, s) in &values {
                if last_p != Some(*p) {
                    expected.push_str(&format!("S{}\n", (255.0 * *p as f64 / 100.0).round() as u32));
                    last_p = Some(*p);
                }
                if last_s != Some(*s) {
                    expected.push_str(&format!("G1 F{}\n", (*s as f64 * 20.0).round() as u32));
                    last_s = Some(*s);
                }
            }
            prop_assert_eq!(out, expected);
        }
    }
}
