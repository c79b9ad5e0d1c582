//! # Factory Presets
//!
//! Starting points shipped with the plugin, stored as normalized knob
//! positions in host parameter order (see [`Controls::from_normalized`]).

use crate::dsp::controls::Controls;

/// A named snapshot of all nine controls.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub controls: Controls,
}

impl Preset {
    const fn new(name: &'static str, values: [f32; 9]) -> Self {
        Self {
            name,
            controls: Controls::from_normalized(values),
        }
    }
}

pub static FACTORY_PRESETS: [Preset; 3] = [
    // Short, identical delays and no modulation: a single tight repeat.
    Preset::new(
        "Mono Slapback Echo",
        [0.100, 0.100, 0.500, 0.232, 0.500, 0.000, 0.000, 0.000, 0.500],
    ),
    // Left and right at different times so repeats bounce across the field.
    Preset::new(
        "Saturated Ping-Pong",
        [0.350, 0.689, 0.655, 0.684, 0.492, 0.489, 0.490, 0.202, 0.500],
    ),
    Preset::new(
        "Heavy Modulation",
        [0.423, 0.628, 1.000, 0.140, 0.200, 1.000, 1.000, 1.000, 0.373],
    ),
];

/// Look up a factory preset by its exact name.
pub fn find(name: &str) -> Option<&'static Preset> {
    FACTORY_PRESETS.iter().find(|preset| preset.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::echo::TapeEcho;

    #[test]
    fn test_find_by_name() {
        let preset = find("Saturated Ping-Pong").unwrap();
        assert_eq!(preset.controls.delay_time, [0.350, 0.689]);
        assert_eq!(preset.controls.dry, 0.5);

        assert!(find("saturated ping-pong").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in FACTORY_PRESETS.iter().enumerate() {
            for b in &FACTORY_PRESETS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    /// Every preset stays within the normalized range and within the
    /// delay buffers at the highest supported sample rate.
    #[test]
    fn test_presets_fit_the_engine() {
        for preset in &FACTORY_PRESETS {
            let c = preset.controls;
            let values = [
                c.delay_time[0],
                c.delay_time[1],
                c.delay_level,
                c.feedback,
                c.brightness,
                c.mod_rate,
                c.mod_level,
                c.tape_degradation,
                c.dry,
            ];
            assert_eq!(Controls::from_normalized(values), c);
            assert!(
                values.iter().all(|v| (0.0..=1.0).contains(v)),
                "{} has out-of-range values",
                preset.name
            );

            let settings = c.settings(192_000.0);
            for delay in settings.delay_samples {
                assert!(delay < crate::dsp::echo::BUFFER_CAPACITY.get());
            }
        }
    }

    /// A burst of loud noise through each preset stays finite and bounded.
    #[test]
    fn test_presets_are_stable() {
        let burst: Vec<f32> = (0..4800)
            .map(|i| if (i / 7) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();

        for preset in &FACTORY_PRESETS {
            let mut echo = TapeEcho::new(48000.0);
            let mut left = burst.clone();
            let mut right = burst.clone();
            left.resize(96_000, 0.0);
            right.resize(96_000, 0.0);

            echo.process_block_in_place(&preset.controls, &mut left, &mut right);

            for sample in left.iter().chain(&right) {
                assert!(
                    sample.is_finite() && sample.abs() <= 2.0,
                    "{} produced {sample}",
                    preset.name
                );
            }
        }
    }
}
