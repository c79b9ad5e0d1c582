//! # Plugin Parameters
//!
//! Parameters are the knobs the user sees in the DAW. Each parameter has:
//!
//! - A **unique string ID** (`#[id = "..."]`) that the host uses to
//!   save and recall sessions. Once published, never change these IDs
//!   or existing sessions will break.
//! - A **human-readable name** shown in the DAW's UI.
//! - A **range**. Every knob here runs over a plain `0..1`; the DSP core
//!   maps that position onto seconds, hertz or gain (see
//!   [`crate::dsp::controls`]).
//! - A **default value**.
//!
//! ## No Smoothing
//!
//! The echo reads its parameters once at the start of every block and
//! holds them for the whole block (see [`TapeEchoParams::controls`]), so
//! none of these knobs carry a smoother. A change lands on the next block
//! boundary.
//!
//! ## Display Strings
//!
//! The host stores the normalized knob position, but the string next to
//! the knob shows what that position actually does: milliseconds of
//! delay, filter cutoff in hertz, drive as a multiplier. The formatters
//! call the same mapping functions as the DSP, so the two can't drift.

use std::sync::Arc;

use nih_plug::prelude::*;

use crate::dsp::controls::{self, Controls};

/// All user-facing parameters for the Loveless Tape Echo plugin, in host
/// parameter order.
#[derive(Params)]
pub struct TapeEchoParams {
    /// **Delay Time L**: time between the left input and its first
    /// repeat, 0 to 1000 ms.
    ///
    /// The left and right sides have separate times. Setting them apart
    /// is what makes the ping-pong presets bounce.
    #[id = "dtl"]
    pub delay_time_left: FloatParam,

    /// **Delay Time R**: the right side's delay time, 0 to 1000 ms.
    #[id = "dtr"]
    pub delay_time_right: FloatParam,

    /// **Delay Level**: gain of the repeats, 0 to 0.3.
    ///
    /// The repeats are driven hard into the saturator first, so the
    /// level is kept small to bring them back down to a sensible volume.
    #[id = "level"]
    pub delay_level: FloatParam,

    /// **Feedback**: how much of each repeat goes back around the loop.
    ///
    /// Together with Delay Level and Tape Degradation this decides how
    /// long the echoes last. The saturator keeps even a runaway loop
    /// bounded, so the full range is available.
    #[id = "fdbk"]
    pub feedback: FloatParam,

    /// **Repeat Brightness**: low-pass cutoff on the repeats, 1 kHz to
    /// 5 kHz. Every trip around the loop passes through the filter again,
    /// so later repeats get progressively darker.
    #[id = "bright"]
    pub brightness: FloatParam,

    /// **Mod Rate**: speed of the tape wobble, 0.5 Hz to 3 Hz.
    #[id = "mrate"]
    pub mod_rate: FloatParam,

    /// **Mod Level**: depth of the tape wobble. At the top of the range
    /// the read head swings up to 3.6 ms behind the input.
    #[id = "mlevel"]
    pub mod_level: FloatParam,

    /// **Tape Degradation**: drive into the repeat saturator, 1× to 3×.
    #[id = "tape"]
    pub tape_degradation: FloatParam,

    /// **Dry Mix**: share of the untouched input in the output. The
    /// echo path gets the rest.
    #[id = "dry"]
    pub dry: FloatParam,
}

/// A `0..1` knob with the given default.
fn knob(name: &str, default: f32) -> FloatParam {
    FloatParam::new(name, default, FloatRange::Linear { min: 0.0, max: 1.0 })
}

impl Default for TapeEchoParams {
    fn default() -> Self {
        let defaults = Controls::default();

        // Delay times display as whole milliseconds: 0.35 → "350 ms".
        let delay_time_to_string: Arc<dyn Fn(f32) -> String + Send + Sync> =
            Arc::new(|value| format!("{:.0} ms", controls::delay_seconds(value) * 1000.0));

        Self {
            delay_time_left: knob("Delay Time L", defaults.delay_time[0])
                .with_value_to_string(delay_time_to_string.clone()),

            delay_time_right: knob("Delay Time R", defaults.delay_time[1])
                .with_value_to_string(delay_time_to_string),

            delay_level: knob("Delay Level", defaults.delay_level).with_value_to_string(
                Arc::new(|value| format!("{:.3}", controls::delay_level(value))),
            ),

            feedback: knob("Feedback", defaults.feedback)
                .with_unit("%")
                // Display as percentage: 0.50 → "50.0%"
                .with_value_to_string(formatters::v2s_f32_percentage(1))
                .with_string_to_value(formatters::s2v_f32_percentage()),

            brightness: knob("Repeat Brightness", defaults.brightness).with_value_to_string(
                Arc::new(|value| format!("{:.0} Hz", controls::brightness_hz(value))),
            ),

            mod_rate: knob("Mod Rate", defaults.mod_rate).with_value_to_string(Arc::new(
                |value| format!("{:.2} Hz", controls::mod_rate_hz(value)),
            )),

            mod_level: knob("Mod Level", defaults.mod_level).with_value_to_string(Arc::new(
                |value| format!("{:.2}", controls::mod_level(value)),
            )),

            tape_degradation: knob("Tape Degradation", defaults.tape_degradation)
                .with_value_to_string(Arc::new(|value| {
                    format!("{:.2}x", controls::input_gain(value))
                })),

            dry: knob("Dry Mix", defaults.dry)
                .with_unit("%")
                .with_value_to_string(formatters::v2s_f32_percentage(1))
                .with_string_to_value(formatters::s2v_f32_percentage()),
        }
    }
}

impl TapeEchoParams {
    /// Snapshot the current knob positions for one block.
    pub fn controls(&self) -> Controls {
        Controls {
            delay_time: [
                self.delay_time_left.value(),
                self.delay_time_right.value(),
            ],
            delay_level: self.delay_level.value(),
            feedback: self.feedback.value(),
            brightness: self.brightness.value(),
            mod_rate: self.mod_rate.value(),
            mod_level: self.mod_level.value(),
            tape_degradation: self.tape_degradation.value(),
            dry: self.dry.value(),
        }
    }
}
