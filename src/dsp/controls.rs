//! # Controls and Block Settings
//!
//! The host hands the echo nine normalized knob positions. [`Controls`] is
//! a plain copy of those positions, taken once at the start of every
//! block; [`Controls::settings`] turns them into the gains, sample counts
//! and frequencies the per-sample loop actually uses ([`BlockSettings`]).
//! Nothing is re-read mid-block, so a knob change lands on the next block
//! boundary and the hot loop never has to synchronize with the host.
//!
//! The knob → value mappings live here as small functions so the
//! parameter display strings and the DSP can never disagree.

use super::saturator::{self, REPEAT_CURVATURE};

/// Fixed gain in front of the saturator, applied on top of the
/// tape degradation gain.
pub const REPEAT_PRE_GAIN: f32 = 0.3;

/// The longest delay time a knob can select.
pub const MAX_DELAY_TIME_SECONDS: f32 = 1.0;

/// Delay time in seconds. The knob maps one-to-one onto seconds.
pub fn delay_seconds(value: f32) -> f32 {
    value * MAX_DELAY_TIME_SECONDS
}

/// Delay time in whole samples. Truncates, like the rest of the integer
/// delay path.
pub fn delay_samples(value: f32, sample_rate: f32) -> usize {
    (delay_seconds(value) * sample_rate) as usize
}

/// Gain of the repeats, 0 to 0.3.
pub fn delay_level(value: f32) -> f32 {
    value * 0.3
}

/// Cutoff of the repeat filter, 1 kHz to 5 kHz.
pub fn brightness_hz(value: f32) -> f32 {
    value * 4000.0 + 1000.0
}

/// Vibrato rate, 0.5 Hz to 3 Hz.
pub fn mod_rate_hz(value: f32) -> f32 {
    value * 2.5 + 0.5
}

/// Vibrato amount, 0 to 2.
pub fn mod_level(value: f32) -> f32 {
    value * 2.0
}

/// Drive into the repeat saturator from "Tape Degradation", 1× to 3×.
pub fn input_gain(value: f32) -> f32 {
    value * 2.0 + 1.0
}

/// Normalized control positions for one block, in host parameter order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    /// Left and right delay time.
    pub delay_time: [f32; 2],
    pub delay_level: f32,
    pub feedback: f32,
    pub brightness: f32,
    pub mod_rate: f32,
    pub mod_level: f32,
    pub tape_degradation: f32,
    /// Dry share of the output. The wet share is `1 - dry`.
    pub dry: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            delay_time: [0.0, 0.0],
            delay_level: 0.0,
            feedback: 0.5,
            brightness: 0.5,
            mod_rate: 0.5,
            mod_level: 0.5,
            tape_degradation: 0.0,
            dry: 0.5,
        }
    }
}

impl Controls {
    /// Build a snapshot from the nine values in host parameter order.
    pub const fn from_normalized(values: [f32; 9]) -> Self {
        let [
            left,
            right,
            delay_level,
            feedback,
            brightness,
            mod_rate,
            mod_level,
            tape_degradation,
            dry,
        ] = values;

        Self {
            delay_time: [left, right],
            delay_level,
            feedback,
            brightness,
            mod_rate,
            mod_level,
            tape_degradation,
            dry,
        }
    }

    /// Derive the values the per-sample loop needs at `sample_rate`.
    pub fn settings(&self, sample_rate: f32) -> BlockSettings {
        BlockSettings {
            delay_samples: self.delay_time.map(|t| delay_samples(t, sample_rate)),
            // A negative delay time switches the repeat saturation off.
            saturate: self.delay_time.map(|t| t >= 0.0),
            drive: input_gain(self.tape_degradation) * REPEAT_PRE_GAIN,
            delay_level: delay_level(self.delay_level),
            feedback: self.feedback,
            cutoff_hz: brightness_hz(self.brightness),
            mod_rate_hz: mod_rate_hz(self.mod_rate),
            mod_level: mod_level(self.mod_level),
            dry: self.dry,
            wet: 1.0 - self.dry,
        }
    }
}

/// Everything the per-sample loop reads, fixed for the length of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSettings {
    /// Integer delay per channel.
    pub delay_samples: [usize; 2],
    /// Whether each channel's repeats go through the saturator.
    pub saturate: [bool; 2],
    /// Gain in front of the saturator.
    pub drive: f32,
    pub delay_level: f32,
    pub feedback: f32,
    pub cutoff_hz: f32,
    pub mod_rate_hz: f32,
    pub mod_level: f32,
    pub dry: f32,
    pub wet: f32,
}

impl BlockSettings {
    /// Gain a quiet repeat picks up on one trip around the feedback loop.
    ///
    /// The low-pass has unity gain at DC, so only the saturator's slope at
    /// zero and the linear gains count. Quiet repeats are where the loop
    /// gain is highest; louder ones are squashed by the saturator.
    pub fn loop_gain(&self) -> f32 {
        let shaping = if self.saturate.contains(&true) {
            self.drive * saturator::slope_at_zero(REPEAT_CURVATURE)
        } else {
            1.0
        };

        shaping * self.delay_level * self.feedback
    }

    /// How long the echoes take to fall 60 dB, in samples, or `None` when
    /// the loop gain is at or above unity and they never die out.
    pub fn tail_samples(&self) -> Option<u32> {
        let period = self.delay_samples.iter().copied().max().unwrap_or(0) as f32 + 1.0;
        let gain = self.loop_gain();

        if gain >= 1.0 {
            return None;
        }
        if gain <= 0.001 {
            // A single pass already sits below -60 dB.
            return Some(period as u32);
        }

        // gain^repeats = 0.001  →  repeats = log10(0.001) / log10(gain)
        let repeats = (-3.0 / gain.log10()).ceil();
        Some((repeats * period) as u32)
    }
}
