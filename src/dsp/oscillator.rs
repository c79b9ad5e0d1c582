//! # Modulation Oscillator
//!
//! A slow sine wave (0.5–3 Hz) sweeps the read head of the modulation
//! buffer back and forth. The echo advances it exactly once per sample
//! through the [`Oscillator`] trait, which also lets tests swap in a
//! stand-in with a fixed output.
//!
//! [`SineOscillator`] is a phase accumulator: `phase` runs from 0 to 1
//! and wraps, and each tick outputs `sin(2π · phase)` before stepping by
//! `frequency / sample_rate`. The first tick after a reset is `0.0`.

use std::f32::consts::TAU;

/// A periodic signal source advanced once per sample.
pub trait Oscillator {
    /// Change the rate. The phase carries on from where it was, so
    /// retuning at a block boundary is seamless.
    fn set_frequency(&mut self, frequency_hz: f32);

    /// Output the current value (roughly `[-1, 1]`) and advance by one sample.
    fn tick(&mut self) -> f32;

    /// Called when the host changes the sample rate.
    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    /// Return to the start of the cycle.
    fn reset(&mut self) {}
}

/// Sine wave oscillator for low-frequency modulation.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    /// Current phase position in `[0, 1)`.
    phase: f32,
    /// Phase increment per sample.
    phase_inc: f32,
    frequency_hz: f32,
    sample_rate: f32,
}

impl SineOscillator {
    /// Create an oscillator at 1 Hz. The echo retunes it every block.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 1.0 / sample_rate,
            frequency_hz: 1.0,
            sample_rate,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }
}

impl Oscillator for SineOscillator {
    fn set_frequency(&mut self, frequency_hz: f32) {
        self.frequency_hz = frequency_hz;
        self.phase_inc = frequency_hz / self.sample_rate;
    }

    #[inline]
    fn tick(&mut self) -> f32 {
        let output = (self.phase * TAU).sin();

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase_inc = self.frequency_hz / sample_rate;
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero_crossing() {
        let mut osc = SineOscillator::new(48000.0);
        osc.set_frequency(2.0);

        assert_eq!(osc.tick(), 0.0);
        assert!(osc.tick() > 0.0, "sine should rise after phase 0");
    }

    /// A quarter period in, the sine sits at its peak.
    #[test]
    fn test_quarter_period_is_peak() {
        let mut osc = SineOscillator::new(1000.0);
        osc.set_frequency(1.0);

        for _ in 0..250 {
            osc.tick();
        }
        let peak = osc.tick();
        assert!((peak - 1.0).abs() < 1e-3, "Expected ~1.0, got {peak}");
    }

    /// Output stays within [-1, 1] and the phase keeps wrapping.
    #[test]
    fn test_bounded_over_many_cycles() {
        let mut osc = SineOscillator::new(44100.0);
        osc.set_frequency(3.0);

        for _ in 0..(44100 * 4) {
            let value = osc.tick();
            assert!((-1.0..=1.0).contains(&value), "out of range: {value}");
        }
        assert!((0.0..1.0).contains(&osc.phase));
    }

    /// Retuning does not reset the phase.
    #[test]
    fn test_set_frequency_keeps_phase() {
        let mut osc = SineOscillator::new(1000.0);
        osc.set_frequency(1.0);
        for _ in 0..100 {
            osc.tick();
        }

        let phase = osc.phase;
        osc.set_frequency(2.5);
        assert_eq!(osc.phase, phase);
        assert_eq!(osc.frequency(), 2.5);
    }

    #[test]
    fn test_sample_rate_change_keeps_frequency() {
        let mut osc = SineOscillator::new(48000.0);
        osc.set_frequency(2.0);
        osc.set_sample_rate(96000.0);

        assert!((osc.phase_inc - 2.0 / 96000.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_restarts_cycle() {
        let mut osc = SineOscillator::new(1000.0);
        osc.set_frequency(1.0);
        for _ in 0..123 {
            osc.tick();
        }

        osc.reset();
        assert_eq!(osc.tick(), 0.0);
    }
}
