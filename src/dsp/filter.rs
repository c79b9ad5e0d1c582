//! # Repeat Tone Filter
//!
//! Every repeat of the echo passes through a low-pass filter before it is
//! fed back, so each generation comes back a little darker than the one
//! before, like the head losses of a tape machine. The "Repeat Brightness"
//! control sets its cutoff between 1 kHz and 5 kHz.
//!
//! The echo only needs two things from a filter, so it talks to one
//! through the [`Lowpass`] trait. [`OnePoleFilter`] is the implementation
//! the plugin ships with.
//!
//! ## The Filter Equation
//!
//! ```text
//! y[n] = (1 - a) * x[n] + a * y[n-1],   a = e^(-2π * cutoff / sample_rate)
//! ```
//!
//! - `a = 0.0` → output = input (no filtering)
//! - `a → 1.0` → output ≈ previous output (extreme filtering)
//!
//! One multiply-add per sample and a 6 dB/octave slope, which is gentle
//! enough that repeats darken gradually instead of turning to mud.

use std::f32::consts::PI;

/// A single-pole low-pass stage the echo can drive once per sample.
pub trait Lowpass {
    /// Retune the filter. Takes effect from the next [`tick`](Self::tick).
    fn set_cutoff(&mut self, cutoff_hz: f32);

    /// Filter one sample.
    fn tick(&mut self, input: f32) -> f32;

    /// Called when the host changes the sample rate.
    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    /// Forget all filter history.
    fn reset(&mut self) {}
}

/// A one-pole (6 dB/octave) lowpass filter.
#[derive(Debug, Clone)]
pub struct OnePoleFilter {
    /// Feedback coefficient `a`, in `[0, 1)`.
    coefficient: f32,

    /// The previous output sample, the filter's only state variable.
    prev_output: f32,

    /// Requested cutoff, kept so a sample rate change can retune.
    cutoff_hz: f32,

    sample_rate: f32,
}

impl OnePoleFilter {
    /// Create a new filter initialized to passthrough (no filtering).
    ///
    /// With `coefficient = 0.0` the filter equation reduces to
    /// `y[n] = x[n]` until a cutoff is set.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            coefficient: 0.0,
            prev_output: 0.0,
            cutoff_hz: f32::INFINITY,
            sample_rate,
        }
    }

    fn update_coefficient(&mut self) {
        if self.cutoff_hz.is_infinite() {
            self.coefficient = 0.0;
            return;
        }

        // Min 20 Hz keeps the coefficient away from 1.0, where the filter
        // would stop responding. Max 49% of the sample rate stays clear of
        // Nyquist.
        let safe_cutoff = self.cutoff_hz.clamp(20.0, self.sample_rate * 0.49);
        self.coefficient = (-2.0 * PI * safe_cutoff / self.sample_rate).exp();
    }
}

impl Lowpass for OnePoleFilter {
    /// Example at 44100 Hz:
    /// - cutoff = 5000 Hz → coeff ≈ 0.49
    /// - cutoff = 1000 Hz → coeff ≈ 0.87
    fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.update_coefficient();
    }

    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let output = (1.0 - self.coefficient) * input + self.coefficient * self.prev_output;
        self.prev_output = output;
        output
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficient();
    }

    fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A new filter (no cutoff set) should pass signals through unchanged.
    #[test]
    fn test_passthrough_by_default() {
        let mut filter = OnePoleFilter::new(44100.0);

        assert_eq!(filter.tick(0.5), 0.5);
        assert_eq!(filter.tick(-0.3), -0.3);
    }

    /// A low cutoff should heavily attenuate the highest representable
    /// frequency (alternating +1, -1 every sample).
    #[test]
    fn test_attenuates_nyquist() {
        let mut filter = OnePoleFilter::new(44100.0);
        filter.set_cutoff(100.0);

        let mut max_output = 0.0_f32;
        for i in 0..1000 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            max_output = max_output.max(filter.tick(input).abs());
        }

        assert!(
            max_output < 0.05,
            "Expected heavy attenuation, got max output {max_output}"
        );
    }

    /// The brightness range of the echo maps onto sensible coefficients.
    #[test]
    fn test_coefficient_range() {
        let mut filter = OnePoleFilter::new(44100.0);

        filter.set_cutoff(5000.0);
        assert!(
            (filter.coefficient - 0.49).abs() < 0.01,
            "5 kHz should give ~0.49, got {}",
            filter.coefficient
        );

        filter.set_cutoff(1000.0);
        assert!(
            (filter.coefficient - 0.867).abs() < 0.01,
            "1 kHz should give ~0.867, got {}",
            filter.coefficient
        );

        // Out-of-range requests are clamped rather than going unstable.
        filter.set_cutoff(1.0);
        assert!(filter.coefficient < 1.0);
        filter.set_cutoff(1.0e6);
        assert!(filter.coefficient > 0.0);
    }

    /// Changing the sample rate retunes to the same cutoff in Hz.
    #[test]
    fn test_sample_rate_change_keeps_cutoff() {
        let mut filter = OnePoleFilter::new(44100.0);
        filter.set_cutoff(2000.0);
        let at_44k = filter.coefficient;

        filter.set_sample_rate(96000.0);
        let expected = (-2.0 * PI * 2000.0 / 96000.0).exp();

        assert!((filter.coefficient - expected).abs() < 1e-6);
        assert!(filter.coefficient > at_44k);
    }

    /// Verify that reset() clears the filter's memory.
    #[test]
    fn test_reset_clears_state() {
        let mut filter = OnePoleFilter::new(44100.0);
        filter.set_cutoff(1000.0);

        filter.tick(1.0);
        assert!(filter.prev_output.abs() > 0.0);

        filter.reset();
        assert_eq!(filter.prev_output, 0.0);
        assert_eq!(filter.tick(0.0), 0.0);
    }

    /// DC passes a lowpass unchanged, whatever the cutoff. The echo relies
    /// on this: the filter never adds or removes loop gain at DC.
    #[test]
    fn test_dc_passes_through() {
        let mut filter = OnePoleFilter::new(44100.0);
        filter.set_cutoff(1000.0);

        let mut output = 0.0;
        for _ in 0..10000 {
            output = filter.tick(1.0);
        }

        assert!(
            (output - 1.0).abs() < 1e-4,
            "DC signal should pass through lowpass, got {output}"
        );
    }
}
