//! # The Tape Echo Engine
//!
//! Two feedback delay lines (left and right), one shared vibrato buffer,
//! a saturator on the repeats and a low-pass per channel, run once per
//! sample over each block the host hands us.
//!
//! ## Signal Flow (per channel)
//!
//! ```text
//!             ┌───────────────── × dry ───────────────────────────────┐
//!  Input ──┬──┤                                                       (+)──► Output
//!          │  │        ┌──────────────────────────────── × wet ──────┘
//!          │  │        │
//!   (L+R)/2│  │   [Delay Line] ─► × drive ─► [Saturator] ─► × level ─► [Lowpass] ──┐
//!          ▼  │        ▲                                                            │
//!   [Modulation Buffer]│                                                            │
//!    read behind by    (+)◄──────────────────── × feedback ◄────────────────────────┘
//!    LFO-swept offset   ▲
//!          └── vibrato ─┘
//! ```
//!
//! The input never enters a delay line directly: it reaches the repeats
//! through the vibrato buffer, which at zero modulation simply hands back
//! the current mono sample.
//!
//! ## Real-Time Rules
//!
//! - All three buffers are allocated in the constructor, sized for the
//!   longest delay at [`MAX_SAMPLE_RATE`], and never resized.
//! - Settings are derived once per block, never inside the sample loop.
//! - The output depends only on the input stream, the settings and the
//!   engine's state, so the same input always produces the same bits,
//!   however the host slices it into blocks.

use std::num::NonZeroUsize;

use nih_plug::nih_debug_assert_eq;

use super::controls::{BlockSettings, Controls};
use super::delay_line::DelayLine;
use super::filter::{Lowpass, OnePoleFilter};
use super::mod_buffer::ModulationBuffer;
use super::oscillator::{Oscillator, SineOscillator};
use super::saturator::{soft_clip, REPEAT_CURVATURE};

/// Highest sample rate the buffers are sized for.
pub const MAX_SAMPLE_RATE: f32 = 192_000.0;

/// Seconds of audio every buffer holds at [`MAX_SAMPLE_RATE`].
pub const BUFFER_SECONDS: f32 = 2.0;

/// Samples per buffer: two seconds at 192 kHz.
pub const BUFFER_CAPACITY: NonZeroUsize =
    match NonZeroUsize::new((BUFFER_SECONDS * MAX_SAMPLE_RATE) as usize) {
        Some(capacity) => capacity,
        None => panic!("buffer capacity must be non-zero"),
    };

/// Peak sweep of the vibrato read head, in seconds, before the mod level.
const MOD_DEPTH_SECONDS: f32 = 0.0009;

/// One stereo side: its delay line and the filter on its repeats.
struct Channel<F> {
    delay_line: DelayLine,
    tone: F,
}

impl<F: Lowpass> Channel<F> {
    /// Run one sample of this side's feedback loop and return the filtered
    /// repeat (the wet signal).
    #[inline]
    fn next_repeat(&mut self, settings: &BlockSettings, side: usize, vibrato: f32) -> f32 {
        let mut delayed = self.delay_line.read(settings.delay_samples[side]);

        if settings.saturate[side] {
            delayed = soft_clip(delayed * settings.drive, REPEAT_CURVATURE);
        }

        let repeat = self.tone.tick(delayed * settings.delay_level);
        self.delay_line.write(repeat * settings.feedback + vibrato);

        repeat
    }
}

/// The stereo echo engine.
///
/// `O` and `F` are the modulation oscillator and the repeat filter. The
/// plugin uses [`SineOscillator`] and [`OnePoleFilter`]; tests plug in
/// deterministic stand-ins.
pub struct TapeEcho<O = SineOscillator, F = OnePoleFilter> {
    sample_rate: f32,
    channels: [Channel<F>; 2],
    modulation: ModulationBuffer,
    lfo: O,
}

impl TapeEcho {
    /// Create the engine with the stock sine LFO and one-pole filters.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_components(
            sample_rate,
            SineOscillator::new(sample_rate),
            [
                OnePoleFilter::new(sample_rate),
                OnePoleFilter::new(sample_rate),
            ],
        )
    }
}

impl<O: Oscillator, F: Lowpass> TapeEcho<O, F> {
    /// Create the engine around the given oscillator and left/right filters.
    ///
    /// This is the only place the engine allocates.
    pub fn with_components(sample_rate: f32, lfo: O, tone: [F; 2]) -> Self {
        let channels = tone.map(|tone| Channel {
            delay_line: DelayLine::new(BUFFER_CAPACITY),
            tone,
        });

        let mut echo = Self {
            sample_rate,
            channels,
            modulation: ModulationBuffer::new(BUFFER_CAPACITY),
            lfo,
        };
        echo.set_sample_rate(sample_rate);
        echo
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Follow a host sample rate change. Buffer storage is left alone.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        for channel in &mut self.channels {
            channel.tone.set_sample_rate(sample_rate);
        }
    }

    /// Silence every buffer and restart the oscillator and filters.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.delay_line.clear();
            channel.tone.reset();
        }
        self.modulation.clear();
        self.lfo.reset();
    }

    /// Process one block from separate input and output buffers.
    ///
    /// All four slices must have the same length; exactly that many
    /// samples are consumed and produced. Returns the settings the block
    /// ran with.
    pub fn process_block(
        &mut self,
        controls: &Controls,
        input: [&[f32]; 2],
        output: [&mut [f32]; 2],
    ) -> BlockSettings {
        let [in_left, in_right] = input;
        let [out_left, out_right] = output;
        nih_debug_assert_eq!(in_left.len(), in_right.len());
        nih_debug_assert_eq!(in_left.len(), out_left.len());
        nih_debug_assert_eq!(in_left.len(), out_right.len());

        let settings = self.prepare(controls);

        let frames = in_left.iter().zip(in_right.iter());
        let outputs = out_left.iter_mut().zip(out_right.iter_mut());
        for ((&left, &right), (out_left, out_right)) in frames.zip(outputs) {
            [*out_left, *out_right] = self.process_frame(&settings, [left, right]);
        }

        settings
    }

    /// Process one block in place, as the plugin host hands it over.
    pub fn process_block_in_place(
        &mut self,
        controls: &Controls,
        left: &mut [f32],
        right: &mut [f32],
    ) -> BlockSettings {
        nih_debug_assert_eq!(left.len(), right.len());

        let settings = self.prepare(controls);

        for (left, right) in left.iter_mut().zip(right.iter_mut()) {
            [*left, *right] = self.process_frame(&settings, [*left, *right]);
        }

        settings
    }

    /// Snapshot the controls for this block and retune the oscillator and
    /// filters to match.
    fn prepare(&mut self, controls: &Controls) -> BlockSettings {
        let settings = controls.settings(self.sample_rate);

        self.lfo.set_frequency(settings.mod_rate_hz);
        for channel in &mut self.channels {
            channel.tone.set_cutoff(settings.cutoff_hz);
        }

        settings
    }

    #[inline]
    fn process_frame(&mut self, settings: &BlockSettings, input: [f32; 2]) -> [f32; 2] {
        // Vibrato: record the mono input, then read it back from behind the
        // cursor by an LFO-swept offset. The offset is `(lfo + 1) * depth`
        // seconds, so the read head never runs ahead of the write head.
        self.modulation.write((input[0] + input[1]) * 0.5);

        let lfo = self.lfo.tick();
        let sweep = (lfo * MOD_DEPTH_SECONDS + MOD_DEPTH_SECONDS) * settings.mod_level;
        let vibrato = self.modulation.read_behind(sweep * self.sample_rate);

        let mut output = [0.0; 2];
        for (side, channel) in self.channels.iter_mut().enumerate() {
            let repeat = channel.next_repeat(settings, side, vibrato);
            output[side] = input[side] * settings.dry + repeat * settings.wet;
        }

        output
    }
}
