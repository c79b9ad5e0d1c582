//! # Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and lets you read them back a whole
//! number of samples later. Each stereo channel of the echo owns one, and
//! the feedback loop writes every repeat back into it.
//!
//! ## Cursor Semantics
//!
//! The write cursor always points at the most recently written slot:
//!
//! 1. `write()` first advances the cursor by one (wrapping at capacity),
//!    then stores the sample there, overwriting the oldest sample.
//! 2. `read(d)` returns the sample written `d` writes ago, so `read(0)` is
//!    the newest sample and `read(capacity - 1)` the oldest one still held.
//!
//! Because the echo reads a channel's delayed sample *before* writing that
//! sample's feedback, a delay of `d` samples closes the loop every `d + 1`
//! samples.
//!
//! ```text
//!   capacity = 8, cursor = 5, read(3) → slot 2
//!
//!   ┌───┬───┬───┬───┬───┬───┬───┬───┐
//!   │ 0 │ 1 │ 2 │ 3 │ 4 │ 5 │ 6 │ 7 │
//!   └───┴───┴─▲─┴───┴───┴─▲─┴───┴───┘
//!             │           └── cursor (newest)
//!             └── 3 writes ago
//! ```

use std::num::NonZeroUsize;

use nih_plug::nih_debug_assert;

/// A fixed-capacity ring buffer with integer-delay reads.
///
/// Storage is allocated once in [`DelayLine::new`] and never resized, so
/// nothing on the audio thread ever touches the allocator.
pub struct DelayLine {
    /// The circular storage. Starts out as silence.
    buffer: Box<[f32]>,

    /// Slot holding the most recently written sample. Always `< capacity`.
    write_pos: usize,
}

impl DelayLine {
    /// Create a silent delay line holding `capacity` samples.
    ///
    /// `NonZeroUsize` keeps the modular index arithmetic free of
    /// division-by-zero.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            buffer: vec![0.0; capacity.get()].into_boxed_slice(),
            write_pos: 0,
        }
    }

    /// Number of samples the line can hold.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Advance the write cursor, then store `sample` in the new slot.
    ///
    /// The slot being overwritten holds the oldest sample in the line.
    pub fn write(&mut self, sample: f32) {
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        self.buffer[self.write_pos] = sample;
    }

    /// Read the sample written `delay_samples` writes ago.
    ///
    /// Delays must not exceed the capacity. The echo sizes its lines so
    /// that no legal parameter value gets there; a longer delay is flagged
    /// in debug builds and wraps around the ring instead of panicking.
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        nih_debug_assert!(
            delay_samples <= len,
            "delay of {} samples exceeds delay line capacity {}",
            delay_samples,
            len
        );

        // `write_pos + len - delay` can't underflow once delay < len.
        let delay = delay_samples % len;
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Clear the entire buffer to silence and reset the write cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
