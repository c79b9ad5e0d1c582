//! # Modulation Buffer
//!
//! A third ring buffer that records a mono mix of the input and reads it
//! back from a position that drifts a few hundred samples behind the
//! write cursor. Because the read head keeps moving, the played-back
//! signal is continuously sped up and slowed down: that pitch wobble is
//! the vibrato injected into every repeat of the echo.
//!
//! ## Fractional Reads
//!
//! The read head almost never sits on a whole sample, so the value is
//! linearly interpolated between the two neighbouring slots:
//!
//! ```text
//! i1 = floor(position), i2 = (i1 + 1) mod capacity, frac = position - i1
//! result = buffer[i1] + frac * (buffer[i2] - buffer[i1])
//! ```
//!
//! Positions are tracked as `f64`. With a 384,000-slot buffer an `f32`
//! position would only resolve about 1/32 of a sample near the top of the
//! ring, which is audible as grainy modulation.

use std::num::NonZeroUsize;

use nih_plug::nih_debug_assert;

/// Ring buffer with interpolated reads at arbitrary offsets.
pub struct ModulationBuffer {
    buffer: Box<[f32]>,
    /// Slot holding the most recently written sample.
    write_pos: usize,
}

impl ModulationBuffer {
    /// Create a silent buffer holding `capacity` samples.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            buffer: vec![0.0; capacity.get()].into_boxed_slice(),
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Slot holding the most recently written sample.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Advance the write cursor, then store `sample` in the new slot.
    pub fn write(&mut self, sample: f32) {
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        self.buffer[self.write_pos] = sample;
    }

    /// Linearly interpolate the buffer at an absolute `position`.
    ///
    /// `position` is measured from slot 0, not from the write cursor, and
    /// must lie in `[0, capacity)`. Use [`read_behind`](Self::read_behind)
    /// to read relative to the cursor with the wrap handled for you.
    pub fn interpolated_read(&self, position: f64) -> f32 {
        let len = self.buffer.len();
        nih_debug_assert!(
            (0.0..len as f64).contains(&position),
            "interpolated read at {} outside of [0, {})",
            position,
            len
        );

        let base = position.floor();
        let frac = (position - base) as f32;
        let i1 = base as usize % len;
        let i2 = (i1 + 1) % len;

        let s1 = self.buffer[i1];
        s1 + frac * (self.buffer[i2] - s1)
    }

    /// Read `offset_samples` behind the write cursor.
    ///
    /// An offset of `0.0` returns the newest sample; fractional offsets
    /// interpolate towards older samples.
    pub fn read_behind(&self, offset_samples: f32) -> f32 {
        let len = self.buffer.len() as f64;
        let mut position = (self.write_pos as f64 - f64::from(offset_samples)).rem_euclid(len);
        // `rem_euclid` can round up to exactly `len` for tiny negatives.
        if position >= len {
            position = 0.0;
        }

        self.interpolated_read(position)
    }

    /// Clear the buffer to silence and reset the write cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
