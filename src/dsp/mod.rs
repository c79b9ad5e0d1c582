//! # DSP (Digital Signal Processing) Core
//!
//! Everything that runs on the audio thread. None of it knows about
//! nih-plug's parameter or buffer types; the plugin shell in `lib.rs`
//! snapshots the parameters into [`controls::Controls`] and hands the
//! channel slices to [`echo::TapeEcho`].
//!
//! - **`delay_line`**: integer-delay ring buffer, one per stereo side.
//! - **`mod_buffer`**: ring buffer with interpolated reads that produces
//!   the vibrato.
//! - **`saturator`**: the exponential soft clipper on the repeats.
//! - **`filter`** / **`oscillator`**: the low-pass and LFO the engine
//!   drives through small traits.
//! - **`controls`**: knob snapshot → per-block settings.
//! - **`echo`**: the per-sample pipeline tying it all together.

pub mod controls;
pub mod delay_line;
pub mod echo;
pub mod filter;
pub mod mod_buffer;
pub mod oscillator;
pub mod saturator;
