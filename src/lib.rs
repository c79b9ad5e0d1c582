//! # Loveless Tape Echo: An AU/VST3/CLAP Stereo Tape Echo
//!
//! A saturated stereo echo built with [nih-plug](https://github.com/robbert-vdh/nih-plug).
//! Outputs Audio Unit (AUv2, on macOS), VST3, and CLAP formats from a
//! single codebase. Each side has its own delay time; the repeats are
//! pushed through an exponential soft clipper and a low-pass filter, and
//! a slow vibrato on the signal feeding the loop gives the wobble of a
//! worn tape transport.
//!
//! ## Signal Flow
//!
//! ```text
//! Input L/R ─┬──────────────────────────────────────────────── × dry ───┐
//!            │                                                          │
//!            │  (L+R)/2   ┌──────────────────────────────────────────┐  │
//!            └──► [Vibrato]──►(+)──► [Delay Line L/R]                │  │
//!                 (LFO-swept   ▲            │                        │  │
//!                  read head)  │            ▼                        │  │
//!                              │      × drive ──► [Saturator]        │  │
//!                              │                      │              │  │
//!                              │                      ▼              │  │
//!                              │                × level ──► [Lowpass]│  │
//!                              │                                 │   │  │
//!                              └────────── × feedback ◄──────────┤   │  │
//!                                                                │   │  │
//!                                                                └ × wet ──►(+)──► Output L/R
//! ```
//!
//! The DSP lives in [`dsp`] and knows nothing about nih-plug's buffers or
//! parameters. This file only moves data between the host and the engine.

pub mod dsp;
pub mod params;
pub mod presets;

use std::num::NonZeroU32;
use std::sync::Arc;

use dsp::echo::{TapeEcho, BUFFER_CAPACITY, MAX_SAMPLE_RATE};
use nih_plug::prelude::*;
use params::TapeEchoParams;

/// The main plugin struct.
///
/// ## Why separate state from parameters?
///
/// Parameters (`TapeEchoParams`) are shared with the host via `Arc` and
/// can be read from any thread. The echo engine is owned exclusively by
/// the audio thread and only touched in `initialize()`, `reset()` and
/// `process()`, so it needs no locks.
struct LovelessTapeEcho {
    params: Arc<TapeEchoParams>,

    /// The whole DSP core. Its buffers are sized for the highest supported
    /// sample rate when the plugin is created, so nothing is allocated
    /// once the host starts calling `process()`.
    echo: TapeEcho,
}

impl Default for LovelessTapeEcho {
    fn default() -> Self {
        Self {
            params: Arc::new(TapeEchoParams::default()),
            // 44100 Hz is a placeholder. The real sample rate is set in
            // initialize() when the host tells us the actual configuration.
            echo: TapeEcho::new(44100.0),
        }
    }
}

impl Plugin for LovelessTapeEcho {
    const NAME: &'static str = "Loveless Tape Echo";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo only. The vibrato is fed from the sum of both sides and each
    // side has its own delay time, so there is no sensible mono version.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    }];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // Parameters are read once per block, so splitting blocks at
    // automation points would buy nothing.
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called when the plugin is first loaded, or when the audio
    /// configuration changes.
    ///
    /// The buffers already exist, so this only retunes the engine for the
    /// new sample rate. Above [`MAX_SAMPLE_RATE`] the buffers can no longer
    /// hold the longest delay, and we refuse the configuration by
    /// returning `false`.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let sample_rate = buffer_config.sample_rate;

        if sample_rate > MAX_SAMPLE_RATE {
            nih_warn!(
                "Sample rate {sample_rate} Hz is above the supported maximum of \
                 {MAX_SAMPLE_RATE} Hz"
            );
            return false;
        }

        self.echo.set_sample_rate(sample_rate);
        nih_log!(
            "Initialized at {sample_rate} Hz ({} samples per delay buffer)",
            BUFFER_CAPACITY
        );

        true
    }

    /// Called when playback stops or the plugin is bypassed.
    ///
    /// Clears every buffer, filter and the LFO phase so stale audio
    /// doesn't bleed into the next playback.
    fn reset(&mut self) {
        self.echo.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        // Read every knob once; the whole block runs with these values.
        let controls = self.params.controls();

        let settings = match buffer.as_slice() {
            [left, right, ..] => self.echo.process_block_in_place(&controls, left, right),
            // Only the stereo layout is offered, so this never happens.
            _ => return ProcessStatus::Normal,
        };

        // Tell the host how long our echoes ring out so it keeps calling
        // process() after the input goes silent. When the loop gain
        // reaches unity the echoes never die away, so ask to be kept
        // alive indefinitely.
        match settings.tail_samples() {
            Some(tail_samples) => ProcessStatus::Tail(tail_samples),
            None => ProcessStatus::KeepAlive,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for LovelessTapeEcho {
    // A reverse-domain-notation ID, unique to this plugin.
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-tape-echo";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A saturated stereo tape echo with modulated repeats");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Delay,
        ClapFeature::Distortion,
    ];
}

impl Vst3Plugin for LovelessTapeEcho {
    // A 16-byte class ID that must be globally unique across all VST3
    // plugins. `*b"..."` turns the 16-character ASCII literal into a
    // `[u8; 16]`.
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssTapeEcho001";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] = &[
        Vst3SubCategory::Fx,
        Vst3SubCategory::Delay,
        Vst3SubCategory::Stereo,
    ];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// nih_export_clap! exports the `clap_entry` symbol for CLAP hosts.
// nih_export_vst3! exports `GetPluginFactory` for VST3 hosts.

nih_export_clap!(LovelessTapeEcho);
nih_export_vst3!(LovelessTapeEcho);

// Wrap the CLAP plugin as an AUv2 component for Logic Pro. Audio Units
// only exist on macOS, and so does the dependency.
#[cfg(target_os = "macos")]
clap_wrapper::export_auv2!();
