//! # lesson-tts
//!
//! Offline speech-asset generation for language-learning lesson data.
//!
//! The crate walks a lesson catalog, pulls foreign-script text out of every
//! sublevel's unit file, deduplicates it and renders one audio file per unique
//! string into a stable directory layout.
//!
//! ## Features
//!
//! - **Corpus walking**: level → sublevel traversal with content-type filtering
//! - **Deterministic output**: sorted, deduplicated strings mapped to stable paths
//! - **Pluggable synthesis**: any [`SynthesisEngine`]; an MMS/VITS ONNX engine
//!   ships behind the `mms` feature and a silent placeholder engine is always available
//! - **Answer shuffling**: randomize the position of correct answers in unit files
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! lesson-tts = { version = "2026.10", features = ["mms"] }
//! ```
//!
//! ```ignore
//! use std::path::PathBuf;
//! use lesson_tts::{engines::mms::MmsEngine, Pipeline, PipelineConfigBuilder, SynthesisEngine};
//!
//! let mut engine = MmsEngine::new();
//! engine.load_model(&PathBuf::from("models/mms-tts-bod"))?;
//!
//! let config = PipelineConfigBuilder::default()
//!     .catalog_path("assets/quiz_data/levels.json")
//!     .audio_root("assets/audios")
//!     .build()?;
//!
//! let report = Pipeline::new(config, engine).run()?;
//! println!("wrote {} files", report.written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod config;
pub mod driver;
pub mod engines;
pub mod error;
pub mod extract;
pub mod paths;
pub mod pipeline;
pub mod shuffle;
pub mod walker;

pub use config::{PipelineConfig, PipelineConfigBuilder, ScriptRange};
pub use error::PipelineError;
pub use pipeline::{Pipeline, RunReport};

use std::path::Path;

/// The result of a synthesis (text-to-speech) operation.
///
/// Contains raw f32 audio samples and the sample rate of the output audio.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Raw audio samples as f32 values
    pub samples: Vec<f32>,
    /// Sample rate of the audio (16000 for MMS)
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Linearly resample to `target_rate`. Returns `self` unchanged when the
    /// rates already match.
    pub fn resampled(self, target_rate: u32) -> Self {
        if self.sample_rate == target_rate || self.samples.is_empty() || target_rate == 0 {
            return self;
        }

        let ratio = self.sample_rate as f64 / target_rate as f64;
        let out_len = ((self.samples.len() as f64) / ratio).round().max(1.0) as usize;
        let last = self.samples.len() - 1;

        let samples = (0..out_len)
            .map(|i| {
                let pos = i as f64 * ratio;
                let idx = (pos.floor() as usize).min(last);
                let next = (idx + 1).min(last);
                let t = (pos - idx as f64) as f32;
                self.samples[idx] * (1.0 - t) + self.samples[next] * t
            })
            .collect();

        Self {
            samples,
            sample_rate: target_rate,
        }
    }
}

/// Common interface for text-to-speech synthesis engines.
///
/// This trait defines the standard operations that all synthesis engines must support.
/// Each engine may have different parameter types for model loading and inference configuration.
pub trait SynthesisEngine {
    /// Parameters for configuring inference behavior (speaking rate, noise, etc.)
    type SynthesisParams;
    /// Parameters for configuring model loading (threads, etc.)
    type ModelParams: Default;

    /// Load a model from the specified path using default parameters.
    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.load_model_with_params(model_path, Self::ModelParams::default())
    }

    /// Load a model from the specified path with custom parameters.
    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Synthesize speech from the given text.
    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>>;

    /// Synthesize speech from the given text and write to a WAV file.
    ///
    /// Default implementation calls `synthesize()` then `SynthesisResult::write_wav()`.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        wav_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.synthesize(text, params)?.write_wav(wav_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SynthesisResult;

    #[test]
    fn resample_is_identity_at_same_rate() {
        let result = SynthesisResult {
            samples: vec![0.1, 0.2, 0.3],
            sample_rate: 16000,
        };
        let out = result.resampled(16000);
        assert_eq!(out.samples, vec![0.1, 0.2, 0.3]);
        assert_eq!(out.sample_rate, 16000);
    }

    #[test]
    fn resample_halves_length_when_downsampling_by_two() {
        let result = SynthesisResult {
            samples: vec![0.0; 3200],
            sample_rate: 32000,
        };
        let out = result.resampled(16000);
        assert_eq!(out.sample_rate, 16000);
        assert_eq!(out.samples.len(), 1600);
        assert!((out.duration_secs() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn resample_interpolates_between_samples() {
        let result = SynthesisResult {
            samples: vec![0.0, 1.0],
            sample_rate: 8000,
        };
        let out = result.resampled(16000);
        assert_eq!(out.samples.len(), 4);
        assert!((out.samples[1] - 0.5).abs() < 1e-6);
        assert_eq!(out.samples[3], 1.0);
    }
}
