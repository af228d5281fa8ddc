use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::SynthesisEngine;

/// Renders one string to one file through a [`SynthesisEngine`].
///
/// Audio is written to a `.part` sibling and renamed into place, so a failed
/// item never leaves a truncated file and an earlier artifact at the same path
/// survives the failure.
pub struct SynthesisDriver<E: SynthesisEngine> {
    engine: E,
    sample_rate: u32,
    params: Option<E::SynthesisParams>,
}

impl<E> SynthesisDriver<E>
where
    E: SynthesisEngine,
    E::SynthesisParams: Clone,
{
    pub fn new(engine: E, sample_rate: u32) -> Self {
        Self {
            engine,
            sample_rate,
            params: None,
        }
    }

    /// Inference parameters passed to every `synthesize` call.
    pub fn with_params(mut self, params: E::SynthesisParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn synthesize_to(&mut self, text: &str, dest: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }

        let result = self
            .engine
            .synthesize(text, self.params.clone())
            .map_err(|e| PipelineError::Synthesis {
                text: text.to_string(),
                message: e.to_string(),
            })?;

        if result.samples.is_empty() {
            return Err(PipelineError::Synthesis {
                text: text.to_string(),
                message: "engine produced no audio".to_string(),
            });
        }

        if result.sample_rate != self.sample_rate {
            log::debug!(
                "Resampling {} Hz → {} Hz for {text:?}",
                result.sample_rate,
                self.sample_rate
            );
        }
        let audio = result.resampled(self.sample_rate);

        let part = part_path(dest);
        if let Err(source) = audio.write_wav(&part) {
            let _ = std::fs::remove_file(&part);
            return Err(PipelineError::Wav { path: part, source });
        }
        if let Err(e) = std::fs::rename(&part, dest) {
            let _ = std::fs::remove_file(&part);
            return Err(PipelineError::io(dest, e));
        }

        log::info!(
            "Saved {:.2}s of audio to {}",
            audio.duration_secs(),
            dest.display()
        );
        Ok(())
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::SynthesisResult;

    /// Records every request; fails for texts listed in `fail_on`.
    #[derive(Default)]
    pub(crate) struct RecordingEngine {
        pub calls: Vec<String>,
        pub fail_on: Vec<String>,
        pub sample_rate: u32,
    }

    impl RecordingEngine {
        pub fn new(sample_rate: u32) -> Self {
            Self {
                sample_rate,
                ..Default::default()
            }
        }
    }

    impl SynthesisEngine for RecordingEngine {
        type SynthesisParams = ();
        type ModelParams = ();

        fn load_model_with_params(
            &mut self,
            _model_path: &Path,
            _params: Self::ModelParams,
        ) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn unload_model(&mut self) {}

        fn synthesize(
            &mut self,
            text: &str,
            _params: Option<Self::SynthesisParams>,
        ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
            self.calls.push(text.to_string());
            if self.fail_on.iter().any(|t| t == text) {
                return Err(format!("cannot voice {text}").into());
            }
            Ok(SynthesisResult {
                samples: vec![0.25; text.chars().count() * 160],
                sample_rate: self.sample_rate,
            })
        }
    }

    #[test]
    fn writes_wav_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("level-1/sublevel-1-1/1-1_001.wav");
        let mut driver = SynthesisDriver::new(RecordingEngine::new(16000), 16000);

        driver.synthesize_to("ཀ", &dest).unwrap();

        let reader = hound::WavReader::open(&dest).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 160);
        assert!(!part_path(&dest).exists());
        assert_eq!(driver.engine().calls, vec!["ཀ".to_string()]);
    }

    #[test]
    fn resamples_to_target_rate() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.wav");
        let mut driver = SynthesisDriver::new(RecordingEngine::new(32000), 16000);

        driver.synthesize_to("ཀཁ", &dest).unwrap();

        let reader = hound::WavReader::open(&dest).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.len(), 160);
    }

    #[test]
    fn failure_leaves_previous_artifact_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("1-1_001.wav");
        std::fs::write(&dest, b"previous").unwrap();

        let mut engine = RecordingEngine::new(16000);
        engine.fail_on.push("ཀ".to_string());
        let mut driver = SynthesisDriver::new(engine, 16000);

        let err = driver.synthesize_to("ཀ", &dest).unwrap_err();
        assert!(matches!(err, PipelineError::Synthesis { ref text, .. } if text == "ཀ"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous");
        assert!(!part_path(&dest).exists());
    }

    #[test]
    fn empty_audio_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("silent.wav");
        let mut driver = SynthesisDriver::new(RecordingEngine::new(16000), 16000);

        assert!(driver.synthesize_to("", &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("a/b/1-1_001.wav")),
            PathBuf::from("a/b/1-1_001.wav.part")
        );
    }
}
