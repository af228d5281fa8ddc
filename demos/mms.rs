use std::path::PathBuf;
use std::time::Instant;

use lesson_tts::{
    engines::mms::{MmsEngine, MmsInferenceParams, MmsModelParams},
    SynthesisEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut engine = MmsEngine::new();
    let model_path = PathBuf::from("models/mms-tts-bod");

    let load_start = Instant::now();
    engine.load_model_with_params(&model_path, MmsModelParams::default())?;
    println!("Model loaded in {:.2?}", load_start.elapsed());

    let text = "བཀྲ་ཤིས་བདེ་ལེགས། ཁྱེད་རང་སྐུ་གཟུགས་བདེ་པོ་ཡིན་པས།";

    let synth_start = Instant::now();
    let result = engine.synthesize(text, Some(MmsInferenceParams::default()))?;
    let synth_dur = synth_start.elapsed();

    let audio_duration = result.duration_secs();
    println!(
        "Synthesized {:.2}s audio in {:.2?} ({:.1}x real-time)",
        audio_duration,
        synth_dur,
        audio_duration / synth_dur.as_secs_f64()
    );

    engine.synthesize_to_file(text, &PathBuf::from("tibetan_tts.wav"), None)?;
    println!("Saved to tibetan_tts.wav");

    engine.unload_model();
    Ok(())
}
