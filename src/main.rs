use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lesson_tts::catalog::ContentType;
use lesson_tts::engines::placeholder::PlaceholderEngine;
use lesson_tts::{shuffle, Pipeline, PipelineConfig, RunReport, SynthesisEngine};

#[derive(Parser)]
#[command(name = "lesson-tts")]
#[command(version)]
#[command(about = "Generate speech assets for lesson data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize one audio file per unique script string in the catalog
    Generate {
        /// TOML config file; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Catalog JSON (levels and sublevels)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Output root for generated audio
        #[arg(long)]
        audio_root: Option<PathBuf>,
        /// Directory that relative unit paths are resolved against
        #[arg(long)]
        asset_root: Option<PathBuf>,
        /// Content type to skip; repeat for several. Replaces the configured list
        #[arg(long = "skip")]
        skip: Vec<ContentType>,
        /// Sample rate of written files
        #[arg(long)]
        sample_rate: Option<u32>,
        /// Synthesis engine; defaults to mms when this build includes it
        #[arg(long, value_enum, default_value_t)]
        engine: EngineKind,
        /// Model directory for the mms engine
        #[arg(short, long, default_value = "models/mms-tts-bod")]
        model: PathBuf,
        /// Inference threads for the mms engine
        #[arg(long)]
        threads: Option<usize>,
        /// Log the plan without synthesizing
        #[arg(long)]
        dry_run: bool,
    },
    /// Move each exercise's correct answer to a random position, in place
    Shuffle {
        /// Unit files to rewrite
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Seed for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    /// MMS VITS ONNX model (requires the `mms` feature)
    Mms,
    /// One second of silence per string
    Placeholder,
}

impl Default for EngineKind {
    fn default() -> Self {
        if cfg!(feature = "mms") {
            EngineKind::Mms
        } else {
            EngineKind::Placeholder
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Generate {
            config,
            catalog,
            audio_root,
            asset_root,
            skip,
            sample_rate,
            engine,
            model,
            threads,
            dry_run,
        } => {
            let mut cfg = match config {
                Some(path) => PipelineConfig::load(&path)?,
                None => PipelineConfig::default(),
            };
            if let Some(catalog) = catalog {
                cfg.catalog_path = catalog;
            }
            if let Some(audio_root) = audio_root {
                cfg.audio_root = audio_root;
            }
            if asset_root.is_some() {
                cfg.asset_root = asset_root;
            }
            if !skip.is_empty() {
                cfg.skip_types = skip;
            }
            if let Some(rate) = sample_rate {
                cfg.sample_rate = rate;
            }
            cfg.dry_run |= dry_run;

            let report = match engine {
                EngineKind::Placeholder => generate(cfg, PlaceholderEngine::new())?,
                EngineKind::Mms => generate_mms(cfg, &model, threads)?,
            };
            Ok(report.is_success())
        }
        Commands::Shuffle { files, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            for file in &files {
                shuffle::shuffle_file(file, &mut rng)?;
            }
            println!("Randomization complete.");
            Ok(true)
        }
    }
}

fn generate<E>(config: PipelineConfig, engine: E) -> Result<RunReport, Box<dyn std::error::Error>>
where
    E: SynthesisEngine,
    E::SynthesisParams: Clone,
{
    let report = Pipeline::new(config, engine).run()?;
    for failed in &report.failed {
        log::error!(
            "[FAILED] {} {:?} → {}: {}",
            failed.sublevel.code,
            failed.text,
            failed.path.display(),
            failed.error
        );
    }
    Ok(report)
}

#[cfg(feature = "mms")]
fn generate_mms(
    config: PipelineConfig,
    model: &std::path::Path,
    threads: Option<usize>,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    use lesson_tts::engines::mms::{MmsEngine, MmsModelParams};

    let mut engine = MmsEngine::new();
    if !config.dry_run {
        engine.load_model_with_params(model, MmsModelParams { num_threads: threads })?;
    }
    generate(config, engine)
}

#[cfg(not(feature = "mms"))]
fn generate_mms(
    _config: PipelineConfig,
    _model: &std::path::Path,
    _threads: Option<usize>,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    Err("this build has no mms engine; rebuild with `--features mms` or pass `--engine placeholder`".into())
}
