use anyhow::{Context, Result, anyhow};
use clap::Parser;
use classifier::{Classification, Feature, NeurologicalClassifier, SymptomObservation};
use neural_network::ModelDocument;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use training::{Trainer, TrainingConfig};

const DEFAULT_MODEL_PATH: &str = "models/neuro_classifier.json";

#[derive(clap::Parser)]
#[command(name = "neuro-classify", about = "Neurological pattern classifier", long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Train the classifier on the built-in dataset and save the model
    Train {
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        output: PathBuf,
        /// JSON training configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Epochs between progress updates
        #[arg(long)]
        chunk: Option<usize>,
        /// Wall-clock budget in seconds
        #[arg(long)]
        time_limit: Option<f64>,
        #[arg(long)]
        no_progress: bool,
    },
    /// Rank every condition for a symptom report
    Classify {
        /// Saved model; trained on the fly when the file does not exist
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        /// Seed used when training on the fly
        #[arg(long)]
        seed: Option<u64>,
        /// Symptom report as a JSON file
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        age: Option<f64>,
        /// Present symptom, e.g. `tremor` or `motor_symptoms`; repeatable
        #[arg(short, long = "symptom", value_parser = parse_feature)]
        symptoms: Vec<Feature>,
        /// Print the classification and explanation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print architecture and training statistics of a saved model
    Stats {
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

fn parse_feature(name: &str) -> Result<Feature, String> {
    match Feature::from_name(name) {
        Some(Feature::Age) => Err("age is not a symptom; use --age".to_string()),
        Some(feature) => Ok(feature),
        None => {
            let names: Vec<&str> = Feature::ALL[1..].iter().map(|f| f.name()).collect();
            Err(format!("expected one of: {}", names.join(", ")))
        }
    }
}

fn install_logger(verbose: u8) -> Result<(), SetGlobalDefaultError> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

fn train(
    output: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
    chunk: Option<usize>,
    time_limit: Option<f64>,
    no_progress: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => TrainingConfig::load(path)
            .with_context(|| format!("Failed to load training config {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(chunk) = chunk {
        config.epochs_per_chunk = chunk;
    }
    if let Some(secs) = time_limit {
        config.time_limit = Some(Duration::try_from_secs_f64(secs).context("Invalid time limit")?);
    }
    config.show_progress &= !no_progress;

    let mut trainer = Trainer::new(config).context("Failed to create trainer")?;
    println!("Training neurological classifier...");
    let summary = trainer.train().context("Failed to train classifier")?;
    println!("\n{summary}");

    if !summary.completed() {
        return Err(anyhow!("Training did not complete; model not saved"));
    }

    if let Some(dir) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    trainer.save_model(output).context("Failed to save model")?;
    println!("Model saved to {}", output.display());
    Ok(())
}

fn load_or_train(model: &Path, seed: Option<u64>) -> Result<NeurologicalClassifier> {
    if model.exists() {
        let trainer = Trainer::load_model(model, TrainingConfig::default())
            .with_context(|| format!("Failed to load model {}", model.display()))?;
        return Ok(trainer.into_classifier());
    }

    eprintln!("No model at {}, training a new one...", model.display());
    let mut classifier = match seed {
        Some(seed) => NeurologicalClassifier::with_seed(seed)?,
        None => NeurologicalClassifier::new()?,
    };
    classifier.ensure_trained().context("Failed to train classifier")?;
    Ok(classifier)
}

fn build_observation(input: Option<&Path>, age: Option<f64>, symptoms: &[Feature]) -> Result<SymptomObservation> {
    let mut observation = match input {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json).context("Failed to parse symptom report")?
        }
        None => SymptomObservation::default(),
    };
    if age.is_some() {
        observation.age = age;
    }
    for &symptom in symptoms {
        observation = observation.with_symptom(symptom);
    }
    Ok(observation)
}

fn print_classification(classification: &Classification) {
    println!("\nCondition  | Probability | Confidence");
    println!("-----------|-------------|-----------");
    for prediction in &classification.all_predictions {
        println!(
            "{:<10} |   {:>6.2}%   | {:?}",
            prediction.condition.label(),
            prediction.probability * 100.0,
            prediction.confidence
        );
    }
}

fn classify(
    model: &Path,
    seed: Option<u64>,
    input: Option<&Path>,
    age: Option<f64>,
    symptoms: &[Feature],
    json: bool,
) -> Result<()> {
    let observation = build_observation(input, age, symptoms)?;
    let classifier = load_or_train(model, seed)?;

    let classification = classifier
        .classify(&observation)
        .context("Failed to classify symptoms")?;
    let explanation = classifier.explain(&observation, &classification);

    if json {
        let output = serde_json::json!({
            "classification": classification,
            "explanation": explanation,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_classification(&classification);
        println!("\n{}", explanation.reasoning);
    }
    Ok(())
}

fn stats(model: &Path) -> Result<()> {
    let json = fs::read_to_string(model)
        .with_context(|| format!("Failed to read model {}", model.display()))?;
    let document = ModelDocument::from_json(&json).context("Failed to parse model")?;
    let mut classifier = NeurologicalClassifier::new()?;
    classifier
        .load_model(document)
        .context("Model is not a neurological classifier")?;

    let stats = classifier.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    install_logger(args.verbose).map_err(|e| anyhow!("Failed to install logger: {}", e))?;

    match args.command {
        Command::Train {
            output,
            config,
            seed,
            chunk,
            time_limit,
            no_progress,
        } => train(&output, config.as_deref(), seed, chunk, time_limit, no_progress)?,
        Command::Classify {
            model,
            seed,
            input,
            age,
            symptoms,
            json,
        } => classify(&model, seed, input.as_deref(), age, &symptoms, json)?,
        Command::Stats { model } => stats(&model)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_classify_arguments() {
        let args = Args::try_parse_from([
            "neuro-classify",
            "-vv",
            "classify",
            "--age",
            "72",
            "-s",
            "tremor",
            "--symptom",
            "rigidity",
            "--json",
        ])
        .unwrap();

        assert_eq!(args.verbose, 2);
        let Command::Classify { age, symptoms, json, model, .. } = args.command else {
            panic!("expected classify");
        };
        assert_eq!(age, Some(72.0));
        assert_eq!(symptoms, vec![Feature::Tremor, Feature::Rigidity]);
        assert!(json);
        assert_eq!(model, PathBuf::from(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_unknown_symptom_rejected() {
        let result = Args::try_parse_from(["neuro-classify", "classify", "-s", "headache"]);
        assert!(result.is_err());

        let result = Args::try_parse_from(["neuro-classify", "classify", "-s", "age"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_observation_merges_file_and_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        fs::write(&path, r#"{ "age": 40, "memoryIssues": true }"#).unwrap();

        let observation =
            build_observation(Some(&path), Some(81.0), &[Feature::Seizures]).unwrap();

        assert_eq!(observation.age, Some(81.0));
        assert!(observation.memory_issues);
        assert!(observation.seizures);
        assert!(!observation.tremor);
    }

    #[test]
    fn test_train_then_stats() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested").join("model.json");

        train(&output, None, Some(42), Some(100), None, true).unwrap();

        assert!(output.exists());
        stats(&output).unwrap();
        classify(&output, None, None, Some(65.0), &[Feature::Tremor], true).unwrap();
    }
}
