// Thin CLI over the library: every training/evaluation step lives in src/lib.rs
// and its modules. Run with:
//   cargo run -- train --config run.json
//   cargo run -- test --config run.json --checkpoint runs/a/model_best.pth.tar --output preds.json
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use ferrite_harness::{
    train_model, test_model, CheckpointManager, Classifier, CrossEntropyLoss, DataLoader, Dataset,
    Loaders, Network, RunConfig, Sgd, TrainConfig,
};

#[derive(Parser, Debug)]
#[command(name = "ferrite-harness", version, about = "Train and evaluate a 3-class classifier.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the epoch loop, writing checkpoints and scalars to `save_dir`
    Train {
        /// JSON run configuration
        #[arg(long)]
        config: PathBuf,
        /// Continue from `<save_dir>/checkpoint.pth.tar`
        #[arg(long)]
        resume: bool,
    },
    /// Evaluate a checkpoint on the configured test set
    Test {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        checkpoint: PathBuf,
        /// Where the per-example output array is written
        #[arg(long, default_value = "test_outputs.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Train { config, resume } => run_train(&config, resume),
        Command::Test { config, checkpoint, output } => run_test(&config, &checkpoint, &output),
    }
}

fn run_train(config_path: &Path, resume: bool) -> Result<()> {
    let run = RunConfig::load_json(config_path)
        .with_context(|| format!("loading run config '{}'", config_path.display()))?;

    let train_set = load_dataset(&run, &run.train_data)?;
    let val_set = load_dataset(&run, &run.val_data)?;
    let mut train_loader = DataLoader::new(train_set, run.batch_size)?;
    if run.shuffle {
        train_loader = train_loader.shuffled(run.seed);
    }
    let mut loaders = Loaders {
        train: train_loader,
        val: DataLoader::new(val_set, run.batch_size)?,
    };

    let mut network = Network::from_spec(&run.network, run.seed)?;
    let mut checkpoints = CheckpointManager::new(&run.save_dir)?;
    let mut train_config = TrainConfig::new(run.num_epochs, &run.save_dir);

    if resume {
        let path = checkpoints.latest_path();
        let state = CheckpointManager::load(&path)
            .with_context(|| format!("resuming from '{}'", path.display()))?;
        network.load_state_dict(&state.state_dict)?;
        info!("Resuming after epoch {} (best acc {:.3})", state.epoch, state.best_acc);
        train_config = train_config.resume_from(&state);
    }

    let mut optimizer = Sgd::with_momentum(run.learning_rate, run.momentum);
    let mut scheduler = run.scheduler.build();

    info!(
        "Training '{}' with {} layers and {} classes",
        run.network.name,
        run.network.layers.len(),
        run.network.num_classes()
    );
    let report = train_model(
        &mut network,
        &mut loaders,
        &CrossEntropyLoss,
        &mut optimizer,
        scheduler.as_mut(),
        &mut checkpoints,
        &train_config,
    )?;

    println!(
        "Finished {} epochs{}; best validation accuracy {:.3}%",
        report.epochs_run,
        if report.stopped_early { " (stopped early)" } else { "" },
        report.best_acc
    );
    Ok(())
}

fn run_test(config_path: &Path, checkpoint: &Path, output: &Path) -> Result<()> {
    let run = RunConfig::load_json(config_path)
        .with_context(|| format!("loading run config '{}'", config_path.display()))?;
    let Some(test_path) = run.test_data.as_ref() else {
        bail!("run config '{}' has no test_data", config_path.display());
    };

    let mut network = Network::from_spec(&run.network, run.seed)?;
    let state = CheckpointManager::load(checkpoint)
        .with_context(|| format!("loading checkpoint '{}'", checkpoint.display()))?;
    network.load_state_dict(&state.state_dict)?;

    let mut loader = DataLoader::new(load_dataset(&run, test_path)?, run.batch_size)?;
    let outcome = test_model(&mut network, &mut loader, output)?;

    println!(
        "Test accuracy {:.3}% ({}/{})",
        outcome.accuracy, outcome.correct, outcome.example_count
    );
    Ok(())
}

/// Loads a dataset and checks its feature width against the network's first layer.
fn load_dataset(run: &RunConfig, path: &Path) -> Result<Dataset<Vec<f64>>> {
    let data = Dataset::load_json(path)
        .with_context(|| format!("loading dataset '{}'", path.display()))?;
    run.network
        .check_dataset(&data)
        .with_context(|| format!("dataset '{}' does not fit network '{}'", path.display(), run.network.name))?;
    Ok(data)
}
