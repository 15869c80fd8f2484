use rand::{rngs::StdRng, Rng, SeedableRng};

use ferrite_harness::{
    train_model, test_model, ActivationFunction, CheckpointManager, CrossEntropyLoss, DataLoader,
    Dataset, LayerSpec, Loaders, Network, NetworkSpec, ReduceLrOnPlateau, Sgd, TrainConfig,
};

const CENTRES: [(f64, f64); 3] = [(-2.0, 0.0), (2.0, 0.0), (0.0, 2.5)];

fn blobs(per_class: usize, rng: &mut StdRng) -> Dataset<Vec<f64>> {
    let mut inputs = Vec::new();
    let mut targets = Vec::new();
    for _ in 0..per_class {
        for (label, &(cx, cy)) in CENTRES.iter().enumerate() {
            inputs.push(vec![cx + rng.gen_range(-1.0..1.0), cy + rng.gen_range(-1.0..1.0)]);
            targets.push(label);
        }
    }
    Dataset::new(inputs, targets).expect("inputs and targets have equal length")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = StdRng::seed_from_u64(7);
    let train_set = blobs(100, &mut rng);
    let val_set = blobs(30, &mut rng);
    let test_set = blobs(30, &mut rng);

    let spec = NetworkSpec {
        name: "blobs-mlp".into(),
        layers: vec![
            LayerSpec { size: 16, input_size: 2, activation: ActivationFunction::ReLU },
            LayerSpec { size: 3, input_size: 16, activation: ActivationFunction::Identity },
        ],
        dropout: 0.1,
    };
    let mut network = Network::from_spec(&spec, 7).expect("valid spec");

    let mut loaders = Loaders {
        train: DataLoader::new(train_set, 16).expect("batch size > 0").shuffled(7),
        val: DataLoader::new(val_set, 16).expect("batch size > 0"),
    };

    let save_dir = std::env::temp_dir().join("ferrite-harness-blobs");
    let mut checkpoints = CheckpointManager::new(&save_dir).expect("create save dir");
    let mut optimizer = Sgd::with_momentum(0.05, 0.9);
    let mut scheduler = ReduceLrOnPlateau::new(0.5, 2, 5);
    let config = TrainConfig::new(30, &save_dir);

    let report = train_model(
        &mut network,
        &mut loaders,
        &CrossEntropyLoss,
        &mut optimizer,
        &mut scheduler,
        &mut checkpoints,
        &config,
    )
    .expect("training failed");

    println!(
        "Ran {} epochs (early stop: {}), best validation accuracy {:.2}%",
        report.epochs_run, report.stopped_early, report.best_acc
    );

    let mut test_loader = DataLoader::new(test_set, 16).expect("batch size > 0");
    let outcome = test_model(&mut network, &mut test_loader, save_dir.join("test_outputs.json"))
        .expect("test pass failed");
    println!("Test accuracy {:.2}% ({}/{})", outcome.accuracy, outcome.correct, outcome.example_count);
    println!("Checkpoints and scalars in {}", save_dir.display());
}
