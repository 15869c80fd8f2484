use ferrite_harness::train::validate;
use ferrite_harness::{
    train_model, ActivationFunction, CheckpointManager, Classifier, ConstantLr, CrossEntropyLoss,
    DataLoader, Dataset, LayerSpec, Loaders, Network, NetworkSpec, Sgd, TrainConfig,
};

const CENTRES: [(f64, f64); 3] = [(-3.0, 0.0), (3.0, 0.0), (0.0, 3.0)];
const OFFSETS: [(f64, f64); 5] = [(0.0, 0.0), (0.3, 0.2), (-0.2, 0.3), (0.2, -0.3), (-0.3, -0.2)];

fn clusters() -> Dataset<Vec<f64>> {
    let mut inputs = Vec::new();
    let mut targets = Vec::new();
    for &(dx, dy) in &OFFSETS {
        for (label, &(cx, cy)) in CENTRES.iter().enumerate() {
            inputs.push(vec![cx + dx, cy + dy]);
            targets.push(label);
        }
    }
    Dataset::new(inputs, targets).unwrap()
}

fn linear_spec() -> NetworkSpec {
    NetworkSpec {
        name: "linear".into(),
        layers: vec![LayerSpec { size: 3, input_size: 2, activation: ActivationFunction::Identity }],
        dropout: 0.0,
    }
}

#[test]
fn separable_clusters_are_learned_and_best_checkpoint_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let mut network = Network::from_spec(&linear_spec(), 5).unwrap();
    let mut loaders = Loaders {
        train: DataLoader::new(clusters(), 3).unwrap().shuffled(5),
        val: DataLoader::new(clusters(), 5).unwrap(),
    };
    let mut checkpoints = CheckpointManager::new(dir.path()).unwrap();

    let report = train_model(
        &mut network,
        &mut loaders,
        &CrossEntropyLoss,
        &mut Sgd::new(0.1),
        &mut ConstantLr,
        &mut checkpoints,
        &TrainConfig::new(30, dir.path()),
    )
    .unwrap();

    let first = &report.history[0];
    let last = report.history.last().unwrap();
    assert!(last.val_loss < first.val_loss, "{} !< {}", last.val_loss, first.val_loss);
    assert_eq!(report.best_acc, 100.0);

    // The returned model and the best checkpoint agree.
    let restored = validate(&mut network, &mut loaders.val, &CrossEntropyLoss).unwrap();
    assert_eq!(restored.accuracy, report.best_acc);

    let best = CheckpointManager::load(checkpoints.best_path()).unwrap();
    let mut fresh = Network::from_spec(&linear_spec(), 99).unwrap();
    fresh.load_state_dict(&best.state_dict).unwrap();
    let reloaded = validate(&mut fresh, &mut loaders.val, &CrossEntropyLoss).unwrap();
    assert_eq!(reloaded.accuracy, report.best_acc);
}
