mod common;

use common::{label_loader, RecordingOptimizer, ScriptedModel};
use ferrite_harness::train::{run_pass, train_epoch, validate};
use ferrite_harness::{CrossEntropyLoss, DataLoader, Dataset, HarnessError, Mode};

#[test]
fn train_pass_stops_before_overrunning_the_dataset() {
    let mut model = ScriptedModel::new(vec![]);
    let mut data = label_loader(10, 4);
    let mut opt = RecordingOptimizer { lr: 0.1, ..Default::default() };

    let out = train_epoch(&mut model, &mut data, &CrossEntropyLoss, &mut opt).unwrap();

    // 4 + 4 = 8 examples, then 8 + 4 > 10 ends the pass.
    assert_eq!(out.example_count, 8);
    assert_eq!(opt.steps, 2);
    assert_eq!(opt.zero_grads, 2);
    assert_eq!(model.backward_calls, 2);
    assert_eq!(out.correct, 8);
    assert_eq!(out.accuracy, 80.0);
    assert!(out.loss.is_finite() && out.loss > 0.0);
}

#[test]
fn train_pass_clips_gradients_before_the_step() {
    let mut model = ScriptedModel::new(vec![]);
    let mut data = label_loader(6, 3);
    let mut opt = RecordingOptimizer::default();

    train_epoch(&mut model, &mut data, &CrossEntropyLoss, &mut opt).unwrap();

    assert!(!opt.seen_grads.is_empty());
    for g in &opt.seen_grads {
        assert_eq!(g.abs(), 0.25, "gradient {g} was not clipped");
    }
}

#[test]
fn eval_pass_covers_the_whole_dataset_without_updates() {
    let mut model = ScriptedModel::new(vec![6]);
    let mut data = label_loader(10, 4);

    let out = validate(&mut model, &mut data, &CrossEntropyLoss).unwrap();

    assert_eq!(out.example_count, 10);
    assert_eq!(out.correct, 6);
    assert_eq!(out.accuracy, 60.0);
    assert_eq!(model.backward_calls, 0);
    assert_eq!(model.mode, Mode::Eval);
}

#[test]
fn dataset_shorter_than_one_batch_is_trained_once() {
    let mut model = ScriptedModel::new(vec![]);
    let mut data = label_loader(3, 4);
    let mut opt = RecordingOptimizer::default();

    let out = train_epoch(&mut model, &mut data, &CrossEntropyLoss, &mut opt).unwrap();

    assert_eq!(out.example_count, 3);
    assert_eq!(opt.steps, 1);
    assert_eq!(out.accuracy, 100.0);
}

#[test]
fn mean_loss_divides_by_examples_not_batches() {
    let mut model = ScriptedModel::new(vec![10, 10]);
    let mut one_batch = label_loader(10, 10);
    let mut many_batches = label_loader(10, 2);

    let a = validate(&mut model, &mut one_batch, &CrossEntropyLoss).unwrap();
    let b = validate(&mut model, &mut many_batches, &CrossEntropyLoss).unwrap();

    // Every example has the same per-example loss ℓ. One batch sums to ℓ,
    // five batches sum to 5ℓ; both are divided by 10.
    assert!((b.loss - 5.0 * a.loss).abs() < 1e-12);
}

#[test]
fn training_without_optimizer_is_rejected() {
    let mut model = ScriptedModel::new(vec![]);
    let mut data = label_loader(4, 2);

    let err = run_pass(&mut model, &mut data, &CrossEntropyLoss, None, Mode::Train).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
    assert_eq!(model.backward_calls, 0);
}

#[test]
fn empty_eval_pass_reports_no_examples() {
    let mut model = ScriptedModel::new(vec![]);
    let dataset: Dataset<usize> = Dataset::new(vec![], vec![]).unwrap();
    let mut data = DataLoader::new(dataset, 4).unwrap();

    let err = validate(&mut model, &mut data, &CrossEntropyLoss).unwrap_err();
    assert!(matches!(err, HarnessError::EmptyPass));
}
