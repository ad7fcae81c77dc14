use classifier::{
    ClassifierError, Condition, Confidence, Feature, NeurologicalClassifier, SymptomObservation,
};
use neural_network::TrainingStatus;
use std::sync::atomic::{AtomicBool, Ordering};

const STROKE_SHAPED: [f64; 10] = [0.8, 1.0, 0.7, 1.0, 0.3, 0.0, 0.2, 0.8, 0.0, 0.0];

fn trained(seed: u64) -> NeurologicalClassifier {
    let mut classifier = NeurologicalClassifier::with_seed(seed).unwrap();
    classifier.train().unwrap();
    classifier
}

#[test]
fn stroke_shaped_vector_is_classified_as_stroke() {
    let classifier = trained(42);

    let result = classifier.classify_features(&STROKE_SHAPED).unwrap();

    assert_eq!(result.top_prediction.condition, Condition::Stroke);
    assert!(result.top_prediction.probability > 0.5);
    assert_eq!(result.all_predictions.len(), 5);
}

#[test]
fn training_uses_the_configured_budget_and_split() {
    let classifier = trained(7);
    let history = classifier.network().training_history();

    assert!(classifier.is_trained());
    assert!(!history.is_empty() && history.len() <= 2000);
    assert_eq!(classifier.network().learning_rate(), 0.1);
    // The validation suffix is the three "normal" rows, which are never trained on.
    assert!(history.iter().all(|r| r.validation_error > 0.0));
    assert!(history.last().unwrap().training_error < history[0].training_error);
}

#[test]
fn predictions_are_ranked_and_not_normalised() {
    let classifier = trained(3);
    let observation = SymptomObservation::default()
        .with_age(65.0)
        .with_symptom(Feature::MotorSymptoms)
        .with_symptom(Feature::Tremor)
        .with_symptom(Feature::Rigidity)
        .with_symptom(Feature::BalanceProblems);

    let result = classifier.classify(&observation).unwrap();

    let probabilities: Vec<f64> = result.all_predictions.iter().map(|p| p.probability).collect();
    assert!(probabilities.windows(2).all(|pair| pair[0] >= pair[1]));
    assert!(probabilities.iter().all(|&p| p > 0.0 && p < 1.0));
    assert_eq!(result.top_prediction, result.all_predictions[0]);

    let sum: f64 = probabilities.iter().sum();
    assert!((sum - 1.0).abs() > 1e-9, "independent sigmoids summed to {sum}");

    let mut conditions: Vec<Condition> = result.all_predictions.iter().map(|p| p.condition).collect();
    conditions.sort_by_key(|c| Condition::ALL.iter().position(|x| x == c));
    assert_eq!(conditions, Condition::ALL.to_vec());

    for prediction in &result.all_predictions {
        assert_eq!(
            prediction.confidence,
            Confidence::from_probability(prediction.probability)
        );
    }
}

#[test]
fn classify_requires_training() {
    let classifier = NeurologicalClassifier::with_seed(1).unwrap();

    let result = classifier.classify(&SymptomObservation::default());

    assert!(matches!(result, Err(ClassifierError::NotTrained)));
}

#[test]
fn explanation_matches_classification() {
    let classifier = trained(42);
    let observation: SymptomObservation = serde_json::from_str(
        r#"{ "age": 80, "motorSymptoms": true, "speech_problems": true, "balanceProblems": true }"#,
    )
    .unwrap();

    let result = classifier.classify(&observation).unwrap();
    let explanation = classifier.explain(&observation, &result);

    assert_eq!(explanation.condition, result.top_prediction.condition);
    assert_eq!(
        explanation.key_factors,
        vec![
            Feature::Age,
            Feature::MotorSymptoms,
            Feature::SpeechProblems,
            Feature::BalanceProblems
        ]
    );
    assert!(explanation.reasoning.starts_with("Based on 4 key factors: age, motor_symptoms"));
    assert!(explanation.reasoning.ends_with('%'));
}

#[test]
fn classification_serialises_to_the_output_contract() {
    let classifier = trained(42);
    let result = classifier.classify_features(&STROKE_SHAPED).unwrap();

    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["topPrediction"]["condition"], "stroke");
    assert!(json["topPrediction"]["probability"].is_f64());
    assert!(json["topPrediction"]["confidence"].is_string());
    assert_eq!(json["allPredictions"].as_array().unwrap().len(), 5);
    assert!(json["timestamp"].is_string());
}

#[test]
fn saved_model_restores_a_trained_classifier() {
    let original = trained(11);
    let json = original.save_model().to_json().unwrap();

    let mut restored = NeurologicalClassifier::with_seed(999).unwrap();
    restored
        .load_model(neural_network::ModelDocument::from_json(&json).unwrap())
        .unwrap();

    assert!(restored.is_trained());
    let a = original.classify_features(&STROKE_SHAPED).unwrap();
    let b = restored.classify_features(&STROKE_SHAPED).unwrap();
    assert_eq!(a.all_predictions, b.all_predictions);
}

#[test]
fn cancelled_training_leaves_classifier_untrained() {
    let mut classifier = NeurologicalClassifier::with_seed(5).unwrap();
    let cancel = AtomicBool::new(false);
    let mut reports = 0;

    let status = classifier
        .train_cancellable(100, &cancel, |_| {
            reports += 1;
            cancel.store(true, Ordering::Relaxed);
        })
        .unwrap();

    assert_eq!(status, TrainingStatus::Cancelled);
    assert_eq!(reports, 1);
    assert!(!classifier.is_trained());
    assert_eq!(classifier.network().training_history().len(), 100);
    assert!(matches!(
        classifier.classify_features(&STROKE_SHAPED),
        Err(ClassifierError::NotTrained)
    ));
}

#[test]
fn chunked_training_matches_blocking_training() {
    let blocking = trained(21);

    let mut chunked = NeurologicalClassifier::with_seed(21).unwrap();
    let cancel = AtomicBool::new(false);
    let status = chunked.train_cancellable(64, &cancel, |_| {}).unwrap();

    assert!(matches!(status, TrainingStatus::Converged | TrainingStatus::Exhausted));
    assert!(chunked.is_trained());
    assert_eq!(chunked.save_model().weights_input_hidden, blocking.save_model().weights_input_hidden);
}

#[test]
fn ensure_trained_only_trains_once() {
    let mut classifier = NeurologicalClassifier::with_seed(9).unwrap();

    classifier.ensure_trained().unwrap();
    let epochs = classifier.network().training_history().len();
    classifier.ensure_trained().unwrap();

    assert_eq!(classifier.network().training_history().len(), epochs);
}
