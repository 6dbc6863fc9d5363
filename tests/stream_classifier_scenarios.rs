use rulestream::classifier::{ClassifierConfig, StreamClassifier};
use rulestream::data::{Attribute, Instance, InstanceHeader};
use rulestream::rules::{Rule, RuleTerm};

fn two_attribute_header() -> InstanceHeader {
    InstanceHeader::new(
        vec![
            Attribute::categorical("A", ["x", "y"]),
            Attribute::categorical("B", ["p", "q"]),
        ],
        "class",
        ["0", "1"],
    )
    .unwrap()
}

fn inst(a: usize, b: usize, class: usize) -> Instance {
    Instance::new(vec![a as f64, b as f64], class)
}

fn trained_scenario(config: ClassifierConfig) -> StreamClassifier {
    let mut classifier = StreamClassifier::new(two_attribute_header(), config).unwrap();
    for instance in [inst(0, 0, 0), inst(0, 1, 0), inst(1, 0, 1), inst(1, 1, 1)] {
        classifier.train(&instance).unwrap();
    }
    classifier
}

#[test]
fn test_window_of_four_yields_two_rules() {
    let classifier = trained_scenario(ClassifierConfig::default().with_window_size(4));

    let rules: Vec<&Rule> = classifier.rules().collect();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].terms(), &[RuleTerm::categorical(0, 0)]);
    assert_eq!(rules[0].class_index(), 0);
    assert_eq!(rules[1].terms(), &[RuleTerm::categorical(0, 1)]);
    assert_eq!(rules[1].class_index(), 1);
    for rule in rules {
        assert_eq!(rule.stats().instances_covered_at_creation, 2);
    }

    let lines = classifier.describe_rules();
    assert!(lines[0].starts_with("[C]A = x THEN 0"));
    assert!(lines[1].starts_with("[C]A = y THEN 1"));
}

#[test]
fn test_fallback_prediction_before_any_rule() {
    let mut classifier =
        StreamClassifier::new(two_attribute_header(), ClassifierConfig::default()).unwrap();
    let stream = [
        inst(0, 0, 1).with_weight(0.25),
        inst(1, 0, 0).with_weight(1.5),
        inst(1, 1, 1).with_weight(2.0),
    ];
    for instance in &stream {
        classifier.train(instance).unwrap();
    }

    let prediction = classifier.predict(&inst(0, 1, 0)).unwrap();
    assert!(!prediction.covered);
    assert_eq!(prediction.votes, vec![1.5, 2.25]);
    assert_eq!(classifier.rule_base().len(), 0);
}

#[test]
fn test_single_class_stream_never_fails() {
    let mut classifier = StreamClassifier::new(
        two_attribute_header(),
        ClassifierConfig::default().with_window_size(5),
    )
    .unwrap();

    for i in 0..50 {
        let instance = inst(i % 2, (i / 2) % 2, 1);
        classifier.votes_for_instance(&instance).unwrap();
        let outcome = classifier.train(&instance).unwrap();
        if let Some(report) = outcome.induction {
            assert!(report.deferred);
        }
    }

    let metrics = classifier.metrics();
    assert_eq!(metrics.rule_count, 0);
    assert_eq!(metrics.induction_passes, 10);
    assert_eq!(metrics.deferred_batches, 10);
    // nothing is lost: every instance is waiting as leftover
    assert_eq!(metrics.leftover_len, 50);
    assert_eq!(metrics.tentative_accuracy, None);
    assert_eq!(metrics.abstaining_rate, Some(0.0));

    let prediction = classifier.predict(&inst(0, 0, 0)).unwrap();
    assert_eq!(prediction.predicted_class(), Some(1));
}

#[test]
fn test_pruning_boundary_through_training() {
    let mut classifier = trained_scenario(
        ClassifierConfig::default()
            .with_window_size(4)
            .with_min_rule_trials(10)
            .with_accuracy_threshold(0.8),
    );
    let miss = inst(0, 0, 1);

    // the rule starts at 1 covered / 1 correct, so 8 misses reach 9 trials
    for _ in 0..8 {
        let outcome = classifier.train(&miss).unwrap();
        assert_eq!(outcome.covered_by, 1);
        assert!(outcome.pruned.is_empty());
    }
    let rule = classifier.rules().next().unwrap();
    assert_eq!(rule.stats().times_covered, 9);

    let outcome = classifier.train(&miss).unwrap();
    assert_eq!(outcome.pruned.len(), 1);
    assert_eq!(classifier.rule_base().len(), 1);

    // the pruned region is uncovered again, so it is buffered
    let outcome = classifier.train(&miss).unwrap();
    assert_eq!(outcome.covered_by, 0);
    assert_eq!(classifier.window().len(), 1);
}

#[test]
fn test_accuracy_at_threshold_survives() {
    let mut classifier = trained_scenario(
        ClassifierConfig::default()
            .with_window_size(4)
            .with_min_rule_trials(10)
            .with_accuracy_threshold(0.8),
    );
    for _ in 0..7 {
        classifier.train(&inst(0, 0, 0)).unwrap();
    }
    // 8/9, then 8/10 == 0.8
    assert!(classifier.train(&inst(0, 1, 1)).unwrap().pruned.is_empty());
    assert!(classifier.train(&inst(0, 1, 1)).unwrap().pruned.is_empty());
    assert_eq!(classifier.rules().next().unwrap().accuracy(), 0.8);
    // 8/11
    assert_eq!(classifier.train(&inst(0, 1, 1)).unwrap().pruned.len(), 1);
}

#[test]
fn test_numeric_and_categorical_stream() {
    let header = InstanceHeader::new(
        vec![
            Attribute::categorical("colour", ["red", "green"]),
            Attribute::numeric("size"),
        ],
        "label",
        ["small", "large"],
    )
    .unwrap();
    let mut classifier =
        StreamClassifier::new(header, ClassifierConfig::default().with_window_size(20)).unwrap();

    for i in 0..200 {
        let size = (i % 10) as f64;
        let class = usize::from(size >= 5.0);
        let instance = Instance::new(vec![(i % 2) as f64, size], class);
        classifier.votes_for_instance(&instance).unwrap();
        classifier.train(&instance).unwrap();
    }

    let metrics = classifier.metrics();
    assert_eq!(metrics.instances_trained, 200);
    assert!(metrics.induction_passes >= 1);
    for rule in classifier.rules() {
        assert!(!rule.terms().is_empty());
        assert!(rule.terms().len() <= 2);
    }
}
