//! End-to-end scenario tests (§8) plus P1/P2/P5/P6 property tests, driven
//! entirely through [`entity_engine::Engine`] against a small fixture
//! corpus under a temp directory.

use std::io::Write;

use entity_engine::{DocumentRequest, Engine, EngineConfig};

fn write_corpus_file(dir: &std::path::Path, name: &str, contents: &str) {
    let mut f = std::fs::File::create(dir.join(name)).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

fn fixture_engine() -> (tempfile::TempDir, Engine) {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus_file(tmp.path(), "first_names.txt", "John\n");
    write_corpus_file(tmp.path(), "last_names.txt", "Smith\n");
    write_corpus_file(tmp.path(), "org.txt", "Acme Inc\nAcme Inc.\n");
    write_corpus_file(tmp.path(), "blacklist.person.txt", "market\nhere\nreal\nestate\n");
    write_corpus_file(tmp.path(), "blacklist.org.txt", "market\n");

    let mut config = EngineConfig::default();
    config.corpus_dir = tmp.path().to_path_buf();
    config.worker_count = 2;
    let engine = Engine::new(config).unwrap();
    (tmp, engine)
}

fn request(text: &str) -> DocumentRequest {
    DocumentRequest {
        document_id: "doc1".to_string(),
        text: text.to_string(),
        pattern_set: "default".to_string(),
        deadline_ms: None,
    }
}

#[test]
fn scenario_1_tight_measurement_range_does_not_over_split() {
    let (_tmp, engine) = fixture_engine();
    let artifact = engine.process_document(request("Handrail height 30-37 inches (76-94 cm)."));

    let measurements: Vec<_> = artifact.entities.iter().filter(|e| e.entity_type == entity_engine::types::EntityType::Measurement).collect();
    assert_eq!(measurements.len(), 2, "expected two fused range entities, got {measurements:?}");
    assert!(measurements.iter().any(|e| e.canonical_surface == "30-37 inches"));
    assert!(measurements.iter().any(|e| e.canonical_surface == "76-94 cm"));
    assert!(!artifact.entities.iter().any(|e| e.canonical_surface == "37 inches"));
}

#[test]
fn scenario_2_percentage_range_does_not_leave_standalone_operands() {
    let (_tmp, engine) = fixture_engine();
    let artifact = engine.process_document(request("Growth projection: 10-15% annually."));

    let percents: Vec<_> = artifact.entities.iter().filter(|e| e.entity_type == entity_engine::types::EntityType::Percent).collect();
    assert_eq!(percents.len(), 1);
    assert_eq!(percents[0].canonical_surface, "10-15%");
    assert!(!artifact.entities.iter().any(|e| e.entity_type == entity_engine::types::EntityType::Measurement));
}

#[test]
fn scenario_3_phone_number_is_not_mistaken_for_measurement_range() {
    let (_tmp, engine) = fixture_engine();
    let artifact = engine.process_document(request("Call (555) 321-6742 for info."));

    let phones: Vec<_> = artifact.entities.iter().filter(|e| e.entity_type == entity_engine::types::EntityType::Phone).collect();
    assert_eq!(phones.len(), 1);
    assert!(!artifact.entities.iter().any(|e| e.entity_type == entity_engine::types::EntityType::Measurement));
}

#[test]
fn scenario_4_person_org_money_date_and_affiliation_fact() {
    let (_tmp, engine) = fixture_engine();
    let artifact = engine.process_document(request(
        "Dr. John Smith, CEO of Acme Inc., announced a $50 million round on March 15, 2024.",
    ));

    use entity_engine::types::EntityType;
    let has = |t: EntityType| artifact.entities.iter().any(|e| e.entity_type == t);
    assert!(has(EntityType::Person), "missing PERSON: {:?}", artifact.entities);
    assert!(has(EntityType::Org), "missing ORG: {:?}", artifact.entities);
    assert!(has(EntityType::Money), "missing MONEY: {:?}", artifact.entities);
    assert!(has(EntityType::Date), "missing DATE: {:?}", artifact.entities);

    assert!(artifact
        .facts
        .iter()
        .any(|f| f.predicate == entity_engine::types::Predicate::AffiliatedWith));
}

#[test]
fn scenario_5_explicit_both_sides_temperature_range_keeps_negative_sign() {
    let (_tmp, engine) = fixture_engine();
    let artifact = engine.process_document(request("Temperature: -20\u{b0}F to 120\u{b0}F."));

    let measurements: Vec<_> = artifact
        .entities
        .iter()
        .filter(|e| e.entity_type == entity_engine::types::EntityType::Measurement)
        .collect();
    assert_eq!(measurements.len(), 1);
    assert!(measurements[0].canonical_surface.starts_with('-'));
    assert_eq!(measurements[0].subtype.as_deref(), Some("temperature"));
}

#[test]
fn scenario_6_noisy_short_words_yield_zero_entities() {
    let (_tmp, engine) = fixture_engine();
    let artifact = engine.process_document(request("market the market real estate"));
    assert!(artifact.entities.is_empty(), "expected no entities, got {:?}", artifact.entities);
}

#[test]
fn scenario_6b_blacklisted_org_automaton_hit_is_filtered() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus_file(tmp.path(), "first_names.txt", "John\n");
    write_corpus_file(tmp.path(), "last_names.txt", "Smith\n");
    write_corpus_file(tmp.path(), "org.txt", "Acme Inc\nMarket\n");
    write_corpus_file(tmp.path(), "blacklist.org.txt", "market\n");

    let mut config = EngineConfig::default();
    config.corpus_dir = tmp.path().to_path_buf();
    config.worker_count = 2;
    let engine = Engine::new(config).unwrap();

    let artifact = engine.process_document(request("The Market rallied, unlike Acme Inc."));
    let orgs: Vec<_> = artifact
        .entities
        .iter()
        .filter(|e| e.entity_type == entity_engine::types::EntityType::Org)
        .collect();
    assert_eq!(orgs.len(), 1, "blacklisted ORG term should be filtered: {orgs:?}");
    assert_eq!(orgs[0].canonical_surface, "Acme Inc");
}

#[test]
fn property_p1_span_fidelity() {
    let (_tmp, engine) = fixture_engine();
    let text = "Dr. John Smith met with Acme Inc. about a $12 million deal on April 2, 2023.";
    let artifact = engine.process_document(request(text));
    for entity in &artifact.entities {
        for mention in &entity.mentions {
            assert_eq!(&text[mention.start..mention.end], mention.surface);
        }
    }
}

#[test]
fn property_p2_accepted_entities_do_not_overlap() {
    let (_tmp, engine) = fixture_engine();
    let text = "Handrail height 30-37 inches wide, built by Acme Inc. in 2021.";
    let artifact = engine.process_document(request(text));
    let mut spans: Vec<(usize, usize)> =
        artifact.entities.iter().flat_map(|e| e.mentions.iter().map(|m| (m.start, m.end))).collect();
    spans.sort();
    for pair in spans.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "overlapping mentions: {pair:?}");
    }
}

#[test]
fn property_p5_rewriter_round_trips() {
    let (_tmp, engine) = fixture_engine();
    let text = "Dr. John Smith, CEO of Acme Inc., announced a $50 million round on March 15, 2024.";
    let artifact = engine.process_document(request(text));
    assert_eq!(entity_engine::rewriter::strip_tags(&artifact.rewritten_text), text);
}

#[test]
fn property_p6_determinism_across_two_runs() {
    let (_tmp, engine) = fixture_engine();
    let text = "Dr. John Smith, CEO of Acme Inc., announced a $50 million round on March 15, 2024.";
    let first = engine.process_document(request(text));
    let second = engine.process_document(request(text));
    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
}

#[test]
fn property_p7_single_lowercase_token_person_is_rejected() {
    let (_tmp, engine) = fixture_engine();
    let artifact = engine.process_document(request("the market report mentions john briefly"));
    assert!(!artifact.entities.iter().any(|e| e.entity_type == entity_engine::types::EntityType::Person));
}
