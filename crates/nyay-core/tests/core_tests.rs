use std::fs;
use tempfile::TempDir;

use nyay_core::config::{Config, Settings};
use nyay_core::corpus::{load_chunks, load_records, normalize, validate_chunk};
use nyay_core::store::MetadataStore;
use nyay_core::types::{Metric, NO_MATCH};
use nyay_core::Error;

const CURRENT_SHAPE: &str = r#"[
  {
    "chunk_id": "bns_section_303_chunk_1",
    "parent_id": "bns_section_303",
    "act_name": "Bharatiya Nyaya Sanhita, 2023",
    "act_year": 2023,
    "category": "Criminal Law",
    "section_number": "303",
    "section_title": "Theft",
    "text": "Whoever commits theft shall be punished with imprisonment.",
    "source": "https://www.indiacode.nic.in/"
  }
]"#;

#[test]
fn current_record_shape_maps_every_field() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("sections_chunks.json");
    fs::write(&path, CURRENT_SHAPE).unwrap();

    let chunks = load_chunks(&path).expect("load");
    assert_eq!(chunks.len(), 1);
    let c = &chunks[0];
    assert_eq!(c.id, "bns_section_303_chunk_1");
    assert_eq!(c.act_name, "Bharatiya Nyaya Sanhita, 2023");
    assert_eq!(c.act_year, 2023);
    assert_eq!(c.category, "Criminal Law");
    assert_eq!(c.section_number, "303");
    assert_eq!(c.source, "https://www.indiacode.nic.in/");
}

#[test]
fn legacy_records_receive_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.json");
    fs::write(
        &path,
        r#"[{"id": "01_act_section_5", "section_text": "  Some provision text.  ", "section_number": 5}]"#,
    )
    .unwrap();

    let chunks = load_chunks(&path).expect("load legacy");
    let c = &chunks[0];
    assert_eq!(c.id, "01_act_section_5");
    assert_eq!(c.text, "Some provision text.");
    assert_eq!(c.section_number, "5", "numeric section numbers become strings");
    assert_eq!(c.act_name, "Unknown");
    assert_eq!(c.act_year, 0);
    assert_eq!(c.category, "General");
    assert_eq!(c.source, "India Code");
}

#[test]
fn blank_text_is_rejected() {
    let records = serde_json::from_str(r#"[{"chunk_id": "x", "text": "   "}]"#).unwrap();
    match normalize(records) {
        Err(Error::InvalidRecord { id, .. }) => assert_eq!(id, "x"),
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn duplicate_ids_are_rejected() {
    let records = serde_json::from_str(
        r#"[{"chunk_id": "a", "text": "one"}, {"chunk_id": "a", "text": "two"}]"#,
    )
    .unwrap();
    let err = normalize(records).unwrap_err();
    assert!(err.to_string().contains("duplicate id"), "{err}");
}

#[test]
fn directory_loading_reads_json_files_in_path_order() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("bns");
    fs::create_dir_all(&nested).unwrap();
    fs::write(tmp.path().join("b.json"), r#"[{"chunk_id": "b1", "text": "bravo"}]"#).unwrap();
    fs::write(nested.join("a.json"), r#"[{"chunk_id": "a1", "text": "alpha"}]"#).unwrap();
    fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

    let records = load_records(tmp.path()).expect("load dir");
    let chunks = normalize(records).unwrap();
    let ids: Vec<_> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "a1"], "b.json sorts before bns/a.json");
}

#[test]
fn missing_corpus_path_is_an_initialization_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_records(&tmp.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::Initialization(_)));
}

#[test]
fn metadata_store_ignores_sentinel_and_out_of_range_positions() {
    let chunks = normalize(serde_json::from_str(CURRENT_SHAPE).unwrap()).unwrap();
    let store = MetadataStore::new(chunks);
    assert!(store.get(0).is_some());
    assert!(store.get(NO_MATCH).is_none());
    assert!(store.get(1).is_none());
}

#[test]
fn config_defaults_without_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(tmp.path(), "dev").expect("defaults load");
    let settings = config.settings().unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.retrieval.top_k, 3);
    assert_eq!(settings.embedding.dimension, 384);
    assert_eq!(settings.llm.max_tokens, 500);
}

#[test]
fn env_specific_file_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[retrieval]\ntop_k = 5\n[llm]\nmodel = \"base-model\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.prod.toml"), "[llm]\nmodel = \"prod-model\"\n").unwrap();

    let settings = Config::load_from(tmp.path(), "prod").unwrap().settings().unwrap();
    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.llm.model, "prod-model");
    assert_eq!(settings.llm.temperature, 0.1, "untouched keys keep defaults");

    let dev = Config::load_from(tmp.path(), "dev").unwrap().settings().unwrap();
    assert_eq!(dev.llm.model, "base-model");
}

#[test]
fn invalid_top_k_is_rejected_at_load() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[retrieval]\ntop_k = 0\n").unwrap();
    assert!(matches!(Config::load_from(tmp.path(), "dev"), Err(Error::InvalidConfig(_))));
}

#[test]
fn metric_parsing_accepts_common_spellings() {
    assert_eq!(Metric::parse("inner_product"), Some(Metric::InnerProduct));
    assert_eq!(Metric::parse("IP"), Some(Metric::InnerProduct));
    assert_eq!(Metric::parse("l2"), Some(Metric::L2));
    assert_eq!(Metric::parse("hamming"), None);
    assert_eq!(Metric::InnerProduct.to_string(), "inner_product");
}

#[test]
fn chunk_validation_tracks_seen_ids() {
    let chunk = normalize(serde_json::from_str(CURRENT_SHAPE).unwrap()).unwrap().remove(0);
    let mut seen = std::collections::HashSet::new();
    assert!(validate_chunk(&chunk, &mut seen).is_ok());
    assert!(matches!(validate_chunk(&chunk, &mut seen), Err(Error::InvalidRecord { .. })));

    let blank = nyay_core::types::Chunk { id: "other".to_string(), text: " ".to_string(), ..chunk };
    assert!(matches!(validate_chunk(&blank, &mut seen), Err(Error::InvalidRecord { .. })));
}
