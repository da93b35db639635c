use nyay_core::config::EmbeddingSettings;
use nyay_embed::{get_default_embedder, HashEmbedder};
use nyay_core::traits::Embedder;

fn dot(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn fake_embedder_shapes_and_determinism() {
    let settings = EmbeddingSettings { use_fake: true, ..EmbeddingSettings::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384, "embedding dim follows settings");
    assert_eq!(embedder.embedder_id(), "fake:xxhash:d384");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_ignores_case_and_punctuation() {
    let e = HashEmbedder::new(64);
    let a = e.embed_text("What is the punishment for theft?");
    let b = e.embed_text("what is the PUNISHMENT for theft");
    assert!((dot(&a, &b) - 1.0).abs() < 1e-5);
}

#[test]
fn unrelated_texts_score_low() {
    let e = HashEmbedder::new(384);
    let a = e.embed_text("Whoever commits theft shall be punished with imprisonment");
    let b = e.embed_text("asdkjaslkdj nonsense query");
    assert!(dot(&a, &b) < 0.5, "score {}", dot(&a, &b));
}

#[test]
fn missing_model_dir_fails_fast() {
    let settings = EmbeddingSettings { model_dir: "/nonexistent/model".to_string(), ..EmbeddingSettings::default() };
    assert!(get_default_embedder(&settings).is_err());
}

#[test]
fn zero_dimension_is_rejected_without_panicking() {
    let settings = EmbeddingSettings { use_fake: true, dimension: 0, ..EmbeddingSettings::default() };
    assert!(get_default_embedder(&settings).is_err());
    assert!(HashEmbedder::new(0).embed_text("theft").is_empty());
}
