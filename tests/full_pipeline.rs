use std::fs;

use serde_json::json;
use tempfile::tempdir;
use vocalcheck::{record_fields, Decision, MatchError, VocalConfig};

const ALPHABET: &str = " abcdefghijklmnopqrstuvwxyz0123456789:/-";

fn vocab_file_contents() -> String {
    let mut out = String::from("\n[UNK]\n");
    for ch in ALPHABET.chars() {
        out.push(ch);
        out.push('\n');
    }
    out
}

#[test]
fn config_file_vocabulary_and_record_end_to_end() -> Result<(), MatchError> {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("char_vocab.txt"), vocab_file_contents()).unwrap();
    fs::write(
        dir.path().join("vocalcheck.yaml"),
        r#"
version: "1.0"
name: "integration"
oracle:
  backend: "hashed"
  dimension: 1024
vocabulary:
  path: "char_vocab.txt"
"#,
    )
    .unwrap();

    let config = VocalConfig::from_file(dir.path().join("vocalcheck.yaml")).unwrap();
    let engine = config.build_engine()?;
    assert!(!engine.is_degraded());
    assert_eq!(engine.vocabulary().len(), ALPHABET.chars().count() + 2);

    let record = json!({
        "patient": { "nom": "Dupont", "prenom": "Paul" },
        "intervention": { "salle": ["Salle trois", "Salle quatre"] }
    });
    let fields = record_fields(&record);
    let salle = fields
        .iter()
        .find(|f| f.label == "intervention.salle")
        .expect("salle field");

    let results = engine.match_utterance_to_candidates("salle trois", &salle.candidates, false);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].candidate.text, "Salle trois");
    assert_eq!(results[0].decision, Decision::Ok);
    assert_eq!(results[1].candidate.text, "Salle quatre");
    assert_eq!(results[1].decision, Decision::Ko);

    Ok(())
}

#[test]
fn name_confirmation_inside_a_sentence() -> Result<(), MatchError> {
    let engine = VocalConfig::default().build_engine()?;
    let record = json!({ "patient": { "nom_complet": ["Paul Dupont", "Marie Durand"] } });
    let fields = record_fields(&record);

    let best = engine
        .best_match("Le patient est Paul Dupont.", &fields[0].candidates, true)
        .expect("one result");
    assert_eq!(best.candidate.text, "Paul Dupont");
    assert_eq!(best.decision, Decision::Ok);
    assert_eq!(best.best_span.text.as_str(), "paul dupont");
    Ok(())
}

#[test]
fn ngram_only_configuration_runs_degraded() -> Result<(), MatchError> {
    let config = VocalConfig::from_yaml("oracle:\n  backend: \"none\"\n").unwrap();
    let engine = config.build_engine()?;
    assert!(engine.is_degraded());

    let record = json!({ "intervention": { "salle": ["Salle trois", "Salle quatre"] } });
    let fields = record_fields(&record);
    let results = engine.match_utterance_to_candidates(
        "oui c'est bien la salle trois",
        &fields[0].candidates,
        false,
    );
    assert_eq!(results[0].decision, Decision::Ok);
    for r in &results {
        assert!(r.embed_score.is_none());
        assert_eq!(r.fused_score, r.ngram_score);
    }
    Ok(())
}

#[test]
fn results_serialize_for_audit() -> Result<(), MatchError> {
    let engine = VocalConfig::default().build_engine()?;
    let record = json!({ "intervention": { "heure": "10:30" } });
    let fields = record_fields(&record);
    let results = engine.match_utterance_to_candidates("a 10:30", &fields[0].candidates, false);

    let value = serde_json::to_value(&results).unwrap();
    assert_eq!(value[0]["candidate"]["label"], "intervention.heure");
    assert_eq!(value[0]["best_span"]["text"], "10:30");
    assert_eq!(value[0]["decision"], "OK");
    Ok(())
}
