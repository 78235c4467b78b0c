// Expansion database construction over a real store

use ferret::core::expand::ExpansionBuilder;
use ferret::core::store::{IndexStore, MemStore, OpenMode, FAM_DIACASE, FAM_STEM, FAM_STEM_UNAC};
use ferret::core::types::{DocInfo, Term};
use rust_stemmers::{Algorithm, Stemmer};
use std::path::Path;

fn store_with_vocab(words: &[&str]) -> MemStore {
    let mut store = MemStore::ephemeral();
    store.open(OpenMode::Update).unwrap();
    let terms: Vec<Term> = words
        .iter()
        .enumerate()
        .map(|(i, w)| Term::new(*w, i, 0, w.len()))
        .collect();
    store
        .add_or_update(DocInfo::for_file(Path::new("/corpus/doc"), "1:1"), terms)
        .unwrap();
    store
}

#[test]
fn test_every_retained_term_reaches_its_stem() {
    let words = [
        "connection",
        "connections",
        "connected",
        "running",
        "walked",
        "quietly",
    ];
    let mut store = store_with_vocab(&words);
    ExpansionBuilder::new(&["english".to_string()], true)
        .build(&mut store)
        .unwrap();

    let stemmer = Stemmer::create(Algorithm::English);
    for word in words {
        let stem = stemmer.stem(word).into_owned();
        assert!(
            store
                .synonyms(FAM_STEM, "english", &stem)
                .contains(&word.to_string()),
            "no edge from {stem} back to {word}"
        );
    }
    // related surface forms collapse onto one stem entry
    let connect = stemmer.stem("connection").into_owned();
    assert!(store.synonyms(FAM_STEM, "english", &connect).len() >= 3);
}

#[test]
fn test_raw_index_folding_families() {
    let mut store = store_with_vocab(&["Résumé", "resume", "Plain"]);
    ExpansionBuilder::new(&["english".to_string()], true)
        .build(&mut store)
        .unwrap();

    // case/diacritics folding maps the folded form to the raw term
    assert_eq!(
        store.synonyms(FAM_DIACASE, "all", "résumé"),
        ["Résumé"]
    );
    assert_eq!(store.synonyms(FAM_DIACASE, "all", "plain"), ["Plain"]);

    // the unaccented variant got its own stem registration
    let stemmer = Stemmer::create(Algorithm::English);
    let unac_stem = stemmer.stem("resume").into_owned();
    assert!(store
        .synonyms(FAM_STEM_UNAC, "english", &unac_stem)
        .contains(&"resume".to_string()));
}

#[test]
fn test_rebuild_with_same_inputs_is_idempotent() {
    let mut store = store_with_vocab(&["running", "Cafés", "walked", "中文"]);
    let builder = ExpansionBuilder::new(&["english".to_string()], true);

    builder.build(&mut store).unwrap();
    let snapshot_before: Vec<(String, Vec<String>)> = store
        .family_members(FAM_STEM)
        .into_iter()
        .map(|m| {
            let keys = store.terms_from(None, 1000);
            (m, keys)
        })
        .collect();

    builder.build(&mut store).unwrap();
    let snapshot_after: Vec<(String, Vec<String>)> = store
        .family_members(FAM_STEM)
        .into_iter()
        .map(|m| {
            let keys = store.terms_from(None, 1000);
            (m, keys)
        })
        .collect();

    assert_eq!(snapshot_before, snapshot_after);
    let stemmer = Stemmer::create(Algorithm::English);
    let stem = stemmer.stem("running").into_owned();
    assert_eq!(store.synonyms(FAM_STEM, "english", &stem), ["running"]);
}

#[test]
fn test_language_list_changes_drop_old_families() {
    let mut store = store_with_vocab(&["words"]);
    ExpansionBuilder::new(&["english".to_string(), "german".to_string()], true)
        .build(&mut store)
        .unwrap();
    assert_eq!(store.family_members(FAM_STEM), ["english", "german"]);

    ExpansionBuilder::new(&["german".to_string()], true)
        .build(&mut store)
        .unwrap();
    assert_eq!(store.family_members(FAM_STEM), ["german"]);
}

#[test]
fn test_vocabulary_streaming_covers_everything() {
    // more terms than one streaming page
    let words: Vec<String> = (0..600).map(|i| format!("w{i:04}x")).collect();
    let refs: Vec<&str> = words.iter().map(String::as_str).collect();
    let mut store = store_with_vocab(&refs);

    let stats = ExpansionBuilder::new(&["english".to_string()], true)
        .build(&mut store)
        .unwrap();
    assert_eq!(stats.terms_seen, 600);
}
