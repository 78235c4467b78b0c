// Compound-token behavior over realistic text

use ferret::core::split::{collect_terms, SplitMode};

fn words(text: &str) -> Vec<String> {
    collect_terms(text, SplitMode::Index)
        .into_iter()
        .map(|t| t.text)
        .collect()
}

#[test]
fn test_mixed_document_text() {
    let text = "Un bout de texte \nnormal. jfd@okyz.com \n\
                Ceci. Est;Oui n@d @net .net t@v@c c# c++ -10 o'brien l'ami \n\
                a 134 +134 -14 -1.5 +1.5 1.54e10";
    let w = words(text);

    // full spans survive
    assert!(w.contains(&"jfd@okyz.com".to_string()));
    assert!(w.contains(&"c#".to_string()));
    assert!(w.contains(&"c++".to_string()));
    assert!(w.contains(&"o'brien".to_string()));
    assert!(w.contains(&".net".to_string()));
    assert!(w.contains(&"-10".to_string()));
    assert!(w.contains(&"+1.5".to_string()));
    assert!(w.contains(&"1.54e10".to_string()));

    // separators do their job
    assert!(w.contains(&"Ceci".to_string()));
    assert!(w.contains(&"Est".to_string()));
    assert!(w.contains(&"Oui".to_string()));
    assert!(w.contains(&"texte".to_string()));
    assert!(w.contains(&"normal".to_string()));
}

#[test]
fn test_line_break_vs_hyphen_break() {
    // plain line break separates
    assert_eq!(words("one\n\rtwo"), ["one", "two"]);
    // hyphen before the break re-joins the wrapped word
    let w = words("three-\nfour");
    assert_eq!(w[0], "threefour");
}

#[test]
fn test_stray_punctuation_yields_nothing() {
    assert!(words(" # ").is_empty());
    assert!(words(" @ ").is_empty());
    assert!(words(" ' ").is_empty());
    assert!(words("@^#$(#$(*)").is_empty());
}

#[test]
fn test_dashed_options_and_paths() {
    let w = words(" -wl,--export-dynamic ");
    // the comma splits, the dashed spans survive
    assert!(w.contains(&"-wl".to_string()));
    assert!(w.contains(&"--export-dynamic".to_string()));

    let w = words(" ~/.xsession-errors ");
    assert!(w.contains(&".xsession-errors".to_string()));
}

#[test]
fn test_query_mode_does_not_atomize() {
    let index_terms = collect_terms("jfd@okyz.com", SplitMode::Index);
    let query_terms = collect_terms("jfd@okyz.com", SplitMode::Query);
    assert!(index_terms.len() > query_terms.len());
    assert_eq!(query_terms.len(), 1);
    assert_eq!(query_terms[0].text, "jfd@okyz.com");
}

#[test]
fn test_retokenization_is_stable() {
    let text = "Correctness under partial failure matters more than scale,\n\
                and throughput over large personal corpora.";
    let first = words(text);
    let second = words(&first.join(" "));
    assert_eq!(first, second);
}
