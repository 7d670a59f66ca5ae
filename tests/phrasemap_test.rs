//! End-to-end tests: phrasemap and config files through analysis to matches.

use std::sync::Arc;

use scaphra::automaton::Automaton;
use scaphra::config::MatcherConfig;
use scaphra::error::Result;
use scaphra::matcher::Matcher;
use scaphra::parallel::ParallelScanner;
use scaphra::phrasemap::PhraseMap;
use tempfile::TempDir;

const PHRASEMAP: &str = r#"{
    "single": ["drucken"],
    "double": ["druckt nicht", "wird getroffen"],
    "triple": ["will nicht starten"]
}"#;

fn labels(matcher: &Matcher, text: &str) -> Result<Vec<String>> {
    Ok(matcher
        .match_text(text)?
        .into_iter()
        .map(|m| m.label)
        .collect())
}

#[test]
fn test_german_phrasemap_with_window() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        format!(r#"{{"phrasemap": {PHRASEMAP}, "max_space": 2}}"#),
    )?;

    let config = MatcherConfig::load_from_file(&config_path)?;
    let matcher = Matcher::from_config(&config)?;

    assert_eq!(labels(&matcher, "Die Kugel wird getroffen")?, vec!["double"]);
    assert!(labels(&matcher, "Die Kugel wird nicht getroffen")?.is_empty());
    assert_eq!(labels(&matcher, "Er will nicht starten")?, vec!["triple"]);
    assert!(labels(&matcher, "Er will heute wirklich nicht starten")?.is_empty());
    Ok(())
}

#[test]
fn test_stems_bridge_inflections() -> Result<()> {
    let matcher = Matcher::from_phrasemap(&PhraseMap::from_json_str(PHRASEMAP)?)?;

    // "Drucken" and "druckt" share the stem "druck"
    let matches = matcher.match_text("Das Drucken klappt, nur druckt er nicht farbig")?;
    let found: Vec<(&str, Vec<usize>)> = matches
        .iter()
        .map(|m| (m.label.as_str(), m.positions.clone()))
        .collect();

    assert_eq!(
        found,
        vec![("single", vec![1]), ("single", vec![4]), ("double", vec![1, 6])]
    );
    Ok(())
}

#[test]
fn test_lemma_dictionary_extends_matches() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let lemmas = dir.path().join("lemmas.json");
    std::fs::write(&lemmas, r#"{"trifft": "treffen", "getroffen": "treffen"}"#)?;

    let phrasemap = PhraseMap::from_json_str(r#"{"hit": ["wird getroffen"]}"#)?;
    let plain = Matcher::from_config(&MatcherConfig::new(phrasemap.clone()))?;
    let lemmatized = Matcher::from_config(&MatcherConfig::new(phrasemap).with_lemmas(&lemmas))?;

    // the lemma "treffen" is shared by both surface forms
    assert!(plain.match_text("Er wird trifft").unwrap().is_empty());
    assert_eq!(lemmatized.match_text("Er wird trifft")?.len(), 1);
    Ok(())
}

#[test]
fn test_expanded_phrasemap_matches_variants() -> Result<()> {
    let mut phrasemap = PhraseMap::from_json_str(r#"{"problem": ["nicht starten"]}"#)?;
    let added = phrasemap.expand(|words| {
        let mut swapped: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        swapped.reverse();
        vec![swapped]
    });
    assert_eq!(added, 1);

    let matcher = Matcher::from_phrasemap(&phrasemap)?;
    assert_eq!(labels(&matcher, "Starten will er nicht")?, vec!["problem"]);
    Ok(())
}

#[test]
fn test_saved_automaton_matches_like_fresh_one() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("phrases.bin");

    let config = MatcherConfig::new(PhraseMap::from_json_str(PHRASEMAP)?);
    let fresh = Matcher::from_config(&config)?;
    fresh.automaton().save(&path)?;

    let loaded = Matcher::new(
        config.build_analyzer()?,
        Arc::new(Automaton::load(&path)?),
        config.scan_config(),
    )?;

    let text = "Der Motor will seit Tagen nicht starten und druckt nicht";
    assert_eq!(fresh.match_text(text)?, loaded.match_text(text)?);
    Ok(())
}

#[test]
fn test_parallel_results_equal_sequential() -> Result<()> {
    let matcher = Arc::new(Matcher::from_phrasemap(&PhraseMap::from_json_str(
        PHRASEMAP,
    )?)?);
    let documents: Vec<String> = (0..50)
        .map(|i| match i % 4 {
            0 => "Der Drucker druckt leider nicht".to_string(),
            1 => "Er wird am Kopf getroffen".to_string(),
            2 => "Der Wagen will im Winter nicht starten".to_string(),
            _ => String::new(),
        })
        .collect();

    let sequential = matcher.match_documents(&documents)?;
    let scanner = ParallelScanner::new(Arc::clone(&matcher), Some(4))?;
    let parallel = scanner.match_documents(&documents)?;

    assert_eq!(sequential, parallel);
    assert!(sequential[3].is_empty());
    assert_eq!(sequential[2][0].label, "triple");
    Ok(())
}

#[test]
fn test_span_groups_from_text() -> Result<()> {
    let matcher = Matcher::from_phrasemap(&PhraseMap::from_json_str(PHRASEMAP)?)?;
    let groups = matcher.span_groups("Er will nicht starten")?;

    let group = groups.get("match:triple:1.2.3").unwrap();
    assert_eq!(group.spans, vec![(1, 4)]);
    assert_eq!(groups.by_label("triple").count(), 1);
    Ok(())
}
