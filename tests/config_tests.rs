use std::fs;
use std::io::Write;

use nazir::{CharPair, ConfigIssue, Error, FuzzySearch, NazirConfig};
use tempfile::{tempdir, NamedTempFile};

const FOX: &str = "the quick brown fox jumps over the lazy dog";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_full_configuration() {
    let dir = tempdir().unwrap();
    let text_path = dir.path().join("reference.txt");
    let queries_path = dir.path().join("queries.txt");
    let table_path = dir.path().join("similarities.json");
    fs::write(&text_path, FOX).unwrap();
    fs::write(&queries_path, "quick brwn fox\nbrawn\n").unwrap();
    fs::write(&table_path, r#"{"ao": 2}"#).unwrap();

    let ini = format!(
        "[file]\ntext_file = {}\nqueries_file = {}\n\n\
         [matcher]\nmax_candidates = 3\ncandidate_threshold = 0.8\nsimilarities_file = \"{}\"\n\n\
         [matcher.scoring]\nmatch_score = 3\nmismatch_score = 0\n\n\
         [processor]\nthread_count = 2\nlog_level = warn\n",
        text_path.display(),
        queries_path.display(),
        table_path.display(),
    );
    let ini_path = dir.path().join("nazir.ini");
    fs::write(&ini_path, ini).unwrap();

    let config = NazirConfig::from_ini(&ini_path).unwrap();
    assert_eq!(config.matcher.max_candidates, 3);
    assert_eq!(config.processor.thread_count, 2);
    assert_eq!(config.files.text_file.as_deref(), Some(text_path.as_path()));

    let engine = FuzzySearch::from_config(FOX, &config.matcher).unwrap();
    let result = engine.find_best_in_text("brawn").unwrap();
    assert_eq!(result.range.unwrap().text(), "brown");
    assert_eq!(result.score, 11);
    assert_eq!(result.substitutions.get(&CharPair::new('a', 'o')), Some(&1));
}

#[test]
fn missing_similarities_file_fails_validation() {
    let ini = write_temp("[matcher]\nsimilarities_file = /definitely/not/here.json\n");
    let err = NazirConfig::from_ini(ini.path()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn missing_input_file_fails_validation() {
    let ini = write_temp("[file]\ntext_file = /definitely/not/here.txt\n");
    assert!(matches!(NazirConfig::from_ini(ini.path()), Err(Error::Config(_))));
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = NazirConfig::from_ini(dir.path().join("absent.ini")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn malformed_similarity_table_is_rejected() {
    let table = write_temp(r#"{"abc": 1}"#);
    let ini = write_temp(&format!("[matcher]\nsimilarities_file = {}\n", table.path().display()));

    let config = NazirConfig::from_ini(ini.path()).unwrap();
    let err = FuzzySearch::from_config(FOX, &config.matcher).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn scoring_section_reaches_the_aligner() {
    let ini = write_temp("[matcher.scoring]\nmatch_score = 5\ndelete_score = -6\ninsert_score = -6\n");
    let config = NazirConfig::from_ini(ini.path()).unwrap();

    let engine = FuzzySearch::from_config(FOX, &config.matcher).unwrap();
    let result = engine.find_best_in_text(FOX).unwrap();
    assert_eq!(result.score, 5 * FOX.len() as i64);
}

#[test]
fn mistyped_keys_are_reported_not_applied() {
    let ini = write_temp("[matcher]\nmax_candidates = many\ncandidate_thresold = 0.5\n");
    let content = fs::read_to_string(ini.path()).unwrap();

    let (config, issues) = NazirConfig::parse_ini_str(&content);
    assert_eq!(config.matcher.max_candidates, 10);
    assert!((config.matcher.candidate_threshold - 0.92).abs() < f64::EPSILON);

    let keys: Vec<_> = issues.iter().filter_map(ConfigIssue::key).collect();
    assert_eq!(keys, vec!["max_candidates", "candidate_thresold"]);
    assert!(matches!(issues[0], ConfigIssue::InvalidValue { .. }));
    assert!(matches!(issues[1], ConfigIssue::UnknownKey { .. }));

    // Still loads; skipped lines fall back to defaults
    assert!(NazirConfig::from_ini(ini.path()).is_ok());
}
