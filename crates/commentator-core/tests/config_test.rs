//! Tests for the commentator configuration system.

use std::path::PathBuf;
use std::sync::Mutex;

use commentator_core::config::{CliOverrides, CommentatorConfig, FusionMode};
use commentator_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all COMMENTATOR_ env vars and point HOME at an empty directory so a
/// developer's user config cannot leak into the tests.
fn isolate_env(home: &std::path::Path) {
    for key in [
        "COMMENTATOR_SCAN_EXCLUDE",
        "COMMENTATOR_SCAN_MAX_FILE_SIZE",
        "COMMENTATOR_SCAN_THREADS",
        "COMMENTATOR_LEARNING_MAX_TEMPLATES",
        "COMMENTATOR_GENERATION_FUSION_MODE",
        "COMMENTATOR_REPORT_MIN_CONFIDENCE",
        "COMMENTATOR_DICTIONARY",
        "COMMENTATOR_PATTERNS",
    ] {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", home);
    std::env::remove_var("USERPROFILE");
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(
        dir.path().join("commentator.toml"),
        r#"
[scan]
threads = 2
max_file_size = 2_000_000

[report]
min_confidence = 0.3
"#,
    )
    .unwrap();

    std::env::set_var("COMMENTATOR_SCAN_THREADS", "6");

    let cli = CliOverrides {
        min_confidence: Some(0.5),
        ..Default::default()
    };
    let config = CommentatorConfig::load(dir.path(), Some(&cli)).unwrap();

    // CLI beats project
    assert_eq!(config.report.min_confidence, Some(0.5));
    // Env beats project
    assert_eq!(config.scan.threads, Some(6));
    // Project value survives where nothing overrides it
    assert_eq!(config.scan.max_file_size, Some(2_000_000));

    std::env::remove_var("COMMENTATOR_SCAN_THREADS");
}

#[test]
fn test_user_config_is_lowest_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let user_dir = home.path().join(".commentator");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        "[learning]\nmax_templates_per_key = 3\nmin_support = 2\n",
    )
    .unwrap();

    let project = tempdir();
    std::fs::write(
        project.path().join("commentator.toml"),
        "[learning]\nmax_templates_per_key = 5\n",
    )
    .unwrap();

    let config = CommentatorConfig::load(project.path(), None).unwrap();
    assert_eq!(config.learning.effective_max_templates_per_key(), 5);
    assert_eq!(config.learning.effective_min_support(), 2);
}

#[test]
fn test_missing_files_fall_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    let config = CommentatorConfig::load(dir.path(), None).unwrap();

    assert_eq!(
        config.scan.effective_exclude(),
        vec!["vendor".to_string(), "build".to_string(), "third_party".to_string()]
    );
    assert_eq!(config.scan.effective_max_file_size(), 10 * 1024 * 1024);
    assert_eq!(config.learning.effective_max_templates_per_key(), 8);
    assert_eq!(config.generation.effective_fusion_mode(), FusionMode::Fuse);
    assert!(!config.generation.effective_structural_fallback());
    assert_eq!(config.report.effective_format(), "markdown");
    assert!(config.paths.dictionary.is_none());
}

#[test]
fn test_env_list_and_enum_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::env::set_var("COMMENTATOR_SCAN_EXCLUDE", "out, generated ,");
    std::env::set_var("COMMENTATOR_GENERATION_FUSION_MODE", "dictionary-first");
    std::env::set_var("COMMENTATOR_DICTIONARY", "/tmp/terms.json");

    let dir = tempdir();
    let config = CommentatorConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.scan.effective_exclude(), vec!["out", "generated"]);
    assert_eq!(
        config.generation.effective_fusion_mode(),
        FusionMode::DictionaryFirst
    );
    assert_eq!(config.paths.dictionary, Some(PathBuf::from("/tmp/terms.json")));

    isolate_env(home.path());
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(dir.path().join("commentator.toml"), "[scan\nthreads = ").unwrap();
    let err = CommentatorConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_validation_rejects_out_of_range_weights() {
    let config = CommentatorConfig::from_toml("[generation]\ndictionary_bonus = 1.5\n").unwrap();
    let err = CommentatorConfig::validate(&config).unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "generation.dictionary_bonus")
        }
        other => panic!("unexpected error: {other}"),
    }

    let config = CommentatorConfig::from_toml("[learning]\nmax_templates_per_key = 0\n").unwrap();
    assert!(CommentatorConfig::validate(&config).is_err());

    let config = CommentatorConfig::from_toml("[report]\nformat = \"html\"\n").unwrap();
    assert!(matches!(
        CommentatorConfig::validate(&config),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_fusion_mode_parses_kebab_case() {
    let config =
        CommentatorConfig::from_toml("[generation]\nfusion_mode = \"pattern-first\"\n").unwrap();
    assert_eq!(config.generation.fusion_mode, Some(FusionMode::PatternFirst));
    assert_eq!("fuse".parse::<FusionMode>(), Ok(FusionMode::Fuse));
    assert!("strict".parse::<FusionMode>().is_err());
}

#[test]
fn test_to_toml_round_trip() {
    let config = CommentatorConfig::from_toml(
        r#"
[scan]
exclude = ["vendor", "extern"]
threads = 4

[generation]
pattern_weight = 0.7
fuzzy_identifier_match = true

[paths]
patterns = "model/comment_patterns.json"
"#,
    )
    .unwrap();

    let text = config.to_toml().unwrap();
    let reloaded = CommentatorConfig::from_toml(&text).unwrap();
    assert_eq!(reloaded.scan.exclude, vec!["vendor", "extern"]);
    assert_eq!(reloaded.scan.threads, Some(4));
    assert_eq!(reloaded.generation.pattern_weight, Some(0.7));
    assert_eq!(reloaded.generation.fuzzy_identifier_match, Some(true));
    assert_eq!(
        reloaded.paths.patterns,
        Some(PathBuf::from("model/comment_patterns.json"))
    );
}

#[test]
fn test_extensions_are_normalized() {
    let config = CommentatorConfig::from_toml("[scan]\nextensions = [\".CPP\", \"inl\"]\n").unwrap();
    assert_eq!(config.scan.effective_extensions(), vec!["cpp", "inl"]);
}
