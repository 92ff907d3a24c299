//! Layered configuration loading.

use reelsmith::{ReelsmithConfig, ReelsmithErrorKind, ProviderErrorKind, build_context};
use std::io::Write;

#[test]
fn test_file_overrides_bundled_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
checkpoint_dir = "/var/lib/reelsmith"

[pipeline]
max_script_words = 60

[models.pexels]
max_video_edge = 1280
"#
    )
    .unwrap();

    let config = ReelsmithConfig::from_file(file.path()).unwrap();

    assert_eq!(config.checkpoint_dir().to_str(), Some("/var/lib/reelsmith"));
    assert_eq!(*config.pipeline().max_script_words(), 60);
    assert_eq!(*config.models().pexels().max_video_edge(), 1280);
    // untouched values come from the bundled file
    assert_eq!(*config.pipeline().vertical_caption_chars(), 15);
    assert_eq!(config.pipeline().topic_rules().len(), 1);
    assert_eq!(config.models().pexels().api_key_env(), "PEXELS_API_KEY");
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReelsmithConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err.kind(), ReelsmithErrorKind::Config(_)));
}

#[test]
fn test_context_requires_api_keys() {
    let config = ReelsmithConfig::from_toml(
        r#"
[models.completion]
api_key_env = "REELSMITH_TEST_KEY_THAT_IS_NEVER_SET"
"#,
    )
    .unwrap();

    let err = build_context(&config).err().unwrap();
    match err.kind() {
        ReelsmithErrorKind::Provider(provider) => {
            assert!(matches!(provider.kind, ProviderErrorKind::Auth(_)));
        }
        other => panic!("expected auth failure, got {}", other),
    }
}
