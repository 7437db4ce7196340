use lumina_domain::config::Config;

#[test]
fn default_relay_binds_localhost() {
    let config = Config::default();
    assert_eq!(config.relay.host, "127.0.0.1");
    assert_eq!(config.relay.port, 8787);
}

#[test]
fn default_retry_budget_is_three() {
    let config = Config::default();
    assert_eq!(config.pipeline.max_retries, 3);
}

#[test]
fn default_document_truncation_is_20k() {
    let config = Config::default();
    assert_eq!(config.pipeline.max_document_chars, 20_000);
}

#[test]
fn default_key_env_var() {
    let config = Config::default();
    assert_eq!(config.relay.auth.env, "GEMINI_API_KEY");
    assert!(config.relay.auth.key.is_none());
}

#[test]
fn partial_toml_fills_defaults() {
    let toml_str = r#"
[pipeline]
relay_url = "http://localhost:9999/api/generate"

[relay]
port = 9001
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.pipeline.relay_url, "http://localhost:9999/api/generate");
    assert_eq!(config.pipeline.generation_model, "gemini-2.5-flash-preview-09-2025");
    assert_eq!(config.relay.port, 9001);
    assert_eq!(config.relay.upstream_base_url, "https://generativelanguage.googleapis.com");
}

#[test]
fn plaintext_key_resolves_with_precedence_over_env() {
    let toml_str = r#"
[relay.auth]
key = "test-key-123"
env = "LUMINA_TEST_UNSET_VAR"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.relay.auth.resolve().unwrap(), "test-key-123");
}

#[test]
fn missing_key_and_env_fails_auth() {
    let toml_str = r#"
[relay.auth]
env = "LUMINA_TEST_DEFINITELY_UNSET_4242"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let err = config.relay.auth.resolve().unwrap_err();
    assert!(err.to_string().contains("LUMINA_TEST_DEFINITELY_UNSET_4242"));
}
