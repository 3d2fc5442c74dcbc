use sw_domain::config::{Config, ProviderKind, StoreBackend};

#[test]
fn empty_file_yields_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.generation.script_max_tokens, 2000);
    assert!(config.generation.provider.is_none());
    assert_eq!(config.llm.providers[0].kind, ProviderKind::OpenaiCompat);
}

#[test]
fn default_temperatures_match_stage_defaults() {
    let g = Config::default().generation;
    assert!((g.analysis_temperature - 0.7).abs() < f32::EPSILON);
    assert!((g.questions_temperature - 0.8).abs() < f32::EPSILON);
    assert!((g.structure_temperature - 0.7).abs() < f32::EPSILON);
    assert!((g.script_temperature - 0.8).abs() < f32::EPSILON);
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(config
        .server
        .cors
        .allowed_origins
        .contains(&"http://localhost:*".to_string()));
    assert!(config
        .server
        .cors
        .allowed_origins
        .contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn full_file_parses() {
    let toml_str = r#"
[server]
host = "0.0.0.0"
port = 8080

[server.cors]
allowed_origins = ["https://roteiria.example"]

[llm]
request_timeout_ms = 30000

[[llm.providers]]
id = "local"
kind = "openai_compat"
base_url = "http://localhost:11434/v1"
default_model = "llama3"

[generation]
provider = "local"
script_max_tokens = 1200

[sessions]
idle_ttl_secs = 600
max_sessions = 16

[store]
backend = "file"
path = "/tmp/sw.json"

[observability]
service_name = "sw-test"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.cors.allowed_origins.len(), 1);
    assert_eq!(config.llm.request_timeout_ms, 30_000);
    assert_eq!(config.llm.providers[0].id, "local");
    assert_eq!(config.generation.provider.as_deref(), Some("local"));
    assert_eq!(config.sessions.idle_ttl_secs, 600);
    assert_eq!(config.sessions.sweep_interval_secs, 60);
    assert_eq!(config.store.backend, StoreBackend::File);
    assert_eq!(config.observability.service_name, "sw-test");
    assert!(config.validate().is_empty());
}
