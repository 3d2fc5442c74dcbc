use sw_domain::config::{Config, ConfigSeverity};

/// Print every config issue. Returns `false` when any is an error.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }
    println!("\n{error_count} error(s), {warning_count} warning(s) in {config_path}");

    error_count == 0
}

/// The resolved config (defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<String> {
    toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("serializing config: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shown_config_parses_back() {
        let rendered = show(&Config::default()).unwrap();
        let back: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(back.server.port, 5000);
        assert_eq!(back.llm.providers[0].id, "openai");
    }

    #[test]
    fn errors_fail_validation() {
        let mut cfg = Config::default();
        cfg.generation.script_max_tokens = 0;
        assert!(!validate(&cfg, "test.toml"));
        assert!(validate(&Config::default(), "test.toml"));
    }
}
