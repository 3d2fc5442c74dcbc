pub mod config;
pub mod draft;

use anyhow::Context;
use clap::{Parser, Subcommand};

/// Scriptwright: an AI-assisted script-writing backend.
#[derive(Debug, Parser)]
#[command(name = "scriptwright", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Run the whole wizard once, without HTTP, and print the final script.
    Draft {
        /// Script format: tiktok, youtube, marketing or shortfilm.
        #[arg(long = "type")]
        script_type: String,
        /// The idea to develop (at least 50 characters).
        #[arg(long)]
        idea: String,
        /// Answer to a refinement question, as `question_id=answer`.
        /// Repeatable.
        #[arg(long = "answer", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
        /// Print the final agent state as JSON instead of the script text.
        #[arg(long)]
        json: bool,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected `id=answer`, got `{raw}`")),
    }
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `SW_CONFIG` (or `config.toml`).
/// A missing file yields the defaults. Returns the config and the path used.
pub fn load_config() -> anyhow::Result<(sw_domain::config::Config, String)> {
    let config_path = std::env::var("SW_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_from(path: &str) -> anyhow::Result<sw_domain::config::Config> {
    if !std::path::Path::new(path).exists() {
        return Ok(sw_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    toml::from_str(&raw).with_context(|| format!("parsing {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_split_on_first_equals() {
        assert_eq!(
            parse_answer("cta=curta=e direta").unwrap(),
            ("cta".to_string(), "curta=e direta".to_string())
        );
        assert!(parse_answer("sem-igual").is_err());
        assert!(parse_answer("=valor").is_err());
    }

    #[test]
    fn draft_flags_parse() {
        let cli = Cli::try_parse_from([
            "scriptwright",
            "draft",
            "--type",
            "tiktok",
            "--idea",
            "uma ideia",
            "--answer",
            "cta=like",
            "--answer",
            "tom=leve",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Draft { script_type, answers, json, .. }) => {
                assert_eq!(script_type, "tiktok");
                assert_eq!(answers.len(), 2);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_config_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let cfg = load_config_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();
        let cfg = load_config_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8080);

        std::fs::write(&path, "[server\n").unwrap();
        let err = load_config_from(path.to_str().unwrap()).unwrap_err();
        assert!(format!("{err:#}").starts_with("parsing "), "{err:#}");
    }
}
