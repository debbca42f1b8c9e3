//! SERAA CLI - evaluate choice-preservation scenarios from the command line

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use seraa_core::{CapabilityError, MoralState, SeraaConfig, SeraaEngine};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "seraa")]
#[command(about = "SERAA - ternary monitoring and choice-preservation checks")]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Evaluate a JSON scenario
    Evaluate {
        /// Scenario file path
        #[arg(short, long)]
        input: PathBuf,

        /// Configuration file path (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check configuration validity
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "seraa.toml")]
        config: PathBuf,
    },
}

/// One candidate action in a scenario file.
#[derive(Debug, Deserialize)]
struct ScenarioAction {
    name: String,
    pac_score: f64,
    #[serde(default = "default_viable")]
    viable: bool,
}

fn default_viable() -> bool {
    true
}

/// Scenario file: a moral state plus the actions on offer.
#[derive(Debug, Deserialize)]
struct Scenario {
    moral_state: MoralState,
    actions: Vec<ScenarioAction>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Evaluate { input, config }) => evaluate(&input, config.as_deref()),
        Some(Commands::Check { config }) => check(&config),
        None => {
            println!("SERAA v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SeraaConfig> {
    match path {
        Some(path) => SeraaConfig::load(path)
            .with_context(|| format!("Invalid configuration in {}", path.display())),
        None => {
            debug!("No config given, using defaults");
            Ok(SeraaConfig::default())
        }
    }
}

fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scenario {}", path.display()))
}

fn evaluate(input: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let engine = SeraaEngine::new(load_config(config)?)?;
    let scenario = load_scenario(input)?;
    info!(
        "Evaluating {} actions over {} moral dimensions",
        scenario.actions.len(),
        scenario.moral_state.len()
    );

    let assessment = engine.assess(
        &scenario.moral_state,
        &scenario.actions,
        |action: &ScenarioAction| {
            debug!("Scoring '{}'", action.name);
            Ok::<_, CapabilityError>(action.pac_score)
        },
        |action: &ScenarioAction| Ok::<_, CapabilityError>(action.viable),
    )?;

    let output = serde_json::json!({
        "assessment": assessment,
        "attention_queue": engine.attention_queue(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn check(config: &Path) -> anyhow::Result<()> {
    let config = load_config(Some(config))?;
    println!("Configuration OK\n\n{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parses_evaluate() {
        let cli = Cli::try_parse_from(["seraa", "evaluate", "--input", "s.json"]).unwrap();
        match cli.command {
            Some(Commands::Evaluate { input, config }) => {
                assert_eq!(input, PathBuf::from("s.json"));
                assert!(config.is_none());
            }
            _ => panic!("expected evaluate"),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["seraa", "evaluate"]).is_err());
    }

    #[test]
    fn test_scenario_viable_defaults_to_true() {
        let scenario: Scenario = serde_json::from_str(
            r#"{"moral_state": {"care": 1.0}, "actions": [{"name": "a", "pac_score": 0.5}]}"#,
        )
        .unwrap();
        assert!(scenario.actions[0].viable);
    }

    #[test]
    fn test_scenario_rejects_negative_weight() {
        let parsed = serde_json::from_str::<Scenario>(
            r#"{"moral_state": {"care": -1.0}, "actions": []}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_evaluate_scenario_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "moral_state": {{"fairness": 0.3, "autonomy": 0.4, "care": 0.3}},
                "actions": [
                    {{"name": "share_data", "pac_score": 0.8, "viable": true}},
                    {{"name": "ask_consent", "pac_score": 0.95, "viable": true}},
                    {{"name": "default_opt_in", "pac_score": 0.75, "viable": true}}
                ]
            }}"#
        )
        .unwrap();

        assert!(evaluate(file.path(), None).is_ok());
    }

    #[test]
    fn test_check_rejects_bad_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[attention]\nmax_attention_items = 0").unwrap();
        assert!(check(file.path()).is_err());
    }
}
