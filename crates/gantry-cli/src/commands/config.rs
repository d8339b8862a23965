//! `gantry config`: inspect the active configuration.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&serde_json::json!({ "key": key, "value": value }))?;
            } else {
                output.document(&value)?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.document(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            let path = global.config.unwrap_or_else(AppConfig::config_path);
            output.document(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let value = match key {
        "cluster.kubectl" => config.cluster.kubectl.display().to_string(),
        "cluster.namespace" => config.cluster.namespace.clone(),
        "cluster.replicas" => config.cluster.replicas.to_string(),
        "environments" => config.environments.join(","),
        "output.no_color" => config.output.no_color.to_string(),
        "output.format" => serde_json::to_value(config.output.format)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default(),
        _ => {
            return Err(CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            });
        }
    };
    Ok(value)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "cluster.namespace").unwrap(), "default");
        assert_eq!(get_config_value(&cfg, "cluster.kubectl").unwrap(), "kubectl");
        assert_eq!(get_config_value(&cfg, "cluster.replicas").unwrap(), "1");
        assert_eq!(get_config_value(&cfg, "output.format").unwrap(), "auto");
    }

    #[test]
    fn environments_are_comma_joined() {
        let cfg = AppConfig {
            environments: vec!["dev".into(), "prod".into()],
            ..AppConfig::default()
        };
        assert_eq!(get_config_value(&cfg, "environments").unwrap(), "dev,prod");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn default_config_renders_as_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[cluster]"));
        assert!(text.contains("namespace = \"default\""));
    }
}
