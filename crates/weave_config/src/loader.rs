//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::WeaveConfig;
use std::collections::HashSet;
use std::path::Path;
use weave_diagnostics::DiagnosticCode;

/// The file name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "weave.toml";

/// Loads and validates a `weave.toml` configuration from a directory.
///
/// A missing file is not an error: the defaults are returned instead.
pub fn load_config(dir: &Path) -> Result<WeaveConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(WeaveConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `weave.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<WeaveConfig, ConfigError> {
    let config: WeaveConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that every listed code parses and that no code is both denied and allowed.
fn validate_config(config: &WeaveConfig) -> Result<(), ConfigError> {
    let diags = &config.diagnostics;
    let mut denied = HashSet::new();
    for code in &diags.deny {
        denied.insert(parse_code(code)?);
    }
    for code in &diags.allow {
        if denied.contains(&parse_code(code)?) {
            return Err(ConfigError::ValidationError(format!(
                "'{code}' is both denied and allowed"
            )));
        }
    }
    Ok(())
}

fn parse_code(code: &str) -> Result<DiagnosticCode, ConfigError> {
    code.parse()
        .map_err(|e: weave_diagnostics::ParseCodeError| ConfigError::ValidationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_diagnostics::Severity;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.diagnostics.level, Severity::Help);
        assert!(config.diagnostics.deny.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[diagnostics]
level = "warning"
color = true
deny = ["W300"]
allow = ["W302", "N001"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.diagnostics.level, Severity::Warning);
        assert!(config.diagnostics.color);
        assert_eq!(config.diagnostics.deny, vec!["W300"]);
        assert_eq!(config.diagnostics.allow.len(), 2);
    }

    #[test]
    fn reject_bad_code() {
        let toml = r#"
[diagnostics]
deny = ["X300"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("X300"));
    }

    #[test]
    fn reject_denied_and_allowed() {
        let toml = r#"
[diagnostics]
deny = ["W300"]
allow = ["W300"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("both denied and allowed"));
    }

    #[test]
    fn reject_unknown_level() {
        let toml = r#"
[diagnostics]
level = "loud"
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn reject_unknown_section() {
        assert!(load_config_from_str("[naming]\nstyle = \"upper\"\n").is_err());
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[diagnostics]\nlevel = \"error\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.diagnostics.level, Severity::Error);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(!config.diagnostics.color);
    }
}
