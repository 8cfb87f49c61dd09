use serde::Deserialize;
use std::path::PathBuf;

use crate::saver::SaveFormat;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory saved messages are written to. Must already exist.
    pub dir: PathBuf,
    /// "json" (single document) or "raw" (`.dat` + `.json` sidecar)
    pub format: String,
    /// Embed the body in single-document saves
    #[serde(default = "default_include_body")]
    pub include_body: bool,
}

fn default_include_body() -> bool {
    true
}

impl Config {
    pub fn load(path: &std::path::Path) -> Result<Self, crate::PersistError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| crate::PersistError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), crate::PersistError> {
        if self.output.dir.as_os_str().is_empty() {
            return Err(crate::PersistError::Config(
                "output.dir must not be empty".to_string(),
            ));
        }
        self.output.parse_format()?;
        Ok(())
    }
}

impl OutputConfig {
    pub fn parse_format(&self) -> Result<SaveFormat, crate::PersistError> {
        self.format.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_yaml(yaml: &str) -> Result<Config, crate::PersistError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        Config::load(file.path())
    }

    #[test]
    fn test_load_config() {
        let config = load_yaml(
            r#"
output:
  dir: /var/lib/tap
  format: raw
  include_body: false
"#,
        )
        .unwrap();

        assert_eq!(config.output.dir, PathBuf::from("/var/lib/tap"));
        assert_eq!(config.output.parse_format().unwrap(), SaveFormat::Raw);
        assert!(!config.output.include_body);
    }

    #[test]
    fn test_include_body_defaults_on() {
        let config = load_yaml(
            r#"
output:
  dir: /var/lib/tap
  format: json
"#,
        )
        .unwrap();

        assert!(config.output.include_body);
        assert_eq!(config.output.parse_format().unwrap(), SaveFormat::Json);
    }

    #[test]
    fn test_config_ignores_unknown_fields() {
        let config = load_yaml(
            r#"
output:
  dir: /var/lib/tap
  format: json
  rotation: 15m
broker:
  url: amqp://localhost:5672
"#,
        )
        .unwrap();

        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = load_yaml(
            r#"
output:
  dir: /var/lib/tap
  format: parquet
"#,
        );
        assert!(matches!(result, Err(crate::PersistError::Config(_))));
    }

    #[test]
    fn test_rejects_empty_dir() {
        let result = load_yaml(
            r#"
output:
  dir: ""
  format: json
"#,
        );
        assert!(matches!(result, Err(crate::PersistError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Config::load(std::path::Path::new("/thispathshouldnotexist/tap.yaml"));
        assert!(matches!(result, Err(crate::PersistError::Io(_))));
    }
}
