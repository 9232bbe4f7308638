pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use self::toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "placement-predictor")]
#[command(about = "Serve placement predictions over an HTML form and a JSON API")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Decision backend: rules or model
    #[arg(long)]
    pub backend: Option<String>,

    /// Path to the JSON classifier artifact
    #[arg(long)]
    pub model_path: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔（若有），再套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = &self.backend {
            config.model.backend = backend.clone();
        }
        if let Some(model_path) = &self.model_path {
            config.model.path = model_path.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_file_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"0.0.0.0\"\nport = 5050\n\n[model]\nbackend = \"rules\"\n")
            .unwrap();

        let cli = CliConfig::parse_from([
            "placement-predictor",
            "--config",
            temp_file.path().to_str().unwrap(),
            "--port",
            "6000",
            "--backend",
            "model",
            "--model-path",
            "artifacts/model.json",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 6000);
        assert!(config.uses_model());
        assert_eq!(config.model.path, "artifacts/model.json");
    }

    #[test]
    fn test_cli_without_config_uses_defaults() {
        let cli = CliConfig::parse_from(["placement-predictor", "--json-logs"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert!(config.logging.json);
    }
}
