pub mod toml_config;

use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
pub use toml_config::BoardConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "message-board")]
#[command(about = "Message board with an HTTP front end and a WebSocket relay")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, env = "BOARD_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "BOARD_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "BOARD_HTTP_PORT")]
    pub http_port: Option<u16>,

    #[arg(long, env = "BOARD_WS_PORT")]
    pub ws_port: Option<u16>,

    /// Directory holding templates/, static/ and storage/
    #[arg(long, env = "BOARD_ROOT_DIR")]
    pub root_dir: Option<PathBuf>,

    #[arg(long, env = "BOARD_RELAY_URL")]
    pub relay_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "BOARD_LOG_JSON")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP and WebSocket servers (default)
    Serve,
    /// Check the local HTTP server's /healthz endpoint
    Healthcheck,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    /// 載入配置檔後套用命令列覆蓋設定
    pub fn load(&self) -> Result<BoardConfig> {
        let mut config = match &self.config {
            Some(path) => BoardConfig::from_file(path)?,
            None => BoardConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut BoardConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.http_port {
            config.server.http_port = port;
        }
        if let Some(port) = self.ws_port {
            config.server.ws_port = port;
        }
        if let Some(root) = &self.root_dir {
            config.paths.root_dir = root.clone();
        }
        if let Some(url) = &self.relay_url {
            config.relay.url = Some(url.clone());
        }
        if self.log_json {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_take_precedence() {
        let cli = CliConfig::parse_from([
            "message-board",
            "--http-port",
            "8080",
            "--root-dir",
            "/app",
            "--relay-url",
            "ws://10.0.0.5:6000",
        ]);
        let mut config = BoardConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.ws_port, 6000);
        assert_eq!(config.paths.root_dir, PathBuf::from("/app"));
        assert_eq!(config.relay.url.as_deref(), Some("ws://10.0.0.5:6000"));
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn test_healthcheck_subcommand() {
        let cli = CliConfig::parse_from(["message-board", "healthcheck"]);
        assert_eq!(cli.command(), Command::Healthcheck);
    }
}
