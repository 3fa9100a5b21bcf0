use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_WS_PORT: u16 = 6000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    pub ws_port: u16,
    pub shutdown_drain_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: DEFAULT_HTTP_PORT,
            ws_port: DEFAULT_WS_PORT,
            shutdown_drain_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub root_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub data_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            data_file: PathBuf::from("storage/data.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub enabled: bool,
    pub url: Option<String>,
    pub timeout_ms: u64,
    pub broadcast_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            timeout_ms: 2000,
            broadcast_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl BoardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BoardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOARD_HOST})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoardError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.paths.root_dir.join(path)
        }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.paths.templates_dir)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.resolve(&self.paths.static_dir)
    }

    pub fn data_file(&self) -> PathBuf {
        self.resolve(&self.paths.data_file)
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        parse_addr(&self.server.host, self.server.http_port)
    }

    pub fn ws_addr(&self) -> Result<SocketAddr> {
        parse_addr(&self.server.host, self.server.ws_port)
    }

    /// 未指定時，轉發到本機的 WebSocket 埠
    pub fn relay_url(&self, ws_port: u16) -> String {
        self.relay
            .url
            .clone()
            .unwrap_or_else(|| format!("ws://127.0.0.1:{}", ws_port))
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_millis(self.relay.timeout_ms)
    }

    pub fn shutdown_drain(&self) -> Duration {
        Duration::from_millis(self.server.shutdown_drain_ms)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_ports(self.server.http_port, self.server.ws_port)?;
        self.http_addr()?;

        for (field, path) in [
            ("paths.root_dir", &self.paths.root_dir),
            ("paths.templates_dir", &self.paths.templates_dir),
            ("paths.static_dir", &self.paths.static_dir),
            ("paths.data_file", &self.paths.data_file),
        ] {
            validation::validate_path(field, &path.to_string_lossy())?;
        }

        if let Some(url) = &self.relay.url {
            validation::validate_url("relay.url", url, &["ws", "wss"])?;
        }
        validation::validate_positive_number(
            "relay.timeout_ms",
            self.relay.timeout_ms,
            1,
        )?;
        validation::validate_positive_number(
            "relay.broadcast_capacity",
            self.relay.broadcast_capacity as u64,
            1,
        )?;

        Ok(())
    }
}

fn parse_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let candidate = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    };
    candidate
        .parse()
        .map_err(|e| BoardError::InvalidConfigValueError {
            field: "server.host".to_string(),
            value: host.to_string(),
            reason: format!("Invalid bind address: {}", e),
        })
}

impl Validate for BoardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
