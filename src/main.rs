use clap::Parser;
use message_board::app::{healthcheck, servers};
use message_board::config::Command;
use message_board::utils::error::{BoardError, ErrorSeverity, Result};
use message_board::utils::{logger, validation::Validate};
use message_board::CliConfig;

// 根據錯誤嚴重程度決定退出碼
fn exit_code(e: &BoardError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(cli: &CliConfig) -> Result<()> {
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            return Err(e);
        }
    };

    // 初始化日誌
    logger::init_logger(cli.verbose, config.logging.json);

    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    config.validate()?;

    match cli.command() {
        Command::Healthcheck => {
            healthcheck::check(&config).await?;
            println!("ok");
        }
        Command::Serve => {
            tracing::info!("🚀 Starting message-board");
            servers::run(&config).await?;
            tracing::info!("✅ message-board stopped");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // Docker 的 HEALTHCHECK 只認得 0 與 1
        let exit_code = match cli.command() {
            Command::Healthcheck => 1,
            Command::Serve => exit_code(&e),
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_follows_severity() {
        let low = BoardError::ValidationError {
            message: "Invalid form data".to_string(),
        };
        let medium = BoardError::RelayError {
            message: "connect timed out".to_string(),
        };
        let high = BoardError::ConfigError {
            message: "bad toml".to_string(),
        };
        let critical = BoardError::ServerError {
            message: "bind failed".to_string(),
        };

        assert_eq!(exit_code(&low), 0);
        assert_eq!(exit_code(&medium), 2);
        assert_eq!(exit_code(&high), 1);
        assert_eq!(exit_code(&critical), 3);
    }
}
