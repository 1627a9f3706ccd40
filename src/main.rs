use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use pagecraft::cli::Cli;
use pagecraft::config::{self, DEFAULT_CONFIG_PATH, StaticConfig};
use pagecraft::interfaces::cli::run_cli_command;
use pagecraft::system::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 配置文件显式指定时必须存在且能解析，默认路径允许缺失
    let path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let static_config = match StaticConfig::try_load_from(path, cli.config.is_some()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };
    config::set_config(static_config.clone());

    // guard 需要活到 main 返回，否则缓冲中的日志会丢失
    let _guard = match init_logging(&static_config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };
    debug!("Configuration loaded from {}", path);

    match run_cli_command(cli.command, &static_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            ExitCode::FAILURE
        }
    }
}
