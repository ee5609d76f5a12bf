//! swatch：批量编译 Bulmaswatch 主题
//! - 发现主题目录，逐个调用 Dart Sass 输出 `<主题>.css`
//! - 任一主题跳过或失败时以非零状态退出

mod build;
mod cli;
mod commands;
mod compiler;
mod config;
mod init;
mod utils;
mod watch;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    commands::run(cli)
}

/// 诊断日志写到 stderr，级别由 SWATCH_LOG 控制（默认 warn）
fn init_logging() {
    let filter = EnvFilter::try_from_env("SWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
