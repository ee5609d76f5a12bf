//! 命令调度模块：
//! - 接收解析好的 CLI 参数，计算“有效参数”
//! - 调用配置加载、构建、监视、初始化等模块

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::{
    build::{build, discover_themes, BuildSettings},
    cli::{BuildArgs, Cli, Command},
    compiler::SassCommand,
    config::{self, Config},
    init::init_scaffold,
    utils::{env_bool_truthy, env_opt_path, env_opt_string, is_plain_segment, parse_style},
    watch::watch_and_rebuild,
};

/// 运行指定的子命令
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { args, only } => {
            let mut settings = effective_settings(args)?;
            settings.only = only;
            let compiler = SassCommand::from_command_line(&settings.compiler)?;
            let summary = build(&settings, &compiler)?;
            if !summary.is_success() {
                bail!("{} 个主题未能编译", summary.failed);
            }
            Ok(())
        }
        Command::List { args } => {
            let settings = effective_settings(args)?;
            let themes =
                discover_themes(&settings.themes_dir, &settings.utilities, &settings.out_dir)?;
            if themes.is_empty() {
                eprintln!("⚠️ 未找到主题目录: {}", settings.themes_dir.display());
            }
            for name in &themes {
                let mark = if settings.entry_file(name).is_file() { "✓" } else { "✗" };
                println!("{mark} {name}");
            }
            Ok(())
        }
        Command::Watch { args } => {
            let settings = effective_settings(args)?;
            let compiler = SassCommand::from_command_line(&settings.compiler)?;
            watch_and_rebuild(&settings, &compiler)
        }
        Command::Init { force, dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            init_scaffold(&dir, force)
        }
    }
}

/// 加载配置文件并与 CLI、环境变量合并
fn effective_settings(args: BuildArgs) -> Result<BuildSettings> {
    let explicit = args.config.clone().or_else(|| env_opt_path("SWATCH_CONFIG"));
    let loaded = config::load_config(explicit.as_deref(), Path::new("."))?;
    println!("ℹ️ 本次使用的配置来源: {}", config::describe_source(&loaded.source));
    let settings = resolve_settings(args, loaded.config)?;
    tracing::debug!(?settings, "effective build settings");
    Ok(settings)
}

/// 优先级：CLI > 环境变量 > 配置文件 > 默认值
pub(crate) fn resolve_settings(args: BuildArgs, cfg: Config) -> Result<BuildSettings> {
    let defaults = BuildSettings::default();

    let env_style = match env_opt_string("SWATCH_STYLE") {
        Some(s) => Some(parse_style(&s).ok_or_else(|| anyhow::anyhow!("无效的 SWATCH_STYLE: {s}"))?),
        None => None,
    };
    let cli_style = match args.style.as_deref() {
        Some(s) => Some(parse_style(s).ok_or_else(|| anyhow::anyhow!("无效的 --style: {s}"))?),
        None => None,
    };

    let settings = BuildSettings {
        themes_dir: args
            .themes_dir
            .or_else(|| env_opt_path("SWATCH_THEMES_DIR"))
            .or(cfg.themes_dir)
            .unwrap_or(defaults.themes_dir),
        out_dir: args
            .out
            .or_else(|| env_opt_path("SWATCH_OUT"))
            .or(cfg.out_dir)
            .unwrap_or(defaults.out_dir),
        utilities: args
            .utilities
            .or_else(|| env_opt_string("SWATCH_UTILITIES"))
            .or(cfg.utilities)
            .unwrap_or(defaults.utilities),
        entry: args
            .entry
            .or_else(|| env_opt_string("SWATCH_ENTRY"))
            .or(cfg.entry)
            .unwrap_or(defaults.entry),
        compiler: args
            .compiler
            .or_else(|| env_opt_string("SWATCH_COMPILER"))
            .or(cfg.compiler)
            .unwrap_or(defaults.compiler),
        style: cli_style.or(env_style).or(cfg.style).unwrap_or(defaults.style),
        // 开关型参数：CLI 只能打开，未打开时再看环境变量与配置
        source_map: if args.source_map {
            true
        } else {
            env_bool_truthy("SWATCH_SOURCE_MAP")
                .or(cfg.source_map)
                .unwrap_or(defaults.source_map)
        },
        load_paths: if !args.load_paths.is_empty() {
            args.load_paths
        } else {
            cfg.load_paths.unwrap_or(defaults.load_paths)
        },
        only: Vec::new(),
    };

    if !is_plain_segment(&settings.utilities) {
        bail!("工具库目录名必须是单个目录名: {}", settings.utilities);
    }
    if !is_plain_segment(&settings.entry) {
        bail!("入口文件名必须是单个文件名: {}", settings.entry);
    }
    Ok(settings)
}
