//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 将 clap 的声明与业务逻辑解耦，便于在其它模块中复用参数。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 顶层 CLI 入口
#[derive(Parser, Debug)]
#[command(name = "swatch", about = "Bulmaswatch 主题批量编译工具", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// build / list / watch 共用的构建参数
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct BuildArgs {
    /// 配置文件路径，默认：swatch.yaml / swatch.yml
    #[arg(short, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
    /// 主题根目录，默认：new_themes
    #[arg(short = 't', long, value_name = "DIR")]
    pub(crate) themes_dir: Option<PathBuf>,
    /// 输出目录，默认：dist/css
    #[arg(short, long, value_name = "DIR")]
    pub(crate) out: Option<PathBuf>,
    /// 保留的工具库目录名（不参与主题发现），默认：utilities
    #[arg(long, value_name = "NAME")]
    pub(crate) utilities: Option<String>,
    /// 每个主题的入口文件名，默认：bulmaswatch.scss
    #[arg(long, value_name = "FILE")]
    pub(crate) entry: Option<String>,
    /// 编译器命令，默认：npx sass
    #[arg(long, value_name = "CMD")]
    pub(crate) compiler: Option<String>,
    /// 输出风格（compressed|expanded）
    #[arg(long, value_name = "STYLE")]
    pub(crate) style: Option<String>,
    /// 生成 source map（默认关闭）
    #[arg(long)]
    pub(crate) source_map: bool,
    /// 共享库搜索路径（可多次指定，覆盖默认的 node_modules）
    #[arg(long = "load-path", value_name = "DIR")]
    pub(crate) load_paths: Vec<PathBuf>,
}

/// 子命令定义
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// 编译全部主题
    Build {
        #[command(flatten)]
        args: BuildArgs,
        /// 仅编译指定主题（可多次指定）
        #[arg(long, value_name = "NAME")]
        only: Vec<String>,
    },
    /// 列出发现的主题（不调用编译器）
    List {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// 监视主题目录，变更后自动重新编译
    Watch {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// 初始化示例配置与主题脚手架
    Init {
        /// 强制覆盖已存在文件
        #[arg(long)]
        force: bool,
        /// 目标目录（默认当前目录）
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}
