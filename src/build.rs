//! 主题构建编排模块：
//! - 准备输出目录、发现主题目录（排除工具库目录）
//! - 逐个调用外部编译器，失败时尽力清理半成品输出
//! - 汇总成功/失败数量，决定最终退出状态

use std::{
    fs, io,
    path::{Path, PathBuf},
};
use anyhow::Result;
use chrono::Local;
use thiserror::Error;

use crate::{
    compiler::{CompileJob, Compiler},
    config::OutputStyle,
};

pub(crate) const DEFAULT_THEMES_DIR: &str = "new_themes";
pub(crate) const DEFAULT_OUT_DIR: &str = "dist/css";
pub(crate) const DEFAULT_UTILITIES: &str = "utilities";
pub(crate) const DEFAULT_ENTRY: &str = "bulmaswatch.scss";
pub(crate) const DEFAULT_COMPILER: &str = "npx sass";
pub(crate) const DEFAULT_LOAD_PATH: &str = "node_modules";

/// 一次构建的有效参数（CLI > 环境变量 > 配置文件 > 默认值 合并之后）
#[derive(Debug, Clone)]
pub(crate) struct BuildSettings {
    pub(crate) themes_dir: PathBuf,
    pub(crate) out_dir: PathBuf,
    /// 工具库目录名，位于 `themes_dir` 下，永远不作为主题
    pub(crate) utilities: String,
    pub(crate) entry: String,
    pub(crate) compiler: String,
    pub(crate) style: OutputStyle,
    pub(crate) source_map: bool,
    /// 共享库搜索路径
    pub(crate) load_paths: Vec<PathBuf>,
    /// 非空时仅编译这些主题
    pub(crate) only: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            themes_dir: PathBuf::from(DEFAULT_THEMES_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            utilities: DEFAULT_UTILITIES.to_string(),
            entry: DEFAULT_ENTRY.to_string(),
            compiler: DEFAULT_COMPILER.to_string(),
            style: OutputStyle::default(),
            source_map: false,
            load_paths: vec![PathBuf::from(DEFAULT_LOAD_PATH)],
            only: Vec::new(),
        }
    }
}

impl BuildSettings {
    pub(crate) fn utilities_dir(&self) -> PathBuf {
        self.themes_dir.join(&self.utilities)
    }

    pub(crate) fn entry_file(&self, theme: &str) -> PathBuf {
        self.themes_dir.join(theme).join(&self.entry)
    }

    pub(crate) fn output_file(&self, theme: &str) -> PathBuf {
        self.out_dir.join(format!("{theme}.css"))
    }

    /// 为指定主题生成编译任务
    pub(crate) fn job_for(&self, theme: &str) -> CompileJob {
        let mut load_paths = self.load_paths.clone();
        load_paths.push(self.utilities_dir());
        CompileJob {
            input: self.entry_file(theme),
            output: self.output_file(theme),
            source_map: self.source_map,
            style: self.style,
            load_paths,
        }
    }
}

/// 中止整次构建的错误
#[derive(Debug, Error)]
pub(crate) enum BuildError {
    #[error("创建输出目录失败: {}", .path.display())]
    OutputDirCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("读取主题目录失败: {}", .path.display())]
    ThemesDirRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 单个主题的构建结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ThemeOutcome {
    Compiled,
    /// 入口文件不存在，未调用编译器
    Skipped { entry: PathBuf },
    /// 编译器失败（非零退出或无法启动）
    Failed { reason: String },
}

impl ThemeOutcome {
    pub(crate) fn is_success(&self) -> bool {
        matches!(self, ThemeOutcome::Compiled)
    }
}

/// 构建汇总
#[derive(Debug, Default)]
pub(crate) struct Summary {
    pub(crate) results: Vec<(String, ThemeOutcome)>,
    pub(crate) succeeded: usize,
    pub(crate) failed: usize,
}

impl Summary {
    fn record(&mut self, theme: &str, outcome: ThemeOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.results.push((theme.to_string(), outcome));
    }

    /// 仅当没有任何失败（含跳过）时成功
    pub(crate) fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub(crate) fn print(&self) {
        println!("\n--- 构建汇总 ---");
        println!("编译成功: {} 个主题", self.succeeded);
        println!("编译失败: {} 个主题", self.failed);
        for (name, outcome) in self.results.iter().filter(|(_, o)| !o.is_success()) {
            match outcome {
                ThemeOutcome::Skipped { entry } => {
                    println!("  - {name}（已跳过，缺少 {}）", entry.display())
                }
                ThemeOutcome::Failed { reason } => println!("  - {name}（编译失败: {reason}）"),
                ThemeOutcome::Compiled => {}
            }
        }
        println!("----------------");
        if self.is_success() {
            println!("✅ 构建完成");
        } else {
            eprintln!("❌ 构建结束，存在失败的主题");
        }
    }
}

/// 确保输出目录存在；返回是否为本次新建
pub(crate) fn prepare_output_dir(out_dir: &Path) -> Result<bool, BuildError> {
    if out_dir.is_dir() {
        println!("📁 输出目录已存在: {}", out_dir.display());
        return Ok(false);
    }
    fs::create_dir_all(out_dir).map_err(|source| BuildError::OutputDirCreation {
        path: out_dir.to_path_buf(),
        source,
    })?;
    println!("📁 已创建输出目录: {}", out_dir.display());
    Ok(true)
}

/// 列出主题根目录下的直接子目录，按名称排序
/// 排除工具库目录、包含输出目录的目录，以及非 UTF-8 的目录名
pub(crate) fn discover_themes(
    themes_dir: &Path,
    utilities: &str,
    out_dir: &Path,
) -> Result<Vec<String>, BuildError> {
    let read_err = |source: io::Error| BuildError::ThemesDirRead {
        path: themes_dir.to_path_buf(),
        source,
    };
    // 输出目录尚未创建时不可能位于主题目录内
    let out_canonical = out_dir.canonicalize().ok();
    let mut themes = Vec::new();
    for entry in fs::read_dir(themes_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!(name = ?raw, "ignoring non UTF-8 theme directory");
                eprintln!("⚠️ 忽略非 UTF-8 目录名: {}", entry.path().display());
                continue;
            }
        };
        if name == utilities {
            continue;
        }
        if let (Some(out), Ok(dir)) = (&out_canonical, entry.path().canonicalize()) {
            if out.starts_with(&dir) {
                tracing::debug!(dir = %dir.display(), "skipping directory holding the output");
                continue;
            }
        }
        themes.push(name);
    }
    themes.sort();
    Ok(themes)
}

/// 按 `only` 过滤已发现主题；返回（待编译主题，未发现的请求名）
fn select_themes(discovered: Vec<String>, only: &[String]) -> (Vec<String>, Vec<String>) {
    if only.is_empty() {
        return (discovered, Vec::new());
    }
    let mut missing: Vec<String> = Vec::new();
    for name in only {
        if !discovered.contains(name) && !missing.contains(name) {
            missing.push(name.clone());
        }
    }
    let selected = discovered.into_iter().filter(|d| only.contains(d)).collect();
    (selected, missing)
}

/// 编译单个主题
pub(crate) fn compile_theme(
    settings: &BuildSettings,
    compiler: &dyn Compiler,
    theme: &str,
) -> ThemeOutcome {
    let job = settings.job_for(theme);
    println!("\n--- 处理主题: {theme} ---");

    if !job.input.is_file() {
        eprintln!("跳过 '{}': 入口文件不存在 {}", theme, job.input.display());
        return ThemeOutcome::Skipped { entry: job.input };
    }

    println!("编译: {} -> {}", job.input.display(), job.output.display());
    println!("执行: {}", compiler.command_line(&job));

    match compiler.compile(&job) {
        Ok(()) => {
            println!("✅ 已编译 {theme}.css");
            ThemeOutcome::Compiled
        }
        Err(e) => {
            let reason = format!("{e:#}");
            eprintln!("❌ 主题 '{theme}' 编译失败: {reason}（详见上方编译器输出）");
            cleanup_failed_output(theme, &job);
            ThemeOutcome::Failed { reason }
        }
    }
}

/// 尽力删除失败编译留下的输出；失败只记录，不影响计数
fn cleanup_failed_output(theme: &str, job: &CompileJob) {
    let mut targets = vec![job.output.clone()];
    if job.source_map {
        targets.push(job.map_file());
    }
    for path in targets.iter().filter(|p| p.exists()) {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(theme, path = %path.display(), error = %e, "cleanup failed");
            eprintln!("清理 '{}' 的输出失败: {}: {}", theme, path.display(), e);
        }
    }
}

/// 执行一次完整构建：准备输出目录 → 发现主题 → 逐个编译 → 汇总
pub(crate) fn build(settings: &BuildSettings, compiler: &dyn Compiler) -> Result<Summary> {
    println!(
        "🚧 开始编译主题（{}）: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        settings.themes_dir.display()
    );

    prepare_output_dir(&settings.out_dir)?;

    let discovered =
        discover_themes(&settings.themes_dir, &settings.utilities, &settings.out_dir)?;
    println!("🔎 发现 {} 个主题目录", discovered.len());
    let mut summary = Summary::default();
    if discovered.is_empty() {
        eprintln!("⚠️ 未找到可处理的主题目录: {}", settings.themes_dir.display());
        return Ok(summary);
    }

    let (themes, missing) = select_themes(discovered, &settings.only);
    for theme in &themes {
        let outcome = compile_theme(settings, compiler, theme);
        summary.record(theme, outcome);
    }
    for name in &missing {
        eprintln!("⚠️ 未发现指定的主题: {name}");
        summary.record(name, ThemeOutcome::Skipped { entry: settings.entry_file(name) });
    }

    summary.print();
    Ok(summary)
}
