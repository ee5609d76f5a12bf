//! 配置与加载模块：
//! - 定义 `Config`（swatch.yaml）与 `OutputStyle` 等数据结构
//! - 提供 `load_config` 支持显式路径或当前目录自动探测
//! - 暴露配置来源信息，便于日志打印

use std::{fs, path::{Path, PathBuf}};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// 自动探测的配置文件名（按顺序）
const CONFIG_CANDIDATES: [&str; 2] = ["swatch.yaml", "swatch.yml"];

/// swatch.yaml 结构，所有字段可选，未填写时回退到环境变量或内置默认值
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// 主题根目录，例如 `new_themes`
    #[serde(default)]
    pub(crate) themes_dir: Option<PathBuf>,
    /// 输出目录，例如 `dist/css`
    #[serde(default, alias = "out")]
    pub(crate) out_dir: Option<PathBuf>,
    /// 保留的工具库目录名（位于主题根目录下）
    #[serde(default)]
    pub(crate) utilities: Option<String>,
    /// 主题入口文件名
    #[serde(default)]
    pub(crate) entry: Option<String>,
    /// 编译器命令，按空白拆分为程序与前置参数，例如 `npx sass`
    #[serde(default)]
    pub(crate) compiler: Option<String>,
    /// 输出风格（compressed|expanded）
    #[serde(default)]
    pub(crate) style: Option<OutputStyle>,
    /// 是否生成 source map
    #[serde(default)]
    pub(crate) source_map: Option<bool>,
    /// 共享库搜索路径（例如 node_modules），工具库目录总会追加在最后
    #[serde(default)]
    pub(crate) load_paths: Option<Vec<PathBuf>>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputStyle {
    #[default]
    Compressed,
    Expanded,
}

impl OutputStyle {
    /// 对应的 Sass 命令行参数
    pub(crate) fn as_flag(self) -> &'static str {
        match self {
            OutputStyle::Compressed => "--style=compressed",
            OutputStyle::Expanded => "--style=expanded",
        }
    }
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// 已加载的配置及其来源
#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) source: ConfigSource,
}

/// 描述配置来源，供日志打印
pub(crate) fn describe_source(src: &ConfigSource) -> String {
    match src {
        ConfigSource::File(p) => format!("本地文件 {}", p.display()),
        ConfigSource::Defaults => "内置默认值（未找到 swatch.yaml）".to_string(),
    }
}

/// 加载配置：显式路径必须存在；否则在 `base_dir` 下探测 swatch.yaml / swatch.yml
pub(crate) fn load_config(explicit: Option<&Path>, base_dir: &Path) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(p) => {
            if !p.is_file() {
                bail!("配置文件不存在: {}", p.display());
            }
            Some(p.to_path_buf())
        }
        None => CONFIG_CANDIDATES
            .iter()
            .map(|c| base_dir.join(c))
            .find(|p| p.is_file()),
    };
    let Some(path) = path else {
        return Ok(LoadedConfig { config: Config::default(), source: ConfigSource::Defaults });
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("读取配置失败: {}", path.display()))?;
    let config = parse_config(&text)
        .with_context(|| format!("解析 YAML 失败: {}", path.display()))?;
    Ok(LoadedConfig { config, source: ConfigSource::File(path) })
}

/// 解析配置文本；空文档视为全部默认
pub(crate) fn parse_config(text: &str) -> Result<Config> {
    if text.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_full_config() {
        let cfg = parse_config(
            "themes_dir: themes\nout: public/css\nutilities: shared\nentry: main.scss\n\
             compiler: sass\nstyle: expanded\nsource_map: true\nload_paths: [vendor, node_modules]\n",
        )
        .unwrap();
        assert_eq!(cfg.themes_dir, Some(PathBuf::from("themes")));
        assert_eq!(cfg.out_dir, Some(PathBuf::from("public/css")));
        assert_eq!(cfg.utilities.as_deref(), Some("shared"));
        assert_eq!(cfg.entry.as_deref(), Some("main.scss"));
        assert_eq!(cfg.compiler.as_deref(), Some("sass"));
        assert_eq!(cfg.style, Some(OutputStyle::Expanded));
        assert_eq!(cfg.source_map, Some(true));
        assert_eq!(
            cfg.load_paths,
            Some(vec![PathBuf::from("vendor"), PathBuf::from("node_modules")])
        );
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = parse_config("  \n").unwrap();
        assert!(cfg.themes_dir.is_none());
        assert!(cfg.style.is_none());
    }

    #[test]
    fn rejects_unknown_fields_and_styles() {
        assert!(parse_config("theme_dir: x\n").is_err());
        assert!(parse_config("style: nested\n").is_err());
    }

    #[test]
    fn autodetects_config_in_base_dir() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_config(None, tmp.path()).unwrap();
        assert_eq!(loaded.source, ConfigSource::Defaults);

        fs::write(tmp.path().join("swatch.yml"), "entry: main.scss\n").unwrap();
        let loaded = load_config(None, tmp.path()).unwrap();
        assert_eq!(loaded.source, ConfigSource::File(tmp.path().join("swatch.yml")));
        assert_eq!(loaded.config.entry.as_deref(), Some("main.scss"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.yaml")), tmp.path()).unwrap_err();
        assert!(err.to_string().contains("配置文件不存在"));
    }

    #[test]
    fn style_flags() {
        assert_eq!(OutputStyle::default().as_flag(), "--style=compressed");
        assert_eq!(OutputStyle::Expanded.as_flag(), "--style=expanded");
    }
}
