//! 通用辅助函数：
//! - 环境变量读取与解析
//! - 单段路径名校验
//! - 文本到枚举的解析工具

use std::{
    env,
    path::{Component, Path, PathBuf},
};
use crate::config::OutputStyle;

/// 可选读取 PATH 环境变量为 PathBuf。
pub(crate) fn env_opt_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// 可选读取 String 环境变量。
pub(crate) fn env_opt_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// 读取布尔环境变量的真值（1/true/on/yes/y）。
pub(crate) fn env_bool_truthy(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| {
        matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes" | "y")
    })
}

/// 将字符串解析为 OutputStyle。
pub(crate) fn parse_style(s: &str) -> Option<OutputStyle> {
    match s.trim().to_ascii_lowercase().as_str() {
        "compressed" => Some(OutputStyle::Compressed),
        "expanded" => Some(OutputStyle::Expanded),
        _ => None,
    }
}

/// 是否为单个普通路径段（不含分隔符、`.`、`..`）。
pub(crate) fn is_plain_segment(s: &str) -> bool {
    let mut comps = Path::new(s).components();
    matches!((comps.next(), comps.next()), (Some(Component::Normal(_)), None))
        && !s.contains('/')
        && !s.contains('\\')
}
