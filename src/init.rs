//! 初始化脚手架模块
//! - `swatch init` 写出示例配置、工具库目录与一个示例主题

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use std::{fs, path::Path};

// 内置示例（用于 init）
const SAMPLE_CONFIG: &str = include_str!("assets/sample.swatch.yaml");
static SCAFFOLD_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/scaffold");

/// 初始化示例配置与主题脚手架
pub(crate) fn init_scaffold(dir: &Path, force: bool) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("创建目录失败: {}", dir.display()))?;
    }

    // 写入示例配置
    let cfg_path = dir.join("swatch.yaml");
    if cfg_path.exists() && !force {
        eprintln!("跳过: {} 已存在，使用 --force 可覆盖", cfg_path.display());
    } else {
        fs::write(&cfg_path, SAMPLE_CONFIG.as_bytes())
            .with_context(|| format!("写入示例配置失败: {}", cfg_path.display()))?;
        println!("写入: {}", cfg_path.display());
    }

    write_scaffold(&SCAFFOLD_DIR, dir, force)?;

    println!("✅ 初始化完成，安装 bulma 与 sass 后运行: swatch build");
    Ok(())
}

/// 逐文件写出内置脚手架；已存在的文件除非 `force` 否则跳过
fn write_scaffold(src: &Dir, target_dir: &Path, force: bool) -> Result<()> {
    for f in src.files() {
        let out_path = target_dir.join(f.path());
        if out_path.exists() && !force {
            eprintln!("跳过: {} 已存在，使用 --force 可覆盖", out_path.display());
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, f.contents())
            .with_context(|| format!("写出脚手架文件失败: {}", out_path.display()))?;
        println!("写入: {}", out_path.display());
    }
    for d in src.dirs() {
        write_scaffold(d, target_dir, force)?;
    }
    Ok(())
}
