//! 监视与自动重建模块
//! - 先完整构建一次，再递归监视主题根目录
//! - 文件变更只置脏标记，由轮询循环串行重建

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};
use anyhow::{bail, Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::{build::{build, BuildSettings}, compiler::Compiler};

const POLL_INTERVAL: Duration = Duration::from_millis(400);

/// 监视主题目录并在变更后重建；构建失败不会中断监视
pub(crate) fn watch_and_rebuild(settings: &BuildSettings, compiler: &dyn Compiler) -> Result<()> {
    if !settings.themes_dir.is_dir() {
        bail!("主题目录不存在: {}", settings.themes_dir.display());
    }
    rebuild(settings, compiler);

    let dirty = Arc::new(AtomicBool::new(false));
    let ignored = settings.out_dir.canonicalize().ok();
    let mut watcher: RecommendedWatcher = {
        let dirty = dirty.clone();
        notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(ev) = res {
                if is_relevant(&ev.paths, ignored.as_deref()) {
                    dirty.store(true, Ordering::SeqCst);
                }
            }
        })?
    };
    watcher
        .watch(&settings.themes_dir, RecursiveMode::Recursive)
        .with_context(|| format!("监视目录失败: {}", settings.themes_dir.display()))?;
    println!("👀 正在监视: {}（Ctrl+C 退出）", settings.themes_dir.display());

    // watcher 需存活到进程结束
    loop {
        thread::sleep(POLL_INTERVAL);
        if dirty.swap(false, Ordering::SeqCst) {
            println!("🔁 检测到变更，重新编译");
            rebuild(settings, compiler);
        }
    }
}

fn rebuild(settings: &BuildSettings, compiler: &dyn Compiler) {
    if let Err(e) = build(settings, compiler) {
        eprintln!("❌ 构建失败: {e:#}");
    }
}

/// 输出目录位于主题目录内时，忽略其中的变更，避免自触发
fn is_relevant(paths: &[PathBuf], ignored: Option<&Path>) -> bool {
    match ignored {
        Some(out) => paths.is_empty() || paths.iter().any(|p| !p.starts_with(out)),
        None => true,
    }
}
