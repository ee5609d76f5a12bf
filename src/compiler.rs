//! 外部样式编译器封装：
//! - `CompileJob` 描述一次主题编译（输入、输出、参数）
//! - `Compiler` 为编排器依赖的接口，`SassCommand` 以子进程调用 Dart Sass

use std::{
    ffi::OsString,
    path::PathBuf,
    process::Command,
};
use anyhow::{bail, Context, Result};

use crate::config::OutputStyle;

/// 禁用 source map 的 Sass 参数
pub(crate) const NO_SOURCE_MAP_FLAG: &str = "--no-source-map";

/// 单个主题的一次编译任务
#[derive(Debug, Clone)]
pub(crate) struct CompileJob {
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) source_map: bool,
    pub(crate) style: OutputStyle,
    /// 按顺序传给 `--load-path=`：共享库在前，工具库目录在后
    pub(crate) load_paths: Vec<PathBuf>,
}

impl CompileJob {
    /// 编译器参数（不含程序本身）
    pub(crate) fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![self.input.clone().into(), self.output.clone().into()];
        if !self.source_map {
            args.push(NO_SOURCE_MAP_FLAG.into());
        }
        args.push(self.style.as_flag().into());
        for lp in &self.load_paths {
            let mut a = OsString::from("--load-path=");
            a.push(lp);
            args.push(a);
        }
        args
    }

    /// source map 文件路径（`<output>.map`）
    pub(crate) fn map_file(&self) -> PathBuf {
        let mut p = self.output.clone().into_os_string();
        p.push(".map");
        PathBuf::from(p)
    }
}

/// 样式编译器：返回 Err 即视为该主题编译失败
pub(crate) trait Compiler {
    fn compile(&self, job: &CompileJob) -> Result<()>;

    /// 用于进度输出的完整命令行
    fn command_line(&self, job: &CompileJob) -> String;
}

/// 以子进程方式调用的编译器（默认 `npx sass`）
#[derive(Debug, Clone)]
pub(crate) struct SassCommand {
    program: String,
    leading_args: Vec<String>,
}

impl SassCommand {
    /// 由命令字符串构造，按空白拆分为程序与前置参数
    pub(crate) fn from_command_line(cmd: &str) -> Result<Self> {
        let mut parts = cmd.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("编译器命令为空");
        };
        Ok(Self { program, leading_args: parts.collect() })
    }
}

impl Compiler for SassCommand {
    fn compile(&self, job: &CompileJob) -> Result<()> {
        tracing::debug!(program = %self.program, args = ?job.args(), "spawning compiler");
        // 继承标准输入输出，编译器诊断信息直接显示在进度之间
        let status = Command::new(&self.program)
            .args(&self.leading_args)
            .args(job.args())
            .status()
            .with_context(|| format!("启动编译器失败: {}", self.program))?;
        if !status.success() {
            bail!("编译器异常退出（{}）", status);
        }
        Ok(())
    }

    fn command_line(&self, job: &CompileJob) -> String {
        let mut line = self.program.clone();
        for a in &self.leading_args {
            line.push(' ');
            line.push_str(a);
        }
        line.push_str(&format!(" \"{}\" \"{}\"", job.input.display(), job.output.display()));
        for a in job.args().iter().skip(2) {
            line.push(' ');
            line.push_str(&a.to_string_lossy());
        }
        line
    }
}
