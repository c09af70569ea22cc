//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与剧本检查命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `script-check`: 检查剧本文件（JSON 格式、跳转目标、节点字段）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use court_runtime::{DiagnosticResult, Script, analyze_script};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Debug, Subcommand)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 检查剧本文件
    ///
    /// 不带参数：检查 assets/scripts/ 下所有 .json 文件
    ScriptCheck {
        /// 指定文件或目录
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    match Cli::parse().task {
        Task::CheckAll => check_all(),
        Task::ScriptCheck { path } => script_check(path.as_deref()),
    }
}

fn check_all() -> anyhow::Result<()> {
    let sh = Shell::new()?;

    eprintln!("\n==> cargo fmt --all -- --check");
    cmd!(sh, "cargo fmt --all -- --check").run()?;

    eprintln!("\n==> cargo clippy --workspace --all-targets");
    cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

    eprintln!("\n==> cargo test --workspace");
    cmd!(sh, "cargo test --workspace").run()?;

    Ok(())
}

//=============================================================================
// script-check 命令实现
//=============================================================================

/// 默认剧本目录（相对于 workspace root）
const SCRIPTS_DIR: &str = "assets/scripts";

/// 剧本检查结果
#[derive(Default)]
struct ScriptCheckResult {
    /// 检查的剧本数量
    scripts_checked: usize,
    /// 加载失败数量
    load_errors: usize,
    /// 诊断结果
    diagnostics: DiagnosticResult,
}

/// 执行剧本检查
fn script_check(path: Option<&Path>) -> anyhow::Result<()> {
    let root = match path {
        Some(p) if p.exists() => p.to_path_buf(),
        Some(p) => anyhow::bail!("路径不存在: {}", p.display()),
        None => {
            let dir = PathBuf::from(SCRIPTS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认剧本目录不存在: {}\n请在 workspace 根目录运行，或指定剧本路径",
                    dir.display()
                );
            }
            dir
        }
    };

    let files = collect_script_files(&root)?;
    if files.is_empty() {
        eprintln!("未找到剧本文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个剧本文件...\n", files.len());

    let mut result = ScriptCheckResult::default();
    for file in &files {
        check_script_file(file, &mut result);
    }

    print_check_result(&result);

    if result.load_errors > 0 || result.diagnostics.has_errors() {
        anyhow::bail!("剧本检查发现错误");
    }

    Ok(())
}

/// 收集剧本文件（单个文件或目录下所有 .json）
fn collect_script_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// 检查单个剧本文件
fn check_script_file(file: &Path, result: &mut ScriptCheckResult) {
    let display = file.display().to_string();
    result.scripts_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {}", display, e);
            result.load_errors += 1;
            return;
        }
    };

    let script = match Script::from_json(&content) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[ERROR] {}: {}", display, e);
            result.load_errors += 1;
            return;
        }
    };

    result.diagnostics.merge(analyze_script(&script));
}

/// 输出检查结果
fn print_check_result(result: &ScriptCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个剧本", result.scripts_checked);
    eprintln!();

    for diag in &result.diagnostics.diagnostics {
        eprintln!("{}", diag);
    }

    let error_count = result.load_errors + result.diagnostics.error_count();
    let warn_count = result.diagnostics.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{ "id": "ok", "start": "a", "fallback": "b",
        "nodes": [ { "id": "a", "kind": "line", "next": "b" }, { "id": "b", "kind": "line" } ] }"#;

    const DANGLING: &str = r#"{ "id": "bad", "start": "a", "fallback": "b",
        "nodes": [ { "id": "a", "kind": "line", "next": "ghost" }, { "id": "b", "kind": "line" } ] }"#;

    #[test]
    fn test_collect_script_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("chapter1")).unwrap();
        std::fs::write(dir.path().join("b.json"), VALID).unwrap();
        std::fs::write(dir.path().join("chapter1/a.json"), VALID).unwrap();
        std::fs::write(dir.path().join("notes.md"), "# notes").unwrap();

        let files = collect_script_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().is_some_and(|e| e == "json")));

        let single = collect_script_files(&dir.path().join("b.json")).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_check_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let valid = dir.path().join("ok.json");
        let dangling = dir.path().join("bad.json");
        let broken = dir.path().join("broken.json");
        std::fs::write(&valid, VALID).unwrap();
        std::fs::write(&dangling, DANGLING).unwrap();
        std::fs::write(&broken, "{").unwrap();

        let mut result = ScriptCheckResult::default();
        check_script_file(&valid, &mut result);
        assert!(!result.diagnostics.has_errors());

        check_script_file(&dangling, &mut result);
        assert_eq!(result.diagnostics.error_count(), 1);

        check_script_file(&broken, &mut result);
        assert_eq!(result.load_errors, 1);
        assert_eq!(result.scripts_checked, 3);
    }

    #[test]
    fn test_script_check_fails_on_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), DANGLING).unwrap();
        assert!(script_check(Some(dir.path())).is_err());

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.json"), VALID).unwrap();
        assert!(script_check(Some(dir.path())).is_ok());
    }
}
