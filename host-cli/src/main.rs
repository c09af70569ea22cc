//! # court - 庭审对话小游戏（终端宿主）
//!
//! 负责加载配置和剧本、采集终端输入，驱动 court-runtime 执行。
//!
//! ## 命令
//!
//! - `play [script]`: 开始游戏（默认）
//! - `check [script]`: 检查剧本（跳转目标、节点字段）
//! - `init-config`: 写出默认配置文件

mod command;
mod config;
mod render;
mod session;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use court_runtime::{DialogueEngine, DiagnosticResult, Script, analyze_script};
use tracing::{Level, error, info};

use config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "court", version, about = "庭审对话小游戏（终端版）")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// 开始游戏
    Play {
        /// 剧本路径（覆盖配置文件中的 start_script_path）
        script: Option<PathBuf>,
    },
    /// 检查剧本
    Check {
        /// 剧本路径（覆盖配置文件中的 start_script_path）
        script: Option<PathBuf>,
    },
    /// 在 --config 指定的位置写出默认配置
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli) {
        error!("{e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let (script_override, check_only) = match cli.mode {
        None => (None, false),
        Some(Mode::Play { script }) => (script, false),
        Some(Mode::Check { script }) => (script, true),
        Some(Mode::InitConfig) => {
            AppConfig::default()
                .save(&cli.config)
                .with_context(|| format!("无法写入配置: {}", cli.config.display()))?;
            eprintln!("已写出默认配置: {}", cli.config.display());
            return Ok(());
        }
    };

    let mut config = AppConfig::load(&cli.config);
    if let Some(path) = script_override {
        config.start_script_path = path;
    }
    config.validate()?;

    let script = load_script(&config.start_script_path)?;
    info!(
        script = %script.id,
        nodes = script.len(),
        "剧本加载成功"
    );

    if check_only {
        let result = analyze_script(&script);
        print_diagnostics(&result);
        if result.has_errors() {
            anyhow::bail!("剧本检查发现 {} 个错误", result.error_count());
        }
        return Ok(());
    }

    if config.debug.script_check {
        print_diagnostics(&analyze_script(&script));
    }

    let mut engine = DialogueEngine::with_options(script, config.engine.clone());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session::run(&mut engine, stdin.lock(), &mut stdout)
}

fn load_script(path: &Path) -> anyhow::Result<Script> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取剧本: {}", path.display()))?;
    Script::from_json(&text).with_context(|| format!("无法解析剧本: {}", path.display()))
}

fn print_diagnostics(result: &DiagnosticResult) {
    for diag in &result.diagnostics {
        eprintln!("{diag}");
    }
    if result.is_empty() {
        eprintln!("✅ 检查通过，无错误");
    } else {
        eprintln!(
            "{} 个错误, {} 个警告",
            result.error_count(),
            result.warn_count()
        );
    }
}
