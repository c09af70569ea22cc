//! # Court Runtime
//!
//! 庭审对话小游戏的核心运行时库。
//!
//! ## 架构概述
//!
//! `court-runtime` 是纯逻辑核心，不依赖任何 IO 或渲染引擎。
//! 它通过 **操作驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                          Engine
//!   │                              │
//!   │──── PlayerAction ──────────►│
//!   │                              │ handle()
//!   │◄─── Result<Step, EngineError> │
//!   │◄─── EngineState ─────────────│
//!   │                              │
//! ```
//!
//! 计时器、动画、音频播放都由 Host 负责；引擎只保存音频开关。
//!
//! ## 核心类型
//!
//! - [`DialogueEngine`]：对话状态机
//! - [`Script`]：剧本图（id → 节点）
//! - [`PlayerAction`]：Host 向引擎传递的操作
//! - [`EngineState`]：每次操作后供 Host 读取的状态
//!
//! ## 使用示例
//!
//! ```ignore
//! use court_runtime::{DialogueEngine, PlayerAction, Script};
//!
//! let script = Script::from_json(text)?;
//! let mut engine = DialogueEngine::new(script);
//!
//! let step = engine.handle(PlayerAction::Advance)?;
//! println!("HP: {}", engine.state().hp);
//! ```
//!
//! ## 模块结构
//!
//! - [`config`]：引擎配置
//! - [`diagnostic`]：剧本静态检查
//! - [`error`]：错误类型定义
//! - [`history`]：庭审记录
//! - [`input`]：PlayerAction 定义
//! - [`runtime`]：对话引擎
//! - [`script`]：剧本图与 JSON 格式
//! - [`state`]：EngineState 定义

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod history;
pub mod input;
pub mod runtime;
pub mod script;
pub mod state;

// 重导出核心类型
pub use config::EngineOptions;
pub use diagnostic::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_script, get_jump_targets,
    get_node_ids,
};
pub use error::{CourtError, CourtResult, EngineError, ScriptError};
pub use history::{History, HistoryEvent};
pub use input::{EvidenceId, PlayerAction};
pub use runtime::{DialogueEngine, Step};
pub use script::{ChoiceOption, NodeKind, Script, ScriptDocument, ScriptNode};
pub use state::{EngineState, MAX_HP, Phase};
