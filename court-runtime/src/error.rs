//! # Error 模块
//!
//! 定义 court-runtime 中使用的错误类型。
//!
//! 所有引擎操作出错时都不会修改 [`EngineState`](crate::state::EngineState)，
//! 调用方可以把错误当作"什么也没发生"的提示直接展示。

use thiserror::Error;

use crate::script::NodeKind;

/// 脚本构建/加载错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// JSON 格式错误
    #[error("脚本 JSON 解析失败: {message}")]
    Json { message: String },

    /// 节点 id 重复
    #[error("节点 '{id}' 重复定义")]
    DuplicateNode { id: String },

    /// 起始节点不存在
    #[error("起始节点 '{id}' 不存在")]
    MissingStart { id: String },

    /// 兜底节点不存在
    #[error("兜底节点 '{id}' 不存在")]
    MissingFallback { id: String },

    /// 字段值非法
    #[error("节点 '{node}' 的字段 '{field}' 无效 - {message}")]
    InvalidField {
        node: String,
        field: String,
        message: String,
    },
}

impl From<serde_json::Error> for ScriptError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            message: e.to_string(),
        }
    }
}

/// 引擎运行时错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 当前节点类型不支持此操作
    #[error("节点 '{node}'（{kind}）不支持操作 {operation}")]
    InvalidTransition {
        node: String,
        kind: NodeKind,
        operation: &'static str,
    },

    /// 选项索引越界
    #[error("无效的选择索引 {index}，有效范围是 0..{max}")]
    IndexOutOfRange { index: usize, max: usize },

    /// 跳转目标不存在
    ///
    /// 只用于日志，引擎会跳转到兜底节点，不会返回给调用方。
    #[error("节点 '{from}' 引用了不存在的节点 '{target}'，已跳转到兜底节点 '{fallback}'")]
    DanglingReference {
        from: String,
        target: String,
        fallback: String,
    },

    /// 游戏已结束
    #[error("游戏已结束，请先重新开始")]
    AlreadyGameOver,
}

/// court-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CourtError {
    /// 脚本错误
    #[error("脚本错误: {0}")]
    Script(#[from] ScriptError),

    /// 引擎错误
    #[error("引擎错误: {0}")]
    Engine(#[from] EngineError),
}

/// Result 类型别名
pub type CourtResult<T> = Result<T, CourtError>;
