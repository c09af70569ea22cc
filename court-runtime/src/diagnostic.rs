//! # 诊断模块
//!
//! 提供剧本静态检查和诊断 API，不依赖 IO 或引擎。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 悬空引用在运行时会被兜底，但在这里一律报 Error

use std::collections::{HashSet, VecDeque};

use crate::script::{NodeKind, Script, ScriptNode};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 剧本 ID / 文件路径
    pub script_id: String,
    /// 相关节点 id
    pub node: Option<String>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选）
    pub detail: Option<String>,
}

impl Diagnostic {
    fn with_level(
        level: DiagnosticLevel,
        script_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            script_id: script_id.into(),
            node: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建错误诊断
    pub fn error(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, script_id, message)
    }

    /// 创建警告诊断
    pub fn warn(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warn, script_id, message)
    }

    /// 创建信息诊断
    pub fn info(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Info, script_id, message)
    }

    /// 设置节点
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.script_id)?;
        if let Some(node) = &self.node {
            write!(f, "#{}", node)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {}", detail)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

//=============================================================================
// 剧本分析 API
//=============================================================================

/// 分析剧本，返回诊断结果
///
/// 执行以下检查：
/// - 未定义的跳转目标（Error）
/// - 节点缺少必需字段，如选择节点没有选项、出示证物节点没有正确证物（Error）
/// - 可疑的配置，如没有正确选项、兜底节点不是终止台词（Warn）
/// - 从起始节点不可达的节点（Info）
pub fn analyze_script(script: &Script) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    for node in script.nodes() {
        check_targets(script, node, &mut result);
        check_shape(script, node, &mut result);
    }

    if !script.fallback_node().is_terminal() {
        result.push(
            Diagnostic::warn(&script.id, "兜底节点不是终止台词")
                .with_node(script.fallback())
                .with_detail("兜底节点应是没有 next 的 line 节点，否则兜底跳转后剧情仍会继续"),
        );
    }

    let reachable = reachable_nodes(script);
    for node in script.nodes() {
        if !reachable.contains(node.id.as_str()) && node.id != script.fallback() {
            result.push(
                Diagnostic::info(&script.id, "节点从起始节点不可达").with_node(&node.id),
            );
        }
    }

    result
}

/// 检查跳转目标是否存在
fn check_targets(script: &Script, node: &ScriptNode, result: &mut DiagnosticResult) {
    for target in node.targets() {
        if !script.contains(target) {
            result.push(
                Diagnostic::error(&script.id, format!("未定义的跳转目标: **{}**", target))
                    .with_node(&node.id)
                    .with_detail(format!(
                        "运行时将跳转到兜底节点 '{}'",
                        script.fallback()
                    )),
            );
        }
    }
}

/// 检查节点字段是否与类型匹配
fn check_shape(script: &Script, node: &ScriptNode, result: &mut DiagnosticResult) {
    let error = |message: &str| Diagnostic::error(&script.id, message).with_node(&node.id);
    let warn = |message: &str| Diagnostic::warn(&script.id, message).with_node(&node.id);

    match node.kind {
        NodeKind::Choice | NodeKind::CrossExam => {
            if node.choices.is_empty() {
                result.push(error("选择节点没有任何选项"));
            } else if !node.choices.iter().any(|c| c.success) {
                result.push(warn("选择节点没有正确选项"));
            }
        }
        NodeKind::EvidencePrompt => {
            if node.evidence.is_none() {
                result.push(error("出示证物节点缺少 evidence"));
            }
        }
        NodeKind::PressPrompt | NodeKind::Line => {}
    }

    if node.kind.is_prompt() && node.next.is_none() {
        let detail = if node.fail_target().is_none() {
            "成功和失败都将跳转到兜底节点"
        } else {
            "成功后将跳转到兜底节点"
        };
        result.push(warn("小游戏节点缺少 next").with_detail(detail));
    } else if node.kind.is_mini_game() && node.fail_target().is_none() {
        result.push(
            warn("小游戏节点缺少失败跳转（next / on_fail_next）")
                .with_detail("超时后将跳转到兜底节点"),
        );
    }

    if !node.kind.has_choices() && !node.choices.is_empty() {
        result.push(warn(&format!("{} 节点的 choices 不会被使用", node.kind)));
    }

    if !node.kind.is_mini_game() && (node.attempts.is_some() || node.time_limit.is_some()) {
        result.push(warn(&format!(
            "{} 节点的 attempts/time_limit 不会被使用",
            node.kind
        )));
    }
}

/// 从起始节点出发的可达节点
fn reachable_nodes(script: &Script) -> HashSet<&str> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([script.start()]);

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(node) = script.get(id) {
            queue.extend(node.targets().into_iter().filter(|t| script.contains(t)));
        }
    }

    visited
}

/// 获取剧本中所有节点 id（声明顺序）
pub fn get_node_ids(script: &Script) -> Vec<&str> {
    script.nodes().iter().map(|n| n.id.as_str()).collect()
}

/// 获取剧本中所有跳转目标（去重）
pub fn get_jump_targets(script: &Script) -> HashSet<String> {
    script
        .nodes()
        .iter()
        .flat_map(ScriptNode::targets)
        .map(str::to_string)
        .collect()
}
