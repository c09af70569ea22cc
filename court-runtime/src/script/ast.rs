//! # AST 模块
//!
//! 定义剧本图的节点结构。
//!
//! ## 设计说明
//!
//! 剧本是一张扁平的有向图：节点按 id 索引，跳转只保存目标 id。
//! 交叉询问失败后回到同一个节点这类回边只是普通的 id 引用，
//! 不会形成递归结构。

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// 普通台词，点击继续
    Line,
    /// 选择分支
    Choice,
    /// 交叉询问（带尝试次数的选择）
    CrossExam,
    /// 出示证物
    EvidencePrompt,
    /// 追问
    PressPrompt,
}

impl NodeKind {
    /// 是否是小游戏节点（受尝试次数/时限约束）
    pub fn is_mini_game(&self) -> bool {
        matches!(
            self,
            Self::CrossExam | Self::EvidencePrompt | Self::PressPrompt
        )
    }

    /// 是否使用 `choices` 选项列表
    pub fn has_choices(&self) -> bool {
        matches!(self, Self::Choice | Self::CrossExam)
    }

    /// 是否接受出示证物/追问操作
    pub fn is_prompt(&self) -> bool {
        matches!(self, Self::EvidencePrompt | Self::PressPrompt)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Choice => "choice",
            Self::CrossExam => "cross_exam",
            Self::EvidencePrompt => "evidence_prompt",
            Self::PressPrompt => "press_prompt",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceOption {
    /// 选项显示文本
    pub label: String,
    /// 是否为正确选项
    pub success: bool,
    /// 跳转目标
    pub next: String,
    /// 失败时的跳转目标（缺省时使用 `next`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_fail_next: Option<String>,
}

impl ChoiceOption {
    /// 创建正确选项
    pub fn correct(label: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            success: true,
            next: next.into(),
            on_fail_next: None,
        }
    }

    /// 创建错误选项
    pub fn wrong(label: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            success: false,
            next: next.into(),
            on_fail_next: None,
        }
    }

    /// 设置失败跳转目标
    pub fn on_fail(mut self, target: impl Into<String>) -> Self {
        self.on_fail_next = Some(target.into());
        self
    }

    /// 失败时实际使用的跳转目标
    pub fn fail_target(&self) -> &str {
        self.on_fail_next.as_deref().unwrap_or(&self.next)
    }
}

/// 剧本节点
///
/// 一个节点就是剧情中的一步。哪些字段有意义取决于 `kind`：
///
/// | kind              | next        | on_fail_next | choices | evidence |
/// | ----------------- | ----------- | ------------ | ------- | -------- |
/// | `line`            | 点击后跳转  | -            | -       | -        |
/// | `choice`          | -           | -            | 必需    | -        |
/// | `cross_exam`      | 超时跳转    | 超时跳转     | 必需    | -        |
/// | `evidence_prompt` | 成功跳转    | 失败跳转     | -       | 必需     |
/// | `press_prompt`    | 成功跳转    | 失败跳转     | -       | -        |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptNode {
    /// 节点 id（脚本内唯一）
    pub id: String,
    /// 节点类型
    pub kind: NodeKind,
    /// 说话者（None 表示旁白）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// 显示文本
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_fail_next: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceOption>,
    /// 正确的证物 id（仅 `evidence_prompt`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// 时限（秒），由 Host 计时
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    /// 允许的尝试次数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl ScriptNode {
    fn bare(id: impl Into<String>, kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            speaker: None,
            text: text.into(),
            next: None,
            on_fail_next: None,
            choices: Vec::new(),
            evidence: None,
            time_limit: None,
            attempts: None,
        }
    }

    /// 创建台词节点
    pub fn line(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::bare(id, NodeKind::Line, text)
    }

    /// 创建选择节点
    pub fn choice(
        id: impl Into<String>,
        text: impl Into<String>,
        choices: Vec<ChoiceOption>,
    ) -> Self {
        Self {
            choices,
            ..Self::bare(id, NodeKind::Choice, text)
        }
    }

    /// 创建交叉询问节点
    pub fn cross_exam(
        id: impl Into<String>,
        text: impl Into<String>,
        choices: Vec<ChoiceOption>,
    ) -> Self {
        Self {
            choices,
            ..Self::bare(id, NodeKind::CrossExam, text)
        }
    }

    /// 创建出示证物节点
    pub fn evidence_prompt(
        id: impl Into<String>,
        text: impl Into<String>,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            evidence: Some(evidence.into()),
            ..Self::bare(id, NodeKind::EvidencePrompt, text)
        }
    }

    /// 创建追问节点
    pub fn press_prompt(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::bare(id, NodeKind::PressPrompt, text)
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_fail_next(mut self, target: impl Into<String>) -> Self {
        self.on_fail_next = Some(target.into());
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit = Some(secs);
        self
    }

    /// 节点激活时的尝试次数
    ///
    /// 小游戏节点未配置时只有一次机会，其他节点为 0。
    pub fn initial_attempts(&self) -> u32 {
        if self.kind.is_mini_game() {
            self.attempts.unwrap_or(1)
        } else {
            0
        }
    }

    /// 节点级失败跳转目标（缺省时使用 `next`）
    pub fn fail_target(&self) -> Option<&str> {
        self.on_fail_next.as_deref().or(self.next.as_deref())
    }

    /// 是否是终止台词（没有后继）
    pub fn is_terminal(&self) -> bool {
        self.kind == NodeKind::Line && self.next.is_none()
    }

    /// 节点引用的所有跳转目标
    pub fn targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = self
            .next
            .iter()
            .chain(self.on_fail_next.iter())
            .map(String::as_str)
            .collect();
        for choice in &self.choices {
            targets.push(&choice.next);
            if let Some(fail) = &choice.on_fail_next {
                targets.push(fail);
            }
        }
        targets
    }
}

/// 剧本
///
/// 节点按声明顺序保存，另建 id 索引便于跳转。
/// 构建后不可修改，起始节点和兜底节点一定存在。
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// 剧本标识符
    pub id: String,
    start: String,
    fallback: String,
    nodes: Vec<ScriptNode>,
    node_index: HashMap<String, usize>,
    start_index: usize,
    fallback_index: usize,
}

impl Script {
    /// 创建剧本
    ///
    /// 节点 id 重复、起始节点或兜底节点不存在时失败。
    /// 悬空的跳转引用不会导致失败，由引擎在运行时兜底。
    pub fn new(
        id: impl Into<String>,
        nodes: Vec<ScriptNode>,
        start: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Result<Self, ScriptError> {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), index).is_some() {
                return Err(ScriptError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            validate_node(node)?;
        }

        let start: String = start.into();
        let fallback: String = fallback.into();
        let start_index = *node_index
            .get(&start)
            .ok_or_else(|| ScriptError::MissingStart { id: start.clone() })?;
        let fallback_index = *node_index
            .get(&fallback)
            .ok_or_else(|| ScriptError::MissingFallback {
                id: fallback.clone(),
            })?;

        Ok(Self {
            id: id.into(),
            start,
            fallback,
            nodes,
            node_index,
            start_index,
            fallback_index,
        })
    }

    /// 起始节点 id
    pub fn start(&self) -> &str {
        &self.start
    }

    /// 兜底节点 id
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// 所有节点（声明顺序）
    pub fn nodes(&self) -> &[ScriptNode] {
        &self.nodes
    }

    /// 根据 id 查找节点
    pub fn get(&self, id: &str) -> Option<&ScriptNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// 节点是否存在
    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// 起始节点
    pub fn start_node(&self) -> &ScriptNode {
        &self.nodes[self.start_index]
    }

    /// 兜底节点
    pub fn fallback_node(&self) -> &ScriptNode {
        &self.nodes[self.fallback_index]
    }

    /// 节点数量
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn validate_node(node: &ScriptNode) -> Result<(), ScriptError> {
    let positive = |field: &str, value: Option<u32>| match value {
        Some(0) => Err(ScriptError::InvalidField {
            node: node.id.clone(),
            field: field.to_string(),
            message: "必须为正整数".to_string(),
        }),
        _ => Ok(()),
    };
    positive("time_limit", node.time_limit)?;
    positive("attempts", node.attempts)?;

    if node.id.is_empty() {
        return Err(ScriptError::InvalidField {
            node: node.id.clone(),
            field: "id".to_string(),
            message: "不能为空".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> Vec<ScriptNode> {
        vec![
            ScriptNode::line("start", "开庭").with_next("q1"),
            ScriptNode::choice(
                "q1",
                "凶器是什么？",
                vec![
                    ChoiceOption::correct("花瓶", "end"),
                    ChoiceOption::wrong("雨伞", "q1").on_fail("end"),
                ],
            ),
            ScriptNode::line("end", "闭庭"),
        ]
    }

    #[test]
    fn test_node_kind_classification() {
        assert!(!NodeKind::Line.is_mini_game());
        assert!(!NodeKind::Choice.is_mini_game());
        assert!(NodeKind::CrossExam.is_mini_game());
        assert!(NodeKind::EvidencePrompt.is_mini_game());
        assert!(NodeKind::PressPrompt.is_mini_game());

        assert!(NodeKind::Choice.has_choices());
        assert!(NodeKind::CrossExam.has_choices());
        assert!(!NodeKind::PressPrompt.has_choices());

        assert_eq!(NodeKind::EvidencePrompt.to_string(), "evidence_prompt");
    }

    #[test]
    fn test_initial_attempts() {
        assert_eq!(ScriptNode::line("a", "").initial_attempts(), 0);
        assert_eq!(ScriptNode::press_prompt("p", "").initial_attempts(), 1);
        assert_eq!(
            ScriptNode::evidence_prompt("e", "", "knife")
                .with_attempts(3)
                .initial_attempts(),
            3
        );
    }

    #[test]
    fn test_fail_targets() {
        let choice = ChoiceOption::wrong("B", "q1");
        assert_eq!(choice.fail_target(), "q1");
        assert_eq!(choice.on_fail("end").fail_target(), "end");

        let node = ScriptNode::press_prompt("p", "").with_next("ok");
        assert_eq!(node.fail_target(), Some("ok"));
        let node = node.with_fail_next("bad");
        assert_eq!(node.fail_target(), Some("bad"));
        assert_eq!(ScriptNode::press_prompt("p", "").fail_target(), None);
    }

    #[test]
    fn test_node_targets() {
        let nodes = sample_nodes();
        assert_eq!(nodes[0].targets(), vec!["q1"]);
        assert_eq!(nodes[1].targets(), vec!["end", "q1", "end"]);
        assert!(nodes[2].targets().is_empty());
        assert!(nodes[2].is_terminal());
    }

    #[test]
    fn test_script_index() {
        let script = Script::new("trial", sample_nodes(), "start", "end").unwrap();

        assert_eq!(script.len(), 3);
        assert_eq!(script.get("q1").map(|n| n.kind), Some(NodeKind::Choice));
        assert!(script.get("nonexistent").is_none());
        assert_eq!(script.start_node().id, "start");
        assert_eq!(script.fallback_node().id, "end");
    }

    #[test]
    fn test_script_rejects_duplicate_ids() {
        let mut nodes = sample_nodes();
        nodes.push(ScriptNode::line("q1", "重复"));

        let err = Script::new("trial", nodes, "start", "end").unwrap_err();
        assert_eq!(
            err,
            ScriptError::DuplicateNode {
                id: "q1".to_string()
            }
        );
    }

    #[test]
    fn test_script_requires_start_and_fallback() {
        let err = Script::new("trial", sample_nodes(), "missing", "end").unwrap_err();
        assert!(matches!(err, ScriptError::MissingStart { .. }));

        let err = Script::new("trial", sample_nodes(), "start", "missing").unwrap_err();
        assert!(matches!(err, ScriptError::MissingFallback { .. }));
    }

    #[test]
    fn test_script_rejects_zero_attempts() {
        let nodes = vec![
            ScriptNode::press_prompt("p", "").with_attempts(0),
            ScriptNode::line("end", ""),
        ];
        let err = Script::new("trial", nodes, "p", "end").unwrap_err();
        assert!(matches!(
            err,
            ScriptError::InvalidField { ref field, .. } if field == "attempts"
        ));
    }

    #[test]
    fn test_dangling_reference_is_not_a_build_error() {
        let nodes = vec![
            ScriptNode::line("start", "").with_next("ghost"),
            ScriptNode::line("end", ""),
        ];
        assert!(Script::new("trial", nodes, "start", "end").is_ok());
    }
}
