//! # Render 模块
//!
//! 把引擎状态渲染为终端文本。

use std::fmt::Write;

use court_runtime::{EngineError, EngineState, HistoryEvent, MAX_HP, NodeKind, ScriptNode, Step};

/// HP 条，例如 `♥♥♥♡♡`
pub fn hp_bar(hp: u8) -> String {
    let hp = hp.min(MAX_HP);
    let mut bar = "♥".repeat(hp as usize);
    bar.push_str(&"♡".repeat((MAX_HP - hp) as usize));
    bar
}

/// 渲染当前节点
pub fn render_node(node: &ScriptNode, state: &EngineState) -> String {
    let mut out = String::new();
    let audio = if state.audio_enabled { "开" } else { "关" };
    let _ = writeln!(out, "[HP {}] [音频 {}]", hp_bar(state.hp), audio);

    match &node.speaker {
        Some(speaker) => {
            let _ = writeln!(out, "{}：{}", speaker, node.text);
        }
        None => {
            let _ = writeln!(out, "{}", node.text);
        }
    }

    for (i, choice) in node.choices.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, choice.label);
    }

    match node.kind {
        NodeKind::EvidencePrompt => {
            let _ = writeln!(out, "  （present <证物> 出示证物 / press 追问）");
        }
        NodeKind::PressPrompt => {
            let _ = writeln!(out, "  （press 追问 / present <证物> 出示证物）");
        }
        NodeKind::Line if node.is_terminal() => {
            let _ = writeln!(out, "  —— 完 ——");
        }
        _ => {}
    }

    if node.kind.is_mini_game() {
        let _ = write!(out, "  剩余尝试 {} 次", state.attempts_remaining);
        if let Some(secs) = node.time_limit {
            let _ = write!(out, "，限时 {} 秒", secs);
        }
        out.push('\n');
    }

    out
}

/// 操作结果的提示，没有需要提示的内容时返回 None
pub fn describe_step(step: &Step) -> Option<String> {
    match step {
        Step::Moved {
            penalty: true,
            redirected_from,
            ..
        } => Some(match redirected_from {
            Some(missing) => format!("异议驳回！HP -1（剧本缺少节点 '{missing}'）"),
            None => "异议驳回！HP -1".to_string(),
        }),
        Step::Moved {
            redirected_from: Some(missing),
            ..
        } => Some(format!("剧本缺少节点 '{missing}'，已跳转到结局")),
        Step::Moved { .. } => None,
        Step::Retry { attempts_remaining } => {
            Some(format!("不对……再想想。剩余尝试 {attempts_remaining} 次"))
        }
        Step::GameOver { .. } => Some("HP 耗尽，审判结束。输入 reset 重新开始".to_string()),
        Step::AudioToggled { enabled } => Some(format!(
            "音频已{}",
            if *enabled { "开启" } else { "关闭" }
        )),
        Step::Restarted => Some("重新开庭".to_string()),
    }
}

/// 操作失败的提示
pub fn describe_error(error: &EngineError) -> String {
    match error {
        EngineError::InvalidTransition { kind, .. } => match kind {
            NodeKind::Line => "这里只能推进台词（回车）".to_string(),
            NodeKind::Choice | NodeKind::CrossExam => "请选择一个选项".to_string(),
            NodeKind::EvidencePrompt | NodeKind::PressPrompt => {
                "请出示证物或追问".to_string()
            }
        },
        other => other.to_string(),
    }
}

/// 渲染一条庭审记录
pub fn render_history_event(event: &HistoryEvent) -> Option<String> {
    match event {
        HistoryEvent::Line {
            speaker: Some(speaker),
            text,
            ..
        } => Some(format!("{speaker}：{text}")),
        HistoryEvent::Line { text, .. } => Some(text.clone()),
        HistoryEvent::ChoiceMade { label, success, .. } => Some(format!(
            "> {label}{}",
            if *success { "" } else { " ✗" }
        )),
        HistoryEvent::EvidenceSubmitted {
            item_id, accepted, ..
        } => Some(format!(
            "> 出示 {item_id}{}",
            if *accepted { "" } else { " ✗" }
        )),
        HistoryEvent::Pressed { accepted, .. } => {
            Some(format!("> 追问{}", if *accepted { "" } else { " ✗" }))
        }
        HistoryEvent::TimeExpired { .. } => Some("> 时间到".to_string()),
        HistoryEvent::HpLost { remaining, .. } => Some(format!("  HP {}", hp_bar(*remaining))),
        HistoryEvent::GameOver { .. } => Some("== 审判结束 ==".to_string()),
        HistoryEvent::Restarted { .. } => Some("== 重新开庭 ==".to_string()),
        HistoryEvent::Redirected { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use court_runtime::ChoiceOption;

    #[test]
    fn test_hp_bar() {
        assert_eq!(hp_bar(5), "♥♥♥♥♥");
        assert_eq!(hp_bar(2), "♥♥♡♡♡");
        assert_eq!(hp_bar(0), "♡♡♡♡♡");
    }

    #[test]
    fn test_render_cross_exam() {
        let node = ScriptNode::cross_exam(
            "exam",
            "我当时在看新闻。",
            vec![
                ChoiceOption::correct("新闻九点就结束了", "next"),
                ChoiceOption::wrong("没有疑问", "exam"),
            ],
        )
        .with_speaker("证人")
        .with_attempts(3)
        .with_time_limit(60);
        let mut state = EngineState::new("exam", 3, true);
        state.hp = 4;

        insta::assert_snapshot!(render_node(&node, &state), @r"
        [HP ♥♥♥♥♡] [音频 开]
        证人：我当时在看新闻。
          1. 新闻九点就结束了
          2. 没有疑问
          剩余尝试 3 次，限时 60 秒
        ");
    }

    #[test]
    fn test_render_terminal_line() {
        let node = ScriptNode::line("end", "闭庭。");
        let state = EngineState::new("end", 0, false);

        let text = render_node(&node, &state);
        assert!(text.contains("[音频 关]"));
        assert!(text.contains("闭庭。"));
        assert!(text.contains("—— 完 ——"));
    }

    #[test]
    fn test_describe_step() {
        assert_eq!(
            describe_step(&Step::Moved {
                node_id: "a".to_string(),
                penalty: false,
                redirected_from: None,
            }),
            None
        );
        assert_eq!(
            describe_step(&Step::Retry {
                attempts_remaining: 2
            })
            .as_deref(),
            Some("不对……再想想。剩余尝试 2 次")
        );
        let hint = describe_step(&Step::Moved {
            node_id: "end".to_string(),
            penalty: true,
            redirected_from: Some("ghost".to_string()),
        })
        .unwrap();
        assert!(hint.contains("HP -1"));
        assert!(hint.contains("ghost"));
    }

    #[test]
    fn test_describe_error() {
        let err = EngineError::InvalidTransition {
            node: "q1".to_string(),
            kind: NodeKind::Choice,
            operation: "advance",
        };
        assert_eq!(describe_error(&err), "请选择一个选项");
        assert_eq!(
            describe_error(&EngineError::AlreadyGameOver),
            "游戏已结束，请先重新开始"
        );
    }
}
