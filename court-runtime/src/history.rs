//! # History 模块
//!
//! 庭审记录，用于回看和调试。
//!
//! ## 设计原则
//!
//! - 只记录玩家可感知的事件（台词、作答、扣血、结局）
//! - 所有数据可序列化
//! - 容量有上限，超出后丢弃最早的事件

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// 历史事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// 显示了一句台词（任意节点的文本）
    Line {
        node_id: String,
        speaker: Option<String>,
        text: String,
        timestamp: u64,
    },

    /// 做出选择
    ChoiceMade {
        node_id: String,
        label: String,
        success: bool,
        timestamp: u64,
    },

    /// 出示证物
    EvidenceSubmitted {
        node_id: String,
        item_id: String,
        accepted: bool,
        timestamp: u64,
    },

    /// 追问
    Pressed {
        node_id: String,
        accepted: bool,
        timestamp: u64,
    },

    /// 时限已到
    TimeExpired { node_id: String, timestamp: u64 },

    /// 扣除 HP
    HpLost { remaining: u8, timestamp: u64 },

    /// 跳转目标缺失，已转到兜底节点
    Redirected {
        missing: String,
        fallback: String,
        timestamp: u64,
    },

    /// 游戏结束
    GameOver { node_id: String, timestamp: u64 },

    /// 重新开始
    Restarted { timestamp: u64 },
}

impl HistoryEvent {
    /// 获取事件时间戳
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Line { timestamp, .. }
            | Self::ChoiceMade { timestamp, .. }
            | Self::EvidenceSubmitted { timestamp, .. }
            | Self::Pressed { timestamp, .. }
            | Self::TimeExpired { timestamp, .. }
            | Self::HpLost { timestamp, .. }
            | Self::Redirected { timestamp, .. }
            | Self::GameOver { timestamp, .. }
            | Self::Restarted { timestamp } => *timestamp,
        }
    }

    pub fn line(node_id: &str, speaker: Option<&str>, text: &str) -> Self {
        Self::Line {
            node_id: node_id.to_string(),
            speaker: speaker.map(str::to_string),
            text: text.to_string(),
            timestamp: current_timestamp(),
        }
    }

    pub fn choice_made(node_id: &str, label: &str, success: bool) -> Self {
        Self::ChoiceMade {
            node_id: node_id.to_string(),
            label: label.to_string(),
            success,
            timestamp: current_timestamp(),
        }
    }

    pub fn evidence_submitted(node_id: &str, item_id: &str, accepted: bool) -> Self {
        Self::EvidenceSubmitted {
            node_id: node_id.to_string(),
            item_id: item_id.to_string(),
            accepted,
            timestamp: current_timestamp(),
        }
    }

    pub fn pressed(node_id: &str, accepted: bool) -> Self {
        Self::Pressed {
            node_id: node_id.to_string(),
            accepted,
            timestamp: current_timestamp(),
        }
    }

    pub fn time_expired(node_id: &str) -> Self {
        Self::TimeExpired {
            node_id: node_id.to_string(),
            timestamp: current_timestamp(),
        }
    }

    pub fn hp_lost(remaining: u8) -> Self {
        Self::HpLost {
            remaining,
            timestamp: current_timestamp(),
        }
    }

    pub fn redirected(missing: &str, fallback: &str) -> Self {
        Self::Redirected {
            missing: missing.to_string(),
            fallback: fallback.to_string(),
            timestamp: current_timestamp(),
        }
    }

    pub fn game_over(node_id: &str) -> Self {
        Self::GameOver {
            node_id: node_id.to_string(),
            timestamp: current_timestamp(),
        }
    }

    pub fn restarted() -> Self {
        Self::Restarted {
            timestamp: current_timestamp(),
        }
    }
}

/// 历史记录容器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    /// 事件列表（按时间顺序）
    events: VecDeque<HistoryEvent>,
    /// 最大记录数
    max_events: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// 创建新的历史记录（默认最多 1000 条）
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            max_events: 1000,
        }
    }

    /// 设置最大记录数
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// 添加事件
    pub fn push(&mut self, event: HistoryEvent) {
        self.events.push_back(event);
        while self.events.len() > self.max_events {
            self.events.pop_front();
        }
    }

    /// 按时间顺序遍历事件
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &HistoryEvent> {
        self.events.iter()
    }

    /// 最近一条事件
    pub fn last(&self) -> Option<&HistoryEvent> {
        self.events.back()
    }

    /// 扣血次数
    pub fn mistakes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HistoryEvent::HpLost { .. }))
            .count()
    }

    /// 获取最近的 N 条台词
    pub fn recent_lines(&self, count: usize) -> Vec<&HistoryEvent> {
        let mut lines: Vec<_> = self
            .events
            .iter()
            .rev()
            .filter(|e| matches!(e, HistoryEvent::Line { .. }))
            .take(count)
            .collect();
        lines.reverse();
        lines
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// 获取当前时间戳（Unix 秒）
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_basic() {
        let mut history = History::new();
        assert!(history.is_empty());

        history.push(HistoryEvent::line("a", Some("审判长"), "开庭"));
        history.push(HistoryEvent::choice_made("q1", "花瓶", false));
        history.push(HistoryEvent::hp_lost(4));

        assert_eq!(history.len(), 3);
        assert_eq!(history.mistakes(), 1);
        assert!(matches!(history.last(), Some(HistoryEvent::HpLost { remaining: 4, .. })));
    }

    #[test]
    fn test_history_max_events() {
        let mut history = History::new().with_max_events(5);

        for i in 0..10 {
            history.push(HistoryEvent::line(&format!("n{i}"), None, &format!("台词 {i}")));
        }

        assert_eq!(history.len(), 5);
        if let Some(HistoryEvent::Line { text, .. }) = history.events().next() {
            assert_eq!(text, "台词 5");
        } else {
            panic!("expected a line event");
        }
    }

    #[test]
    fn test_recent_lines() {
        let mut history = History::new();

        history.push(HistoryEvent::line("a", None, "台词1"));
        history.push(HistoryEvent::pressed("p", true));
        history.push(HistoryEvent::line("b", None, "台词2"));
        history.push(HistoryEvent::line("c", None, "台词3"));

        let recent = history.recent_lines(2);
        assert_eq!(recent.len(), 2);
        assert!(matches!(recent[0], HistoryEvent::Line { text, .. } if text == "台词2"));
        assert!(matches!(recent[1], HistoryEvent::Line { text, .. } if text == "台词3"));
    }

    #[test]
    fn test_history_serialization() {
        let mut history = History::new();
        history.push(HistoryEvent::evidence_submitted("e", "knife", true));
        history.push(HistoryEvent::restarted());

        let json = serde_json::to_string(&history).unwrap();
        let loaded: History = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.len(), 2);
        assert!(loaded.events().all(|e| e.timestamp() > 0));
    }
}
