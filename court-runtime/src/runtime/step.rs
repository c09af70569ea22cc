//! # Step 模块
//!
//! 一次操作的结果。

use serde::{Deserialize, Serialize};

/// 操作结果
///
/// 引擎每处理一个操作返回一个 `Step`，Host 据此播放反馈（扣血动画、
/// "再试一次"提示等），然后读取 [`EngineState`](crate::state::EngineState) 重新渲染。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// 已进入新节点
    Moved {
        /// 新的当前节点
        node_id: String,
        /// 是否扣除了 HP
        penalty: bool,
        /// 原跳转目标不存在时，记录缺失的 id（此时 `node_id` 是兜底节点）
        redirected_from: Option<String>,
    },

    /// 回答错误，但仍有尝试次数，停留在当前节点
    Retry { attempts_remaining: u32 },

    /// HP 归零，停留在出错的节点
    GameOver { node_id: String },

    /// 音频开关已切换
    AudioToggled { enabled: bool },

    /// 已重新开始
    Restarted,
}

impl Step {
    /// 是否扣除了 HP
    pub fn is_penalty(&self) -> bool {
        matches!(
            self,
            Self::Moved { penalty: true, .. } | Self::GameOver { .. }
        )
    }

    /// 是否经过了兜底跳转
    pub fn is_redirected(&self) -> bool {
        matches!(
            self,
            Self::Moved {
                redirected_from: Some(_),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_flags() {
        let moved = Step::Moved {
            node_id: "end".to_string(),
            penalty: true,
            redirected_from: Some("ghost".to_string()),
        };
        assert!(moved.is_penalty());
        assert!(moved.is_redirected());

        let over = Step::GameOver {
            node_id: "q1".to_string(),
        };
        assert!(over.is_penalty());
        assert!(!over.is_redirected());

        assert!(!Step::Retry { attempts_remaining: 1 }.is_penalty());
        assert!(!Step::Restarted.is_penalty());
    }
}
