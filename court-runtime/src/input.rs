//! # Input 模块
//!
//! 定义 Host 向引擎传递的玩家操作。
//!
//! ## 设计说明
//!
//! - 引擎不处理鼠标/键盘事件，只处理语义化的操作
//! - 一次点击对应一个操作，Host 负责串行化输入
//! - 时限由 Host 计时，到时后发送 `TimeExpired`

use serde::{Deserialize, Serialize};

/// 证物标识符
pub type EvidenceId = String;

/// 玩家操作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// 推进台词
    Advance,

    /// 选择选项
    ///
    /// `index` 是选项的索引（从 0 开始）
    Choose { index: usize },

    /// 出示证物
    SubmitEvidence { item_id: EvidenceId },

    /// 追问
    Press,

    /// 时限已到（由 Host 计时器触发）
    TimeExpired,

    /// 切换音频开关
    ToggleAudio,

    /// 重新开始
    Reset,
}

impl PlayerAction {
    /// 创建选择操作
    pub fn choose(index: usize) -> Self {
        Self::Choose { index }
    }

    /// 创建出示证物操作
    pub fn evidence(item_id: impl Into<EvidenceId>) -> Self {
        Self::SubmitEvidence {
            item_id: item_id.into(),
        }
    }

    /// 是否会推进剧情（游戏结束后被拒绝）
    pub fn is_narrative(&self) -> bool {
        !matches!(self, Self::ToggleAudio | Self::Reset)
    }
}
