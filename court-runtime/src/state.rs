//! # State 模块
//!
//! 定义引擎的会话状态。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**，由引擎独占
//! - 只能通过引擎的公开操作修改
//! - 不允许隐式全局状态，重新开始通过 `reset()` 完成

use serde::{Deserialize, Serialize};

/// HP 上限（也是初始值）
pub const MAX_HP: u8 = 5;

/// 会话阶段
///
/// # 状态转换
///
/// ```text
/// Playing  --(HP 归零)-->  GameOver
/// GameOver --(reset)---->  Playing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// 游戏进行中
    #[default]
    Playing,
    /// 游戏结束，只允许切换音频和重新开始
    GameOver,
}

/// 引擎状态
///
/// 每次操作后 Host 读取此结构进行渲染。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    /// 当前节点 id
    pub current_node_id: String,
    /// 剩余 HP，范围 [0, MAX_HP]
    pub hp: u8,
    /// 当前小游戏节点的剩余尝试次数
    pub attempts_remaining: u32,
    /// 音频开关
    pub audio_enabled: bool,
    /// 会话阶段
    pub phase: Phase,
}

impl EngineState {
    /// 创建初始状态
    pub fn new(start: impl Into<String>, attempts: u32, audio_enabled: bool) -> Self {
        Self {
            current_node_id: start.into(),
            hp: MAX_HP,
            attempts_remaining: attempts,
            audio_enabled,
            phase: Phase::Playing,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// 扣除 1 点 HP
    ///
    /// HP 不会低于 0；归零时进入 `GameOver`。返回是否因此结束游戏。
    pub fn lose_hp(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.phase = Phase::GameOver;
        }
        self.is_game_over()
    }

    /// 进入节点，并重置尝试次数
    pub fn enter(&mut self, node_id: impl Into<String>, attempts: u32) {
        self.current_node_id = node_id.into();
        self.attempts_remaining = attempts;
    }

    /// 消耗一次尝试，返回剩余次数
    pub fn consume_attempt(&mut self) -> u32 {
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        self.attempts_remaining
    }
}
