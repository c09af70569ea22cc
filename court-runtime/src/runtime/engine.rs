//! # Engine 模块
//!
//! 庭审对话状态机。
//!
//! ## 执行模型
//!
//! ```text
//! operation() -> Result<Step, EngineError>
//! ```
//!
//! 1. 游戏结束时拒绝所有推进剧情的操作
//! 2. 检查当前节点类型是否支持该操作
//! 3. 结算成败：成功走 `next`，失败扣尝试次数或 HP
//! 4. 跳转目标缺失时转到兜底节点
//!
//! 出错时状态保持不变。

use tracing::{debug, info, warn};

use crate::config::EngineOptions;
use crate::error::EngineError;
use crate::history::{History, HistoryEvent};
use crate::input::PlayerAction;
use crate::runtime::step::Step;
use crate::script::{ChoiceOption, NodeKind, Script, ScriptNode};
use crate::state::EngineState;

/// 庭审对话引擎
///
/// 持有剧本图和会话状态，是修改 [`EngineState`] 的唯一入口。
///
/// # 使用示例
///
/// ```ignore
/// let script = Script::from_json(text)?;
/// let mut engine = DialogueEngine::new(script);
///
/// loop {
///     let action = host.next_action();
///     match engine.handle(action) {
///         Ok(step) => host.play_feedback(&step),
///         Err(e) => host.show_hint(&e),
///     }
///     host.render(engine.current_node(), engine.state());
/// }
/// ```
pub struct DialogueEngine {
    /// 剧本图
    script: Script,
    /// 会话状态
    state: EngineState,
    /// 引擎配置
    options: EngineOptions,
    /// 庭审记录
    history: History,
}

impl DialogueEngine {
    /// 使用默认配置创建引擎
    pub fn new(script: Script) -> Self {
        Self::with_options(script, EngineOptions::default())
    }

    /// 使用指定配置创建引擎
    pub fn with_options(script: Script, options: EngineOptions) -> Self {
        let state = initial_state(&script, &options);
        let history = History::new().with_max_events(options.history_limit);
        let mut engine = Self {
            script,
            state,
            options,
            history,
        };
        engine.record_current_line();
        engine
    }

    /// 分发玩家操作
    pub fn handle(&mut self, action: PlayerAction) -> Result<Step, EngineError> {
        match action {
            PlayerAction::Advance => self.advance(),
            PlayerAction::Choose { index } => self.choose(index),
            PlayerAction::SubmitEvidence { item_id } => self.submit_evidence(&item_id),
            PlayerAction::Press => self.press(),
            PlayerAction::TimeExpired => self.time_expired(),
            PlayerAction::ToggleAudio => Ok(Step::AudioToggled {
                enabled: self.toggle_audio(),
            }),
            PlayerAction::Reset => {
                self.reset();
                Ok(Step::Restarted)
            }
        }
    }

    /// 推进台词
    ///
    /// 只能在 `line` 节点上调用，且节点必须有 `next`。
    pub fn advance(&mut self) -> Result<Step, EngineError> {
        let node = self.playing_node()?;
        let next = match (&node.kind, &node.next) {
            (NodeKind::Line, Some(next)) => next,
            _ => return Err(invalid(&node, "advance")),
        };
        Ok(self.move_to(&node.id, next, false))
    }

    /// 选择选项
    ///
    /// - `choice`：选错立即扣 1 点 HP，跳转到失败分支
    /// - `cross_exam`：选错先消耗尝试次数，次数用尽后按 `choice` 的失败处理
    pub fn choose(&mut self, index: usize) -> Result<Step, EngineError> {
        let node = self.playing_node()?;
        if !node.kind.has_choices() {
            return Err(invalid(&node, "choose"));
        }
        let option = node
            .choices
            .get(index)
            .ok_or(EngineError::IndexOutOfRange {
                index,
                max: node.choices.len(),
            })?;

        self.history.push(HistoryEvent::choice_made(
            &node.id,
            &option.label,
            option.success,
        ));

        let step = if option.success {
            self.move_to(&node.id, &option.next, false)
        } else if node.kind == NodeKind::CrossExam {
            self.wrong_attempt(&node, option.fail_target())
        } else {
            self.fail(&node, option.fail_target())
        };
        Ok(step)
    }

    /// 出示证物
    ///
    /// 只有在 `evidence_prompt` 上出示正确的证物才算成功；
    /// 在 `press_prompt` 上出示证物视为答错。
    pub fn submit_evidence(&mut self, item_id: &str) -> Result<Step, EngineError> {
        let node = self.playing_node()?;
        if !node.kind.is_prompt() {
            return Err(invalid(&node, "submit_evidence"));
        }
        let accepted =
            node.kind == NodeKind::EvidencePrompt && node.evidence.as_deref() == Some(item_id);

        self.history
            .push(HistoryEvent::evidence_submitted(&node.id, item_id, accepted));
        Ok(self.resolve_prompt(&node, accepted))
    }

    /// 追问
    ///
    /// 在 `press_prompt` 上追问即成功，回到正常流程；
    /// 在 `evidence_prompt` 上追问视为答错。
    pub fn press(&mut self) -> Result<Step, EngineError> {
        let node = self.playing_node()?;
        if !node.kind.is_prompt() {
            return Err(invalid(&node, "press"));
        }
        let accepted = node.kind == NodeKind::PressPrompt;

        self.history.push(HistoryEvent::pressed(&node.id, accepted));
        Ok(self.resolve_prompt(&node, accepted))
    }

    /// 时限已到
    ///
    /// 引擎不计时，由 Host 的计时器调用。效果等同于尝试次数用尽。
    pub fn time_expired(&mut self) -> Result<Step, EngineError> {
        let node = self.playing_node()?;
        if !node.kind.is_mini_game() {
            return Err(invalid(&node, "time_expired"));
        }

        self.history.push(HistoryEvent::time_expired(&node.id));
        self.state.attempts_remaining = 0;

        let fallback = self.script.fallback().to_string();
        let target = node.fail_target().unwrap_or(&fallback);
        Ok(self.fail(&node, target))
    }

    /// 切换音频开关，返回新的值
    ///
    /// 不影响剧情，游戏结束后也可以调用。
    pub fn toggle_audio(&mut self) -> bool {
        self.state.audio_enabled = !self.state.audio_enabled;
        debug!(enabled = self.state.audio_enabled, "切换音频");
        self.state.audio_enabled
    }

    /// 重新开始
    ///
    /// 任何阶段都可以调用，状态恢复为初始值。
    pub fn reset(&mut self) {
        self.state = initial_state(&self.script, &self.options);
        self.history.push(HistoryEvent::restarted());
        self.record_current_line();
        info!(start = %self.state.current_node_id, "重新开始");
    }

    /// 获取当前状态
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// 获取当前节点
    pub fn current_node(&self) -> &ScriptNode {
        self.script
            .get(&self.state.current_node_id)
            .unwrap_or_else(|| self.script.fallback_node())
    }

    /// 当前节点的选项
    pub fn choices(&self) -> &[ChoiceOption] {
        &self.current_node().choices
    }

    /// 获取剧本
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// 获取庭审记录
    pub fn history(&self) -> &History {
        &self.history
    }

    /// 是否已到达终止台词
    pub fn is_finished(&self) -> bool {
        self.current_node().is_terminal()
    }

    /// HP 是否已耗尽（只能 `reset` 或切换音频）
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// 游戏进行中时返回当前节点的副本
    fn playing_node(&self) -> Result<ScriptNode, EngineError> {
        if self.state.is_game_over() {
            return Err(EngineError::AlreadyGameOver);
        }
        Ok(self.current_node().clone())
    }

    /// 结算 `evidence_prompt` / `press_prompt`
    fn resolve_prompt(&mut self, node: &ScriptNode, accepted: bool) -> Step {
        let fallback = self.script.fallback().to_string();
        if accepted {
            let target = node.next.as_deref().unwrap_or(&fallback);
            self.move_to(&node.id, target, false)
        } else {
            let target = node.fail_target().unwrap_or(&fallback);
            self.wrong_attempt(node, target)
        }
    }

    /// 答错一次：还有次数则重试，否则按失败处理
    fn wrong_attempt(&mut self, node: &ScriptNode, fail_target: &str) -> Step {
        let remaining = self.state.consume_attempt();
        if remaining > 0 {
            debug!(node = %node.id, remaining, "回答错误，剩余尝试次数");
            return Step::Retry {
                attempts_remaining: remaining,
            };
        }
        self.fail(node, fail_target)
    }

    /// 失败：扣 1 点 HP，未归零则进入失败分支
    fn fail(&mut self, node: &ScriptNode, fail_target: &str) -> Step {
        let game_over = self.state.lose_hp();
        self.history.push(HistoryEvent::hp_lost(self.state.hp));

        if game_over {
            info!(node = %node.id, "HP 归零，游戏结束");
            self.history.push(HistoryEvent::game_over(&node.id));
            return Step::GameOver {
                node_id: node.id.clone(),
            };
        }

        debug!(node = %node.id, hp = self.state.hp, "扣除 HP");
        self.move_to(&node.id, fail_target, true)
    }

    /// 跳转到目标节点，目标缺失时转到兜底节点
    fn move_to(&mut self, from: &str, target: &str, penalty: bool) -> Step {
        let (node_id, redirected_from) = if self.script.contains(target) {
            (target.to_string(), None)
        } else {
            let fallback = self.script.fallback().to_string();
            let error = EngineError::DanglingReference {
                from: from.to_string(),
                target: target.to_string(),
                fallback: fallback.clone(),
            };
            warn!(error = %error, "跳转目标不存在");
            self.history
                .push(HistoryEvent::redirected(target, &fallback));
            (fallback, Some(target.to_string()))
        };

        let attempts = self
            .script
            .get(&node_id)
            .map(ScriptNode::initial_attempts)
            .unwrap_or(0);
        self.state.enter(node_id.clone(), attempts);
        debug!(from, to = %node_id, penalty, "跳转");
        self.record_current_line();

        Step::Moved {
            node_id,
            penalty,
            redirected_from,
        }
    }

    /// 记录当前节点的文本
    fn record_current_line(&mut self) {
        let event = {
            let node = self.current_node();
            HistoryEvent::line(&node.id, node.speaker.as_deref(), &node.text)
        };
        self.history.push(event);
    }
}

fn initial_state(script: &Script, options: &EngineOptions) -> EngineState {
    let start = script.start_node();
    EngineState::new(
        start.id.clone(),
        start.initial_attempts(),
        options.audio_enabled,
    )
}

fn invalid(node: &ScriptNode, operation: &'static str) -> EngineError {
    EngineError::InvalidTransition {
        node: node.id.clone(),
        kind: node.kind,
        operation,
    }
}
