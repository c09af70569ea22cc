//! # Command 模块
//!
//! 把终端输入的一行文本解析为宿主命令。

use court_runtime::PlayerAction;
use thiserror::Error;

/// 宿主命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// 交给引擎处理的玩家操作
    Action(PlayerAction),
    /// 打印当前状态
    State,
    /// 打印庭审记录，带数字时只打印最近 N 句台词
    History(Option<usize>),
    /// 打印帮助
    Help,
    /// 退出
    Quit,
}

/// 输入解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("未知命令 '{0}'，输入 help 查看可用命令")]
    Unknown(String),

    #[error("'{command}' 需要参数 {param}")]
    MissingArgument {
        command: &'static str,
        param: &'static str,
    },

    #[error("选项编号必须是从 1 开始的整数，收到 '{0}'")]
    InvalidChoice(String),

    #[error("台词条数必须是正整数，收到 '{0}'")]
    InvalidCount(String),
}

/// 解析一行输入
///
/// 空行等同于 `next`，单独的数字等同于 `choose N`。选项编号从 1 开始。
pub fn parse(line: &str) -> Result<HostCommand, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(HostCommand::Action(PlayerAction::Advance));
    };
    let arg = words.next();

    let command = match head.to_lowercase().as_str() {
        "next" | "n" => HostCommand::Action(PlayerAction::Advance),
        "choose" | "c" => {
            let number = arg.ok_or(CommandError::MissingArgument {
                command: "choose",
                param: "<编号>",
            })?;
            HostCommand::Action(PlayerAction::choose(parse_choice(number)?))
        }
        "present" | "p" => {
            let item = arg.ok_or(CommandError::MissingArgument {
                command: "present",
                param: "<证物>",
            })?;
            HostCommand::Action(PlayerAction::evidence(item))
        }
        "press" => HostCommand::Action(PlayerAction::Press),
        "timeout" => HostCommand::Action(PlayerAction::TimeExpired),
        "audio" => HostCommand::Action(PlayerAction::ToggleAudio),
        "reset" | "restart" => HostCommand::Action(PlayerAction::Reset),
        "state" => HostCommand::State,
        "history" | "h" => HostCommand::History(arg.map(parse_count).transpose()?),
        "help" | "?" => HostCommand::Help,
        "quit" | "exit" | "q" => HostCommand::Quit,
        other if other.chars().all(|c| c.is_ascii_digit()) => {
            HostCommand::Action(PlayerAction::choose(parse_choice(other)?))
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn parse_choice(number: &str) -> Result<usize, CommandError> {
    match number.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidChoice(number.to_string())),
    }
}

fn parse_count(number: &str) -> Result<usize, CommandError> {
    match number.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::InvalidCount(number.to_string())),
    }
}

/// 帮助文本
pub const HELP: &str = "\
命令:
  <回车> / next        推进台词
  <N> / choose <N>     选择第 N 个选项
  present <证物>       出示证物
  press                追问
  timeout              模拟时限已到
  audio                切换音频
  reset                重新开始
  state                查看状态
  history [N]          查看庭审记录（或最近 N 句台词）
  help                 显示帮助
  quit                 退出";
