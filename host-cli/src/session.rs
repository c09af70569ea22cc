//! # Session 模块
//!
//! 终端游戏循环：渲染当前节点 → 读取一行输入 → 交给引擎处理。
//!
//! 输入输出都是泛型，测试时可以用内存缓冲区驱动。

use std::io::{BufRead, Write};

use anyhow::Result;
use court_runtime::DialogueEngine;
use tracing::debug;

use crate::command::{self, HELP, HostCommand};
use crate::render;

/// 运行一局游戏，直到输入结束或玩家退出
pub fn run<R: BufRead, W: Write>(
    engine: &mut DialogueEngine,
    input: R,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "{}", render::render_node(engine.current_node(), engine.state()))?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };

        match command {
            HostCommand::Quit => break,
            HostCommand::Help => writeln!(output, "{HELP}")?,
            HostCommand::State => {
                writeln!(output, "{}", serde_json::to_string_pretty(engine.state())?)?
            }
            HostCommand::History(None) => {
                for event in engine.history().events() {
                    if let Some(text) = render::render_history_event(event) {
                        writeln!(output, "{text}")?;
                    }
                }
            }
            HostCommand::History(Some(count)) => {
                for event in engine.history().recent_lines(count) {
                    if let Some(text) = render::render_history_event(event) {
                        writeln!(output, "{text}")?;
                    }
                }
            }
            HostCommand::Action(action) => {
                debug!(?action, "玩家操作");
                match engine.handle(action) {
                    Ok(step) => {
                        if let Some(hint) = render::describe_step(&step) {
                            writeln!(output, "{hint}")?;
                        }
                        writeln!(
                            output,
                            "{}",
                            render::render_node(engine.current_node(), engine.state())
                        )?;
                    }
                    Err(e) => writeln!(output, "{}", render::describe_error(&e))?,
                }
            }
        }
    }

    Ok(())
}
