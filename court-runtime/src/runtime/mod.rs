//! # Runtime 模块
//!
//! 庭审对话引擎核心，负责剧情推进和 HP 结算。
//!
//! ## 模块结构
//!
//! - [`engine`]：对话状态机
//! - [`step`]：单次操作的结果

pub mod engine;
pub mod step;

pub use engine::DialogueEngine;
pub use step::Step;
