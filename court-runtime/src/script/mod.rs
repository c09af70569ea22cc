//! # Script 模块
//!
//! 剧本图相关功能。
//!
//! ## 模块结构
//!
//! - [`ast`]：节点与剧本定义
//! - [`document`]：JSON 剧本文件格式

pub mod ast;
pub mod document;

pub use ast::*;
pub use document::ScriptDocument;
