//! # Document 模块
//!
//! 剧本的 JSON 文件格式。
//!
//! ```json
//! {
//!   "id": "trial",
//!   "start": "opening",
//!   "fallback": "end",
//!   "nodes": [
//!     { "id": "opening", "kind": "line", "text": "开庭！", "next": "end" },
//!     { "id": "end", "kind": "line", "text": "闭庭。" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::ast::{Script, ScriptNode};
use crate::error::ScriptError;

/// 剧本文件的原始结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptDocument {
    pub id: String,
    pub start: String,
    pub fallback: String,
    pub nodes: Vec<ScriptNode>,
}

impl ScriptDocument {
    /// 转换为已校验的剧本
    pub fn into_script(self) -> Result<Script, ScriptError> {
        Script::new(self.id, self.nodes, self.start, self.fallback)
    }
}

impl From<&Script> for ScriptDocument {
    fn from(script: &Script) -> Self {
        Self {
            id: script.id.clone(),
            start: script.start().to_string(),
            fallback: script.fallback().to_string(),
            nodes: script.nodes().to_vec(),
        }
    }
}

impl Script {
    /// 从 JSON 文本加载剧本
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        let document: ScriptDocument = serde_json::from_str(text)?;
        document.into_script()
    }

    /// 导出为格式化的 JSON 文本
    pub fn to_json_pretty(&self) -> Result<String, ScriptError> {
        Ok(serde_json::to_string_pretty(&ScriptDocument::from(self))?)
    }
}
