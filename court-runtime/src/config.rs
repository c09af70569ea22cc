//! # Config 模块
//!
//! 引擎配置。字段都有默认值，可以直接嵌入 Host 的配置文件。

use serde::{Deserialize, Serialize};

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// 初始音频开关（`reset()` 也会恢复到此值）
    #[serde(default = "default_audio_enabled")]
    pub audio_enabled: bool,

    /// 历史记录容量
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_audio_enabled() -> bool {
    true
}

fn default_history_limit() -> usize {
    1000
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            audio_enabled: default_audio_enabled(),
            history_limit: default_history_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert!(options.audio_enabled);
        assert_eq!(options.history_limit, 1000);
    }

    #[test]
    fn test_partial_config() {
        let options: EngineOptions = serde_json::from_str(r#"{ "audio_enabled": false }"#).unwrap();
        assert!(!options.audio_enabled);
        assert_eq!(options.history_limit, 1000);
    }
}
