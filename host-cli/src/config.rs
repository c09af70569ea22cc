//! # Config 模块
//!
//! 终端宿主的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use court_runtime::EngineOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 入口剧本路径
    #[serde(default = "default_start_script_path")]
    pub start_script_path: PathBuf,

    /// 引擎配置
    #[serde(default)]
    pub engine: EngineOptions,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 调试配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 开始游戏前是否运行剧本检查
    ///
    /// - debug build 默认开启
    /// - release build 默认关闭，可在 `config.json` 显式设置
    /// - 检查结果只输出诊断，不阻塞启动
    #[serde(default = "default_script_check")]
    pub script_check: bool,
}

fn default_start_script_path() -> PathBuf {
    PathBuf::from("assets/scripts/trial.json")
}

fn default_script_check() -> bool {
    cfg!(debug_assertions)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_script_path: default_start_script_path(),
            engine: EngineOptions::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            script_check: default_script_check(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(error = %e, "配置文件加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 读取并解析配置文件
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_script_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "必须配置 start_script_path（入口剧本路径）".to_string(),
            ));
        }

        if !self.start_script_path.exists() {
            return Err(ConfigError::ValidationFailed(format!(
                "入口剧本不存在: {}",
                self.start_script_path.display()
            )));
        }

        if self.engine.history_limit == 0 {
            return Err(ConfigError::ValidationFailed(
                "engine.history_limit 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
