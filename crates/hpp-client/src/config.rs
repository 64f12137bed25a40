//! 客户端配置
//!
//! 可以嵌入应用自己的配置文件（如 `hpp-cli` 的 `[client]` 表）：
//!
//! ```toml
//! address = "/run/hpp/problem-solver.sock"
//! context = "corbaserver"
//! connect_timeout_ms = 5000
//! call_timeout_ms = 60000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认服务地址
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:13331";

/// 默认命名服务上下文
pub const DEFAULT_CONTEXT: &str = "corbaserver";

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Unix Socket 路径或 `host:port`
    pub address: String,
    pub context: String,
    pub connect_timeout_ms: u64,
    /// 未设置时一直等待应答
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            context: DEFAULT_CONTEXT.to_string(),
            connect_timeout_ms: 5000,
            call_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}
