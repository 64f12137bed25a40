//! Client Builder
//!
//! 提供链式 API 连接到求解服务。

use crate::client::Client;
use crate::config::{ClientConfig, DEFAULT_ADDRESS};
use crate::error::{ClientError, Result};
use hpp_transport::{ServiceAddr, StreamConfig, StreamTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Client Builder
///
/// # 示例
///
/// ```rust,no_run
/// use hpp_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn main() -> hpp_client::Result<()> {
/// // 使用默认配置（127.0.0.1:13331）
/// let client = ClientBuilder::new().build()?;
///
/// // 完整配置
/// let client = ClientBuilder::new()
///     .address("/run/hpp/problem-solver.sock")
///     .context("corbaserver")
///     .connect_timeout(Duration::from_secs(2))
///     .call_timeout(Duration::from_secs(600))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    address: Option<String>,
    context: Option<String>,
    connect_timeout: Option<Duration>,
    call_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// 创建新的 Builder
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置文件内容创建
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            address: Some(config.address.clone()),
            context: Some(config.context.clone()),
            connect_timeout: Some(config.connect_timeout()),
            call_timeout: config.call_timeout(),
        }
    }

    /// 服务地址
    ///
    /// - UDS 路径（如 "/run/hpp/problem-solver.sock"）
    /// - TCP 地址（如 "127.0.0.1:13331"）
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// 命名服务上下文（默认: "corbaserver"）
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// 建立连接和握手的超时（默认: 5 秒）
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// 单次调用超时（默认一直等待，`solve` 可能耗时很长）
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    fn stream_config(&self) -> StreamConfig {
        let defaults = StreamConfig::default();
        StreamConfig {
            context: self.context.clone().unwrap_or(defaults.context),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            call_timeout: self.call_timeout,
        }
    }

    /// 连接并完成握手
    pub fn build(self) -> Result<Client> {
        let address = self.address.as_deref().unwrap_or(DEFAULT_ADDRESS).trim();
        if address.is_empty() {
            return Err(ClientError::Config("Service address is empty".to_string()));
        }
        let config = self.stream_config();
        if config.connect_timeout.is_zero() {
            return Err(ClientError::Config(
                "Connect timeout must be greater than zero".to_string(),
            ));
        }

        let addr = ServiceAddr::parse(address);
        let transport = StreamTransport::connect(&addr, &config)?;
        info!(
            "Connected to problem solver at {} (server protocol {})",
            addr,
            transport.server_version()
        );
        Ok(Client::new(Arc::new(transport)))
    }
}
