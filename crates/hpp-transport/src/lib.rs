//! # HPP Transport
//!
//! 远程调用传输层，提供统一的 [`Transport`] 抽象。
//!
//! - [`StreamTransport`]：基于 Unix Socket / TCP 的阻塞式传输，按序列号复用同一连接
//! - `MockTransport`（feature `mock`）：脚本化的替身服务，记录每一次调用

use hpp_protocol::{ErrorCode, ProtocolError};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub mod stream;

#[cfg(feature = "mock")]
pub mod mock;

pub use stream::{ServiceAddr, StreamConfig, StreamTransport};

#[cfg(feature = "mock")]
pub use mock::{MockTransport, RecordedCall};

/// 服务端返回的异常，原样携带错误码和消息
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{method} failed ({code}): {message}")]
pub struct RemoteError {
    /// 出错的完整操作名
    pub method: String,
    pub code: ErrorCode,
    pub message: String,
}

impl RemoteError {
    pub fn new(method: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            code,
            message: message.into(),
        }
    }
}

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    /// Socket 底层错误
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    /// 帧编码/解码错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 握手失败（拒绝连接、版本不兼容等）
    #[error("Connection error: {0}")]
    Connection(String),

    /// 等待应答超时
    #[error("Call timeout")]
    Timeout,

    /// 连接已关闭
    #[error("Connection closed")]
    Closed,

    /// 远程异常
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// 远程调用传输 Trait
///
/// 语义：
/// - `call()`: 阻塞直到收到应答；服务端异常以 [`TransportError::Remote`] 返回
/// - `args` 为按位置排列的参数（JSON 数组）
///
/// 实现必须可以跨线程共享，以便在另一个线程中中断正在进行的求解。
pub trait Transport: Send + Sync {
    /// 调用一个远程操作
    fn call(&self, method: &str, args: Value) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn call(&self, method: &str, args: Value) -> Result<Value, TransportError> {
        (**self).call(method, args)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn call(&self, method: &str, args: Value) -> Result<Value, TransportError> {
        (**self).call(method, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::new(
            "hpp/problem::solve",
            ErrorCode::Remote,
            "No initial configuration",
        );
        assert_eq!(
            err.to_string(),
            "hpp/problem::solve failed (remote): No initial configuration"
        );
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "Call timeout");
        assert_eq!(TransportError::Closed.to_string(), "Connection closed");
        let err = TransportError::Connection("refused".to_string());
        assert!(err.to_string().contains("refused"));

        // Remote 变体透明转发
        let remote = RemoteError::new("hpp/problem::solve", ErrorCode::Remote, "boom");
        let err: TransportError = remote.clone().into();
        assert_eq!(err.to_string(), remote.to_string());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: TransportError = io.into();
        assert!(matches!(err, TransportError::Io(_)));
    }
}
