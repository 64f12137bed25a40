//! 客户端错误类型定义

use hpp_transport::{RemoteError, TransportError};
use thiserror::Error;

/// 客户端错误类型
///
/// 远程异常不做任何翻译，以 [`ClientError::Remote`] 原样返回。
#[derive(Error, Debug)]
pub enum ClientError {
    /// 传输层错误（连接、超时、帧格式）
    #[error("Transport error: {0}")]
    Transport(TransportError),

    /// 服务端抛出的异常
    #[error(transparent)]
    Remote(RemoteError),

    /// 参数序列化失败
    #[error("Failed to encode arguments of {method}: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// 应答与预期类型不符
    #[error("Unexpected reply to {method}: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        // 远程异常单独提出来，调用方只需要匹配一层
        match e {
            TransportError::Remote(remote) => ClientError::Remote(remote),
            other => ClientError::Transport(other),
        }
    }
}

impl ClientError {
    /// 是否为服务端异常
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote(_))
    }

    /// 服务端异常（如果是）
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            ClientError::Remote(e) => Some(e),
            _ => None,
        }
    }
}

/// 客户端结果类型
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hpp_protocol::ErrorCode;

    #[test]
    fn test_remote_error_is_unwrapped() {
        let remote = RemoteError::new("hpp/problem::solve", ErrorCode::Remote, "no goal");
        let err: ClientError = TransportError::Remote(remote.clone()).into();
        assert!(err.is_remote());
        assert_eq!(err.as_remote(), Some(&remote));
        // 显示内容与远程异常完全一致
        assert_eq!(err.to_string(), remote.to_string());
    }

    #[test]
    fn test_transport_error_display() {
        let err: ClientError = TransportError::Closed.into();
        assert!(!err.is_remote());
        assert_eq!(err.to_string(), "Transport error: Connection closed");
    }

    #[test]
    fn test_decode_error_display() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = ClientError::Decode {
            method: "hpp/problem::numberPaths".to_string(),
            source,
        };
        assert!(
            err.to_string()
                .starts_with("Unexpected reply to hpp/problem::numberPaths")
        );
    }
}
