//! # HPP Protocol
//!
//! 问题求解器（problem solver）远程服务的协议定义（无 IO 依赖）
//!
//! ## 模块
//!
//! - `message`: 消息头与消息编码/解码
//! - `interface`: 远程接口路由（plugin/object::operation）
//! - `types`: 构型、位姿、路径等数据类型
//! - `value`: 参数信封类型 [`Any`]
//!
//! ## 帧格式
//!
//! ```text
//! ┌──────┬───────┬──────────┬─────────┬──────────────┬──────────────────┐
//! │ type │ flags │ reserved │ seq(LE) │ length(LE)   │ JSON payload ... │
//! │  1B  │  1B   │    2B    │   4B    │     4B       │   length bytes   │
//! └──────┴───────┴──────────┴─────────┴──────────────┴──────────────────┘
//! ```

pub mod interface;
pub mod message;
pub mod types;
pub mod value;

// 重新导出常用类型
pub use interface::*;
pub use message::*;
pub use types::*;
pub use value::Any;

use thiserror::Error;

/// 协议版本（握手时与服务端比较主版本号）
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// 缓冲区长度不足以容纳消息头
    #[error("Message too short: {actual} bytes (header needs {expected})")]
    TooShort { expected: usize, actual: usize },

    /// 未知消息类型
    #[error("Invalid message type: 0x{value:02X}")]
    InvalidMessageType { value: u8 },

    /// 负载长度与消息头不一致
    #[error("Incomplete message: expected {expected} payload bytes, got {actual}")]
    Incomplete { expected: usize, actual: usize },

    /// 负载超过上限
    #[error("Payload too large: {length} bytes (max {max})")]
    PayloadTooLarge { length: usize, max: usize },

    /// JSON 负载编码/解码失败
    #[error("Payload codec error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::TooShort {
            expected: 12,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Message too short: 3 bytes (header needs 12)"
        );

        let err = ProtocolError::InvalidMessageType { value: 0x7E };
        assert_eq!(err.to_string(), "Invalid message type: 0x7E");

        let err = ProtocolError::Incomplete {
            expected: 10,
            actual: 4,
        };
        assert!(err.to_string().contains("expected 10"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ProtocolError = json_err.into();
        assert!(matches!(err, ProtocolError::Json(_)));
    }
}
