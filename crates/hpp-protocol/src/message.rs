//! 客户端与问题求解器服务之间的消息定义
//!
//! 消息头为固定 12 字节，负载为 JSON。编码函数只做拼接，不做任何语义校验。

use crate::ProtocolError;
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 消息头长度
pub const HEADER_LEN: usize = 12;

/// 单条消息负载上限（64 MiB）
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;

// ============================================================================
// Message Types
// ============================================================================

/// 消息类型枚举
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum MessageType {
    // 客户端 → 服务端
    Connect = 0x01,    // 连接请求（携带命名上下文）
    Disconnect = 0x02, // 断开通知（无应答）
    Call = 0x03,       // 远程调用

    // 服务端 → 客户端
    ConnectAck = 0x81, // 连接确认
    Reply = 0x83,      // 调用结果
    Error = 0xFF,      // 远程异常
}

// ============================================================================
// Error Codes
// ============================================================================

/// 远程错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unknown,
    /// 服务端抛出的求解器异常（hpp::Error）
    Remote,
    /// 服务端不认识该操作
    UnknownOperation,
    /// 参数个数或类型不匹配
    InvalidArguments,
    /// 未完成握手
    NotConnected,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::Unknown => "unknown",
            ErrorCode::Remote => "remote",
            ErrorCode::UnknownOperation => "unknown operation",
            ErrorCode::InvalidArguments => "invalid arguments",
            ErrorCode::NotConnected => "not connected",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Message Header
// ============================================================================

/// 消息头（12 字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub msg_type: MessageType,
    pub flags: u8,
    pub seq: u32,
    pub length: u32,
}

impl MessageHeader {
    /// 创建新的消息头
    pub fn new(msg_type: MessageType, length: u32, seq: u32) -> Self {
        Self {
            msg_type,
            flags: 0,
            seq,
            length,
        }
    }

    /// 编码消息头
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0] = self.msg_type.into();
        buf[1] = self.flags;
        // buf[2..4] 保留
        buf[4..8].copy_from_slice(&self.seq.to_le_bytes());
        buf[8..12].copy_from_slice(&self.length.to_le_bytes());
        buf
    }

    /// 从缓冲区解码消息头
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < HEADER_LEN {
            return Err(ProtocolError::TooShort {
                expected: HEADER_LEN,
                actual: buf.len(),
            });
        }

        let msg_type = MessageType::try_from(buf[0])
            .map_err(|_| ProtocolError::InvalidMessageType { value: buf[0] })?;
        let seq = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let length = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);

        if length as usize > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge {
                length: length as usize,
                max: MAX_PAYLOAD_LEN,
            });
        }

        Ok(Self {
            msg_type,
            flags: buf[1],
            seq,
            length,
        })
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// 连接请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connect {
    /// 命名服务上下文（如 "corbaserver"）
    pub context: String,
    /// 客户端协议版本
    pub version: String,
}

/// 连接确认
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectAck {
    /// 0 = 成功
    pub status: u8,
    /// 服务端协议版本
    pub version: String,
}

/// 远程调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// 完整操作名，如 `hpp/problem::solve`
    pub method: String,
    /// 按位置排列的参数（JSON 数组）
    pub args: Value,
}

/// 调用结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub result: Value,
}

/// 远程异常
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub code: ErrorCode,
    pub message: String,
}

// ============================================================================
// Message Enum
// ============================================================================

/// 协议消息枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Connect(Connect),
    Disconnect,
    Call(Call),
    ConnectAck(ConnectAck),
    Reply(Reply),
    Error(ErrorReply),
}

impl Message {
    /// 消息对应的类型字节
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Connect(_) => MessageType::Connect,
            Message::Disconnect => MessageType::Disconnect,
            Message::Call(_) => MessageType::Call,
            Message::ConnectAck(_) => MessageType::ConnectAck,
            Message::Reply(_) => MessageType::Reply,
            Message::Error(_) => MessageType::Error,
        }
    }
}

/// 编码一条完整消息（消息头 + 负载）
pub fn encode_message(seq: u32, message: &Message) -> Result<Bytes, ProtocolError> {
    let payload = match message {
        Message::Connect(p) => serde_json::to_vec(p)?,
        Message::Disconnect => Vec::new(),
        Message::Call(p) => serde_json::to_vec(p)?,
        Message::ConnectAck(p) => serde_json::to_vec(p)?,
        Message::Reply(p) => serde_json::to_vec(p)?,
        Message::Error(p) => serde_json::to_vec(p)?,
    };

    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::PayloadTooLarge {
            length: payload.len(),
            max: MAX_PAYLOAD_LEN,
        });
    }

    let header = MessageHeader::new(message.message_type(), payload.len() as u32, seq);
    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_slice(&header.to_bytes());
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

/// 根据已解码的消息头解析负载
pub fn decode_payload(header: &MessageHeader, payload: &[u8]) -> Result<Message, ProtocolError> {
    if payload.len() != header.length as usize {
        return Err(ProtocolError::Incomplete {
            expected: header.length as usize,
            actual: payload.len(),
        });
    }

    let message = match header.msg_type {
        MessageType::Connect => Message::Connect(serde_json::from_slice(payload)?),
        MessageType::Disconnect => Message::Disconnect,
        MessageType::Call => Message::Call(serde_json::from_slice(payload)?),
        MessageType::ConnectAck => Message::ConnectAck(serde_json::from_slice(payload)?),
        MessageType::Reply => Message::Reply(serde_json::from_slice(payload)?),
        MessageType::Error => Message::Error(serde_json::from_slice(payload)?),
    };
    Ok(message)
}

/// 从连续缓冲区解码一条完整消息
pub fn decode_message(buf: &[u8]) -> Result<(MessageHeader, Message), ProtocolError> {
    let header = MessageHeader::decode(buf)?;
    let end = HEADER_LEN + header.length as usize;
    if buf.len() < end {
        return Err(ProtocolError::Incomplete {
            expected: header.length as usize,
            actual: buf.len() - HEADER_LEN,
        });
    }
    let message = decode_payload(&header, &buf[HEADER_LEN..end])?;
    Ok((header, message))
}
