//! 参数信封类型
//!
//! 服务端的参数表（`setParameter` / `getParameter`）接受带类型标记的值，
//! 本地的标量和数组需要先包装成 [`Any`]。

use serde::{Deserialize, Serialize};

/// 带类型标记的参数值
///
/// 线上格式：`{"type": "double", "value": 0.05}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Any {
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    IntSeq(Vec<i64>),
    FloatSeq(Vec<f64>),
    FloatSeqSeq(Vec<Vec<f64>>),
    StringSeq(Vec<String>),
}

impl Any {
    /// 类型标记名
    pub fn type_name(&self) -> &'static str {
        match self {
            Any::Boolean(_) => "boolean",
            Any::Long(_) => "long",
            Any::Double(_) => "double",
            Any::String(_) => "string",
            Any::IntSeq(_) => "int_seq",
            Any::FloatSeq(_) => "float_seq",
            Any::FloatSeqSeq(_) => "float_seq_seq",
            Any::StringSeq(_) => "string_seq",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Any::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Any::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// 整数也可以按浮点读取
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Any::Double(v) => Some(*v),
            Any::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Any::String(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Any {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Any::Boolean(v) => write!(f, "{v}"),
            Any::Long(v) => write!(f, "{v}"),
            Any::Double(v) => write!(f, "{v}"),
            Any::String(v) => write!(f, "{v}"),
            Any::IntSeq(v) => write!(f, "{v:?}"),
            Any::FloatSeq(v) => write!(f, "{v:?}"),
            Any::FloatSeqSeq(v) => write!(f, "{v:?}"),
            Any::StringSeq(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for Any {
    fn from(v: bool) -> Self {
        Any::Boolean(v)
    }
}

impl From<i32> for Any {
    fn from(v: i32) -> Self {
        Any::Long(v.into())
    }
}

impl From<u32> for Any {
    fn from(v: u32) -> Self {
        Any::Long(v.into())
    }
}

impl From<i64> for Any {
    fn from(v: i64) -> Self {
        Any::Long(v)
    }
}

impl From<f64> for Any {
    fn from(v: f64) -> Self {
        Any::Double(v)
    }
}

impl From<&str> for Any {
    fn from(v: &str) -> Self {
        Any::String(v.to_string())
    }
}

impl From<String> for Any {
    fn from(v: String) -> Self {
        Any::String(v)
    }
}

impl From<Vec<i64>> for Any {
    fn from(v: Vec<i64>) -> Self {
        Any::IntSeq(v)
    }
}

impl From<Vec<f64>> for Any {
    fn from(v: Vec<f64>) -> Self {
        Any::FloatSeq(v)
    }
}

impl From<&[f64]> for Any {
    fn from(v: &[f64]) -> Self {
        Any::FloatSeq(v.to_vec())
    }
}

impl From<Vec<Vec<f64>>> for Any {
    fn from(v: Vec<Vec<f64>>) -> Self {
        Any::FloatSeqSeq(v)
    }
}

impl From<Vec<String>> for Any {
    fn from(v: Vec<String>) -> Self {
        Any::StringSeq(v)
    }
}
