//! 脚本化的替身服务
//!
//! 不需要真实的求解服务即可测试客户端：
//! 为每个操作预设应答，然后检查客户端实际发出的调用。
//!
//! ```rust
//! use hpp_transport::{MockTransport, Transport};
//! use serde_json::json;
//!
//! let mock = MockTransport::new();
//! mock.respond("hpp/problem::numberPaths", json!(2));
//!
//! let n = mock.call("hpp/problem::numberPaths", json!([])).unwrap();
//! assert_eq!(n, json!(2));
//! assert_eq!(mock.call_count(), 1);
//! ```

use crate::{RemoteError, Transport, TransportError};
use hpp_protocol::{ErrorCode, ErrorReply};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// 一次被记录的调用
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// 完整操作名（`plugin/object::operation`）
    pub method: String,
    /// 位置参数
    pub args: Value,
}

type Handler = Arc<dyn Fn(&Value) -> Result<Value, ErrorReply> + Send + Sync>;

/// 替身服务
///
/// 未预设的操作返回 `null`（即 void 操作的应答）。
#[derive(Clone, Default)]
pub struct MockTransport {
    handlers: Arc<Mutex<HashMap<String, Handler>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为操作设置固定应答
    pub fn respond(&self, method: &str, result: Value) {
        self.on(method, move |_| Ok(result.clone()));
    }

    /// 让操作抛出远程异常
    pub fn fail(&self, method: &str, message: &str) {
        self.fail_with(method, ErrorCode::Remote, message);
    }

    /// 让操作以指定错误码失败
    pub fn fail_with(&self, method: &str, code: ErrorCode, message: &str) {
        let reply = ErrorReply {
            code,
            message: message.to_string(),
        };
        self.on(method, move |_| Err(reply.clone()));
    }

    /// 用闭包处理操作（可以根据参数应答）
    pub fn on<F>(&self, method: &str, handler: F)
    where
        F: Fn(&Value) -> Result<Value, ErrorReply> + Send + Sync + 'static,
    {
        self.handlers.lock().insert(method.to_string(), Arc::new(handler));
    }

    /// 所有已记录的调用（按发生顺序）
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// 对某个操作的调用
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls.lock().iter().filter(|c| c.method == method).cloned().collect()
    }

    /// 取出并清空已记录的调用
    pub fn take_calls(&self) -> Vec<RecordedCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// 已记录的调用数量
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("scripted", &self.handlers.lock().len())
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

impl Transport for MockTransport {
    fn call(&self, method: &str, args: Value) -> Result<Value, TransportError> {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            args: args.clone(),
        });

        // 先克隆出处理器再调用，处理器内部可以再次访问本对象
        let handler = self.handlers.lock().get(method).cloned();
        match handler {
            Some(handler) => handler(&args)
                .map_err(|e| RemoteError::new(method, e.code, e.message).into()),
            None => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unscripted_method_returns_null() {
        let mock = MockTransport::new();
        let result = mock.call("hpp/problem::resetGoalConfigs", json!([])).unwrap();
        assert_eq!(result, Value::Null);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_records_calls_in_order() {
        let mock = MockTransport::new();
        mock.call("hpp/problem::setRandomSeed", json!([7])).unwrap();
        mock.call("hpp/problem::getRandomSeed", json!([])).unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "hpp/problem::setRandomSeed");
        assert_eq!(calls[0].args, json!([7]));
        assert_eq!(mock.calls_to("hpp/problem::getRandomSeed").len(), 1);

        assert_eq!(mock.take_calls().len(), 2);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_fail_produces_remote_error() {
        let mock = MockTransport::new();
        mock.fail("hpp/problem::solve", "No goal configuration");

        match mock.call("hpp/problem::solve", json!([])) {
            Err(TransportError::Remote(e)) => {
                assert_eq!(e.method, "hpp/problem::solve");
                assert_eq!(e.code, ErrorCode::Remote);
                assert_eq!(e.message, "No goal configuration");
            },
            other => panic!("Expected Remote error, got {other:?}"),
        }
    }

    #[test]
    fn test_handler_sees_arguments() {
        let mock = MockTransport::new();
        mock.on("hpp/problem::pathLength", |args| Ok(json!(args[0].as_u64().unwrap_or(0) * 2)));
        assert_eq!(
            mock.call("hpp/problem::pathLength", json!([21])).unwrap(),
            json!(42)
        );
    }

    #[test]
    fn test_clones_share_state() {
        let mock = MockTransport::new();
        let shared = mock.clone();
        shared.respond("hpp/problem::numberPaths", json!(3));
        assert_eq!(mock.call("hpp/problem::numberPaths", json!([])).unwrap(), json!(3));
        assert_eq!(shared.call_count(), 1);
    }
}
