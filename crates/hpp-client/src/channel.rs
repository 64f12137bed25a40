//! 绑定到某个远程子接口的调用通道

use crate::error::{ClientError, Result};
use hpp_protocol::Interface;
use hpp_transport::Transport;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// 调用通道
///
/// 参数以元组形式传入，序列化为 JSON 数组后按位置发送：
/// `channel.invoke("pathLength", (path_id,))`。
#[derive(Clone)]
pub struct Channel {
    transport: Arc<dyn Transport>,
    interface: Interface,
}

impl Channel {
    pub fn new(transport: Arc<dyn Transport>, interface: Interface) -> Self {
        Self {
            transport,
            interface,
        }
    }

    pub fn interface(&self) -> Interface {
        self.interface
    }

    /// 调用远程操作并把应答解码为 `R`
    pub fn invoke<A, R>(&self, operation: &str, args: A) -> Result<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let method = self.interface.method(operation);
        let result = self.send(&method, args)?;
        serde_json::from_value(result).map_err(|source| ClientError::Decode { method, source })
    }

    /// 调用无返回值的远程操作（忽略应答内容）
    pub fn invoke_unit<A: Serialize>(&self, operation: &str, args: A) -> Result<()> {
        let method = self.interface.method(operation);
        self.send(&method, args).map(|_| ())
    }

    fn send<A: Serialize>(&self, method: &str, args: A) -> Result<Value> {
        let args = match serde_json::to_value(args) {
            Ok(Value::Null) => Value::Array(Vec::new()),
            Ok(args @ Value::Array(_)) => args,
            Ok(single) => Value::Array(vec![single]),
            Err(source) => {
                return Err(ClientError::Encode {
                    method: method.to_string(),
                    source,
                });
            },
        };
        trace!("{} {}", method, args);
        Ok(self.transport.call(method, args)?)
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("interface", &self.interface).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpp_transport::MockTransport;
    use serde_json::json;

    fn channel(mock: &MockTransport) -> Channel {
        Channel::new(Arc::new(mock.clone()), Interface::BasicProblem)
    }

    #[test]
    fn test_argument_shapes() {
        let mock = MockTransport::new();
        let ch = channel(&mock);

        ch.invoke_unit("resetGoalConfigs", ()).unwrap();
        ch.invoke_unit("setRandomSeed", (42,)).unwrap();
        ch.invoke_unit("setErrorThreshold", 1e-4).unwrap();
        ch.invoke_unit("selectPathValidation", ("Discretized", 0.05)).unwrap();

        let args: Vec<Value> = mock.calls().into_iter().map(|c| c.args).collect();
        assert_eq!(
            args,
            vec![
                json!([]),
                json!([42]),
                json!([1e-4]),
                json!(["Discretized", 0.05])
            ]
        );
        assert_eq!(mock.calls()[0].method, "hpp/problem::resetGoalConfigs");
    }

    #[test]
    fn test_decodes_reply() {
        let mock = MockTransport::new();
        mock.respond("hpp/problem::getInitialConfig", json!([0.0, 1.5]));
        let q: Vec<f64> = channel(&mock).invoke("getInitialConfig", ()).unwrap();
        assert_eq!(q, vec![0.0, 1.5]);
    }

    #[test]
    fn test_decode_failure_names_method() {
        let mock = MockTransport::new();
        mock.respond("hpp/problem::numberPaths", json!("three"));
        let err = channel(&mock)
            .invoke::<_, u32>("numberPaths", ())
            .unwrap_err();
        match err {
            ClientError::Decode { method, .. } => assert_eq!(method, "hpp/problem::numberPaths"),
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_ignores_reply_content() {
        let mock = MockTransport::new();
        mock.respond("hpp/problem::erasePath", json!({"ignored": true}));
        channel(&mock).invoke_unit("erasePath", (0,)).unwrap();
    }
}
