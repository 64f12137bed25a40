//! HPP SDK - 操作规划求解服务的 Rust SDK
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 帧格式、消息和数据类型
//! - **传输层** (`transport`): Unix Socket / TCP 传输，按序列号复用连接
//! - **客户端层** (`client`): 类型化的远程接口和 [`ProblemSolver`]
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use hpp_sdk::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> hpp_sdk::Result<()> {
//! hpp_sdk::init_logging("hpp_client=info").ok();
//!
//! let client = ClientBuilder::new().address("127.0.0.1:13331").build()?;
//! let robot = Arc::new(HumanoidRobot::new(
//!     client,
//!     "romeo",
//!     "romeo/LAnkleRoll",
//!     "romeo/RAnkleRoll",
//! ));
//! let ps = ProblemSolver::new(robot);
//! let time = ps.solve()?;
//! # Ok(())
//! # }
//! ```

pub mod logging;
pub mod prelude;

// 各层通过模块路径访问
pub use hpp_client as client;
pub use hpp_protocol as protocol;
pub use hpp_transport as transport;

// --- 用户以此为界 ---

pub use hpp_client::{
    Client, ClientBuilder, ClientConfig, ClientError, HumanoidRobot, ProblemSolver, Result,
    RobotModel,
};
pub use hpp_protocol::ProtocolError;
pub use hpp_transport::{RemoteError, Transport, TransportError};
pub use logging::{LoggingError, init_logging};
