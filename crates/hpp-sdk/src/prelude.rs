//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use hpp_sdk::prelude::*;
//! ```

// 客户端层（推荐使用）
pub use hpp_client::{
    Client, ClientBuilder, ClientConfig, HumanoidRobot, PlacementConstraints, ProblemSolver,
    RobotModel,
};

// 数据类型
pub use hpp_protocol::{
    Any, Config, DirectPath, Edge, PathId, PositionInJoint, Projection, SolveTime, StabilityType,
    Transform,
};

// 错误类型
pub use hpp_client::ClientError;
pub use hpp_transport::{RemoteError, TransportError};
