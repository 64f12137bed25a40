//! # HPP Client
//!
//! 操作规划求解服务的类型化客户端。
//!
//! - [`Client`]：远程服务句柄，按子接口分组的类型化桩（[`remote`]）
//! - [`ProblemSolver`]：面向用户的求解器，只暴露公开的远程操作
//! - [`HumanoidRobot`]：机器人描述，提供脚踝关节名和模型加载操作
//!
//! # 使用场景
//!
//! 大多数用户只需要 [`ProblemSolver`]。需要调用未公开的远程操作时，
//! 可以通过 [`Client`] 的子接口直接访问。

pub mod builder;
pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod problem_solver;
pub mod remote;
pub mod robot;
pub mod stability;


pub use builder::ClientBuilder;
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use problem_solver::{DEFAULT_PRE_PLACEMENT_WIDTH, PlacementConstraints, ProblemSolver};
pub use robot::{HumanoidRobot, RobotModel};

// 常用数据类型
pub use hpp_protocol::{
    Any, Config, DirectPath, Edge, PathId, Projection, SolveTime, StabilityType, Transform,
};
pub use hpp_transport::RemoteError;
