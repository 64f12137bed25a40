//! 远程服务句柄

use crate::builder::ClientBuilder;
use crate::channel::Channel;
use crate::error::Result;
use crate::remote::{basic, manipulation, wholebody_step};
use hpp_protocol::Interface;
use hpp_transport::Transport;
use std::sync::Arc;

/// 基础求解器的子接口
#[derive(Debug, Clone)]
pub struct BasicClient {
    pub problem: basic::Problem,
    pub obstacle: basic::Obstacle,
    pub robot: basic::Robot,
}

/// 操作规划插件的子接口
#[derive(Debug, Clone)]
pub struct ManipulationClient {
    pub problem: manipulation::Problem,
    pub robot: manipulation::Robot,
}

/// 全身步态插件的子接口
#[derive(Debug, Clone)]
pub struct WholebodyStepClient {
    pub problem: wholebody_step::Problem,
}

/// 远程服务句柄
///
/// 所有子接口共用同一个传输，克隆开销很小，可以跨线程共享
/// （例如在另一个线程中调用 `interrupt_path_planning`）。
///
/// # 示例
///
/// ```rust,no_run
/// use hpp_client::Client;
///
/// # fn main() -> hpp_client::Result<()> {
/// let client = Client::connect("/run/hpp/problem-solver.sock")?;
/// let planners = client.basic.problem.get_available("PathPlanner")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    pub basic: BasicClient,
    pub manipulation: ManipulationClient,
    pub wholebody_step: WholebodyStepClient,
}

impl Client {
    /// 在已有传输上创建客户端
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let channel = |interface| Channel::new(Arc::clone(&transport), interface);
        let basic = BasicClient {
            problem: basic::Problem::new(channel(Interface::BasicProblem)),
            obstacle: basic::Obstacle::new(channel(Interface::BasicObstacle)),
            robot: basic::Robot::new(channel(Interface::BasicRobot)),
        };
        let manipulation = ManipulationClient {
            problem: manipulation::Problem::new(channel(Interface::ManipulationProblem)),
            robot: manipulation::Robot::new(channel(Interface::ManipulationRobot)),
        };
        let wholebody_step = WholebodyStepClient {
            problem: wholebody_step::Problem::new(channel(Interface::WholebodyStepProblem)),
        };
        Self {
            transport,
            basic,
            manipulation,
            wholebody_step,
        }
    }

    /// 使用默认配置连接到服务
    pub fn connect(address: &str) -> Result<Self> {
        ClientBuilder::new().address(address).build()
    }

    /// 底层传输
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
