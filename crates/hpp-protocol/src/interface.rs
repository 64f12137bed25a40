//! 远程接口路由
//!
//! 服务端按插件（plugin）和对象（object）组织接口，完整操作名形如
//! `manipulation/problem::selectProblem`。操作名保留远程 IDL 的拼写。

/// 远程子接口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interface {
    /// 基础求解器：问题定义、约束、路径、路线图
    BasicProblem,
    /// 基础求解器：障碍物
    BasicObstacle,
    /// 基础求解器：机器人（部分质心）
    BasicRobot,
    /// 操作规划插件：问题
    ManipulationProblem,
    /// 操作规划插件：机器人模型、抓手、把手
    ManipulationRobot,
    /// 全身步态插件：静态稳定约束
    WholebodyStepProblem,
}

impl Interface {
    /// 全部子接口
    pub const ALL: [Interface; 6] = [
        Interface::BasicProblem,
        Interface::BasicObstacle,
        Interface::BasicRobot,
        Interface::ManipulationProblem,
        Interface::ManipulationRobot,
        Interface::WholebodyStepProblem,
    ];

    /// 插件名
    pub const fn plugin(&self) -> &'static str {
        match self {
            Interface::BasicProblem | Interface::BasicObstacle | Interface::BasicRobot => "hpp",
            Interface::ManipulationProblem | Interface::ManipulationRobot => "manipulation",
            Interface::WholebodyStepProblem => "wholebody_step",
        }
    }

    /// 对象名
    pub const fn object(&self) -> &'static str {
        match self {
            Interface::BasicProblem
            | Interface::ManipulationProblem
            | Interface::WholebodyStepProblem => "problem",
            Interface::BasicObstacle => "obstacle",
            Interface::BasicRobot | Interface::ManipulationRobot => "robot",
        }
    }

    /// 完整操作名
    pub fn method(&self, operation: &str) -> String {
        format!("{}/{}::{}", self.plugin(), self.object(), operation)
    }

    /// 解析完整操作名，返回子接口和操作名
    pub fn parse_method(method: &str) -> Option<(Interface, &str)> {
        let (route, operation) = method.split_once("::")?;
        let (plugin, object) = route.split_once('/')?;
        let interface = Self::ALL
            .into_iter()
            .find(|i| i.plugin() == plugin && i.object() == object)?;
        if operation.is_empty() {
            return None;
        }
        Some((interface, operation))
    }
}

impl std::fmt::Display for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.plugin(), self.object())
    }
}
