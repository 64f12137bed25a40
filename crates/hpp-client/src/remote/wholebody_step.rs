//! 全身步态插件接口（`wholebody_step/problem`）

use crate::channel::Channel;
use crate::error::Result;
use hpp_protocol::StabilityType;

#[derive(Debug, Clone)]
pub struct Problem {
    channel: Channel,
}

impl Problem {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// 生成静态稳定约束，约束名为 `name/<后缀>`
    pub fn add_static_stability_constraints(
        &self,
        name: &str,
        q0: &[f64],
        left_ankle: &str,
        right_ankle: &str,
        com_name: &str,
        kind: StabilityType,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "addStaticStabilityConstraints",
            (name, q0, left_ankle, right_ankle, com_name, kind),
        )
    }

    pub fn add_complement_static_stability_constraints(
        &self,
        name: &str,
        q0: &[f64],
        left_ankle: &str,
        right_ankle: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "addComplementStaticStabilityConstraints",
            (name, q0, left_ankle, right_ankle),
        )
    }
}
