//! 机器人描述
//!
//! [`ProblemSolver`](crate::ProblemSolver) 只需要三样东西：远程服务句柄和左右脚踝关节名。
//! [`HumanoidRobot`] 额外转发 `manipulation/robot` 上的模型操作。

use crate::client::Client;
use crate::error::Result;
use hpp_protocol::{PositionInJoint, Transform};

/// 机器人描述 Trait
pub trait RobotModel: Send + Sync {
    /// 远程服务句柄
    fn client(&self) -> &Client;

    /// 左脚踝关节名
    fn left_ankle(&self) -> &str;

    /// 右脚踝关节名
    fn right_ankle(&self) -> &str;
}

/// 人形机器人
///
/// # 示例
///
/// ```rust,no_run
/// use hpp_client::{Client, HumanoidRobot};
///
/// # fn main() -> hpp_client::Result<()> {
/// let client = Client::connect("127.0.0.1:13331")?;
/// let robot = HumanoidRobot::new(client, "romeo", "romeo/LAnkleRoll", "romeo/RAnkleRoll");
/// robot.load_model("freeflyer", "romeo.urdf", "romeo.srdf")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HumanoidRobot {
    client: Client,
    name: String,
    left_ankle: String,
    right_ankle: String,
}

impl HumanoidRobot {
    pub fn new(
        client: Client,
        name: impl Into<String>,
        left_ankle: impl Into<String>,
        right_ankle: impl Into<String>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            left_ankle: left_ankle.into(),
            right_ankle: right_ankle.into(),
        }
    }

    /// 机器人名（也是关节名前缀）
    pub fn name(&self) -> &str {
        &self.name
    }

    fn remote(&self) -> &crate::remote::manipulation::Robot {
        &self.client.manipulation.robot
    }

    /// 以本机器人名加载人形模型
    pub fn load_model(&self, root_joint_type: &str, urdf_name: &str, srdf_name: &str) -> Result<()> {
        self.remote()
            .insert_humanoid_model(&self.name, root_joint_type, urdf_name, srdf_name)
    }

    pub fn load_model_from_string(
        &self,
        root_joint_type: &str,
        urdf_string: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.remote().insert_humanoid_model_from_string(
            &self.name,
            root_joint_type,
            urdf_string,
            srdf_string,
        )
    }

    /// 插入另一个机器人（如被操作的物体）
    pub fn insert_robot_model(
        &self,
        robot_name: &str,
        root_joint_type: &str,
        urdf_name: &str,
        srdf_name: &str,
    ) -> Result<()> {
        self.remote()
            .insert_robot_model(robot_name, root_joint_type, urdf_name, srdf_name)
    }

    pub fn insert_robot_model_on_frame(
        &self,
        robot_name: &str,
        frame_name: &str,
        root_joint_type: &str,
        urdf_name: &str,
        srdf_name: &str,
    ) -> Result<()> {
        self.remote().insert_robot_model_on_frame(
            robot_name,
            frame_name,
            root_joint_type,
            urdf_name,
            srdf_name,
        )
    }

    pub fn insert_robot_model_from_string(
        &self,
        robot_name: &str,
        root_joint_type: &str,
        urdf_string: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.remote()
            .insert_robot_model_from_string(robot_name, root_joint_type, urdf_string, srdf_string)
    }

    pub fn insert_robot_model_on_frame_from_string(
        &self,
        robot_name: &str,
        frame_name: &str,
        root_joint_type: &str,
        urdf_string: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.remote().insert_robot_model_on_frame_from_string(
            robot_name,
            frame_name,
            root_joint_type,
            urdf_string,
            srdf_string,
        )
    }

    pub fn insert_robot_srdf_model(&self, robot_name: &str, srdf_path: &str) -> Result<()> {
        self.remote().insert_robot_srdf_model(robot_name, srdf_path)
    }

    pub fn insert_robot_srdf_model_from_string(
        &self,
        robot_name: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.remote()
            .insert_robot_srdf_model_from_string(robot_name, srdf_string)
    }

    pub fn load_environment_model(&self, urdf_name: &str, srdf_name: &str, prefix: &str) -> Result<()> {
        self.remote()
            .load_environment_model(urdf_name, srdf_name, prefix)
    }

    pub fn load_environment_model_from_string(
        &self,
        urdf_string: &str,
        srdf_string: &str,
        prefix: &str,
    ) -> Result<()> {
        self.remote()
            .load_environment_model_from_string(urdf_string, srdf_string, prefix)
    }

    pub fn get_root_joint_position(&self, robot_name: &str) -> Result<Transform> {
        self.remote().get_root_joint_position(robot_name)
    }

    pub fn set_root_joint_position(&self, robot_name: &str, position: &Transform) -> Result<()> {
        self.remote().set_root_joint_position(robot_name, position)
    }

    pub fn add_handle(
        &self,
        link_name: &str,
        handle_name: &str,
        local_position: &Transform,
        clearance: f64,
        mask: &[bool],
    ) -> Result<()> {
        self.remote()
            .add_handle(link_name, handle_name, local_position, clearance, mask)
    }

    pub fn add_gripper(
        &self,
        link_name: &str,
        gripper_name: &str,
        position: &Transform,
        clearance: f64,
    ) -> Result<()> {
        self.remote()
            .add_gripper(link_name, gripper_name, position, clearance)
    }

    pub fn get_gripper_position_in_joint(&self, gripper_name: &str) -> Result<PositionInJoint> {
        self.remote().get_gripper_position_in_joint(gripper_name)
    }

    pub fn get_handle_position_in_joint(&self, handle_name: &str) -> Result<PositionInJoint> {
        self.remote().get_handle_position_in_joint(handle_name)
    }

    pub fn set_handle_position_in_joint(&self, handle_name: &str, position: &Transform) -> Result<()> {
        self.remote()
            .set_handle_position_in_joint(handle_name, position)
    }
}

impl RobotModel for HumanoidRobot {
    fn client(&self) -> &Client {
        &self.client
    }

    fn left_ankle(&self) -> &str {
        &self.left_ankle
    }

    fn right_ankle(&self) -> &str {
        &self.right_ankle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpp_transport::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn robot() -> (MockTransport, HumanoidRobot) {
        let mock = MockTransport::new();
        let client = Client::new(Arc::new(mock.clone()));
        let robot = HumanoidRobot::new(client, "romeo", "romeo/LAnkleRoll", "romeo/RAnkleRoll");
        (mock, robot)
    }

    #[test]
    fn test_load_model_uses_robot_name() {
        let (mock, robot) = robot();
        robot.load_model("freeflyer", "romeo.urdf", "romeo.srdf").unwrap();
        let calls = mock.calls();
        assert_eq!(calls[0].method, "manipulation/robot::insertHumanoidModel");
        assert_eq!(
            calls[0].args,
            json!(["romeo", "freeflyer", "romeo.urdf", "romeo.srdf"])
        );
    }

    #[test]
    fn test_robot_model_accessors() {
        let (_, robot) = robot();
        assert_eq!(robot.name(), "romeo");
        assert_eq!(robot.left_ankle(), "romeo/LAnkleRoll");
        assert_eq!(robot.right_ankle(), "romeo/RAnkleRoll");
    }

    #[test]
    fn test_add_handle_marshalling() {
        let (mock, robot) = robot();
        robot
            .add_handle("box/base_link", "box/handle", &Transform::IDENTITY, 0.05, &[true; 6])
            .unwrap();
        assert_eq!(
            mock.calls()[0].args,
            json!([
                "box/base_link",
                "box/handle",
                [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
                0.05,
                [true, true, true, true, true, true]
            ])
        );
    }

    #[test]
    fn test_gripper_position_reply() {
        let (mock, robot) = robot();
        mock.respond(
            "manipulation/robot::getGripperPositionInJoint",
            json!({"joint": "romeo/LWristPitch", "position": [0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 1.0]}),
        );
        let p = robot.get_gripper_position_in_joint("romeo/l_hand").unwrap();
        assert_eq!(p.joint, "romeo/LWristPitch");
        assert_eq!(p.position.translation(), [0.0, 0.0, 0.1]);
    }
}
