//! 操作规划插件接口（`manipulation/*`）

use crate::channel::Channel;
use crate::error::Result;
use hpp_protocol::{PositionInJoint, Transform};

/// `manipulation/problem`
#[derive(Debug, Clone)]
pub struct Problem {
    channel: Channel,
}

impl Problem {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// 选择（必要时创建）命名问题，返回是否新建
    pub fn select_problem(&self, name: &str) -> Result<bool> {
        self.channel.invoke("selectProblem", (name,))
    }

    pub fn get_available(&self, kind: &str) -> Result<Vec<String>> {
        self.channel.invoke("getAvailable", (kind,))
    }

    /// 丢弃当前问题并新建一个空问题
    pub fn reset_problem(&self) -> Result<()> {
        self.channel.invoke_unit("resetProblem", ())
    }

    pub fn create_placement_constraint(
        &self,
        name: &str,
        shapes: &[String],
        env_contacts: &[String],
    ) -> Result<()> {
        self.channel
            .invoke_unit("createPlacementConstraint", (name, shapes, env_contacts))
    }

    pub fn create_pre_placement_constraint(
        &self,
        name: &str,
        shapes: &[String],
        env_contacts: &[String],
        width: f64,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "createPrePlacementConstraint",
            (name, shapes, env_contacts, width),
        )
    }

    pub fn set_target_state(&self, state_id: u32) -> Result<()> {
        self.channel.invoke_unit("setTargetState", (state_id,))
    }
}

/// `manipulation/robot`：复合机器人模型、抓手和把手
#[derive(Debug, Clone)]
pub struct Robot {
    channel: Channel,
}

impl Robot {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// 插入机器人模型（URDF/SRDF 文件名），根关节挂在 "universe" 上
    pub fn insert_robot_model(
        &self,
        robot_name: &str,
        root_joint_type: &str,
        urdf_name: &str,
        srdf_name: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "insertRobotModel",
            (robot_name, root_joint_type, urdf_name, srdf_name),
        )
    }

    pub fn insert_robot_model_on_frame(
        &self,
        robot_name: &str,
        frame_name: &str,
        root_joint_type: &str,
        urdf_name: &str,
        srdf_name: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "insertRobotModelOnFrame",
            (robot_name, frame_name, root_joint_type, urdf_name, srdf_name),
        )
    }

    pub fn insert_robot_model_from_string(
        &self,
        robot_name: &str,
        root_joint_type: &str,
        urdf_string: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "insertRobotModelFromString",
            (robot_name, root_joint_type, urdf_string, srdf_string),
        )
    }

    pub fn insert_robot_model_on_frame_from_string(
        &self,
        robot_name: &str,
        frame_name: &str,
        root_joint_type: &str,
        urdf_string: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "insertRobotModelOnFrameFromString",
            (robot_name, frame_name, root_joint_type, urdf_string, srdf_string),
        )
    }

    pub fn insert_robot_srdf_model(&self, robot_name: &str, srdf_path: &str) -> Result<()> {
        self.channel
            .invoke_unit("insertRobotSRDFModel", (robot_name, srdf_path))
    }

    pub fn insert_robot_srdf_model_from_string(
        &self,
        robot_name: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.channel
            .invoke_unit("insertRobotSRDFModelFromString", (robot_name, srdf_string))
    }

    /// 插入人形机器人模型（服务端会设置双脚和质心）
    pub fn insert_humanoid_model(
        &self,
        robot_name: &str,
        root_joint_type: &str,
        urdf_name: &str,
        srdf_name: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "insertHumanoidModel",
            (robot_name, root_joint_type, urdf_name, srdf_name),
        )
    }

    pub fn insert_humanoid_model_from_string(
        &self,
        robot_name: &str,
        root_joint_type: &str,
        urdf_string: &str,
        srdf_string: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "insertHumanoidModelFromString",
            (robot_name, root_joint_type, urdf_string, srdf_string),
        )
    }

    /// 加载环境模型，所有物体名加上 `prefix` 前缀
    pub fn load_environment_model(
        &self,
        urdf_name: &str,
        srdf_name: &str,
        prefix: &str,
    ) -> Result<()> {
        self.channel
            .invoke_unit("loadEnvironmentModel", (urdf_name, srdf_name, prefix))
    }

    pub fn load_environment_model_from_string(
        &self,
        urdf_string: &str,
        srdf_string: &str,
        prefix: &str,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "loadEnvironmentModelFromString",
            (urdf_string, srdf_string, prefix),
        )
    }

    pub fn get_root_joint_position(&self, robot_name: &str) -> Result<Transform> {
        self.channel.invoke("getRootJointPosition", (robot_name,))
    }

    pub fn set_root_joint_position(&self, robot_name: &str, position: &Transform) -> Result<()> {
        self.channel
            .invoke_unit("setRootJointPosition", (robot_name, position))
    }

    /// 在连杆上添加把手，`mask` 为 6 个分量
    pub fn add_handle(
        &self,
        link_name: &str,
        handle_name: &str,
        local_position: &Transform,
        clearance: f64,
        mask: &[bool],
    ) -> Result<()> {
        self.channel.invoke_unit(
            "addHandle",
            (link_name, handle_name, local_position, clearance, mask),
        )
    }

    pub fn add_gripper(
        &self,
        link_name: &str,
        gripper_name: &str,
        position: &Transform,
        clearance: f64,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "addGripper",
            (link_name, gripper_name, position, clearance),
        )
    }

    pub fn get_gripper_position_in_joint(&self, gripper_name: &str) -> Result<PositionInJoint> {
        self.channel
            .invoke("getGripperPositionInJoint", (gripper_name,))
    }

    pub fn get_handle_position_in_joint(&self, handle_name: &str) -> Result<PositionInJoint> {
        self.channel
            .invoke("getHandlePositionInJoint", (handle_name,))
    }

    pub fn set_handle_position_in_joint(
        &self,
        handle_name: &str,
        position: &Transform,
    ) -> Result<()> {
        self.channel
            .invoke_unit("setHandlePositionInJoint", (handle_name, position))
    }
}
