//! 基础求解器接口（`hpp/*`）

use crate::channel::Channel;
use crate::error::Result;
use hpp_protocol::{
    Any, ComponentId, Config, DirectPath, Edge, EdgeId, NodeId, PathId, Point3, Projection,
    Quaternion, SolveTime, Transform,
};

/// `hpp/problem`：问题定义、约束、求解、路径和路线图
#[derive(Debug, Clone)]
pub struct Problem {
    channel: Channel,
}

impl Problem {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    // ------------------------------------------------------------------
    // 问题
    // ------------------------------------------------------------------

    pub fn set_random_seed(&self, seed: i64) -> Result<()> {
        self.channel.invoke_unit("setRandomSeed", (seed,))
    }

    pub fn get_random_seed(&self) -> Result<i64> {
        self.channel.invoke("getRandomSeed", ())
    }

    /// 列出某类可用对象（如 "PathPlanner"、"LockedJoint"、"type"）
    pub fn get_available(&self, kind: &str) -> Result<Vec<String>> {
        self.channel.invoke("getAvailable", (kind,))
    }

    pub fn get_selected(&self, kind: &str) -> Result<Vec<String>> {
        self.channel.invoke("getSelected", (kind,))
    }

    pub fn set_parameter(&self, name: &str, value: &Any) -> Result<()> {
        self.channel.invoke_unit("setParameter", (name, value))
    }

    pub fn get_parameter(&self, name: &str) -> Result<Any> {
        self.channel.invoke("getParameter", (name,))
    }

    pub fn move_path_to_problem(
        &self,
        path_id: PathId,
        problem_name: &str,
        joint_names: &[String],
    ) -> Result<()> {
        self.channel
            .invoke_unit("movePathToProblem", (path_id, problem_name, joint_names))
    }

    // ------------------------------------------------------------------
    // 初始构型和目标构型
    // ------------------------------------------------------------------

    pub fn set_initial_config(&self, q: &[f64]) -> Result<()> {
        self.channel.invoke_unit("setInitialConfig", (q,))
    }

    pub fn get_initial_config(&self) -> Result<Config> {
        self.channel.invoke("getInitialConfig", ())
    }

    pub fn add_goal_config(&self, q: &[f64]) -> Result<()> {
        self.channel.invoke_unit("addGoalConfig", (q,))
    }

    pub fn get_goal_configs(&self) -> Result<Vec<Config>> {
        self.channel.invoke("getGoalConfigs", ())
    }

    pub fn reset_goal_configs(&self) -> Result<()> {
        self.channel.invoke_unit("resetGoalConfigs", ())
    }

    // ------------------------------------------------------------------
    // 约束
    // ------------------------------------------------------------------

    pub fn create_orientation_constraint(
        &self,
        name: &str,
        joint1: &str,
        joint2: &str,
        rotation: &Quaternion,
        mask: &[bool],
    ) -> Result<()> {
        self.channel.invoke_unit(
            "createOrientationConstraint",
            (name, joint1, joint2, rotation, mask),
        )
    }

    pub fn create_position_constraint(
        &self,
        name: &str,
        joint1: &str,
        joint2: &str,
        point1: &Point3,
        point2: &Point3,
        mask: &[bool],
    ) -> Result<()> {
        self.channel.invoke_unit(
            "createPositionConstraint",
            (name, joint1, joint2, point1, point2, mask),
        )
    }

    pub fn create_transformation_constraint(
        &self,
        name: &str,
        joint1: &str,
        joint2: &str,
        reference: &Transform,
        mask: &[bool],
    ) -> Result<()> {
        self.channel.invoke_unit(
            "createTransformationConstraint",
            (name, joint1, joint2, reference, mask),
        )
    }

    pub fn create_relative_com_constraint(
        &self,
        name: &str,
        com_name: &str,
        joint: &str,
        point: &Point3,
        mask: &[bool],
    ) -> Result<()> {
        self.channel.invoke_unit(
            "createRelativeComConstraint",
            (name, com_name, joint, point, mask),
        )
    }

    /// 远程操作名保留了服务端的拼写 `createComBeetweenFeet`
    #[allow(clippy::too_many_arguments)]
    pub fn create_com_between_feet(
        &self,
        name: &str,
        com_name: &str,
        joint_left: &str,
        joint_right: &str,
        point_left: &Point3,
        point_right: &Point3,
        joint_reference: &str,
        mask: &[bool],
    ) -> Result<()> {
        self.channel.invoke_unit(
            "createComBeetweenFeet",
            (
                name,
                com_name,
                joint_left,
                joint_right,
                point_left,
                point_right,
                joint_reference,
                mask,
            ),
        )
    }

    pub fn add_passive_dofs(&self, name: &str, dof_names: &[String]) -> Result<()> {
        self.channel.invoke_unit("addPassiveDofs", (name, dof_names))
    }

    pub fn set_constant_right_hand_side(&self, name: &str, constant: bool) -> Result<()> {
        self.channel
            .invoke_unit("setConstantRightHandSide", (name, constant))
    }

    pub fn get_constant_right_hand_side(&self, name: &str) -> Result<bool> {
        self.channel.invoke("getConstantRightHandSide", (name,))
    }

    pub fn reset_constraints(&self) -> Result<()> {
        self.channel.invoke_unit("resetConstraints", ())
    }

    pub fn add_numerical_constraints(
        &self,
        name: &str,
        names: &[String],
        priorities: &[i64],
    ) -> Result<()> {
        self.channel
            .invoke_unit("addNumericalConstraints", (name, names, priorities))
    }

    pub fn add_locked_joint_constraints(&self, name: &str, names: &[String]) -> Result<()> {
        self.channel
            .invoke_unit("addLockedJointConstraints", (name, names))
    }

    pub fn apply_constraints(&self, q: &[f64]) -> Result<Projection> {
        self.channel.invoke("applyConstraints", (q,))
    }

    pub fn generate_valid_config(&self, max_iter: u32) -> Result<Projection> {
        self.channel.invoke("generateValidConfig", (max_iter,))
    }

    pub fn create_locked_joint(&self, name: &str, joint: &str, value: &[f64]) -> Result<()> {
        self.channel
            .invoke_unit("createLockedJoint", (name, joint, value))
    }

    pub fn create_locked_extra_dof(&self, name: &str, index: u32, value: &[f64]) -> Result<()> {
        self.channel
            .invoke_unit("createLockedExtraDof", (name, index, value))
    }

    pub fn get_error_threshold(&self) -> Result<f64> {
        self.channel.invoke("getErrorThreshold", ())
    }

    pub fn set_error_threshold(&self, threshold: f64) -> Result<()> {
        self.channel.invoke_unit("setErrorThreshold", (threshold,))
    }

    pub fn get_max_iter_projection(&self) -> Result<u32> {
        self.channel.invoke("getMaxIterProjection", ())
    }

    pub fn set_max_iter_projection(&self, iterations: u32) -> Result<()> {
        self.channel.invoke_unit("setMaxIterProjection", (iterations,))
    }

    pub fn get_max_iter_path_planning(&self) -> Result<u32> {
        self.channel.invoke("getMaxIterPathPlanning", ())
    }

    pub fn set_max_iter_path_planning(&self, iterations: u32) -> Result<()> {
        self.channel.invoke_unit("setMaxIterPathPlanning", (iterations,))
    }

    // ------------------------------------------------------------------
    // 求解器配置
    // ------------------------------------------------------------------

    pub fn select_path_planner(&self, kind: &str) -> Result<()> {
        self.channel.invoke_unit("selectPathPlanner", (kind,))
    }

    pub fn select_configuration_shooter(&self, kind: &str) -> Result<()> {
        self.channel.invoke_unit("selectConfigurationShooter", (kind,))
    }

    pub fn select_distance(&self, kind: &str) -> Result<()> {
        self.channel.invoke_unit("selectDistance", (kind,))
    }

    pub fn select_steering_method(&self, kind: &str) -> Result<()> {
        self.channel.invoke_unit("selectSteeringMethod", (kind,))
    }

    pub fn add_path_optimizer(&self, kind: &str) -> Result<()> {
        self.channel.invoke_unit("addPathOptimizer", (kind,))
    }

    pub fn clear_path_optimizers(&self) -> Result<()> {
        self.channel.invoke_unit("clearPathOptimizers", ())
    }

    pub fn add_config_validation(&self, kind: &str) -> Result<()> {
        self.channel.invoke_unit("addConfigValidation", (kind,))
    }

    pub fn clear_config_validations(&self) -> Result<()> {
        self.channel.invoke_unit("clearConfigValidations", ())
    }

    pub fn select_path_validation(&self, kind: &str, tolerance: f64) -> Result<()> {
        self.channel
            .invoke_unit("selectPathValidation", (kind, tolerance))
    }

    pub fn select_path_projector(&self, kind: &str, tolerance: f64) -> Result<()> {
        self.channel
            .invoke_unit("selectPathProjector", (kind, tolerance))
    }

    // ------------------------------------------------------------------
    // 求解
    // ------------------------------------------------------------------

    pub fn prepare_solve_step_by_step(&self) -> Result<bool> {
        self.channel.invoke("prepareSolveStepByStep", ())
    }

    pub fn execute_one_step(&self) -> Result<bool> {
        self.channel.invoke("executeOneStep", ())
    }

    pub fn finish_solve_step_by_step(&self) -> Result<()> {
        self.channel.invoke_unit("finishSolveStepByStep", ())
    }

    pub fn solve(&self) -> Result<SolveTime> {
        self.channel.invoke("solve", ())
    }

    pub fn interrupt_path_planning(&self) -> Result<()> {
        self.channel.invoke_unit("interruptPathPlanning", ())
    }

    // ------------------------------------------------------------------
    // 路径
    // ------------------------------------------------------------------

    pub fn direct_path(&self, start: &[f64], end: &[f64], validate: bool) -> Result<DirectPath> {
        self.channel.invoke("directPath", (start, end, validate))
    }

    pub fn project_path(&self, path_id: PathId) -> Result<bool> {
        self.channel.invoke("projectPath", (path_id,))
    }

    pub fn number_paths(&self) -> Result<u32> {
        self.channel.invoke("numberPaths", ())
    }

    pub fn optimize_path(&self, path_id: PathId) -> Result<SolveTime> {
        self.channel.invoke("optimizePath", (path_id,))
    }

    pub fn path_length(&self, path_id: PathId) -> Result<f64> {
        self.channel.invoke("pathLength", (path_id,))
    }

    pub fn config_at_param(&self, path_id: PathId, distance: f64) -> Result<Config> {
        self.channel.invoke("configAtParam", (path_id, distance))
    }

    pub fn get_waypoints(&self, path_id: PathId) -> Result<Vec<Config>> {
        self.channel.invoke("getWaypoints", (path_id,))
    }

    pub fn erase_path(&self, path_id: PathId) -> Result<()> {
        self.channel.invoke_unit("erasePath", (path_id,))
    }

    pub fn concatenate_path(&self, start_id: PathId, end_id: PathId) -> Result<()> {
        self.channel
            .invoke_unit("concatenatePath", (start_id, end_id))
    }

    // ------------------------------------------------------------------
    // 路线图
    // ------------------------------------------------------------------

    pub fn nodes(&self) -> Result<Vec<Config>> {
        self.channel.invoke("nodes", ())
    }

    pub fn node(&self, node_id: NodeId) -> Result<Config> {
        self.channel.invoke("node", (node_id,))
    }

    pub fn number_nodes(&self) -> Result<u32> {
        self.channel.invoke("numberNodes", ())
    }

    pub fn number_edges(&self) -> Result<u32> {
        self.channel.invoke("numberEdges", ())
    }

    pub fn edge(&self, edge_id: EdgeId) -> Result<Edge> {
        self.channel.invoke("edge", (edge_id,))
    }

    pub fn number_connected_components(&self) -> Result<u32> {
        self.channel.invoke("numberConnectedComponents", ())
    }

    pub fn nodes_connected_component(&self, component: ComponentId) -> Result<Vec<Config>> {
        self.channel.invoke("nodesConnectedComponent", (component,))
    }

    pub fn clear_roadmap(&self) -> Result<()> {
        self.channel.invoke_unit("clearRoadmap", ())
    }

    pub fn add_config_to_roadmap(&self, q: &[f64]) -> Result<()> {
        self.channel.invoke_unit("addConfigToRoadmap", (q,))
    }

    pub fn add_edge_to_roadmap(
        &self,
        q1: &[f64],
        q2: &[f64],
        path_id: PathId,
        both_edges: bool,
    ) -> Result<()> {
        self.channel
            .invoke_unit("addEdgeToRoadmap", (q1, q2, path_id, both_edges))
    }
}

/// `hpp/obstacle`：环境中的障碍物
#[derive(Debug, Clone)]
pub struct Obstacle {
    channel: Channel,
}

impl Obstacle {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// 从 ROS 包中的 URDF 加载障碍物
    pub fn load_obstacle_model(&self, package: &str, filename: &str, prefix: &str) -> Result<()> {
        self.channel
            .invoke_unit("loadObstacleModel", (package, filename, prefix))
    }

    pub fn remove_obstacle_from_joint(
        &self,
        object: &str,
        joint: &str,
        collision: bool,
        distance: bool,
    ) -> Result<()> {
        self.channel.invoke_unit(
            "removeObstacleFromJoint",
            (object, joint, collision, distance),
        )
    }

    pub fn move_obstacle(&self, object: &str, position: &Transform) -> Result<()> {
        self.channel.invoke_unit("moveObstacle", (object, position))
    }

    pub fn get_obstacle_position(&self, object: &str) -> Result<Transform> {
        self.channel.invoke("getObstaclePosition", (object,))
    }

    pub fn get_obstacle_names(&self, collision: bool, distance: bool) -> Result<Vec<String>> {
        self.channel
            .invoke("getObstacleNames", (collision, distance))
    }
}

/// `hpp/robot`：部分质心
#[derive(Debug, Clone)]
pub struct Robot {
    channel: Channel,
}

impl Robot {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    pub fn add_partial_com(&self, name: &str, joints: &[String]) -> Result<()> {
        self.channel.invoke_unit("addPartialCom", (name, joints))
    }

    pub fn get_partial_com(&self, name: &str) -> Result<Point3> {
        self.channel.invoke("getPartialCom", (name,))
    }

    /// 3 x n 雅可比矩阵（按行）
    pub fn get_jacobian_partial_com(&self, name: &str) -> Result<Vec<Vec<f64>>> {
        self.channel.invoke("getJacobianPartialCom", (name,))
    }
}
