//! 操作规划问题求解器
//!
//! 远程服务实现了大量操作，其中一部分只供服务端内部使用。
//! [`ProblemSolver`] 只暴露公开的部分：每个方法直接转发到对应的远程操作，
//! 原样返回应答或远程异常。
//!
//! 只有以下本地行为：
//! - 参数的简单整形（标量包装成 [`Any`]、省略的优先级补零）
//! - 缓存最近一次生成的静态稳定约束名（[`ProblemSolver::balance_constraints`]）
//! - [`ProblemSolver::get_available`] 和 [`ProblemSolver::get_constant_right_hand_side`]
//!   两个特例，用于绕开远程接口的拆分问题

use crate::error::Result;
use crate::remote::{basic, manipulation};
use crate::robot::RobotModel;
use crate::stability::balance_constraint_names;
use hpp_protocol::{
    Any, ComponentId, Config, DirectPath, Edge, EdgeId, NodeId, PathId, Point3, Projection,
    Quaternion, SolveTime, StabilityType, Transform,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// 预放置约束的默认宽度（`create_placement_constraints` 省略 `width` 时使用）
pub const DEFAULT_PRE_PLACEMENT_WIDTH: f64 = 0.05;

/// 自由浮动关节的默认锁定值（原点 + 单位四元数）
pub const FREE_FLYER_IDENTITY: [f64; 7] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

/// 平面关节的默认锁定值（原点 + 零角度的 cos/sin）
pub const PLANAR_IDENTITY: [f64; 4] = [0.0, 0.0, 1.0, 0.0];

/// 放置约束与预放置约束的名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementConstraints {
    pub placement: String,
    /// `pre_<placement>`
    pub pre_placement: String,
}

/// 操作规划问题求解器
///
/// # 示例
///
/// ```rust,no_run
/// use hpp_client::{Client, HumanoidRobot, ProblemSolver, StabilityType};
/// use std::sync::Arc;
///
/// # fn main() -> hpp_client::Result<()> {
/// let client = Client::connect("127.0.0.1:13331")?;
/// let robot = Arc::new(HumanoidRobot::new(
///     client,
///     "romeo",
///     "romeo/LAnkleRoll",
///     "romeo/RAnkleRoll",
/// ));
/// let mut ps = ProblemSolver::new(robot);
///
/// let q0 = ps.get_initial_config()?;
/// ps.create_static_stability_constraints("balance", &q0, "", Some(StabilityType::Sliding))?;
/// let names = ps.balance_constraints().to_vec();
/// ps.add_numerical_constraints("proj", &names, None)?;
/// let time = ps.solve()?;
/// # Ok(())
/// # }
/// ```
pub struct ProblemSolver<R: RobotModel> {
    robot: Arc<R>,
    balance_constraints: Vec<String>,
}

impl<R: RobotModel> ProblemSolver<R> {
    pub fn new(robot: Arc<R>) -> Self {
        Self {
            robot,
            balance_constraints: Vec::new(),
        }
    }

    pub fn robot(&self) -> &Arc<R> {
        &self.robot
    }

    fn basic(&self) -> &basic::Problem {
        &self.robot.client().basic.problem
    }

    fn obstacle(&self) -> &basic::Obstacle {
        &self.robot.client().basic.obstacle
    }

    fn manipulation(&self) -> &manipulation::Problem {
        &self.robot.client().manipulation.problem
    }

    // ========================================================================
    // 问题
    // ========================================================================

    /// 设置随机数种子
    pub fn set_random_seed(&self, seed: i64) -> Result<()> {
        self.basic().set_random_seed(seed)
    }

    pub fn get_random_seed(&self) -> Result<i64> {
        self.basic().get_random_seed()
    }

    /// 选择命名问题，不存在时由服务端创建
    ///
    /// 返回是否新建了问题。
    pub fn select_problem(&self, name: &str) -> Result<bool> {
        self.manipulation().select_problem(name)
    }

    /// 丢弃当前问题，服务端重新创建一个空问题
    pub fn new_problem(&self) -> Result<()> {
        self.manipulation().reset_problem()
    }

    /// 列出某类可用对象
    ///
    /// 远程接口被拆成了基础和操作规划两部分：
    /// - `kind` 为 "type"（不区分大小写）时，返回两者结果的拼接（不去重）
    /// - 其他情况先查询基础接口，失败时改为查询操作规划接口
    pub fn get_available(&self, kind: &str) -> Result<Vec<String>> {
        if kind.eq_ignore_ascii_case("type") {
            let mut types = self.basic().get_available(kind)?;
            types.extend(self.manipulation().get_available(kind)?);
            return Ok(types);
        }
        match self.basic().get_available(kind) {
            Ok(names) => Ok(names),
            Err(e) => {
                warn!(
                    "getAvailable({}) failed on basic interface, trying manipulation: {}",
                    kind, e
                );
                self.manipulation().get_available(kind)
            },
        }
    }

    pub fn get_selected(&self, kind: &str) -> Result<Vec<String>> {
        self.basic().get_selected(kind)
    }

    /// 设置参数，值会先包装成带类型标记的 [`Any`]
    pub fn set_parameter(&self, name: &str, value: impl Into<Any>) -> Result<()> {
        self.basic().set_parameter(name, &value.into())
    }

    pub fn get_parameter(&self, name: &str) -> Result<Any> {
        self.basic().get_parameter(name)
    }

    /// 把路径移动到另一个问题
    pub fn move_path_to_problem(
        &self,
        path_id: PathId,
        problem_name: &str,
        joint_names: &[String],
    ) -> Result<()> {
        self.basic()
            .move_path_to_problem(path_id, problem_name, joint_names)
    }

    // ========================================================================
    // 初始构型和目标构型
    // ========================================================================

    pub fn set_initial_config(&self, q: &[f64]) -> Result<()> {
        self.basic().set_initial_config(q)
    }

    pub fn get_initial_config(&self) -> Result<Config> {
        self.basic().get_initial_config()
    }

    pub fn add_goal_config(&self, q: &[f64]) -> Result<()> {
        self.basic().add_goal_config(q)
    }

    pub fn get_goal_configs(&self) -> Result<Vec<Config>> {
        self.basic().get_goal_configs()
    }

    pub fn reset_goal_configs(&self) -> Result<()> {
        self.basic().reset_goal_configs()
    }

    // ========================================================================
    // 障碍物
    // ========================================================================

    /// 从 ROS 包 `package` 中的 `urdf/<filename>.urdf` 加载障碍物
    ///
    /// 物体名加上 `prefix` 前缀。
    pub fn load_obstacle_from_urdf(&self, package: &str, filename: &str, prefix: &str) -> Result<()> {
        self.obstacle()
            .load_obstacle_model(package, filename, prefix)
    }

    /// 把物体从某个关节的碰撞检测（或距离计算）中移除
    pub fn remove_obstacle_from_joint(
        &self,
        object: &str,
        joint: &str,
        collision: bool,
        distance: bool,
    ) -> Result<()> {
        self.obstacle()
            .remove_obstacle_from_joint(object, joint, collision, distance)
    }

    pub fn move_obstacle(&self, object: &str, position: &Transform) -> Result<()> {
        self.obstacle().move_obstacle(object, position)
    }

    pub fn get_obstacle_position(&self, object: &str) -> Result<Transform> {
        self.obstacle().get_obstacle_position(object)
    }

    pub fn get_obstacle_names(&self, collision: bool, distance: bool) -> Result<Vec<String>> {
        self.obstacle().get_obstacle_names(collision, distance)
    }

    // ========================================================================
    // 约束
    // ========================================================================

    /// 生成静态稳定约束
    ///
    /// 左右脚踝取自构造时传入的机器人。`kind` 省略时为 [`StabilityType::Sliding`]，
    /// `com_name` 为空字符串时使用整机质心。
    ///
    /// 远程调用成功后，生成的约束名可以通过 [`balance_constraints`](Self::balance_constraints) 获取。
    pub fn create_static_stability_constraints(
        &mut self,
        name: &str,
        q0: &[f64],
        com_name: &str,
        kind: Option<StabilityType>,
    ) -> Result<()> {
        let kind = kind.unwrap_or_default();
        self.robot.client().wholebody_step.problem.add_static_stability_constraints(
            name,
            q0,
            self.robot.left_ankle(),
            self.robot.right_ankle(),
            com_name,
            kind,
        )?;
        self.balance_constraints = balance_constraint_names(name, kind);
        debug!(
            "Created {:?} balance constraints: {:?}",
            kind, self.balance_constraints
        );
        Ok(())
    }

    /// 最近一次 [`create_static_stability_constraints`](Self::create_static_stability_constraints) 生成的约束名
    pub fn balance_constraints(&self) -> &[String] {
        &self.balance_constraints
    }

    /// 生成静态稳定约束的补集
    pub fn create_complement_static_stability_constraints(
        &self,
        name: &str,
        q0: &[f64],
    ) -> Result<()> {
        self.robot
            .client()
            .wholebody_step
            .problem
            .add_complement_static_stability_constraints(
                name,
                q0,
                self.robot.left_ankle(),
                self.robot.right_ankle(),
            )
    }

    /// 生成一对放置约束：`name` 和预放置约束 `pre_<name>`
    ///
    /// `width` 省略时为 [`DEFAULT_PRE_PLACEMENT_WIDTH`]。
    /// 只需要放置约束时使用 [`create_placement_constraint`](Self::create_placement_constraint)。
    pub fn create_placement_constraints(
        &self,
        name: &str,
        shapes: &[String],
        env_contacts: &[String],
        width: Option<f64>,
    ) -> Result<PlacementConstraints> {
        self.create_placement_constraint(name, shapes, env_contacts)?;

        let pre_placement = format!("pre_{name}");
        self.manipulation().create_pre_placement_constraint(
            &pre_placement,
            shapes,
            env_contacts,
            width.unwrap_or(DEFAULT_PRE_PLACEMENT_WIDTH),
        )?;
        Ok(PlacementConstraints {
            placement: name.to_string(),
            pre_placement,
        })
    }

    /// 只生成放置约束（不带预放置约束）
    pub fn create_placement_constraint(
        &self,
        name: &str,
        shapes: &[String],
        env_contacts: &[String],
    ) -> Result<()> {
        self.manipulation()
            .create_placement_constraint(name, shapes, env_contacts)
    }

    /// 两个关节之间的姿态约束
    ///
    /// 关节名为空字符串时表示世界坐标系。
    pub fn create_orientation_constraint(
        &self,
        name: &str,
        joint1: &str,
        joint2: &str,
        rotation: &Quaternion,
        mask: &[bool],
    ) -> Result<()> {
        self.basic()
            .create_orientation_constraint(name, joint1, joint2, rotation, mask)
    }

    /// 两个关节之间的位置约束（点在各自关节坐标系中给出）
    pub fn create_position_constraint(
        &self,
        name: &str,
        joint1: &str,
        joint2: &str,
        point1: &Point3,
        point2: &Point3,
        mask: &[bool],
    ) -> Result<()> {
        self.basic()
            .create_position_constraint(name, joint1, joint2, point1, point2, mask)
    }

    pub fn create_transformation_constraint(
        &self,
        name: &str,
        joint1: &str,
        joint2: &str,
        reference: &Transform,
        mask: &[bool],
    ) -> Result<()> {
        self.basic()
            .create_transformation_constraint(name, joint1, joint2, reference, mask)
    }

    /// 质心相对关节的位置约束
    pub fn create_relative_com_constraint(
        &self,
        name: &str,
        com_name: &str,
        joint: &str,
        point: &Point3,
        mask: &[bool],
    ) -> Result<()> {
        self.basic()
            .create_relative_com_constraint(name, com_name, joint, point, mask)
    }

    /// 质心位于两脚之间的约束
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
        self.basic().create_com_between_feet(
            name,
            com_name,
            joint_left,
            joint_right,
            point_left,
            point_right,
            joint_reference,
            mask,
        )
    }

    /// 添加部分质心（从给定关节开始递归包含子树）
    pub fn add_partial_com(&self, name: &str, joints: &[String]) -> Result<()> {
        self.robot.client().basic.robot.add_partial_com(name, joints)
    }

    pub fn get_partial_com(&self, name: &str) -> Result<Point3> {
        self.robot.client().basic.robot.get_partial_com(name)
    }

    pub fn get_jacobian_partial_com(&self, name: &str) -> Result<Vec<Vec<f64>>> {
        self.robot.client().basic.robot.get_jacobian_partial_com(name)
    }

    /// 为约束定义被动自由度
    pub fn add_passive_dofs(&self, name: &str, dof_names: &[String]) -> Result<()> {
        self.basic().add_passive_dofs(name, dof_names)
    }

    pub fn set_constant_right_hand_side(&self, name: &str, constant: bool) -> Result<()> {
        self.basic().set_constant_right_hand_side(name, constant)
    }

    /// 约束的右端项是否为常量
    ///
    /// 锁定关节的右端项总是可变的：如果 `name` 出现在 "LockedJoint" 列表中，
    /// 直接返回 `false`，不再调用远程 `getConstantRightHandSide`。
    pub fn get_constant_right_hand_side(&self, name: &str) -> Result<bool> {
        if self
            .get_available("LockedJoint")?
            .iter()
            .any(|locked| locked == name)
        {
            return Ok(false);
        }
        self.basic().get_constant_right_hand_side(name)
    }

    /// 清除所有约束（数值约束和锁定关节）
    pub fn reset_constraints(&self) -> Result<()> {
        self.basic().reset_constraints()
    }

    /// 把数值约束加入投影器 `name`
    ///
    /// `priorities` 省略时每个约束的优先级都为 0。
    pub fn add_numerical_constraints(
        &self,
        name: &str,
        names: &[String],
        priorities: Option<&[i64]>,
    ) -> Result<()> {
        match priorities {
            Some(priorities) => self.basic().add_numerical_constraints(name, names, priorities),
            None => {
                let zeros = vec![0; names.len()];
                self.basic().add_numerical_constraints(name, names, &zeros)
            },
        }
    }

    /// 同 [`add_numerical_constraints`](Self::add_numerical_constraints)
    pub fn set_numerical_constraints(
        &self,
        name: &str,
        names: &[String],
        priorities: Option<&[i64]>,
    ) -> Result<()> {
        self.add_numerical_constraints(name, names, priorities)
    }

    pub fn add_locked_joint_constraints(&self, name: &str, names: &[String]) -> Result<()> {
        self.basic().add_locked_joint_constraints(name, names)
    }

    /// 同 [`add_locked_joint_constraints`](Self::add_locked_joint_constraints)
    pub fn set_locked_joint_constraints(&self, name: &str, names: &[String]) -> Result<()> {
        self.add_locked_joint_constraints(name, names)
    }

    /// 把构型投影到约束流形上
    pub fn apply_constraints(&self, q: &[f64]) -> Result<Projection> {
        self.basic().apply_constraints(q)
    }

    /// 随机采样直到满足约束，最多尝试 `max_iter` 次
    pub fn generate_valid_config(&self, max_iter: u32) -> Result<Projection> {
        self.basic().generate_valid_config(max_iter)
    }

    pub fn create_locked_joint(&self, name: &str, joint: &str, value: &[f64]) -> Result<()> {
        self.basic().create_locked_joint(name, joint, value)
    }

    /// 锁定额外自由度，`index` 从 0 开始，约束维度等于 `value` 的长度
    pub fn create_locked_extra_dof(&self, name: &str, index: u32, value: &[f64]) -> Result<()> {
        self.basic().create_locked_extra_dof(name, index, value)
    }

    /// 锁定自由浮动关节，`values` 省略时为 [`FREE_FLYER_IDENTITY`]
    pub fn lock_free_flyer_joint(
        &self,
        free_flyer: &str,
        lock_name: &str,
        values: Option<&[f64]>,
    ) -> Result<Vec<String>> {
        let values = values.unwrap_or(&FREE_FLYER_IDENTITY);
        self.create_locked_joint(lock_name, free_flyer, values)?;
        Ok(vec![lock_name.to_string()])
    }

    /// 锁定平面关节，`values` 省略时为 [`PLANAR_IDENTITY`]
    pub fn lock_planar_joint(
        &self,
        joint: &str,
        lock_name: &str,
        values: Option<&[f64]>,
    ) -> Result<Vec<String>> {
        let values = values.unwrap_or(&PLANAR_IDENTITY);
        self.create_locked_joint(lock_name, joint, values)?;
        Ok(vec![lock_name.to_string()])
    }

    pub fn get_error_threshold(&self) -> Result<f64> {
        self.basic().get_error_threshold()
    }

    pub fn set_error_threshold(&self, threshold: f64) -> Result<()> {
        self.basic().set_error_threshold(threshold)
    }

    #[deprecated(note = "use get_max_iter_projection")]
    pub fn get_max_iterations(&self) -> Result<u32> {
        warn!("get_max_iterations is deprecated, use get_max_iter_projection");
        self.get_max_iter_projection()
    }

    #[deprecated(note = "use set_max_iter_projection")]
    pub fn set_max_iterations(&self, iterations: u32) -> Result<()> {
        warn!("set_max_iterations is deprecated, use set_max_iter_projection");
        self.set_max_iter_projection(iterations)
    }

    pub fn get_max_iter_projection(&self) -> Result<u32> {
        self.basic().get_max_iter_projection()
    }

    pub fn set_max_iter_projection(&self, iterations: u32) -> Result<()> {
        self.basic().set_max_iter_projection(iterations)
    }

    pub fn get_max_iter_path_planning(&self) -> Result<u32> {
        self.basic().get_max_iter_path_planning()
    }

    pub fn set_max_iter_path_planning(&self, iterations: u32) -> Result<()> {
        self.basic().set_max_iter_path_planning(iterations)
    }

    // ========================================================================
    // 求解器配置
    // ========================================================================

    pub fn select_path_planner(&self, kind: &str) -> Result<()> {
        self.basic().select_path_planner(kind)
    }

    pub fn select_configuration_shooter(&self, kind: &str) -> Result<()> {
        self.basic().select_configuration_shooter(kind)
    }

    pub fn select_distance(&self, kind: &str) -> Result<()> {
        self.basic().select_distance(kind)
    }

    pub fn select_steering_method(&self, kind: &str) -> Result<()> {
        self.basic().select_steering_method(kind)
    }

    /// 追加路径优化器（按添加顺序依次执行）
    pub fn add_path_optimizer(&self, kind: &str) -> Result<()> {
        self.basic().add_path_optimizer(kind)
    }

    pub fn clear_path_optimizers(&self) -> Result<()> {
        self.basic().clear_path_optimizers()
    }

    pub fn add_config_validation(&self, kind: &str) -> Result<()> {
        self.basic().add_config_validation(kind)
    }

    pub fn clear_config_validations(&self) -> Result<()> {
        self.basic().clear_config_validations()
    }

    pub fn select_path_validation(&self, kind: &str, tolerance: f64) -> Result<()> {
        self.basic().select_path_validation(kind, tolerance)
    }

    pub fn select_path_projector(&self, kind: &str, tolerance: f64) -> Result<()> {
        self.basic().select_path_projector(kind, tolerance)
    }

    // ========================================================================
    // 求解
    // ========================================================================

    /// 求解，阻塞直到完成
    pub fn solve(&self) -> Result<SolveTime> {
        self.basic().solve()
    }

    pub fn prepare_solve_step_by_step(&self) -> Result<bool> {
        self.basic().prepare_solve_step_by_step()
    }

    pub fn execute_one_step(&self) -> Result<bool> {
        self.basic().execute_one_step()
    }

    pub fn finish_solve_step_by_step(&self) -> Result<()> {
        self.basic().finish_solve_step_by_step()
    }

    /// 中断正在进行的求解
    ///
    /// 只有服务端以多线程方式运行时才会生效。
    pub fn interrupt_path_planning(&self) -> Result<()> {
        self.basic().interrupt_path_planning()
    }

    // ========================================================================
    // 路径
    // ========================================================================

    /// 直连两个构型
    ///
    /// `validate` 为 true 时，结果中的路径只包含从起点开始的无碰撞部分。
    pub fn direct_path(&self, start: &[f64], end: &[f64], validate: bool) -> Result<DirectPath> {
        self.basic().direct_path(start, end, validate)
    }

    pub fn project_path(&self, path_id: PathId) -> Result<bool> {
        self.basic().project_path(path_id)
    }

    pub fn number_paths(&self) -> Result<u32> {
        self.basic().number_paths()
    }

    pub fn optimize_path(&self, path_id: PathId) -> Result<SolveTime> {
        self.basic().optimize_path(path_id)
    }

    pub fn path_length(&self, path_id: PathId) -> Result<f64> {
        self.basic().path_length(path_id)
    }

    /// 路径上距起点 `distance` 处的构型
    pub fn config_at_param(&self, path_id: PathId, distance: f64) -> Result<Config> {
        self.basic().config_at_param(path_id, distance)
    }

    pub fn get_waypoints(&self, path_id: PathId) -> Result<Vec<Config>> {
        self.basic().get_waypoints(path_id)
    }

    pub fn erase_path(&self, path_id: PathId) -> Result<()> {
        self.basic().erase_path(path_id)
    }

    /// 把路径 `end_id` 接到 `start_id` 末尾
    pub fn concatenate_path(&self, start_id: PathId, end_id: PathId) -> Result<()> {
        self.basic().concatenate_path(start_id, end_id)
    }

    // ========================================================================
    // 路线图
    // ========================================================================

    pub fn nodes(&self) -> Result<Vec<Config>> {
        self.basic().nodes()
    }

    pub fn node(&self, node_id: NodeId) -> Result<Config> {
        self.basic().node(node_id)
    }

    pub fn number_nodes(&self) -> Result<u32> {
        self.basic().number_nodes()
    }

    pub fn number_edges(&self) -> Result<u32> {
        self.basic().number_edges()
    }

    pub fn edge(&self, edge_id: EdgeId) -> Result<Edge> {
        self.basic().edge(edge_id)
    }

    pub fn number_connected_components(&self) -> Result<u32> {
        self.basic().number_connected_components()
    }

    pub fn nodes_connected_component(&self, component: ComponentId) -> Result<Vec<Config>> {
        self.basic().nodes_connected_component(component)
    }

    pub fn clear_roadmap(&self) -> Result<()> {
        self.basic().clear_roadmap()
    }

    pub fn add_config_to_roadmap(&self, q: &[f64]) -> Result<()> {
        self.basic().add_config_to_roadmap(q)
    }

    /// 在路线图中添加边，`both_edges` 为 true 时同时添加反向边
    pub fn add_edge_to_roadmap(
        &self,
        q1: &[f64],
        q2: &[f64],
        path_id: PathId,
        both_edges: bool,
    ) -> Result<()> {
        self.basic().add_edge_to_roadmap(q1, q2, path_id, both_edges)
    }

    // ========================================================================
    // 操作规划
    // ========================================================================

    /// 选择约束图中的目标状态
    pub fn set_target_state(&self, state_id: u32) -> Result<()> {
        self.manipulation().set_target_state(state_id)
    }
}

impl<R: RobotModel> std::fmt::Debug for ProblemSolver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemSolver")
            .field("balance_constraints", &self.balance_constraints)
            .finish_non_exhaustive()
    }
}
