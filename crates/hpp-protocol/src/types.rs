//! 远程接口使用的数据类型
//!
//! 这些类型只描述数据的形状，所有数据的生命周期都由服务端管理。

use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 机器人构型（广义坐标）
pub type Config = Vec<f64>;

/// 服务端路径编号
pub type PathId = u32;

/// 路线图节点编号
pub type NodeId = u32;

/// 路线图边编号
pub type EdgeId = u32;

/// 路线图连通分量编号
pub type ComponentId = u32;

/// 约束分量掩码
pub type Mask = Vec<bool>;

/// 三维点
pub type Point3 = [f64; 3];

/// 四元数，顺序为 (x, y, z, w)
pub type Quaternion = [f64; 4];

/// 刚体位姿：平移 (x, y, z) + 四元数 (x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform(pub [f64; 7]);

impl Transform {
    /// 单位位姿
    pub const IDENTITY: Transform = Transform([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);

    pub fn new(translation: Point3, rotation: Quaternion) -> Self {
        let [x, y, z] = translation;
        let [qx, qy, qz, qw] = rotation;
        Self([x, y, z, qx, qy, qz, qw])
    }

    pub fn translation(&self) -> Point3 {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn rotation(&self) -> Quaternion {
        [self.0[3], self.0[4], self.0[5], self.0[6]]
    }

    /// 转换为 nalgebra 等距变换（四元数会被归一化）
    pub fn to_isometry(&self) -> na::Isometry3<f64> {
        let [x, y, z] = self.translation();
        let [qx, qy, qz, qw] = self.rotation();
        na::Isometry3::from_parts(
            na::Translation3::new(x, y, z),
            na::UnitQuaternion::from_quaternion(na::Quaternion::new(qw, qx, qy, qz)),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<na::Isometry3<f64>> for Transform {
    fn from(iso: na::Isometry3<f64>) -> Self {
        let t = iso.translation.vector;
        // coords 的存储顺序为 (i, j, k, w)
        let q = iso.rotation.coords;
        Self([t.x, t.y, t.z, q[0], q[1], q[2], q[3]])
    }
}

impl From<Transform> for na::Isometry3<f64> {
    fn from(t: Transform) -> Self {
        t.to_isometry()
    }
}

/// 路线图中的一条边（起点和终点构型）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: Config,
    pub to: Config,
}

/// 投影或随机采样的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// 是否满足全部约束
    pub success: bool,
    /// 输出构型
    pub config: Config,
    /// 残差
    pub residual_error: f64,
}

/// 直连路径的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectPath {
    /// 路径是否通过验证
    pub success: bool,
    /// 新路径编号
    pub path_id: PathId,
    /// 验证失败时的说明
    pub report: String,
}

/// 抓手或把手在所属关节中的位姿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionInJoint {
    /// 关节名（无关节时为 "universe"）
    pub joint: String,
    pub position: Transform,
}

/// 求解耗时，线上格式为 `[hours, minutes, seconds, milliseconds]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u64; 4]", into = "[u64; 4]")]
pub struct SolveTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
}

impl SolveTime {
    /// 字段超出范围时饱和到 `u64::MAX` 毫秒
    pub fn as_duration(&self) -> Duration {
        let minutes = self.hours.saturating_mul(60).saturating_add(self.minutes);
        let seconds = minutes.saturating_mul(60).saturating_add(self.seconds);
        Duration::from_millis(seconds.saturating_mul(1000).saturating_add(self.milliseconds))
    }
}

impl From<[u64; 4]> for SolveTime {
    fn from([hours, minutes, seconds, milliseconds]: [u64; 4]) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            milliseconds,
        }
    }
}

impl From<SolveTime> for [u64; 4] {
    fn from(t: SolveTime) -> Self {
        [t.hours, t.minutes, t.seconds, t.milliseconds]
    }
}

/// 静态稳定约束的生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StabilityType {
    /// 双脚可在地面滑动，质心相对左脚固定
    #[default]
    Sliding,
    /// 双脚可滑动，质心位于两脚之间
    SlidingAlignedCom,
    /// 双脚固定在地面
    FixedOnTheGround,
    /// 双脚固定，质心位于两脚之间
    FixedAlignedCom,
}
