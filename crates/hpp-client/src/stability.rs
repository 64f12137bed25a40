//! 静态稳定约束的命名规则
//!
//! 服务端按稳定类型生成一组固定的约束，名称为 `<约束名>/<后缀>`。

use hpp_protocol::StabilityType;

const SLIDING: &[&str] = &[
    "relative-com",
    "relative-orientation",
    "relative-position",
    "orientation-left-foot",
    "position-left-foot",
];

const SLIDING_ALIGNED_COM: &[&str] = &["com-between-feet", "pose-left-foot", "pose-right-foot"];

const FIXED_ON_THE_GROUND: &[&str] = &["pose-left-foot", "pose-right-foot", "relative-com"];

const FIXED_ALIGNED_COM: &[&str] = &["com-between-feet", "pose-left-foot", "pose-right-foot"];

/// 某种稳定类型生成的约束后缀（按服务端生成顺序）
pub fn balance_constraint_suffixes(kind: StabilityType) -> &'static [&'static str] {
    match kind {
        StabilityType::Sliding => SLIDING,
        StabilityType::SlidingAlignedCom => SLIDING_ALIGNED_COM,
        StabilityType::FixedOnTheGround => FIXED_ON_THE_GROUND,
        StabilityType::FixedAlignedCom => FIXED_ALIGNED_COM,
    }
}

/// 完整约束名列表
pub fn balance_constraint_names(name: &str, kind: StabilityType) -> Vec<String> {
    balance_constraint_suffixes(kind)
        .iter()
        .map(|suffix| format!("{name}/{suffix}"))
        .collect()
}
