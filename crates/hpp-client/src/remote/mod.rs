//! 远程接口的类型化桩
//!
//! 每个子接口一个结构体，每个远程操作一个方法，参数顺序与远程 IDL 一致。
//! 这里不做任何本地处理，特殊行为都在 [`ProblemSolver`](crate::ProblemSolver) 中。

pub mod basic;
pub mod manipulation;
pub mod wholebody_step;
