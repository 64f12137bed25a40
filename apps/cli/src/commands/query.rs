//! 查询命令

use super::Settings;
use anyhow::Result;

/// 只读查询（`problem` 除外，它会切换当前问题）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCommand {
    Available(String),
    Selected(String),
    Problem(String),
    Paths,
    Roadmap,
}

impl QueryCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        let ps = settings.connect()?;

        match self {
            QueryCommand::Available(kind) => print_names(&ps.get_available(&kind)?),
            QueryCommand::Selected(kind) => print_names(&ps.get_selected(&kind)?),

            QueryCommand::Problem(name) => {
                if ps.select_problem(&name)? {
                    println!("✅ 创建并选择问题: {}", name);
                } else {
                    println!("✅ 选择问题: {}", name);
                }
            },

            QueryCommand::Paths => {
                let count = ps.number_paths()?;
                if count == 0 {
                    println!("(无路径)");
                }
                for id in 0..count {
                    println!(
                        "  #{}: length {:.4}, {} waypoints",
                        id,
                        ps.path_length(id)?,
                        ps.get_waypoints(id)?.len()
                    );
                }
            },

            QueryCommand::Roadmap => {
                println!("📊 路线图:");
                println!("  节点: {}", ps.number_nodes()?);
                println!("  边: {}", ps.number_edges()?);
                println!("  连通分量: {}", ps.number_connected_components()?);
            },
        }
        Ok(())
    }
}

fn print_names(names: &[String]) {
    if names.is_empty() {
        println!("(空)");
    }
    for name in names {
        println!("{}", name);
    }
}
