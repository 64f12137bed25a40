//! 求解与中断命令

use super::Settings;
use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;
use tracing::{info, warn};

/// 求解命令参数
#[derive(Args, Debug, Default)]
pub struct SolveCommand {
    /// 求解前选择的问题
    #[arg(short, long)]
    pub problem: Option<String>,

    /// 求解后优化最后一条路径
    #[arg(long)]
    pub optimize: bool,
}

impl SolveCommand {
    pub fn execute(&self, settings: &Settings) -> Result<()> {
        let ps = Arc::new(settings.connect()?);

        if let Some(ref name) = self.problem {
            ps.select_problem(name)?;
        }

        // Ctrl+C 通过同一连接发送中断，solve 调用随后返回错误
        let interrupter = Arc::clone(&ps);
        ctrlc::set_handler(move || {
            eprintln!("\nInterrupting path planning...");
            if let Err(e) = interrupter.interrupt_path_planning() {
                warn!("Failed to interrupt: {}", e);
            }
        })
        .context("设置 Ctrl+C 处理失败")?;

        println!("⏳ 正在求解...");
        let time = ps.solve().context("求解失败")?;
        info!("Solved in {:?}", time.as_duration());
        println!("✅ 求解完成，耗时 {:.3} s", time.as_duration().as_secs_f64());

        let count = ps.number_paths()?;
        if self.optimize && count > 0 {
            let time = ps.optimize_path(count - 1)?;
            println!(
                "✅ 路径优化完成，耗时 {:.3} s",
                time.as_duration().as_secs_f64()
            );
        }
        println!("  路径数: {}", ps.number_paths()?);
        Ok(())
    }
}

/// 从新连接中断另一个进程中的求解
pub fn interrupt(settings: &Settings) -> Result<()> {
    let ps = settings.connect()?;
    ps.interrupt_path_planning()?;
    println!("✅ 已发送中断");
    Ok(())
}
