//! # HPP CLI
//!
//! 问题求解服务的命令行工具。每条命令独立连接服务，执行后断开。
//!
//! ```bash
//! # 配置默认服务地址
//! hpp-cli config set --address /run/hpp/problem-solver.sock
//!
//! # 查询与求解
//! hpp-cli available PathPlanner
//! hpp-cli problem grasp-ball
//! hpp-cli solve
//!
//! # 从另一个终端中断正在进行的求解
//! hpp-cli interrupt
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

mod commands;

use commands::{ConfigCommand, QueryCommand, SolveCommand};

/// HPP CLI - 操作规划求解服务命令行工具
#[derive(Parser, Debug)]
#[command(name = "hpp-cli")]
#[command(about = "Command-line interface for the HPP manipulation problem solver", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 `<config dir>/hpp/config.toml`）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 服务地址（覆盖配置）
    #[arg(short, long, global = true)]
    address: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 列出某类可用对象
    Available {
        /// 对象类别（如 PathPlanner, SteeringMethod, type）
        kind: String,
    },

    /// 列出某类已选择的对象
    Selected {
        /// 对象类别
        kind: String,
    },

    /// 选择（或创建）命名问题
    Problem {
        /// 问题名称
        name: String,
    },

    /// 求解当前问题（Ctrl+C 中断）
    Solve {
        #[command(flatten)]
        args: SolveCommand,
    },

    /// 中断正在进行的路径规划
    Interrupt,

    /// 列出已求得的路径
    Paths,

    /// 路线图统计
    Roadmap,
}

fn main() -> Result<()> {
    // 初始化日志
    let directive: Directive = "hpp_cli=info".parse()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();
    let settings = commands::Settings::new(cli.config, cli.address)?;

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&settings),
        Commands::Available { kind } => QueryCommand::Available(kind).execute(&settings),
        Commands::Selected { kind } => QueryCommand::Selected(kind).execute(&settings),
        Commands::Problem { name } => QueryCommand::Problem(name).execute(&settings),
        Commands::Paths => QueryCommand::Paths.execute(&settings),
        Commands::Roadmap => QueryCommand::Roadmap.execute(&settings),
        Commands::Solve { args } => args.execute(&settings),
        Commands::Interrupt => commands::solve::interrupt(&settings),
    }
}
