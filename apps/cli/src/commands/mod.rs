//! 命令定义和实现

pub mod config;
pub mod query;
pub mod solve;

pub use config::{CliConfig, ConfigCommand};
pub use query::QueryCommand;
pub use solve::SolveCommand;

use anyhow::{Context, Result};
use hpp_sdk::{ClientBuilder, HumanoidRobot, ProblemSolver};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// 默认配置文件路径：`<config dir>/hpp/config.toml`
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("hpp");
    path.push("config.toml");
    Ok(path)
}

/// 命令行全局选项
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_file: PathBuf,
    /// 命令行给出的地址优先于配置文件
    pub address: Option<String>,
}

impl Settings {
    pub fn new(config_file: Option<PathBuf>, address: Option<String>) -> Result<Self> {
        let config_file = match config_file {
            Some(path) => path,
            None => default_config_file()?,
        };
        Ok(Self {
            config_file,
            address,
        })
    }

    pub fn load(&self) -> Result<CliConfig> {
        CliConfig::load(&self.config_file)
    }

    /// 连接服务并创建求解器
    pub fn connect(&self) -> Result<ProblemSolver<HumanoidRobot>> {
        let config = self.load()?;
        let mut builder = ClientBuilder::from_config(&config.client);
        if let Some(ref address) = self.address {
            builder = builder.address(address.as_str());
        }

        debug!("Connecting with {:?}", builder);
        let client = builder
            .build()
            .with_context(|| format!("连接求解服务失败（配置文件 {}）", self.config_file.display()))?;

        let robot = HumanoidRobot::new(
            client,
            config.robot.name,
            config.robot.left_ankle,
            config.robot.right_ankle,
        );
        Ok(ProblemSolver::new(Arc::new(robot)))
    }
}
