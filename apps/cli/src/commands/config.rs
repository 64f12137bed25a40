//! 配置管理命令
//!
//! 配置文件分为两节：
//!
//! ```toml
//! [client]
//! address = "127.0.0.1:13331"
//! context = "corbaserver"
//! connect_timeout_ms = 5000
//!
//! [robot]
//! name = "robot"
//! left_ankle = "robot/l_ankle"
//! right_ankle = "robot/r_ankle"
//! ```

use super::Settings;
use anyhow::{Context, Result};
use clap::Subcommand;
use hpp_sdk::ClientConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 机器人描述（用于构造求解器）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub name: String,
    pub left_ankle: String,
    pub right_ankle: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            name: "robot".to_string(),
            left_ankle: String::new(),
            right_ankle: String::new(),
        }
    }
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub client: ClientConfig,
    pub robot: RobotConfig,
}

impl CliConfig {
    /// 加载配置，文件不存在时使用默认值
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("读取配置文件失败")?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 保存配置
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }

        let content = format!(
            "# HPP CLI Configuration\n\n{}",
            toml::to_string_pretty(self).context("序列化配置失败")?
        );
        fs::write(path, content).context("写入配置文件失败")?;
        Ok(())
    }

    /// 按键名读取配置项，未设置的可选项返回 `None`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "address" => Some(self.client.address.clone()),
            "context" => Some(self.client.context.clone()),
            "connect_timeout_ms" => Some(self.client.connect_timeout_ms.to_string()),
            "call_timeout_ms" => self.client.call_timeout_ms.map(|ms| ms.to_string()),
            "robot" => Some(self.robot.name.clone()),
            "left_ankle" => Some(self.robot.left_ankle.clone()),
            "right_ankle" => Some(self.robot.right_ankle.clone()),
            _ => anyhow::bail!("未知配置项: {}", key),
        };
        Ok(value)
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 服务地址（Unix Socket 路径或 host:port）
        #[arg(long)]
        address: Option<String>,

        /// 命名服务上下文
        #[arg(long)]
        context: Option<String>,

        /// 连接超时（毫秒）
        #[arg(long)]
        connect_timeout_ms: Option<u64>,

        /// 调用超时（毫秒，0 表示不限）
        #[arg(long)]
        call_timeout_ms: Option<u64>,

        /// 机器人名称
        #[arg(long)]
        robot: Option<String>,

        /// 左脚踝关节名
        #[arg(long)]
        left_ankle: Option<String>,

        /// 右脚踝关节名
        #[arg(long)]
        right_ankle: Option<String>,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },
}

impl ConfigCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        match self {
            ConfigCommand::Set {
                address,
                context,
                connect_timeout_ms,
                call_timeout_ms,
                robot,
                left_ankle,
                right_ankle,
            } => {
                let mut config = settings.load()?;

                if let Some(address) = address {
                    println!("✅ 设置服务地址: {}", address);
                    config.client.address = address;
                }
                if let Some(context) = context {
                    println!("✅ 设置上下文: {}", context);
                    config.client.context = context;
                }
                if let Some(ms) = connect_timeout_ms {
                    println!("✅ 设置连接超时: {} ms", ms);
                    config.client.connect_timeout_ms = ms;
                }
                if let Some(ms) = call_timeout_ms {
                    println!("✅ 设置调用超时: {} ms", ms);
                    config.client.call_timeout_ms = (ms > 0).then_some(ms);
                }
                if let Some(robot) = robot {
                    println!("✅ 设置机器人: {}", robot);
                    config.robot.name = robot;
                }
                if let Some(joint) = left_ankle {
                    config.robot.left_ankle = joint;
                }
                if let Some(joint) = right_ankle {
                    config.robot.right_ankle = joint;
                }

                config.save(&settings.config_file)
            },

            ConfigCommand::Get { key } => {
                let config = settings.load()?;
                if key == "all" {
                    println!("配置文件: {}", settings.config_file.display());
                    print!("{}", toml::to_string_pretty(&config)?);
                    return Ok(());
                }

                match config.get(&key)? {
                    Some(value) => println!("{}", value),
                    None => println!("(未设置)"),
                }
                Ok(())
            },
        }
    }
}
