//! 日志初始化
//!
//! SDK 内部统一使用 `tracing`。应用程序调用一次 [`init_logging`] 即可：
//! - `RUST_LOG` 优先，未设置时使用传入的默认指令
//! - 依赖库通过 `log` 发出的记录也会转发到同一个订阅器

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    /// 默认过滤指令无法解析
    #[error("Invalid log directive {directive:?}: {message}")]
    InvalidDirective { directive: String, message: String },

    /// 已经安装过全局订阅器
    #[error("Global tracing subscriber already installed")]
    AlreadyInitialized,
}

/// 构造过滤器：`RUST_LOG` 优先
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            LoggingError::InvalidDirective {
                directive: default_directive.to_string(),
                message: e.to_string(),
            }
        }),
    }
}

/// 安装全局日志订阅器
///
/// ```rust,no_run
/// hpp_sdk::init_logging("hpp_client=info").ok();
/// ```
pub fn init_logging(default_directive: &str) -> Result<(), LoggingError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive)?)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    // log -> tracing 桥接（其他库可能已经设置了 logger，忽略失败）
    if LogTracer::builder()
        .with_max_level(log::LevelFilter::Trace)
        .init()
        .is_err()
    {
        tracing::debug!("A `log` logger is already installed, records are not bridged");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_default_directive() {
        // 仅当 RUST_LOG 未设置时，默认指令才会被解析
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = env_filter("hpp_client=loud").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidDirective { .. }));
    }

    #[test]
    fn test_init_twice() {
        let first = init_logging("hpp_client=debug");
        let second = init_logging("hpp_client=debug");
        // 第一次可能因其他测试已安装而失败，但第二次一定失败
        let _ = first;
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized)));
    }
}
