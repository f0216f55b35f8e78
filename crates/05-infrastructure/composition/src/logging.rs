//! 日志初始化

use infrastructure_common::InfrastructureResult;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以环境变量为准
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string().to_lowercase()))
    }
}

/// 安装全局日志订阅者
///
/// 已存在全局订阅者或日志桥接时返回 `Ok(false)`，不会覆盖现有配置。
pub fn init_logging(config: &LoggingConfig) -> InfrastructureResult<bool> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    let result = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    match result {
        Ok(()) => {
            info!("日志系统初始化完成");
            Ok(true)
        }
        Err(e) => {
            debug!("全局日志订阅者已存在, 跳过初始化: {}", e);
            Ok(false)
        }
    }
}
