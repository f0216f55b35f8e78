//! # 基础设施组合层
//!
//! 将属性存储、注解元数据与 Bean 定义解析组合成一个可用的
//! [`AnnotationConfigContext`]。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{ContainerBuilder, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ContainerBuilder::new()
//!         .add_metadata_json_file("metadata.json")?
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     context.ensure_no_problems()?;
//!     for name in context.user_bean_names() {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod infrastructure;
pub mod logging;

#[cfg(test)]
mod tests;

pub use bootstrapper::ContainerBootstrapper;
pub use builder::ContainerBuilder;
pub use infrastructure::AnnotationConfigContext;
pub use logging::{init_logging, LoggingConfig};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
