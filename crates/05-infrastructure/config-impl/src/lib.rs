//! # Configuration Implementation
//! 
//! 容器属性存储的具体实现。
//! 
//! ## 主要组件
//! 
//! - [`ContainerProperties`] - 进程级两级属性存储
//! - [`LocalPropertySource`] - 基于 TOML 资源的本地属性源
//! - [`SystemPropertySource`] - 基于环境变量的系统属性源

pub mod properties;
pub mod providers;

pub use properties::*;
pub use providers::*;
