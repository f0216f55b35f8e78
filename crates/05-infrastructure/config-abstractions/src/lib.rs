//! # Configuration Abstractions
//! 
//! 属性源抽象层，定义容器读取开关类属性的统一接口。
//! 
//! ## 核心接口
//! 
//! - [`PropertySource`] - 属性源接口
//! - [`MutablePropertySource`] - 可在运行时覆盖的属性源

pub mod provider;

pub use provider::*;
