//! # Infrastructure Common
//!
//! 依赖注入容器各层共享的模型与错误类型。
//!
//! ## 核心组件
//!
//! - [`BeanDefinition`] / [`BeanDefinitionHolder`] - Bean 定义及其注册名称
//! - [`AnnotatedTypeMetadata`] - 注解元数据视图（由外部元数据层提供）
//! - [`annotations`] - 容器识别的注解类型
//! - [`ApplicationStartup`] - 启动步骤跟踪
//!
//! ## 设计原则
//!
//! - 元数据通过强类型 trait 读取，不依赖运行时反射
//! - Bean 定义注册前可变，注册后只读共享
//! - 致命错误通过 `Result` 传播，结构性问题交给问题报告器

pub mod annotations;
pub mod definition;
pub mod errors;
pub mod metadata;
pub mod startup;

pub use definition::*;
pub use errors::*;
pub use metadata::*;
pub use startup::*;
