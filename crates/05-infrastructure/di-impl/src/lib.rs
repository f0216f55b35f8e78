//! # 依赖注入具体实现
//!
//! 提供注解驱动的 Bean 定义解析：名称生成、通用注解处理、配置类校验、
//! 作用域代理以及注解配置基础设施注册。
//!
//! ## 处理流程
//!
//! 候选定义（扫描得到或来自 `@Bean` 方法）-> [`AnnotationBeanNameGenerator`] 生成名称
//! -> [`ConfigurationModel::validate`] 结构校验 -> [`process_common_definition_annotations`]
//! 复制声明式属性 -> 注册到 [`DefaultListableBeanFactory`]。

pub mod annotation_config;
pub mod autowire;
pub mod common_annotations;
pub mod config_class;
pub mod config_reader;
pub mod naming;
pub mod ordering;
pub mod problems;
pub mod reader;
pub mod registry;
pub mod scoped_proxy;

pub use annotation_config::*;
pub use autowire::*;
pub use common_annotations::*;
pub use config_class::*;
pub use config_reader::*;
pub use naming::*;
pub use ordering::*;
pub use problems::*;
pub use reader::*;
pub use registry::*;
pub use scoped_proxy::*;
