//! # Dependency Injection Abstractions
//! 
//! 依赖注入抽象层，定义 Bean 定义注册、命名与校验的核心接口。
//! 
//! ## 核心接口
//! 
//! - [`BeanDefinitionRegistry`] - Bean 定义注册表接口
//! - [`ConfigurableListableBeanFactory`] - 可配置的 Bean 工厂接口
//! - [`BeanNameGenerator`] - Bean 名称生成器接口
//! - [`ProblemReporter`] - 配置问题报告器接口
//! - [`DependencyComparator`] / [`AutowireCandidateResolver`] - 自动装配支持

pub mod registry;
pub mod factory;
pub mod naming;
pub mod problem;

pub use registry::*;
pub use factory::*;
pub use naming::*;
pub use problem::*;
