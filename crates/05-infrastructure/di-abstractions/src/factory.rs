//! Bean 工厂抽象接口
//!
//! 实例化引擎不在本层范围内，这里只暴露注解配置需要调整的两个扩展点：
//! 依赖排序比较器与自动装配候选解析器。

use crate::registry::BeanDefinitionRegistry;
use infrastructure_common::{BeanDefinition, BeanDefinitionHolder};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

/// 依赖排序比较器 trait
pub trait DependencyComparator: Send + Sync + Debug {
    /// 比较两个 Bean 定义的先后顺序
    fn compare(&self, left: &BeanDefinition, right: &BeanDefinition) -> Ordering;

    /// 用于判断具体实现类型
    fn as_any(&self) -> &dyn Any;
}

/// 依赖描述
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDescriptor {
    /// 期望的类型名称
    pub type_name: Option<String>,
    /// 限定符
    pub qualifier: Option<String>,
    /// 是否必需
    pub required: bool,
}

impl DependencyDescriptor {
    /// 创建必需依赖描述
    pub fn new() -> Self {
        Self {
            type_name: None,
            qualifier: None,
            required: true,
        }
    }

    /// 设置类型
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// 设置限定符
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// 设置为可选依赖
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// 自动装配候选解析器 trait
pub trait AutowireCandidateResolver: Send + Sync + Debug {
    /// 判断 Bean 定义是否可以作为依赖的候选者
    fn is_autowire_candidate(&self, holder: &BeanDefinitionHolder, descriptor: &DependencyDescriptor) -> bool;

    /// 用于判断具体实现类型
    fn as_any(&self) -> &dyn Any;
}

/// 默认候选解析器：只看定义上的候选标志
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleAutowireCandidateResolver;

impl AutowireCandidateResolver for SimpleAutowireCandidateResolver {
    fn is_autowire_candidate(&self, holder: &BeanDefinitionHolder, _descriptor: &DependencyDescriptor) -> bool {
        holder.definition().is_autowire_candidate()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 可配置的 Bean 工厂 trait
pub trait ConfigurableListableBeanFactory: BeanDefinitionRegistry {
    /// 当前依赖排序比较器
    fn dependency_comparator(&self) -> Option<Arc<dyn DependencyComparator>>;

    /// 设置依赖排序比较器
    fn set_dependency_comparator(&self, comparator: Option<Arc<dyn DependencyComparator>>);

    /// 当前自动装配候选解析器
    fn autowire_candidate_resolver(&self) -> Arc<dyn AutowireCandidateResolver>;

    /// 设置自动装配候选解析器
    fn set_autowire_candidate_resolver(&self, resolver: Arc<dyn AutowireCandidateResolver>);
}
