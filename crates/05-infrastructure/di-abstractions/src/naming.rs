//! Bean 名称生成抽象接口

use crate::registry::BeanDefinitionRegistry;
use infrastructure_common::{BeanDefinition, DefinitionResult};
use std::fmt::Debug;

/// Bean 名称生成器 trait
pub trait BeanNameGenerator: Send + Sync + Debug {
    /// 为 Bean 定义生成名称
    ///
    /// 注解给出的名称互相冲突时返回
    /// [`DefinitionError::NamingConflict`](infrastructure_common::DefinitionError::NamingConflict)。
    fn generate_bean_name(
        &self,
        definition: &BeanDefinition,
        registry: &dyn BeanDefinitionRegistry,
    ) -> DefinitionResult<String>;
}
