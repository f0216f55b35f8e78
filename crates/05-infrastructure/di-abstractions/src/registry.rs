//! Bean 定义注册表抽象接口

use crate::factory::ConfigurableListableBeanFactory;
use infrastructure_common::{BeanDefinition, DefinitionResult};
use std::sync::Arc;

/// Bean 定义注册表 trait
///
/// 名称在注册表内唯一，实现自身负责并发同步，因此所有方法都接收 `&self`。
pub trait BeanDefinitionRegistry: Send + Sync {
    /// 以指定名称注册 Bean 定义
    ///
    /// 名称已存在且不允许覆盖时返回 [`DefinitionError::DuplicateBeanName`](infrastructure_common::DefinitionError::DuplicateBeanName)。
    fn register_bean_definition(
        &self,
        bean_name: &str,
        definition: BeanDefinition,
    ) -> DefinitionResult<Arc<BeanDefinition>>;

    /// 移除 Bean 定义
    fn remove_bean_definition(&self, bean_name: &str) -> DefinitionResult<Arc<BeanDefinition>>;

    /// 获取 Bean 定义
    fn get_bean_definition(&self, bean_name: &str) -> DefinitionResult<Arc<BeanDefinition>>;

    /// 是否包含指定名称的 Bean 定义
    fn contains_bean_definition(&self, bean_name: &str) -> bool;

    /// 所有 Bean 定义名称（注册顺序）
    fn bean_definition_names(&self) -> Vec<String>;

    /// Bean 定义数量
    fn bean_definition_count(&self) -> usize {
        self.bean_definition_names().len()
    }

    /// 注册别名
    fn register_alias(&self, name: &str, alias: &str) -> DefinitionResult<()>;

    /// 指定名称的所有别名
    fn aliases(&self, name: &str) -> Vec<String>;

    /// 是否为已注册的别名
    fn is_alias(&self, name: &str) -> bool;

    /// 名称是否已被 Bean 定义或别名占用
    fn is_bean_name_in_use(&self, name: &str) -> bool {
        self.contains_bean_definition(name) || self.is_alias(name)
    }

    /// 获取底层可配置的 Bean 工厂（如果注册表本身就是或包装了一个）
    fn as_bean_factory(&self) -> Option<&dyn ConfigurableListableBeanFactory> {
        None
    }
}
