//! 注解配置基础设施注册
//!
//! 在注册表中以固定名称登记注解处理所需的后置处理器定义，重复调用只补齐缺失的条目。

use crate::autowire::ContextAnnotationAutowireCandidateResolver;
use crate::ordering::AnnotationAwareOrderComparator;
use di_abstractions::{BeanDefinitionRegistry, ConfigurableListableBeanFactory};
use infrastructure_common::{
    BeanDefinition, BeanDefinitionHolder, BeanRole, DefinitionResult, MetadataTable, SourceLocation,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// 配置类后置处理器
pub const CONFIGURATION_ANNOTATION_PROCESSOR_BEAN_NAME: &str =
    "lorn.di.context.annotation.internalConfigurationAnnotationProcessor";

/// 处理配置类时使用的名称生成器
pub const CONFIGURATION_BEAN_NAME_GENERATOR: &str =
    "lorn.di.context.annotation.internalConfigurationBeanNameGenerator";

/// `@Autowired` 后置处理器
pub const AUTOWIRED_ANNOTATION_PROCESSOR_BEAN_NAME: &str =
    "lorn.di.context.annotation.internalAutowiredAnnotationProcessor";

/// JSR-250 通用注解后置处理器
pub const COMMON_ANNOTATION_PROCESSOR_BEAN_NAME: &str =
    "lorn.di.context.annotation.internalCommonAnnotationProcessor";

/// JPA 持久化注解后置处理器
pub const PERSISTENCE_ANNOTATION_PROCESSOR_BEAN_NAME: &str =
    "lorn.di.context.annotation.internalPersistenceAnnotationProcessor";

/// `@EventListener` 方法处理器
pub const EVENT_LISTENER_PROCESSOR_BEAN_NAME: &str = "lorn.di.context.event.internalEventListenerProcessor";

/// 事件监听器工厂
pub const EVENT_LISTENER_FACTORY_BEAN_NAME: &str = "lorn.di.context.event.internalEventListenerFactory";

const CONFIGURATION_CLASS_POST_PROCESSOR: &str = "lorn.di.context.annotation.ConfigurationClassPostProcessor";
const AUTOWIRED_ANNOTATION_BEAN_POST_PROCESSOR: &str =
    "lorn.di.beans.factory.annotation.AutowiredAnnotationBeanPostProcessor";
const COMMON_ANNOTATION_BEAN_POST_PROCESSOR: &str = "lorn.di.context.annotation.CommonAnnotationBeanPostProcessor";
const EVENT_LISTENER_METHOD_PROCESSOR: &str = "lorn.di.context.event.EventListenerMethodProcessor";
const DEFAULT_EVENT_LISTENER_FACTORY: &str = "lorn.di.context.event.DefaultEventListenerFactory";

/// 持久化注解后置处理器的类名
pub const PERSISTENCE_ANNOTATION_PROCESSOR_CLASS_NAME: &str =
    "lorn.di.orm.jpa.support.PersistenceAnnotationBeanPostProcessor";

/// JSR-250 支持的标志类型
pub const JSR250_MARKER_CLASS_NAME: &str = "javax.annotation.Resource";

/// JPA 支持的标志类型
pub const JPA_MARKER_CLASS_NAME: &str = "javax.persistence.EntityManagerFactory";

/// 可选类型是否可用
pub trait ClassPresence {
    fn is_present(&self, class_name: &str) -> bool;
}

/// 显式列出可用类型
#[derive(Debug, Clone, Default)]
pub struct KnownClasses {
    classes: BTreeSet<String>,
}

impl KnownClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明一个可用类型
    pub fn with(mut self, class_name: impl Into<String>) -> Self {
        self.classes.insert(class_name.into());
        self
    }
}

impl ClassPresence for KnownClasses {
    fn is_present(&self, class_name: &str) -> bool {
        self.classes.contains(class_name)
    }
}

impl ClassPresence for MetadataTable {
    fn is_present(&self, class_name: &str) -> bool {
        self.class(class_name).is_some()
    }
}

/// 为依赖比较器与候选解析器安装注解感知的实现，已是对应类型时保持不变
pub fn install_annotation_aware_support(factory: &dyn ConfigurableListableBeanFactory) {
    let has_comparator = factory
        .dependency_comparator()
        .map_or(false, |comparator| comparator.as_any().is::<AnnotationAwareOrderComparator>());
    if !has_comparator {
        factory.set_dependency_comparator(Some(Arc::new(AnnotationAwareOrderComparator::new())));
        debug!("已安装注解感知的依赖比较器");
    }

    let has_resolver = factory
        .autowire_candidate_resolver()
        .as_any()
        .is::<ContextAnnotationAutowireCandidateResolver>();
    if !has_resolver {
        factory.set_autowire_candidate_resolver(Arc::new(ContextAnnotationAutowireCandidateResolver::new()));
        debug!("已安装注解感知的自动装配候选解析器");
    }
}

/// 注册注解配置所需的全部基础设施定义
///
/// 只注册注册表中尚不存在的名称，返回本次实际注册的定义。
/// 通用注解与持久化处理器仅在其依赖类型可用时注册，否则静默跳过。
pub fn register_annotation_config_processors(
    registry: &dyn BeanDefinitionRegistry,
    source: Option<&SourceLocation>,
    presence: &dyn ClassPresence,
) -> DefinitionResult<Vec<BeanDefinitionHolder>> {
    if let Some(factory) = registry.as_bean_factory() {
        install_annotation_aware_support(factory);
    }

    let jsr250_present = presence.is_present(JSR250_MARKER_CLASS_NAME);
    let jpa_present = presence.is_present(JPA_MARKER_CLASS_NAME)
        && presence.is_present(PERSISTENCE_ANNOTATION_PROCESSOR_CLASS_NAME);

    let candidates = [
        (CONFIGURATION_ANNOTATION_PROCESSOR_BEAN_NAME, CONFIGURATION_CLASS_POST_PROCESSOR, true),
        (AUTOWIRED_ANNOTATION_PROCESSOR_BEAN_NAME, AUTOWIRED_ANNOTATION_BEAN_POST_PROCESSOR, true),
        (COMMON_ANNOTATION_PROCESSOR_BEAN_NAME, COMMON_ANNOTATION_BEAN_POST_PROCESSOR, jsr250_present),
        (PERSISTENCE_ANNOTATION_PROCESSOR_BEAN_NAME, PERSISTENCE_ANNOTATION_PROCESSOR_CLASS_NAME, jpa_present),
        (EVENT_LISTENER_PROCESSOR_BEAN_NAME, EVENT_LISTENER_METHOD_PROCESSOR, true),
        (EVENT_LISTENER_FACTORY_BEAN_NAME, DEFAULT_EVENT_LISTENER_FACTORY, true),
    ];

    let mut registered = Vec::new();
    for (bean_name, class_name, enabled) in candidates {
        if !enabled {
            debug!("可选基础设施 {} 的依赖类型不可用, 跳过", bean_name);
            continue;
        }
        if registry.contains_bean_definition(bean_name) {
            continue;
        }
        let mut definition = BeanDefinition::for_class(class_name);
        definition.set_source(source.cloned());
        registered.push(register_post_processor(registry, definition, bean_name)?);
    }

    if !registered.is_empty() {
        info!("已注册 {} 个注解配置基础设施定义", registered.len());
    }
    Ok(registered)
}

fn register_post_processor(
    registry: &dyn BeanDefinitionRegistry,
    mut definition: BeanDefinition,
    bean_name: &str,
) -> DefinitionResult<BeanDefinitionHolder> {
    definition.set_role(BeanRole::Infrastructure);
    let definition = registry.register_bean_definition(bean_name, definition)?;
    Ok(BeanDefinitionHolder::new(definition, bean_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DefaultListableBeanFactory;
    use di_abstractions::DependencyComparator;

    #[derive(Debug)]
    struct ReverseComparator;

    impl DependencyComparator for ReverseComparator {
        fn compare(&self, left: &BeanDefinition, right: &BeanDefinition) -> std::cmp::Ordering {
            AnnotationAwareOrderComparator::order_of(right).cmp(&AnnotationAwareOrderComparator::order_of(left))
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_registers_mandatory_processors() {
        let registry = DefaultListableBeanFactory::new();
        let holders = register_annotation_config_processors(&registry, None, &KnownClasses::new()).unwrap();

        let names: Vec<_> = holders.iter().map(|holder| holder.bean_name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                CONFIGURATION_ANNOTATION_PROCESSOR_BEAN_NAME,
                AUTOWIRED_ANNOTATION_PROCESSOR_BEAN_NAME,
                EVENT_LISTENER_PROCESSOR_BEAN_NAME,
                EVENT_LISTENER_FACTORY_BEAN_NAME,
            ]
        );
        assert!(holders.iter().all(|holder| holder.definition().role() == BeanRole::Infrastructure));
        assert!(!registry.contains_bean_definition(COMMON_ANNOTATION_PROCESSOR_BEAN_NAME));
        assert!(!registry.contains_bean_definition(PERSISTENCE_ANNOTATION_PROCESSOR_BEAN_NAME));
    }

    #[test]
    fn test_optional_processors_follow_class_presence() {
        let registry = DefaultListableBeanFactory::new();
        let presence = KnownClasses::new()
            .with(JSR250_MARKER_CLASS_NAME)
            .with(JPA_MARKER_CLASS_NAME)
            .with(PERSISTENCE_ANNOTATION_PROCESSOR_CLASS_NAME);
        let holders = register_annotation_config_processors(&registry, None, &presence).unwrap();

        assert_eq!(holders.len(), 6);
        assert_eq!(
            registry
                .get_bean_definition(PERSISTENCE_ANNOTATION_PROCESSOR_BEAN_NAME)
                .unwrap()
                .bean_class_name(),
            Some(PERSISTENCE_ANNOTATION_PROCESSOR_CLASS_NAME)
        );

        let only_marker = DefaultListableBeanFactory::new();
        register_annotation_config_processors(&only_marker, None, &KnownClasses::new().with(JPA_MARKER_CLASS_NAME))
            .unwrap();
        assert!(!only_marker.contains_bean_definition(PERSISTENCE_ANNOTATION_PROCESSOR_BEAN_NAME));
    }

    #[test]
    fn test_registration_is_idempotent() {
        let registry = DefaultListableBeanFactory::new();
        let source = SourceLocation::new("com.acme.Application");
        let first = register_annotation_config_processors(&registry, Some(&source), &KnownClasses::new()).unwrap();
        let second = register_annotation_config_processors(&registry, Some(&source), &KnownClasses::new()).unwrap();

        assert_eq!(first.len(), 4);
        assert!(second.is_empty());
        assert_eq!(registry.bean_definition_count(), 4);
        assert_eq!(
            registry
                .get_bean_definition(CONFIGURATION_ANNOTATION_PROCESSOR_BEAN_NAME)
                .unwrap()
                .source(),
            Some(&source)
        );
    }

    #[test]
    fn test_existing_definition_is_not_replaced() {
        let registry = DefaultListableBeanFactory::new();
        registry
            .register_bean_definition(AUTOWIRED_ANNOTATION_PROCESSOR_BEAN_NAME, BeanDefinition::for_class("com.acme.Custom"))
            .unwrap();

        let holders = register_annotation_config_processors(&registry, None, &KnownClasses::new()).unwrap();
        assert_eq!(holders.len(), 3);
        let custom = registry.get_bean_definition(AUTOWIRED_ANNOTATION_PROCESSOR_BEAN_NAME).unwrap();
        assert_eq!(custom.bean_class_name(), Some("com.acme.Custom"));
        assert_eq!(custom.role(), BeanRole::Application);
    }

    #[test]
    fn test_installs_comparator_and_resolver_once() {
        let registry = DefaultListableBeanFactory::new();
        register_annotation_config_processors(&registry, None, &KnownClasses::new()).unwrap();

        let comparator = registry.dependency_comparator().unwrap();
        let resolver = registry.autowire_candidate_resolver();
        assert!(comparator.as_any().is::<AnnotationAwareOrderComparator>());
        assert!(resolver.as_any().is::<ContextAnnotationAutowireCandidateResolver>());

        register_annotation_config_processors(&registry, None, &KnownClasses::new()).unwrap();
        assert!(Arc::ptr_eq(&comparator, &registry.dependency_comparator().unwrap()));
        assert!(Arc::ptr_eq(&resolver, &registry.autowire_candidate_resolver()));
    }

    #[test]
    fn test_custom_comparator_is_replaced() {
        let registry = DefaultListableBeanFactory::new();
        registry.set_dependency_comparator(Some(Arc::new(ReverseComparator)));

        register_annotation_config_processors(&registry, None, &KnownClasses::new()).unwrap();
        assert!(registry
            .dependency_comparator()
            .unwrap()
            .as_any()
            .is::<AnnotationAwareOrderComparator>());
    }

    #[test]
    fn test_metadata_table_as_class_presence() {
        let table = MetadataTable::new()
            .with_class(infrastructure_common::StandardClassMetadata::new(JSR250_MARKER_CLASS_NAME));
        assert!(table.is_present(JSR250_MARKER_CLASS_NAME));
        assert!(!table.is_present(JPA_MARKER_CLASS_NAME));
    }
}
