//! 从配置模型读取 Bean 定义
//!
//! 每个 `@Bean` 方法生成一个工厂方法定义：
//! - 名称取 `@Bean(name)` 的第一个值，没有时使用方法名，其余值作为别名
//! - 静态方法以配置类为 Bean 类，实例方法以配置类 Bean 为工厂 Bean
//! - 通用注解以方法元数据为视图处理，`@Lazy` 缺失时回退到配置类

use crate::common_annotations::{attributes_for, process_common_definition_annotations};
use crate::config_class::{BeanMethod, ConfigurationClass, ConfigurationModel};
use crate::naming::AnnotationBeanNameGenerator;
use crate::registry::register_bean_definition;
use crate::scoped_proxy::{apply_scoped_proxy_mode, AnnotationScopeMetadataResolver};
use di_abstractions::{BeanDefinitionRegistry, BeanNameGenerator};
use infrastructure_common::annotations::BEAN;
use infrastructure_common::{
    AttributeValue, BeanDefinition, BeanDefinitionHolder, DefinitionResult, SourceLocation,
};
use std::sync::Arc;
use tracing::{debug, info};

/// 配置类 Bean 定义读取器
pub struct ConfigurationClassBeanDefinitionReader<'a> {
    registry: &'a dyn BeanDefinitionRegistry,
    name_generator: Arc<dyn BeanNameGenerator>,
    scope_resolver: AnnotationScopeMetadataResolver,
}

impl<'a> ConfigurationClassBeanDefinitionReader<'a> {
    /// 创建读取器，使用默认名称生成器与作用域解析器
    pub fn new(registry: &'a dyn BeanDefinitionRegistry) -> Self {
        Self {
            registry,
            name_generator: Arc::new(AnnotationBeanNameGenerator::new()),
            scope_resolver: AnnotationScopeMetadataResolver::new(),
        }
    }

    /// 配置类自身命名使用的生成器
    pub fn with_name_generator(mut self, name_generator: Arc<dyn BeanNameGenerator>) -> Self {
        self.name_generator = name_generator;
        self
    }

    /// 设置作用域解析器
    pub fn with_scope_resolver(mut self, scope_resolver: AnnotationScopeMetadataResolver) -> Self {
        self.scope_resolver = scope_resolver;
        self
    }

    /// 读取模型中所有配置类及其 `@Bean` 方法，返回本次注册的定义
    ///
    /// 尚未命名的配置类会先注册自身。
    pub fn load_bean_definitions(&self, model: &mut ConfigurationModel) -> DefinitionResult<Vec<BeanDefinitionHolder>> {
        let mut registered = Vec::new();

        let unnamed: Vec<_> = model
            .classes()
            .iter()
            .filter(|class| class.bean_name().is_none())
            .map(|class| class.id())
            .collect();
        for id in unnamed {
            if let Some(class) = model.class(id) {
                let holder = self.register_configuration_class(class)?;
                model.set_bean_name(id, holder.bean_name());
                registered.push(holder);
            }
        }

        for class in model.classes() {
            for method in class.bean_methods() {
                if let Some(holder) = self.load_bean_definition_for_bean_method(class, method)? {
                    registered.push(holder);
                }
            }
        }

        info!("从 {} 个配置类读取了 {} 个 Bean 定义", model.len(), registered.len());
        Ok(registered)
    }

    fn register_configuration_class(&self, class: &ConfigurationClass) -> DefinitionResult<BeanDefinitionHolder> {
        let metadata = Arc::clone(class.metadata());
        let mut definition = BeanDefinition::annotated(Arc::clone(&metadata));
        let scope_metadata = self.scope_resolver.resolve_scope_metadata(metadata.as_ref())?;
        definition.set_scope(scope_metadata.scope_name.clone());
        definition.set_source(Some(SourceLocation::new(class.class_name())));
        process_common_definition_annotations(&mut definition, metadata.as_ref())?;

        let bean_name = self.name_generator.generate_bean_name(&definition, self.registry)?;
        let holder = BeanDefinitionHolder::new(definition, bean_name);
        let holder = apply_scoped_proxy_mode(&scope_metadata, holder, self.registry)?;
        register_bean_definition(&holder, self.registry)?;
        debug!("注册配置类 '{}' -> {}", holder.bean_name(), class.class_name());
        Ok(holder)
    }

    /// 读取单个 `@Bean` 方法
    ///
    /// 同一配置类中的同名方法（重载）已注册时跳过，返回 `None`。
    pub fn load_bean_definition_for_bean_method(
        &self,
        class: &ConfigurationClass,
        bean_method: &BeanMethod,
    ) -> DefinitionResult<Option<BeanDefinitionHolder>> {
        let metadata = Arc::clone(bean_method.metadata());
        let method_name = bean_method.method_name().to_string();
        let Some(bean) = attributes_for(metadata.as_ref(), BEAN) else {
            debug!("方法 {}#{} 未声明 @Bean, 跳过", class.class_name(), method_name);
            return Ok(None);
        };

        let mut names = if bean.contains_key("name") {
            bean.get_string_array("name")?
        } else {
            Vec::new()
        };
        names.retain(|name| !name.trim().is_empty());
        let bean_name = if names.is_empty() {
            method_name.clone()
        } else {
            names.remove(0)
        };

        if self.is_overridden_by_existing_definition(class, &method_name, &bean_name) {
            debug!(
                "跳过 {}#{}: 同一配置类已注册同名 Bean '{}'",
                class.class_name(),
                method_name,
                bean_name
            );
            return Ok(None);
        }

        let mut definition = BeanDefinition::for_factory_method(Arc::clone(class.metadata()), Arc::clone(&metadata));
        definition.set_source(Some(SourceLocation::new(class.class_name()).with_element(method_name.as_str())));
        if metadata.is_static() {
            definition.set_bean_class_name(Some(class.class_name().to_string()));
        } else {
            definition.set_factory_bean_name(class.bean_name().map(str::to_string));
        }
        if let Some(AttributeValue::Bool(candidate)) = bean.get("autowireCandidate") {
            definition.set_autowire_candidate(*candidate);
        }

        process_common_definition_annotations(&mut definition, metadata.as_ref())?;

        let scope_metadata = self.scope_resolver.resolve_scope_metadata(metadata.as_ref())?;
        definition.set_scope(scope_metadata.scope_name.clone());

        let holder = BeanDefinitionHolder::new(definition, bean_name).with_aliases(names);
        let holder = apply_scoped_proxy_mode(&scope_metadata, holder, self.registry)?;
        register_bean_definition(&holder, self.registry)?;
        debug!("注册 @Bean 方法 {}#{} -> '{}'", class.class_name(), method_name, holder.bean_name());
        Ok(Some(holder))
    }

    fn is_overridden_by_existing_definition(&self, class: &ConfigurationClass, method_name: &str, bean_name: &str) -> bool {
        let Ok(existing) = self.registry.get_bean_definition(bean_name) else {
            return false;
        };
        existing.factory_method_name() == Some(method_name)
            && existing
                .metadata()
                .map_or(false, |metadata| metadata.class_name() == class.class_name())
    }
}
