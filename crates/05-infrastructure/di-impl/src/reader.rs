//! 注解类 Bean 定义读取器
//!
//! 显式注册组件类：作用域 -> 名称 -> 通用注解 -> 作用域代理 -> 注册。

use crate::annotation_config::{register_annotation_config_processors, ClassPresence};
use crate::common_annotations::process_common_definition_annotations;
use crate::naming::AnnotationBeanNameGenerator;
use crate::registry::register_bean_definition;
use crate::scoped_proxy::{apply_scoped_proxy_mode, AnnotationScopeMetadataResolver};
use di_abstractions::{BeanDefinitionRegistry, BeanNameGenerator};
use infrastructure_common::{
    BeanDefinition, BeanDefinitionHolder, ClassMetadata, DefinitionResult, SourceLocation,
};
use std::sync::Arc;
use tracing::debug;

/// 注解类 Bean 定义读取器
pub struct AnnotatedBeanDefinitionReader<'a> {
    registry: &'a dyn BeanDefinitionRegistry,
    name_generator: Arc<dyn BeanNameGenerator>,
    scope_resolver: AnnotationScopeMetadataResolver,
}

impl<'a> AnnotatedBeanDefinitionReader<'a> {
    /// 创建读取器，同时确保注解配置基础设施已注册
    pub fn new(registry: &'a dyn BeanDefinitionRegistry, presence: &dyn ClassPresence) -> DefinitionResult<Self> {
        register_annotation_config_processors(registry, None, presence)?;
        Ok(Self {
            registry,
            name_generator: Arc::new(AnnotationBeanNameGenerator::new()),
            scope_resolver: AnnotationScopeMetadataResolver::new(),
        })
    }

    /// 设置名称生成器
    pub fn with_name_generator(mut self, name_generator: Arc<dyn BeanNameGenerator>) -> Self {
        self.name_generator = name_generator;
        self
    }

    /// 设置作用域解析器
    pub fn with_scope_resolver(mut self, scope_resolver: AnnotationScopeMetadataResolver) -> Self {
        self.scope_resolver = scope_resolver;
        self
    }

    /// 目标注册表
    pub fn registry(&self) -> &'a dyn BeanDefinitionRegistry {
        self.registry
    }

    /// 注册组件类，名称由名称生成器决定
    pub fn register_bean(&self, metadata: Arc<dyn ClassMetadata>) -> DefinitionResult<BeanDefinitionHolder> {
        self.register_bean_named(metadata, None)
    }

    /// 注册组件类，`name` 为空时由名称生成器决定
    pub fn register_bean_named(
        &self,
        metadata: Arc<dyn ClassMetadata>,
        name: Option<&str>,
    ) -> DefinitionResult<BeanDefinitionHolder> {
        let mut definition = BeanDefinition::annotated(Arc::clone(&metadata));
        definition.set_source(Some(SourceLocation::new(metadata.class_name())));

        let scope_metadata = self.scope_resolver.resolve_scope_metadata(metadata.as_ref())?;
        definition.set_scope(scope_metadata.scope_name.clone());

        let bean_name = match name {
            Some(name) => name.to_string(),
            None => self.name_generator.generate_bean_name(&definition, self.registry)?,
        };

        process_common_definition_annotations(&mut definition, metadata.as_ref())?;

        let holder = BeanDefinitionHolder::new(definition, bean_name);
        let holder = apply_scoped_proxy_mode(&scope_metadata, holder, self.registry)?;
        register_bean_definition(&holder, self.registry)?;
        debug!("注册组件类 {} -> '{}'", metadata.class_name(), holder.bean_name());
        Ok(holder)
    }

    /// 依次注册多个组件类，遇到错误立即中止
    pub fn register(
        &self,
        classes: impl IntoIterator<Item = Arc<dyn ClassMetadata>>,
    ) -> DefinitionResult<Vec<BeanDefinitionHolder>> {
        classes
            .into_iter()
            .map(|metadata| self.register_bean(metadata))
            .collect()
    }
}
