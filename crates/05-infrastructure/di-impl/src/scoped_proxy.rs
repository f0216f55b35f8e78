//! 作用域解析与作用域代理

use crate::common_annotations::attributes_for;
use di_abstractions::BeanDefinitionRegistry;
use infrastructure_common::annotations::{SCOPE, VALUE};
use infrastructure_common::{
    AnnotatedTypeMetadata, BeanDefinition, BeanDefinitionHolder, DefinitionError, DefinitionResult,
    ScopeMetadata, ScopedProxyMode,
};
use tracing::debug;

/// 作用域代理目标 Bean 的名称前缀
pub const SCOPED_TARGET_NAME_PREFIX: &str = "scopedTarget.";

/// 作用域代理工厂的类名
pub const SCOPED_PROXY_FACTORY_CLASS_NAME: &str = "lorn.di.aop.scope.ScopedProxyFactoryBean";

/// 代理定义上记录目标名称的属性
pub const TARGET_BEAN_NAME_ATTRIBUTE: &str = "targetBeanName";

/// 代理定义上记录是否基于类代理的属性
pub const PROXY_TARGET_CLASS_ATTRIBUTE: &str = "proxyTargetClass";

/// 基于 `@Scope` 的作用域解析器
#[derive(Debug, Clone, Copy)]
pub struct AnnotationScopeMetadataResolver {
    default_proxy_mode: ScopedProxyMode,
}

impl AnnotationScopeMetadataResolver {
    /// `proxyMode = DEFAULT` 解析为不代理
    pub fn new() -> Self {
        Self::with_default_proxy_mode(ScopedProxyMode::No)
    }

    /// 指定 `@Scope` 未声明代理模式时使用的默认模式
    pub fn with_default_proxy_mode(default_proxy_mode: ScopedProxyMode) -> Self {
        Self { default_proxy_mode }
    }

    /// 从注解元数据解析作用域，未声明 `@Scope` 时为单例且不代理
    pub fn resolve_scope_metadata<M>(&self, metadata: &M) -> DefinitionResult<ScopeMetadata>
    where
        M: AnnotatedTypeMetadata + ?Sized,
    {
        let Some(attributes) = attributes_for(metadata, SCOPE) else {
            return Ok(ScopeMetadata::default());
        };

        let mut scope_name = if attributes.contains_key(VALUE) {
            attributes.get_string(VALUE)?.to_string()
        } else {
            String::new()
        };
        if scope_name.is_empty() && attributes.contains_key("scopeName") {
            scope_name = attributes.get_string("scopeName")?.to_string();
        }

        let mut proxy_mode = if attributes.contains_key("proxyMode") {
            let name = attributes.get_string("proxyMode")?;
            ScopedProxyMode::from_name(name).ok_or_else(|| DefinitionError::type_mismatch("proxyMode", "ScopedProxyMode"))?
        } else {
            ScopedProxyMode::Default
        };
        if proxy_mode == ScopedProxyMode::Default {
            proxy_mode = self.default_proxy_mode;
        }

        Ok(ScopeMetadata::new(scope_name, proxy_mode))
    }

    /// 解析 Bean 定义的作用域，未带注解元数据的定义使用默认值
    pub fn resolve_for_definition(&self, definition: &BeanDefinition) -> DefinitionResult<ScopeMetadata> {
        match definition.metadata() {
            Some(metadata) => self.resolve_scope_metadata(metadata.as_ref()),
            None => Ok(ScopeMetadata::default()),
        }
    }
}

impl Default for AnnotationScopeMetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 代理目标的名称
pub fn scoped_target_name(original_bean_name: &str) -> String {
    format!("{}{}", SCOPED_TARGET_NAME_PREFIX, original_bean_name)
}

/// 是否为作用域代理目标名称
pub fn is_scoped_target(bean_name: &str) -> bool {
    bean_name.starts_with(SCOPED_TARGET_NAME_PREFIX)
}

/// 按代理模式包装定义
///
/// `No` 原样返回；其它模式把原定义注册为 `scopedTarget.<name>`（不再作为自动装配候选或首选），
/// 返回一个沿用原名称与别名的代理定义，由调用方负责注册。
pub fn apply_scoped_proxy_mode(
    scope_metadata: &ScopeMetadata,
    holder: BeanDefinitionHolder,
    registry: &dyn BeanDefinitionRegistry,
) -> DefinitionResult<BeanDefinitionHolder> {
    if scope_metadata.proxy_mode == ScopedProxyMode::No {
        return Ok(holder);
    }
    let proxy_target_class = scope_metadata.proxy_mode == ScopedProxyMode::TargetClass;
    create_scoped_proxy(holder, registry, proxy_target_class)
}

fn create_scoped_proxy(
    holder: BeanDefinitionHolder,
    registry: &dyn BeanDefinitionRegistry,
    proxy_target_class: bool,
) -> DefinitionResult<BeanDefinitionHolder> {
    let original_name = holder.bean_name().to_string();
    let target_name = scoped_target_name(&original_name);
    let target = holder.definition();

    let mut proxy = BeanDefinition::for_class(SCOPED_PROXY_FACTORY_CLASS_NAME);
    proxy.set_attribute(TARGET_BEAN_NAME_ATTRIBUTE, target_name.as_str());
    proxy.set_attribute(PROXY_TARGET_CLASS_ATTRIBUTE, proxy_target_class.to_string());
    proxy.set_source(target.source().cloned());
    proxy.set_role(target.role());
    proxy.set_autowire_candidate(target.is_autowire_candidate());
    proxy.set_primary(target.is_primary());

    let mut hidden_target = target.clone();
    hidden_target.set_autowire_candidate(false);
    hidden_target.set_primary(false);
    registry.register_bean_definition(&target_name, hidden_target)?;
    debug!(
        "为 '{}' 创建作用域代理, 目标注册为 '{}' (proxyTargetClass = {})",
        original_name, target_name, proxy_target_class
    );

    Ok(BeanDefinitionHolder::new(proxy, original_name).with_aliases(holder.aliases().to_vec()))
}
