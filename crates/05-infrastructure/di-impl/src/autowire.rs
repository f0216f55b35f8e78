//! 注解感知的自动装配候选解析

use di_abstractions::{AutowireCandidateResolver, DependencyDescriptor};
use infrastructure_common::annotations::{QUALIFIER, VALUE};
use infrastructure_common::{AnnotatedTypeMetadata, BeanDefinitionHolder};
use std::any::Any;

/// 支持 `@Qualifier` 的候选解析器
///
/// 依赖未指定限定符时只看定义的候选标志；指定时匹配 Bean 名称、别名或
/// 定义上 `@Qualifier` 的值（工厂方法上的优先）。
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextAnnotationAutowireCandidateResolver;

impl ContextAnnotationAutowireCandidateResolver {
    pub fn new() -> Self {
        Self
    }

    fn declared_qualifier(holder: &BeanDefinitionHolder) -> Option<String> {
        let definition = holder.definition();
        if let Some(method) = definition.factory_method_metadata() {
            if let Some(qualifier) = qualifier_from(method.as_ref()) {
                return Some(qualifier);
            }
        }
        definition.metadata().and_then(|metadata| qualifier_from(metadata.as_ref()))
    }
}

fn qualifier_from<M>(metadata: &M) -> Option<String>
where
    M: AnnotatedTypeMetadata + ?Sized,
{
    metadata
        .annotation_attributes(QUALIFIER)
        .and_then(|attributes| attributes.get_string(VALUE).ok().map(str::to_string))
}

impl AutowireCandidateResolver for ContextAnnotationAutowireCandidateResolver {
    fn is_autowire_candidate(&self, holder: &BeanDefinitionHolder, descriptor: &DependencyDescriptor) -> bool {
        if !holder.definition().is_autowire_candidate() {
            return false;
        }
        match &descriptor.qualifier {
            None => true,
            Some(qualifier) => {
                holder.matches_name(qualifier)
                    || Self::declared_qualifier(holder).as_deref() == Some(qualifier.as_str())
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
