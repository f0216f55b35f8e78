//! 注解驱动的 Bean 名称生成
//!
//! 名称来源优先级：
//! 1. 构造型注解（`@Component` 及以其为元注解的注解、`@ManagedBean`、`@Named`）的 `value` 属性
//! 2. 类的短名称，首字母小写（前两个字符都是大写时保持不变）

use dashmap::DashMap;
use di_abstractions::{BeanDefinitionRegistry, BeanNameGenerator};
use infrastructure_common::annotations::{COMPONENT, MANAGED_BEAN, NAMED, VALUE};
use infrastructure_common::{
    AnnotatedTypeMetadata, AnnotationAttributes, AttributeValue, BeanDefinition, DefinitionError,
    DefinitionResult,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// 基于注解的 Bean 名称生成器
///
/// 元注解闭包按注解类型缓存，生成器实例存活期间不会失效。
#[derive(Debug, Default)]
pub struct AnnotationBeanNameGenerator {
    meta_annotation_cache: DashMap<String, Arc<BTreeSet<String>>>,
}

impl AnnotationBeanNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取注解类型的元注解闭包，首次访问时计算并缓存
    ///
    /// 并发首次访问可能重复计算，但只有先插入的结果会被保留。
    pub fn meta_annotation_types<M>(&self, metadata: &M, annotation_type: &str) -> Arc<BTreeSet<String>>
    where
        M: AnnotatedTypeMetadata + ?Sized,
    {
        if let Some(cached) = self.meta_annotation_cache.get(annotation_type) {
            return Arc::clone(cached.value());
        }

        let computed = Arc::new(metadata.meta_annotation_types(annotation_type));
        trace!("缓存注解 {} 的元注解闭包: {:?}", annotation_type, computed);
        let entry = self
            .meta_annotation_cache
            .entry(annotation_type.to_string())
            .or_insert(computed);
        Arc::clone(entry.value())
    }

    /// 已缓存的注解类型数量
    pub fn cached_annotation_types(&self) -> usize {
        self.meta_annotation_cache.len()
    }

    /// 从构造型注解中读取显式名称
    ///
    /// 多个注解给出不同的非空名称时返回 [`DefinitionError::NamingConflict`]。
    pub fn determine_bean_name_from_annotation<M>(&self, metadata: &M) -> DefinitionResult<Option<String>>
    where
        M: AnnotatedTypeMetadata + ?Sized,
    {
        let mut bean_name: Option<String> = None;

        for annotation_type in metadata.annotation_types() {
            let Some(attributes) = metadata.annotation_attributes(&annotation_type) else {
                continue;
            };
            let meta_types = self.meta_annotation_types(metadata, &annotation_type);
            if !is_stereotype_with_name_value(&annotation_type, &meta_types, &attributes) {
                continue;
            }

            if let Some(AttributeValue::String(value)) = attributes.get(VALUE) {
                if value.is_empty() {
                    continue;
                }
                if let Some(existing) = &bean_name {
                    if existing != value {
                        return Err(DefinitionError::NamingConflict {
                            existing: existing.clone(),
                            candidate: value.clone(),
                        });
                    }
                }
                bean_name = Some(value.clone());
            }
        }

        Ok(bean_name)
    }

    /// 根据类名生成默认名称
    pub fn build_default_bean_name(&self, definition: &BeanDefinition) -> DefinitionResult<String> {
        let class_name = definition
            .bean_class_name()
            .ok_or(DefinitionError::MissingBeanClassName)?;
        Ok(decapitalize(&short_class_name(class_name)))
    }
}

impl BeanNameGenerator for AnnotationBeanNameGenerator {
    fn generate_bean_name(
        &self,
        definition: &BeanDefinition,
        _registry: &dyn BeanDefinitionRegistry,
    ) -> DefinitionResult<String> {
        if let Some(metadata) = definition.metadata() {
            if let Some(name) = self.determine_bean_name_from_annotation(metadata.as_ref())? {
                if !name.trim().is_empty() {
                    debug!("使用注解指定的 Bean 名称: {}", name);
                    return Ok(name);
                }
            }
        }

        let name = self.build_default_bean_name(definition)?;
        debug!("使用默认 Bean 名称: {}", name);
        Ok(name)
    }
}

fn is_stereotype_with_name_value(
    annotation_type: &str,
    meta_annotation_types: &BTreeSet<String>,
    attributes: &AnnotationAttributes,
) -> bool {
    let is_stereotype = annotation_type == COMPONENT
        || meta_annotation_types.contains(COMPONENT)
        || annotation_type == MANAGED_BEAN
        || annotation_type == NAMED;
    is_stereotype && attributes.contains_key(VALUE)
}

/// 去掉包名的类短名称
///
/// 内部类分隔符 `$` 转换为 `.`，生成子类的 `$$` 后缀会被截掉。
pub fn short_class_name(class_name: &str) -> String {
    let start = class_name.rfind('.').map_or(0, |index| index + 1);
    let end = class_name.find("$$").unwrap_or(class_name.len());
    if start >= end {
        return class_name[start..].replace('$', ".");
    }
    class_name[start..end].replace('$', ".")
}

/// 首字母小写，前两个字符都是大写时原样返回
///
/// `FooBah` -> `fooBah`，`X` -> `x`，`URL` -> `URL`
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = chars.clone().next() {
        if first.is_uppercase() && second.is_uppercase() {
            return name.to_string();
        }
    }
    first.to_lowercase().chain(chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DefaultListableBeanFactory;
    use infrastructure_common::annotations;
    use infrastructure_common::{AnnotationDescriptor, StandardClassMetadata};

    fn generate(metadata: StandardClassMetadata) -> DefinitionResult<String> {
        let generator = AnnotationBeanNameGenerator::new();
        let registry = DefaultListableBeanFactory::new();
        let definition = BeanDefinition::annotated(metadata.into_shared());
        generator.generate_bean_name(&definition, &registry)
    }

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize("FooServiceImpl"), "fooServiceImpl");
        assert_eq!(decapitalize("URLFooServiceImpl"), "URLFooServiceImpl");
        assert_eq!(decapitalize("X"), "x");
        assert_eq!(decapitalize("a"), "a");
        assert_eq!(decapitalize("Ab"), "ab");
        assert_eq!(decapitalize(""), "");
    }

    #[test]
    fn test_short_class_name() {
        assert_eq!(short_class_name("com.xyz.FooServiceImpl"), "FooServiceImpl");
        assert_eq!(short_class_name("FooServiceImpl"), "FooServiceImpl");
        assert_eq!(short_class_name("com.xyz.Outer$Inner"), "Outer.Inner");
        assert_eq!(short_class_name("com.xyz.Service$$EnhancerByProxy$$1a2b"), "Service");
    }

    #[test]
    fn test_default_names() {
        assert_eq!(
            generate(StandardClassMetadata::new("com.xyz.FooServiceImpl")).unwrap(),
            "fooServiceImpl"
        );
        assert_eq!(
            generate(StandardClassMetadata::new("com.xyz.URLFooServiceImpl")).unwrap(),
            "URLFooServiceImpl"
        );
        assert_eq!(
            generate(StandardClassMetadata::new("com.xyz.Outer$InnerBean")).unwrap(),
            "outer.InnerBean"
        );
    }

    #[test]
    fn test_explicit_component_name() {
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::service(Some("fooService")));
        assert_eq!(generate(metadata).unwrap(), "fooService");
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::component(None));
        assert_eq!(generate(metadata).unwrap(), "fooServiceImpl");
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::component(Some("  ")));
        assert_eq!(generate(metadata).unwrap(), "fooServiceImpl");
    }

    #[test]
    fn test_conflicting_names_fail() {
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::service(Some("a")))
            .with_annotation(annotations::named(Some("b")));
        let err = generate(metadata).unwrap_err();
        assert!(err.is_naming_conflict());
        assert_eq!(
            err,
            DefinitionError::NamingConflict {
                existing: "a".to_string(),
                candidate: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_whitespace_name_conflicts_with_explicit_name() {
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::service(Some("a")))
            .with_annotation(annotations::named(Some("  ")));
        let err = generate(metadata).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::NamingConflict {
                existing: "a".to_string(),
                candidate: "  ".to_string(),
            }
        );
    }

    #[test]
    fn test_agreeing_names_succeed() {
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::repository(Some("store")))
            .with_annotation(annotations::managed_bean(Some("store")));
        assert_eq!(generate(metadata).unwrap(), "store");
    }

    #[test]
    fn test_non_stereotype_value_is_ignored() {
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::description("not a name"))
            .with_annotation(AnnotationDescriptor::new("com.xyz.Custom").with_attribute(VALUE, "custom"));
        assert_eq!(generate(metadata).unwrap(), "fooServiceImpl");
    }

    #[test]
    fn test_custom_stereotype_via_meta_annotation() {
        let metadata = StandardClassMetadata::new("com.xyz.OrderHandler").with_annotation(
            AnnotationDescriptor::new("com.xyz.Handler")
                .with_attribute(VALUE, "orders")
                .with_meta_annotation(COMPONENT),
        );
        assert_eq!(generate(metadata).unwrap(), "orders");
    }

    #[test]
    fn test_stereotype_without_value_attribute_is_skipped() {
        let metadata = StandardClassMetadata::new("com.xyz.Plain")
            .with_annotation(AnnotationDescriptor::new(COMPONENT));
        assert_eq!(generate(metadata).unwrap(), "plain");
    }

    #[test]
    fn test_missing_class_name_fails_fast() {
        let generator = AnnotationBeanNameGenerator::new();
        let registry = DefaultListableBeanFactory::new();
        assert_eq!(
            generator.generate_bean_name(&BeanDefinition::new(), &registry),
            Err(DefinitionError::MissingBeanClassName)
        );
    }

    #[test]
    fn test_meta_annotation_cache_is_reused() {
        let generator = AnnotationBeanNameGenerator::new();
        let metadata = StandardClassMetadata::new("com.xyz.FooServiceImpl")
            .with_annotation(annotations::service(Some("fooService")));

        let first = generator.meta_annotation_types(&metadata, annotations::SERVICE);
        let second = generator.meta_annotation_types(&metadata, annotations::SERVICE);
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains(COMPONENT));
        assert_eq!(generator.cached_annotation_types(), 1);
    }
}
