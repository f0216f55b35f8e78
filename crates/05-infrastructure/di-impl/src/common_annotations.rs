//! 通用定义注解处理
//!
//! 把 `@Lazy`、`@Primary`、`@DependsOn`、`@Role`、`@Description` 复制到 Bean 定义上。
//! 各注解互不影响，未出现的注解保持定义上的默认值。

use infrastructure_common::annotations::{DEPENDS_ON, DESCRIPTION, LAZY, PRIMARY, ROLE, VALUE};
use infrastructure_common::{
    AnnotatedTypeMetadata, AnnotationAttributes, BeanDefinition, BeanRole, DefinitionResult,
};
use tracing::trace;

/// 读取直接声明的注解属性
pub fn attributes_for<M>(metadata: &M, annotation_type: &str) -> Option<AnnotationAttributes>
where
    M: AnnotatedTypeMetadata + ?Sized,
{
    metadata.annotation_attributes(annotation_type)
}

/// 读取可重复注解：直接声明的注解加上容器注解 `value` 中的注解
///
/// 结果保持声明顺序并去重。
pub fn attributes_for_repeatable<M>(
    metadata: &M,
    container_type: &str,
    annotation_type: &str,
) -> DefinitionResult<Vec<AnnotationAttributes>>
where
    M: AnnotatedTypeMetadata + ?Sized,
{
    let mut result: Vec<AnnotationAttributes> = Vec::new();
    let mut push_unique = |attributes: AnnotationAttributes| {
        if !result.contains(&attributes) {
            result.push(attributes);
        }
    };

    if let Some(direct) = attributes_for(metadata, annotation_type) {
        push_unique(direct);
    }
    if let Some(container) = attributes_for(metadata, container_type) {
        if container.contains_key(VALUE) {
            for nested in container.get_nested_array(VALUE)? {
                push_unique(nested);
            }
        }
    }
    Ok(result)
}

/// 将通用注解应用到 Bean 定义
///
/// `metadata` 是当前处理的元数据视图（组件类或 `@Bean` 方法）。`@Lazy` 在视图上缺失时，
/// 如果定义自身持有的类元数据不是同一个视图，会再到类元数据上查找一次。
pub fn process_common_definition_annotations<M>(
    definition: &mut BeanDefinition,
    metadata: &M,
) -> DefinitionResult<()>
where
    M: AnnotatedTypeMetadata + ?Sized,
{
    if let Some(lazy) = attributes_for(metadata, LAZY) {
        definition.set_lazy_init(lazy_value(&lazy)?);
    } else if let Some(own_metadata) = definition.metadata().cloned() {
        let view = metadata as *const M as *const ();
        let own = std::sync::Arc::as_ptr(&own_metadata) as *const ();
        if view != own {
            if let Some(lazy) = attributes_for(own_metadata.as_ref(), LAZY) {
                trace!("在声明类 {} 上找到 @Lazy", own_metadata.class_name());
                definition.set_lazy_init(lazy_value(&lazy)?);
            }
        }
    }

    if metadata.is_annotated(PRIMARY) {
        definition.set_primary(true);
    }

    if let Some(depends_on) = attributes_for(metadata, DEPENDS_ON) {
        let names = if depends_on.contains_key(VALUE) {
            depends_on.get_string_array(VALUE)?
        } else {
            Vec::new()
        };
        definition.set_depends_on(names);
    }

    if let Some(role) = attributes_for(metadata, ROLE) {
        definition.set_role(BeanRole::from_code(role.get_number(VALUE)?)?);
    }

    if let Some(description) = attributes_for(metadata, DESCRIPTION) {
        definition.set_description(Some(description.get_string(VALUE)?.to_string()));
    }

    Ok(())
}

/// `@Lazy` 的 `value` 默认为 true
fn lazy_value(attributes: &AnnotationAttributes) -> DefinitionResult<bool> {
    if attributes.contains_key(VALUE) {
        attributes.get_bool(VALUE)
    } else {
        Ok(true)
    }
}
