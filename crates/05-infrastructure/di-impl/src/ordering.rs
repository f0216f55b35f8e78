//! 基于 `@Order` / `@Priority` 的依赖排序

use di_abstractions::DependencyComparator;
use infrastructure_common::annotations::{ORDER, PRIORITY, VALUE};
use infrastructure_common::{AnnotatedTypeMetadata, BeanDefinition};
use std::any::Any;
use std::cmp::Ordering;

/// 最高优先级
pub const HIGHEST_PRECEDENCE: i64 = i32::MIN as i64;

/// 最低优先级，未声明顺序时使用
pub const LOWEST_PRECEDENCE: i64 = i32::MAX as i64;

/// 注解感知的顺序比较器
///
/// 工厂方法定义读取方法上的注解，其余读取类上的注解；`@Order` 优先于 `@Priority`。
#[derive(Debug, Default, Clone, Copy)]
pub struct AnnotationAwareOrderComparator;

impl AnnotationAwareOrderComparator {
    pub fn new() -> Self {
        Self
    }

    /// 定义上声明的顺序值
    ///
    /// 工厂方法定义只看方法本身，声明类上的 `@Order` 不会传递给 `@Bean` 方法。
    pub fn find_order(definition: &BeanDefinition) -> Option<i64> {
        match definition.factory_method_metadata() {
            Some(method) => order_from(method.as_ref()),
            None => definition.metadata().and_then(|metadata| order_from(metadata.as_ref())),
        }
    }

    /// 定义的顺序值，未声明时为 [`LOWEST_PRECEDENCE`]
    pub fn order_of(definition: &BeanDefinition) -> i64 {
        Self::find_order(definition).unwrap_or(LOWEST_PRECEDENCE)
    }
}

fn order_from<M>(metadata: &M) -> Option<i64>
where
    M: AnnotatedTypeMetadata + ?Sized,
{
    [ORDER, PRIORITY].iter().find_map(|annotation_type| {
        metadata
            .annotation_attributes(annotation_type)
            .and_then(|attributes| attributes.get_number(VALUE).ok())
    })
}

impl DependencyComparator for AnnotationAwareOrderComparator {
    fn compare(&self, left: &BeanDefinition, right: &BeanDefinition) -> Ordering {
        Self::order_of(left).cmp(&Self::order_of(right))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
