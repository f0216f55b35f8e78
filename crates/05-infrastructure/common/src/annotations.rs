//! 容器识别的注解类型
//!
//! 名称常量加上构造对应 [`AnnotationDescriptor`] 的便捷函数，
//! 构造型注解会自动带上 [`COMPONENT`] 元注解。

use crate::definition::ScopedProxyMode;
use crate::metadata::AnnotationDescriptor;

/// 通用的 `value` 属性名
pub const VALUE: &str = "value";

pub const COMPONENT: &str = "lorn.di.stereotype.Component";
pub const SERVICE: &str = "lorn.di.stereotype.Service";
pub const REPOSITORY: &str = "lorn.di.stereotype.Repository";
pub const CONTROLLER: &str = "lorn.di.stereotype.Controller";
pub const INDEXED: &str = "lorn.di.stereotype.Indexed";

/// JSR-250 托管 Bean 标记
pub const MANAGED_BEAN: &str = "javax.annotation.ManagedBean";
/// JSR-330 命名标记
pub const NAMED: &str = "javax.inject.Named";

pub const CONFIGURATION: &str = "lorn.di.annotation.Configuration";
pub const BEAN: &str = "lorn.di.annotation.Bean";
pub const LAZY: &str = "lorn.di.annotation.Lazy";
pub const PRIMARY: &str = "lorn.di.annotation.Primary";
pub const DEPENDS_ON: &str = "lorn.di.annotation.DependsOn";
pub const ROLE: &str = "lorn.di.annotation.Role";
pub const DESCRIPTION: &str = "lorn.di.annotation.Description";
pub const SCOPE: &str = "lorn.di.annotation.Scope";
pub const ORDER: &str = "lorn.di.core.annotation.Order";
pub const PRIORITY: &str = "javax.annotation.Priority";
pub const QUALIFIER: &str = "lorn.di.beans.factory.annotation.Qualifier";

fn stereotype(annotation_type: &str, name: Option<&str>) -> AnnotationDescriptor {
    let mut descriptor =
        AnnotationDescriptor::new(annotation_type).with_attribute(VALUE, name.unwrap_or_default());
    if annotation_type != COMPONENT {
        descriptor = descriptor.with_meta_annotation(COMPONENT);
    }
    descriptor.with_meta_annotation(INDEXED)
}

/// `@Component` 或 `@Component("name")`
pub fn component(name: Option<&str>) -> AnnotationDescriptor {
    stereotype(COMPONENT, name)
}

/// `@Service` 构造型
pub fn service(name: Option<&str>) -> AnnotationDescriptor {
    stereotype(SERVICE, name)
}

/// `@Repository` 构造型
pub fn repository(name: Option<&str>) -> AnnotationDescriptor {
    stereotype(REPOSITORY, name)
}

/// `@Controller` 构造型
pub fn controller(name: Option<&str>) -> AnnotationDescriptor {
    stereotype(CONTROLLER, name)
}

/// `@Configuration`，`proxy_bean_methods` 为 false 时是 lite 模式
pub fn configuration(name: Option<&str>, proxy_bean_methods: bool) -> AnnotationDescriptor {
    stereotype(CONFIGURATION, name).with_attribute("proxyBeanMethods", proxy_bean_methods)
}

/// `@ManagedBean` 命名标记
pub fn managed_bean(name: Option<&str>) -> AnnotationDescriptor {
    AnnotationDescriptor::new(MANAGED_BEAN).with_attribute(VALUE, name.unwrap_or_default())
}

/// `@Named` 命名标记
pub fn named(name: Option<&str>) -> AnnotationDescriptor {
    AnnotationDescriptor::new(NAMED).with_attribute(VALUE, name.unwrap_or_default())
}

/// `@Bean`，第一个名称作为 Bean 名称，其余为别名
pub fn bean(names: &[&str]) -> AnnotationDescriptor {
    AnnotationDescriptor::new(BEAN)
        .with_attribute("name", to_strings(names))
        .with_attribute("autowireCandidate", true)
}

/// `@Lazy` 标记
pub fn lazy(value: bool) -> AnnotationDescriptor {
    AnnotationDescriptor::new(LAZY).with_attribute(VALUE, value)
}

/// `@Primary` 标记
pub fn primary() -> AnnotationDescriptor {
    AnnotationDescriptor::new(PRIMARY)
}

/// `@DependsOn` 标记，名称按声明顺序保存
pub fn depends_on(names: &[&str]) -> AnnotationDescriptor {
    AnnotationDescriptor::new(DEPENDS_ON).with_attribute(VALUE, to_strings(names))
}

/// `@Role` 标记，取值见 [`BeanRole::code`](crate::BeanRole::code)
pub fn role(code: i64) -> AnnotationDescriptor {
    AnnotationDescriptor::new(ROLE).with_attribute(VALUE, code)
}

/// `@Description` 标记
pub fn description(text: &str) -> AnnotationDescriptor {
    AnnotationDescriptor::new(DESCRIPTION).with_attribute(VALUE, text)
}

/// `@Scope` 标记
pub fn scope(scope_name: &str, proxy_mode: ScopedProxyMode) -> AnnotationDescriptor {
    AnnotationDescriptor::new(SCOPE)
        .with_attribute(VALUE, scope_name)
        .with_attribute("proxyMode", proxy_mode.as_str())
}

/// `@Order` 标记
pub fn order(value: i64) -> AnnotationDescriptor {
    AnnotationDescriptor::new(ORDER).with_attribute(VALUE, value)
}

/// `@Priority` 标记
pub fn priority(value: i64) -> AnnotationDescriptor {
    AnnotationDescriptor::new(PRIORITY).with_attribute(VALUE, value)
}

/// `@Qualifier` 标记
pub fn qualifier(value: &str) -> AnnotationDescriptor {
    AnnotationDescriptor::new(QUALIFIER).with_attribute(VALUE, value)
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
