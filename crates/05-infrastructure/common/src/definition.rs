//! Bean 定义模型
//!
//! [`BeanDefinition`] 在扫描或解析配置类时创建，注册前可修改；
//! 注册后由注册表以 `Arc` 持有，只读。

use crate::errors::{DefinitionError, DefinitionResult};
use crate::metadata::{ClassMetadata, MethodMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 单例作用域名称
pub const SCOPE_SINGLETON: &str = "singleton";
/// 原型作用域名称
pub const SCOPE_PROTOTYPE: &str = "prototype";
/// 默认作用域（空字符串，等价于单例）
pub const SCOPE_DEFAULT: &str = "";

/// Bean 角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BeanRole {
    /// 用户应用定义的 Bean
    #[default]
    Application,
    /// 较大配置中的支撑部分
    Support,
    /// 容器内部工作的基础设施 Bean，与最终用户无关
    Infrastructure,
}

impl BeanRole {
    /// 角色代码
    pub const fn code(self) -> i64 {
        match self {
            Self::Application => 0,
            Self::Support => 1,
            Self::Infrastructure => 2,
        }
    }

    /// 从角色代码解析
    pub fn from_code(code: i64) -> DefinitionResult<Self> {
        match code {
            0 => Ok(Self::Application),
            1 => Ok(Self::Support),
            2 => Ok(Self::Infrastructure),
            _ => Err(DefinitionError::InvalidRole { code }),
        }
    }

    /// 是否为容器内部基础设施角色
    pub const fn is_infrastructure(self) -> bool {
        matches!(self, Self::Infrastructure)
    }
}

/// 作用域代理模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScopedProxyMode {
    /// 使用扫描器的默认值，通常等同于 `No`
    #[default]
    Default,
    /// 不创建作用域代理
    No,
    /// 基于接口的代理
    Interfaces,
    /// 基于类（子类化）的代理
    TargetClass,
}

impl ScopedProxyMode {
    /// 作用域代理模式的名称
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::No => "NO",
            Self::Interfaces => "INTERFACES",
            Self::TargetClass => "TARGET_CLASS",
        }
    }

    /// 按名称解析，大小写不敏感
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "DEFAULT" => Some(Self::Default),
            "NO" => Some(Self::No),
            "INTERFACES" => Some(Self::Interfaces),
            "TARGET_CLASS" => Some(Self::TargetClass),
            _ => None,
        }
    }
}

/// 作用域元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeMetadata {
    pub scope_name: String,
    pub proxy_mode: ScopedProxyMode,
}

impl ScopeMetadata {
    /// 创建作用域元数据
    pub fn new(scope_name: impl Into<String>, proxy_mode: ScopedProxyMode) -> Self {
        Self {
            scope_name: scope_name.into(),
            proxy_mode,
        }
    }
}

impl Default for ScopeMetadata {
    fn default() -> Self {
        Self::new(SCOPE_SINGLETON, ScopedProxyMode::No)
    }
}

/// 定义来源位置，仅用于诊断
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// 资源描述，例如配置类名
    pub resource: String,
    /// 资源内的元素，例如方法名
    pub element: Option<String>,
}

impl SourceLocation {
    /// 创建指向资源的位置
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            element: None,
        }
    }

    /// 附加资源内的元素（如方法名）
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) => write!(f, "{}#{}", self.resource, element),
            None => write!(f, "{}", self.resource),
        }
    }
}

/// Bean 定义
#[derive(Debug, Clone)]
pub struct BeanDefinition {
    bean_class_name: Option<String>,
    factory_bean_name: Option<String>,
    factory_method_name: Option<String>,
    scope: String,
    lazy_init: Option<bool>,
    primary: bool,
    autowire_candidate: bool,
    depends_on: Vec<String>,
    role: BeanRole,
    description: Option<String>,
    source: Option<SourceLocation>,
    metadata: Option<Arc<dyn ClassMetadata>>,
    factory_method_metadata: Option<Arc<dyn MethodMetadata>>,
    attributes: BTreeMap<String, String>,
}

impl Default for BeanDefinition {
    fn default() -> Self {
        Self {
            bean_class_name: None,
            factory_bean_name: None,
            factory_method_name: None,
            scope: SCOPE_DEFAULT.to_string(),
            lazy_init: None,
            primary: false,
            autowire_candidate: true,
            depends_on: Vec::new(),
            role: BeanRole::Application,
            description: None,
            source: None,
            metadata: None,
            factory_method_metadata: None,
            attributes: BTreeMap::new(),
        }
    }
}

impl BeanDefinition {
    /// 创建空定义
    pub fn new() -> Self {
        Self::default()
    }

    /// 按类名创建定义
    pub fn for_class(class_name: impl Into<String>) -> Self {
        Self {
            bean_class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    /// 从类注解元数据创建定义（扫描或显式注册的组件）
    pub fn annotated(metadata: Arc<dyn ClassMetadata>) -> Self {
        Self {
            bean_class_name: Some(metadata.class_name().to_string()),
            metadata: Some(metadata),
            ..Self::default()
        }
    }

    /// 从配置类中的工厂方法创建定义
    ///
    /// 自身的元数据仍是声明类的元数据，方法元数据单独保存。
    pub fn for_factory_method(
        class_metadata: Arc<dyn ClassMetadata>,
        method_metadata: Arc<dyn MethodMetadata>,
    ) -> Self {
        Self {
            factory_method_name: Some(method_metadata.method_name().to_string()),
            bean_class_name: method_metadata.return_type_name().map(str::to_string),
            metadata: Some(class_metadata),
            factory_method_metadata: Some(method_metadata),
            ..Self::default()
        }
    }

    /// Bean 类名，工厂方法定义为返回类型
    pub fn bean_class_name(&self) -> Option<&str> {
        self.bean_class_name.as_deref()
    }

    /// 设置 Bean 类名
    pub fn set_bean_class_name(&mut self, class_name: Option<String>) {
        self.bean_class_name = class_name;
    }

    /// 工厂 Bean 名称，静态工厂方法为 `None`
    pub fn factory_bean_name(&self) -> Option<&str> {
        self.factory_bean_name.as_deref()
    }

    /// 设置工厂 Bean 名称
    pub fn set_factory_bean_name(&mut self, name: Option<String>) {
        self.factory_bean_name = name;
    }

    /// 工厂方法名称
    pub fn factory_method_name(&self) -> Option<&str> {
        self.factory_method_name.as_deref()
    }

    /// 作用域名称，空字符串表示默认（单例）
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 设置作用域，空字符串表示默认单例
    pub fn set_scope(&mut self, scope: impl Into<String>) {
        self.scope = scope.into();
    }

    /// 是否为单例作用域
    pub fn is_singleton(&self) -> bool {
        self.scope == SCOPE_SINGLETON || self.scope == SCOPE_DEFAULT
    }

    /// 是否为原型作用域
    pub fn is_prototype(&self) -> bool {
        self.scope == SCOPE_PROTOTYPE
    }

    /// 是否延迟初始化，未显式设置时为 false
    pub fn is_lazy_init(&self) -> bool {
        self.lazy_init.unwrap_or(false)
    }

    /// 显式设置的延迟初始化标志
    pub fn lazy_init(&self) -> Option<bool> {
        self.lazy_init
    }

    /// 设置延迟初始化标志
    pub fn set_lazy_init(&mut self, lazy_init: bool) {
        self.lazy_init = Some(lazy_init);
    }

    /// 是否为首选候选
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// 设置首选标志
    pub fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }

    /// 是否参与自动装配
    pub fn is_autowire_candidate(&self) -> bool {
        self.autowire_candidate
    }

    /// 设置是否参与自动装配
    pub fn set_autowire_candidate(&mut self, candidate: bool) {
        self.autowire_candidate = candidate;
    }

    /// 依赖的 Bean 名称（保持声明顺序）
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// 设置依赖的 Bean 名称
    pub fn set_depends_on(&mut self, depends_on: Vec<String>) {
        self.depends_on = depends_on;
    }

    /// Bean 角色
    pub fn role(&self) -> BeanRole {
        self.role
    }

    /// 设置 Bean 角色
    pub fn set_role(&mut self, role: BeanRole) {
        self.role = role;
    }

    /// 描述文本
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 设置描述文本
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// 定义来源，用于诊断
    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    /// 设置定义来源
    pub fn set_source(&mut self, source: Option<SourceLocation>) {
        self.source = source;
    }

    /// 类注解元数据（仅注解驱动的定义才有）
    pub fn metadata(&self) -> Option<&Arc<dyn ClassMetadata>> {
        self.metadata.as_ref()
    }

    /// 是否携带注解元数据
    pub fn is_annotated(&self) -> bool {
        self.metadata.is_some()
    }

    /// 工厂方法元数据，仅 `@Bean` 方法定义存在
    pub fn factory_method_metadata(&self) -> Option<&Arc<dyn MethodMetadata>> {
        self.factory_method_metadata.as_ref()
    }

    /// 附加属性
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// 设置附加属性
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// 简短描述，用于日志
    pub fn resource_description(&self) -> String {
        let class = self.bean_class_name.as_deref().unwrap_or("<unknown>");
        match (&self.factory_method_name, &self.source) {
            (Some(method), Some(source)) => format!("工厂方法 {} 定义于 {}", method, source),
            (Some(method), None) => format!("工厂方法 {} ({})", method, class),
            (None, Some(source)) => format!("类 [{}] 定义于 {}", class, source),
            (None, None) => format!("类 [{}]", class),
        }
    }
}

/// 带名称与别名的 Bean 定义
///
/// 注册时创建，此后只读。
#[derive(Debug, Clone)]
pub struct BeanDefinitionHolder {
    definition: Arc<BeanDefinition>,
    bean_name: String,
    aliases: Vec<String>,
}

impl BeanDefinitionHolder {
    /// 创建定义持有者
    pub fn new(definition: impl Into<Arc<BeanDefinition>>, bean_name: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            bean_name: bean_name.into(),
            aliases: Vec::new(),
        }
    }

    /// 设置别名
    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Bean 定义
    pub fn definition(&self) -> &BeanDefinition {
        &self.definition
    }

    /// 共享的 Bean 定义
    pub fn shared_definition(&self) -> Arc<BeanDefinition> {
        Arc::clone(&self.definition)
    }

    /// 注册名称
    pub fn bean_name(&self) -> &str {
        &self.bean_name
    }

    /// 别名列表
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// 名称或任一别名是否匹配
    pub fn matches_name(&self, candidate: &str) -> bool {
        self.bean_name == candidate || self.aliases.iter().any(|alias| alias == candidate)
    }
}

impl fmt::Display for BeanDefinitionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bean 定义 '{}'", self.bean_name)?;
        if !self.aliases.is_empty() {
            write!(f, " 别名 {:?}", self.aliases)?;
        }
        write!(f, ": {}", self.definition.resource_description())
    }
}
