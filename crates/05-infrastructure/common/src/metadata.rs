//! 注解元数据定义
//!
//! 提供类与方法的注解元数据视图。元数据层本身不属于容器核心，
//! 核心只通过 [`AnnotatedTypeMetadata`] 等 trait 读取注解类型、属性和元注解闭包。
//! [`StandardClassMetadata`] / [`StandardMethodMetadata`] 是基于预计算元数据表的默认实现。

use crate::errors::{ConfigError, ConfigResult, DefinitionError, DefinitionResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::sync::Arc;

/// 注解属性值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    String(String),
    StringArray(Vec<String>),
    Nested(AnnotationAttributes),
    NestedArray(Vec<AnnotationAttributes>),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringArray(value)
    }
}

impl From<AnnotationAttributes> for AttributeValue {
    fn from(value: AnnotationAttributes) -> Self {
        Self::Nested(value)
    }
}

impl From<Vec<AnnotationAttributes>> for AttributeValue {
    fn from(value: Vec<AnnotationAttributes>) -> Self {
        Self::NestedArray(value)
    }
}

/// 单个注解的属性映射
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationAttributes {
    values: BTreeMap<String, AttributeValue>,
}

impl AnnotationAttributes {
    /// 创建空属性映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加属性
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// 插入属性
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// 获取原始属性值
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// 是否声明了指定属性
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有属性
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 按属性名顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.values.iter()
    }

    fn required(&self, name: &str) -> DefinitionResult<&AttributeValue> {
        self.values
            .get(name)
            .ok_or_else(|| DefinitionError::missing_attribute(name))
    }

    /// 读取字符串属性
    pub fn get_string(&self, name: &str) -> DefinitionResult<&str> {
        match self.required(name)? {
            AttributeValue::String(value) => Ok(value),
            _ => Err(DefinitionError::type_mismatch(name, "String")),
        }
    }

    /// 读取布尔属性
    pub fn get_bool(&self, name: &str) -> DefinitionResult<bool> {
        match self.required(name)? {
            AttributeValue::Bool(value) => Ok(*value),
            _ => Err(DefinitionError::type_mismatch(name, "bool")),
        }
    }

    /// 读取数值属性
    pub fn get_number(&self, name: &str) -> DefinitionResult<i64> {
        match self.required(name)? {
            AttributeValue::Int(value) => Ok(*value),
            _ => Err(DefinitionError::type_mismatch(name, "i64")),
        }
    }

    /// 读取字符串数组属性，单个字符串会被包装为单元素数组
    pub fn get_string_array(&self, name: &str) -> DefinitionResult<Vec<String>> {
        match self.required(name)? {
            AttributeValue::StringArray(values) => Ok(values.clone()),
            AttributeValue::String(value) => Ok(vec![value.clone()]),
            _ => Err(DefinitionError::type_mismatch(name, "String[]")),
        }
    }

    /// 读取嵌套注解数组属性
    pub fn get_nested_array(&self, name: &str) -> DefinitionResult<Vec<AnnotationAttributes>> {
        match self.required(name)? {
            AttributeValue::NestedArray(values) => Ok(values.clone()),
            AttributeValue::Nested(value) => Ok(vec![value.clone()]),
            // 空数组在反序列化时无法区分元素类型
            AttributeValue::StringArray(values) if values.is_empty() => Ok(Vec::new()),
            _ => Err(DefinitionError::type_mismatch(name, "Annotation[]")),
        }
    }
}

impl From<BTreeMap<String, AttributeValue>> for AnnotationAttributes {
    fn from(values: BTreeMap<String, AttributeValue>) -> Self {
        Self { values }
    }
}

/// 注解描述：类型名、属性以及该注解类型的元注解闭包
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationDescriptor {
    /// 注解类型名称
    #[serde(rename = "type")]
    pub annotation_type: String,
    /// 注解属性
    #[serde(default)]
    pub attributes: AnnotationAttributes,
    /// 元注解闭包（传递性）
    #[serde(default)]
    pub meta_annotations: BTreeSet<String>,
}

impl AnnotationDescriptor {
    /// 创建新的注解描述
    pub fn new(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            attributes: AnnotationAttributes::new(),
            meta_annotations: BTreeSet::new(),
        }
    }

    /// 添加属性
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// 添加元注解
    pub fn with_meta_annotation(mut self, annotation_type: impl Into<String>) -> Self {
        self.meta_annotations.insert(annotation_type.into());
        self
    }
}

/// 注解元数据视图
///
/// 由外部元数据层提供，容器核心只读。
pub trait AnnotatedTypeMetadata: Send + Sync + Debug {
    /// 直接声明的注解类型名称（声明顺序）
    fn annotation_types(&self) -> Vec<String>;

    /// 指定注解的属性，未直接声明时返回 `None`
    fn annotation_attributes(&self, annotation_type: &str) -> Option<AnnotationAttributes>;

    /// 指定注解类型的元注解闭包
    fn meta_annotation_types(&self, annotation_type: &str) -> BTreeSet<String>;

    /// 是否直接或通过元注解带有指定注解
    fn is_annotated(&self, annotation_type: &str) -> bool {
        self.annotation_types().iter().any(|present| {
            present == annotation_type || self.meta_annotation_types(present).contains(annotation_type)
        })
    }
}

/// 类级元数据
pub trait ClassMetadata: AnnotatedTypeMetadata {
    /// 全限定类名
    fn class_name(&self) -> &str;

    fn is_interface(&self) -> bool {
        false
    }

    fn is_abstract(&self) -> bool {
        false
    }

    /// 类是否不可被子类化
    fn is_final(&self) -> bool {
        false
    }
}

/// 方法级元数据
pub trait MethodMetadata: AnnotatedTypeMetadata {
    fn method_name(&self) -> &str;

    /// 声明该方法的类名
    fn declaring_class_name(&self) -> &str;

    fn return_type_name(&self) -> Option<&str> {
        None
    }

    fn is_static(&self) -> bool;

    fn is_final(&self) -> bool;

    fn is_private(&self) -> bool;

    /// 运行时能否通过子类化拦截该方法
    fn is_overridable(&self) -> bool {
        !self.is_static() && !self.is_final() && !self.is_private()
    }
}

fn find_descriptor<'a>(
    annotations: &'a [AnnotationDescriptor],
    annotation_type: &str,
) -> Option<&'a AnnotationDescriptor> {
    annotations
        .iter()
        .find(|descriptor| descriptor.annotation_type == annotation_type)
}

/// 基于元数据表的类元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardClassMetadata {
    pub class_name: String,
    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,
    #[serde(default, rename = "interface")]
    pub is_interface: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

impl StandardClassMetadata {
    /// 创建新的类元数据
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            annotations: Vec::new(),
            is_interface: false,
            is_abstract: false,
            is_final: false,
        }
    }

    /// 添加注解
    pub fn with_annotation(mut self, descriptor: AnnotationDescriptor) -> Self {
        self.annotations.push(descriptor);
        self
    }

    /// 标记为 final
    pub fn final_class(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// 转换为共享的类元数据
    pub fn into_shared(self) -> Arc<dyn ClassMetadata> {
        Arc::new(self)
    }
}

impl AnnotatedTypeMetadata for StandardClassMetadata {
    fn annotation_types(&self) -> Vec<String> {
        self.annotations
            .iter()
            .map(|descriptor| descriptor.annotation_type.clone())
            .collect()
    }

    fn annotation_attributes(&self, annotation_type: &str) -> Option<AnnotationAttributes> {
        find_descriptor(&self.annotations, annotation_type).map(|d| d.attributes.clone())
    }

    fn meta_annotation_types(&self, annotation_type: &str) -> BTreeSet<String> {
        find_descriptor(&self.annotations, annotation_type)
            .map(|d| d.meta_annotations.clone())
            .unwrap_or_default()
    }
}

impl ClassMetadata for StandardClassMetadata {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn is_interface(&self) -> bool {
        self.is_interface
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn is_final(&self) -> bool {
        self.is_final
    }
}

/// 基于元数据表的方法元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardMethodMetadata {
    pub method_name: String,
    pub declaring_class_name: String,
    #[serde(default)]
    pub return_type_name: Option<String>,
    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default, rename = "private")]
    pub is_private: bool,
}

impl StandardMethodMetadata {
    /// 创建新的方法元数据
    pub fn new(declaring_class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            declaring_class_name: declaring_class_name.into(),
            return_type_name: None,
            annotations: Vec::new(),
            is_static: false,
            is_final: false,
            is_private: false,
        }
    }

    /// 添加注解
    pub fn with_annotation(mut self, descriptor: AnnotationDescriptor) -> Self {
        self.annotations.push(descriptor);
        self
    }

    /// 设置返回类型
    pub fn returning(mut self, type_name: impl Into<String>) -> Self {
        self.return_type_name = Some(type_name.into());
        self
    }

    /// 标记为静态方法
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// 标记为 final 方法
    pub fn final_method(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// 标记为私有方法
    pub fn private_method(mut self) -> Self {
        self.is_private = true;
        self
    }

    /// 转换为共享的方法元数据
    pub fn into_shared(self) -> Arc<dyn MethodMetadata> {
        Arc::new(self)
    }
}

impl AnnotatedTypeMetadata for StandardMethodMetadata {
    fn annotation_types(&self) -> Vec<String> {
        self.annotations
            .iter()
            .map(|descriptor| descriptor.annotation_type.clone())
            .collect()
    }

    fn annotation_attributes(&self, annotation_type: &str) -> Option<AnnotationAttributes> {
        find_descriptor(&self.annotations, annotation_type).map(|d| d.attributes.clone())
    }

    fn meta_annotation_types(&self, annotation_type: &str) -> BTreeSet<String> {
        find_descriptor(&self.annotations, annotation_type)
            .map(|d| d.meta_annotations.clone())
            .unwrap_or_default()
    }
}

impl MethodMetadata for StandardMethodMetadata {
    fn method_name(&self) -> &str {
        &self.method_name
    }

    fn declaring_class_name(&self) -> &str {
        &self.declaring_class_name
    }

    fn return_type_name(&self) -> Option<&str> {
        self.return_type_name.as_deref()
    }

    fn is_static(&self) -> bool {
        self.is_static
    }

    fn is_final(&self) -> bool {
        self.is_final
    }

    fn is_private(&self) -> bool {
        self.is_private
    }
}

/// 预计算的元数据表
///
/// 通常由构建期工具生成 JSON，再在启动时加载。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataTable {
    #[serde(default)]
    pub classes: Vec<StandardClassMetadata>,
    #[serde(default)]
    pub methods: Vec<StandardMethodMetadata>,
}

impl MetadataTable {
    /// 创建空元数据表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文本加载
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(ConfigError::from)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 添加类元数据
    pub fn with_class(mut self, class: StandardClassMetadata) -> Self {
        self.classes.push(class);
        self
    }

    /// 添加方法元数据
    pub fn with_method(mut self, method: StandardMethodMetadata) -> Self {
        self.methods.push(method);
        self
    }

    /// 按类名查找类元数据
    pub fn class(&self, class_name: &str) -> Option<Arc<dyn ClassMetadata>> {
        self.classes
            .iter()
            .find(|class| class.class_name == class_name)
            .map(|class| class.clone().into_shared())
    }

    /// 所有类元数据（表内顺序）
    pub fn classes(&self) -> Vec<Arc<dyn ClassMetadata>> {
        self.classes
            .iter()
            .map(|class| class.clone().into_shared())
            .collect()
    }

    /// 指定类声明的方法元数据
    pub fn methods_of(&self, class_name: &str) -> Vec<Arc<dyn MethodMetadata>> {
        self.methods
            .iter()
            .filter(|method| method.declaring_class_name == class_name)
            .map(|method| method.clone().into_shared())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_array_accepts_single_value() {
        let attributes = AnnotationAttributes::new().with("value", "dataSource");
        assert_eq!(
            attributes.get_string_array("value").unwrap(),
            vec!["dataSource".to_string()]
        );
    }

    #[test]
    fn test_missing_and_mismatched_attributes() {
        let attributes = AnnotationAttributes::new().with("value", true);
        assert_eq!(
            attributes.get_string("name"),
            Err(DefinitionError::missing_attribute("name"))
        );
        assert_eq!(
            attributes.get_number("value"),
            Err(DefinitionError::type_mismatch("value", "i64"))
        );
    }

    #[test]
    fn test_is_annotated_follows_meta_annotations() {
        let metadata = StandardClassMetadata::new("com.example.OrderService").with_annotation(
            AnnotationDescriptor::new("x.Service").with_meta_annotation("x.Component"),
        );
        assert!(metadata.is_annotated("x.Service"));
        assert!(metadata.is_annotated("x.Component"));
        assert!(!metadata.is_annotated("x.Repository"));
        assert!(metadata.annotation_attributes("x.Component").is_none());
    }

    #[test]
    fn test_method_overridability() {
        let method = StandardMethodMetadata::new("com.example.AppConfig", "dataSource");
        assert!(method.is_overridable());
        assert!(!method.clone().final_method().is_overridable());
        assert!(!method.clone().private_method().is_overridable());
        assert!(!method.static_method().is_overridable());
    }

    #[test]
    fn test_metadata_table_from_json() {
        let json = r#"{
            "classes": [{
                "class_name": "com.example.AppConfig",
                "annotations": [{
                    "type": "x.Configuration",
                    "attributes": { "value": "", "proxyBeanMethods": true },
                    "meta_annotations": ["x.Component"]
                }]
            }],
            "methods": [{
                "method_name": "dataSource",
                "declaring_class_name": "com.example.AppConfig",
                "final": true,
                "annotations": [{ "type": "x.Bean", "attributes": { "name": ["primaryDs", "ds"] } }]
            }]
        }"#;

        let table = MetadataTable::from_json(json).unwrap();
        let class = table.class("com.example.AppConfig").unwrap();
        assert!(class.is_annotated("x.Component"));
        let attributes = class.annotation_attributes("x.Configuration").unwrap();
        assert!(attributes.get_bool("proxyBeanMethods").unwrap());

        let methods = table.methods_of("com.example.AppConfig");
        assert_eq!(methods.len(), 1);
        assert!(methods[0].is_final());
        let bean = methods[0].annotation_attributes("x.Bean").unwrap();
        assert_eq!(bean.get_string_array("name").unwrap(), vec!["primaryDs", "ds"]);
    }

    #[test]
    fn test_metadata_table_rejects_invalid_json() {
        assert!(matches!(
            MetadataTable::from_json("{ not json"),
            Err(ConfigError::SerializationError { .. })
        ));
    }
}
