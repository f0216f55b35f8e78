//! 配置类模型与结构校验
//!
//! [`ConfigurationModel`] 拥有全部配置类，配置类拥有自己的 `@Bean` 方法；
//! 方法只通过 [`ConfigurationClassId`] 回指所属的配置类。

use crate::common_annotations::attributes_for;
use di_abstractions::{Problem, ProblemReporter};
use infrastructure_common::annotations::{BEAN, CONFIGURATION};
use infrastructure_common::{
    AnnotatedTypeMetadata, AttributeValue, ClassMetadata, DefinitionResult, MetadataTable, MethodMetadata,
    SourceLocation,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// 配置类在模型中的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationClassId(usize);

impl ConfigurationClassId {
    /// 在模型中的下标
    pub fn index(self) -> usize {
        self.0
    }
}

/// 是否为完整配置类：直接或经元注解带 `@Configuration`，且 `proxyBeanMethods` 不为 false
///
/// 完整配置类的 `@Bean` 方法会在运行时通过子类化被拦截。
/// `proxyBeanMethods` 只从直接声明的 `@Configuration` 读取。
pub fn is_full_configuration_class<M>(metadata: &M) -> bool
where
    M: ClassMetadata + ?Sized,
{
    if !metadata.is_annotated(CONFIGURATION) {
        return false;
    }
    attributes_for(metadata, CONFIGURATION).map_or(true, |attributes| {
        !matches!(attributes.get("proxyBeanMethods"), Some(AttributeValue::Bool(false)))
    })
}

/// 配置类中的 `@Bean` 方法
#[derive(Debug, Clone)]
pub struct BeanMethod {
    metadata: Arc<dyn MethodMetadata>,
    configuration_class: ConfigurationClassId,
}

impl BeanMethod {
    /// 方法元数据
    pub fn metadata(&self) -> &Arc<dyn MethodMetadata> {
        &self.metadata
    }

    /// 所属配置类的标识
    pub fn configuration_class(&self) -> ConfigurationClassId {
        self.configuration_class
    }

    /// 方法名称
    pub fn method_name(&self) -> &str {
        self.metadata.method_name()
    }

    /// 诊断用的位置：配置类 + 方法名
    pub fn location(&self, model: &ConfigurationModel) -> SourceLocation {
        let resource = model
            .class(self.configuration_class)
            .map(|class| class.class_name().to_string())
            .unwrap_or_else(|| self.metadata.declaring_class_name().to_string());
        SourceLocation::new(resource).with_element(self.method_name())
    }

    /// 结构校验，返回发现的问题（为空表示合法）
    ///
    /// 静态方法不受拦截约束；完整配置类中的实例方法必须可被重写。
    pub fn problems(&self, model: &ConfigurationModel) -> Vec<Problem> {
        if self.metadata.is_static() {
            return Vec::new();
        }
        let Some(class) = model.class(self.configuration_class) else {
            return Vec::new();
        };
        if class.is_full() && !self.metadata.is_overridable() {
            return vec![Problem::new(
                format!(
                    "@Bean 方法 '{}' 不能是 private 或 final, 请修改方法修饰符",
                    self.method_name()
                ),
                self.location(model),
            )];
        }
        Vec::new()
    }

    /// 把校验问题作为错误交给报告器
    pub fn validate(&self, model: &ConfigurationModel, reporter: &mut dyn ProblemReporter) -> DefinitionResult<()> {
        for problem in self.problems(model) {
            reporter.error(problem)?;
        }
        Ok(())
    }
}

/// 配置类
#[derive(Debug, Clone)]
pub struct ConfigurationClass {
    id: ConfigurationClassId,
    metadata: Arc<dyn ClassMetadata>,
    bean_name: Option<String>,
    bean_methods: Vec<BeanMethod>,
}

impl ConfigurationClass {
    /// 配置类标识
    pub fn id(&self) -> ConfigurationClassId {
        self.id
    }

    /// 配置类元数据
    pub fn metadata(&self) -> &Arc<dyn ClassMetadata> {
        &self.metadata
    }

    /// 配置类全限定名
    pub fn class_name(&self) -> &str {
        self.metadata.class_name()
    }

    /// 配置类自身注册时使用的名称
    pub fn bean_name(&self) -> Option<&str> {
        self.bean_name.as_deref()
    }

    /// 声明的 `@Bean` 方法
    pub fn bean_methods(&self) -> &[BeanMethod] {
        &self.bean_methods
    }

    /// 是否为完整配置类
    pub fn is_full(&self) -> bool {
        is_full_configuration_class(self.metadata.as_ref())
    }

    /// 类级问题：完整配置类不能是 final
    pub fn problems(&self) -> Vec<Problem> {
        if self.is_full() && self.metadata.is_final() {
            return vec![Problem::new(
                format!(
                    "@Configuration 类 '{}' 不能是 final, 请移除 final 修饰或设置 proxyBeanMethods = false",
                    self.class_name()
                ),
                SourceLocation::new(self.class_name()),
            )];
        }
        Vec::new()
    }
}

/// 配置类集合
#[derive(Debug, Clone, Default)]
pub struct ConfigurationModel {
    classes: Vec<ConfigurationClass>,
}

impl ConfigurationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从元数据表构建：带 `@Configuration` 或声明了 `@Bean` 方法的类
    pub fn from_metadata_table(table: &MetadataTable) -> Self {
        let mut model = Self::new();
        for class in table.classes() {
            let bean_methods: Vec<_> = table
                .methods_of(class.class_name())
                .into_iter()
                .filter(|method| method.is_annotated(BEAN))
                .collect();
            if class.is_annotated(CONFIGURATION) || !bean_methods.is_empty() {
                model.add_class(class, bean_methods);
            }
        }
        debug!("从元数据表解析出 {} 个配置类", model.len());
        model
    }

    /// 添加配置类及其 `@Bean` 方法
    pub fn add_class(
        &mut self,
        metadata: Arc<dyn ClassMetadata>,
        bean_methods: impl IntoIterator<Item = Arc<dyn MethodMetadata>>,
    ) -> ConfigurationClassId {
        let id = ConfigurationClassId(self.classes.len());
        let bean_methods = bean_methods
            .into_iter()
            .map(|metadata| BeanMethod {
                metadata,
                configuration_class: id,
            })
            .collect();
        self.classes.push(ConfigurationClass {
            id,
            metadata,
            bean_name: None,
            bean_methods,
        });
        id
    }

    /// 按标识查找配置类
    pub fn class(&self, id: ConfigurationClassId) -> Option<&ConfigurationClass> {
        self.classes.get(id.0)
    }

    /// 全部配置类，按加入顺序
    pub fn classes(&self) -> &[ConfigurationClass] {
        &self.classes
    }

    /// 记录配置类注册后的 Bean 名称
    pub fn set_bean_name(&mut self, id: ConfigurationClassId, bean_name: impl Into<String>) {
        if let Some(class) = self.classes.get_mut(id.0) {
            class.bean_name = Some(bean_name.into());
        }
    }

    /// 配置类数量
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// 所有类级与方法级问题
    pub fn problems(&self) -> Vec<Problem> {
        self.classes
            .iter()
            .flat_map(|class| {
                class
                    .problems()
                    .into_iter()
                    .chain(class.bean_methods.iter().flat_map(move |method| method.problems(self)))
            })
            .collect()
    }

    /// 校验全部配置类，问题作为错误交给报告器
    ///
    /// 报告器决定是否中止；收集型报告器下不相关的配置类会继续被校验。
    pub fn validate(&self, reporter: &mut dyn ProblemReporter) -> DefinitionResult<usize> {
        let problems = self.problems();
        let count = problems.len();
        if count > 0 {
            warn!("配置类校验发现 {} 个问题", count);
        }
        for problem in problems {
            reporter.error(problem)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{CollectingProblemReporter, FailFastProblemReporter};
    use infrastructure_common::annotations;
    use infrastructure_common::{AnnotationDescriptor, DefinitionError, StandardClassMetadata, StandardMethodMetadata};

    fn config_class(full: bool) -> Arc<dyn ClassMetadata> {
        StandardClassMetadata::new("com.acme.AppConfig")
            .with_annotation(annotations::configuration(None, full))
            .into_shared()
    }

    fn bean_method(customize: impl FnOnce(StandardMethodMetadata) -> StandardMethodMetadata) -> Arc<dyn MethodMetadata> {
        customize(StandardMethodMetadata::new("com.acme.AppConfig", "dataSource").with_annotation(annotations::bean(&[])))
            .into_shared()
    }

    fn single_method_model(class: Arc<dyn ClassMetadata>, method: Arc<dyn MethodMetadata>) -> ConfigurationModel {
        let mut model = ConfigurationModel::new();
        model.add_class(class, vec![method]);
        model
    }

    #[test]
    fn test_final_method_in_full_configuration_is_a_problem() {
        let model = single_method_model(config_class(true), bean_method(|m| m.final_method()));
        let method = &model.classes()[0].bean_methods()[0];

        let problems = method.problems(&model);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].location().to_string(), "com.acme.AppConfig#dataSource");
    }

    #[test]
    fn test_private_method_in_full_configuration_is_a_problem() {
        let model = single_method_model(config_class(true), bean_method(|m| m.private_method()));
        assert_eq!(model.problems().len(), 1);
    }

    #[test]
    fn test_static_method_is_never_a_problem() {
        let model = single_method_model(config_class(true), bean_method(|m| m.static_method().final_method()));
        assert!(model.problems().is_empty());
    }

    #[test]
    fn test_lite_configuration_has_no_constraint() {
        let model = single_method_model(config_class(false), bean_method(|m| m.final_method()));
        assert!(model.problems().is_empty());

        let plain = StandardClassMetadata::new("com.acme.AppConfig").into_shared();
        let model = single_method_model(plain, bean_method(|m| m.final_method()));
        assert!(model.problems().is_empty());
    }

    #[test]
    fn test_meta_annotated_configuration_is_full() {
        let class = StandardClassMetadata::new("com.acme.AppConfig")
            .with_annotation(AnnotationDescriptor::new("com.acme.AppConfiguration").with_meta_annotation(CONFIGURATION))
            .into_shared();
        assert!(is_full_configuration_class(class.as_ref()));

        let model = single_method_model(class, bean_method(|m| m.final_method()));
        assert_eq!(model.problems().len(), 1);
    }

    #[test]
    fn test_overridable_method_is_valid() {
        let model = single_method_model(config_class(true), bean_method(|m| m));
        assert!(model.problems().is_empty());
    }

    #[test]
    fn test_final_full_configuration_class() {
        let class = StandardClassMetadata::new("com.acme.AppConfig")
            .with_annotation(annotations::configuration(None, true))
            .final_class()
            .into_shared();
        let model = single_method_model(class, bean_method(|m| m));
        let problems = model.problems();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].location().element, None);
    }

    #[test]
    fn test_validate_with_reporters() {
        let model = single_method_model(config_class(true), bean_method(|m| m.final_method()));

        let mut collecting = CollectingProblemReporter::new();
        assert_eq!(model.validate(&mut collecting).unwrap(), 1);
        assert!(collecting.has_errors());

        let mut fail_fast = FailFastProblemReporter::new();
        assert!(matches!(
            model.validate(&mut fail_fast),
            Err(DefinitionError::ProblemReported { .. })
        ));

        let method = &model.classes()[0].bean_methods()[0];
        assert!(method.validate(&model, &mut FailFastProblemReporter::new()).is_err());
    }

    #[test]
    fn test_from_metadata_table() {
        let table = MetadataTable::new()
            .with_class(
                StandardClassMetadata::new("com.acme.AppConfig")
                    .with_annotation(annotations::configuration(None, true)),
            )
            .with_class(StandardClassMetadata::new("com.acme.Plain"))
            .with_method(StandardMethodMetadata::new("com.acme.AppConfig", "dataSource").with_annotation(annotations::bean(&[])))
            .with_method(StandardMethodMetadata::new("com.acme.AppConfig", "helper"));

        let model = ConfigurationModel::from_metadata_table(&table);
        assert_eq!(model.len(), 1);
        let class = &model.classes()[0];
        assert_eq!(class.class_name(), "com.acme.AppConfig");
        assert_eq!(class.bean_methods().len(), 1);
        assert_eq!(class.bean_methods()[0].configuration_class(), class.id());
    }
}
