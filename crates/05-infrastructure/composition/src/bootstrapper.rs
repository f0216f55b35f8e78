//! 容器启动器
//!
//! 按固定顺序组装 Bean 定义：基础设施 -> 组件类 -> 配置类校验 -> `@Bean` 方法。
//! 每个阶段都是一个启动步骤。

use crate::infrastructure::AnnotationConfigContext;
use config_impl::{ContainerProperties, ALLOW_BEAN_DEFINITION_OVERRIDING, FAIL_FAST};
use di_abstractions::{BeanDefinitionRegistry, Problem, Severity};
use di_impl::{
    AnnotatedBeanDefinitionReader, ClassPresence, CollectingProblemReporter, ConfigurationClassBeanDefinitionReader,
    ConfigurationModel, DefaultListableBeanFactory, FailFastProblemReporter, KnownClasses,
};
use infrastructure_common::annotations::COMPONENT;
use infrastructure_common::{
    AnnotatedTypeMetadata, ApplicationStartup, ClassMetadata, InfrastructureResult, MetadataTable, MethodMetadata,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 显式声明的配置类
pub(crate) struct ExplicitConfiguration {
    pub(crate) metadata: Arc<dyn ClassMetadata>,
    pub(crate) bean_methods: Vec<Arc<dyn MethodMetadata>>,
}

/// 已解析的容器设置
#[derive(Debug, Clone, Copy)]
pub(crate) struct BootstrapSettings {
    pub(crate) allow_bean_definition_overriding: bool,
    pub(crate) fail_fast: bool,
}

impl BootstrapSettings {
    /// 未显式覆盖的项从属性存储读取
    pub(crate) fn resolve(
        properties: &ContainerProperties,
        allow_bean_definition_overriding: Option<bool>,
        fail_fast: Option<bool>,
    ) -> Self {
        Self {
            allow_bean_definition_overriding: allow_bean_definition_overriding
                .unwrap_or_else(|| properties.get_flag(ALLOW_BEAN_DEFINITION_OVERRIDING)),
            fail_fast: fail_fast.unwrap_or_else(|| properties.get_flag(FAIL_FAST)),
        }
    }
}

struct CombinedPresence<'a> {
    known: &'a KnownClasses,
    table: &'a MetadataTable,
}

impl ClassPresence for CombinedPresence<'_> {
    fn is_present(&self, class_name: &str) -> bool {
        self.known.is_present(class_name) || self.table.is_present(class_name)
    }
}

/// 容器启动器
pub struct ContainerBootstrapper {
    settings: BootstrapSettings,
    table: MetadataTable,
    components: Vec<Arc<dyn ClassMetadata>>,
    configurations: Vec<ExplicitConfiguration>,
    known_classes: KnownClasses,
    startup: Arc<dyn ApplicationStartup>,
}

impl ContainerBootstrapper {
    pub(crate) fn new(
        settings: BootstrapSettings,
        table: MetadataTable,
        components: Vec<Arc<dyn ClassMetadata>>,
        configurations: Vec<ExplicitConfiguration>,
        known_classes: KnownClasses,
        startup: Arc<dyn ApplicationStartup>,
    ) -> Self {
        Self {
            settings,
            table,
            components,
            configurations,
            known_classes,
            startup,
        }
    }

    /// 执行全部启动阶段
    pub fn bootstrap(self) -> InfrastructureResult<AnnotationConfigContext> {
        info!(
            "开始启动容器 (允许覆盖: {}, 快速失败: {})",
            self.settings.allow_bean_definition_overriding, self.settings.fail_fast
        );

        let mut step = self.startup.start("lorn.di.context.beanfactory.create");
        let bean_factory = Arc::new(
            DefaultListableBeanFactory::new()
                .with_bean_definition_overriding(self.settings.allow_bean_definition_overriding),
        );
        step.end();

        // 第一步：基础设施与组件类
        let mut step = self.startup.start("lorn.di.context.components.register");
        let presence = CombinedPresence {
            known: &self.known_classes,
            table: &self.table,
        };
        let reader = AnnotatedBeanDefinitionReader::new(bean_factory.as_ref(), &presence)?;
        let component_names = self.register_components(&reader)?;
        step.tag("count", &component_names.len().to_string());
        step.end();

        // 第二步：配置类模型
        let mut step = self.startup.start("lorn.di.context.config-classes.parse");
        let mut model = ConfigurationModel::from_metadata_table(&self.table);
        for configuration in &self.configurations {
            let class_name = configuration.metadata.class_name();
            if model.classes().iter().any(|class| class.class_name() == class_name) {
                debug!("配置类 {} 已在元数据表中, 跳过", class_name);
                continue;
            }
            model.add_class(Arc::clone(&configuration.metadata), configuration.bean_methods.iter().cloned());
        }
        let ids: Vec<_> = model.classes().iter().map(|class| class.id()).collect();
        for id in ids {
            let registered = model
                .class(id)
                .and_then(|class| component_names.get(class.class_name()).cloned());
            if let Some(bean_name) = registered {
                model.set_bean_name(id, bean_name);
            }
        }
        step.tag("classes", &model.len().to_string());
        step.end();

        // 第三步：校验
        let mut step = self.startup.start("lorn.di.context.config-classes.validate");
        let problems = self.validate(&model)?;
        step.tag("problems", &problems.len().to_string());
        step.end();

        // 第四步：@Bean 方法
        let mut step = self.startup.start("lorn.di.context.bean-methods.load");
        let loaded = ConfigurationClassBeanDefinitionReader::new(bean_factory.as_ref()).load_bean_definitions(&mut model)?;
        step.tag("count", &loaded.len().to_string());
        step.end();

        info!("容器启动完成, 共 {} 个 Bean 定义", bean_factory.bean_definition_count());
        Ok(AnnotationConfigContext::new(bean_factory, problems, self.startup))
    }

    /// 注册显式组件与元数据表中的组件类，返回类名到 Bean 名称的映射
    fn register_components(&self, reader: &AnnotatedBeanDefinitionReader<'_>) -> InfrastructureResult<HashMap<String, String>> {
        let mut names = HashMap::new();
        let table_components = self
            .table
            .classes()
            .into_iter()
            .filter(|class| class.is_annotated(COMPONENT));

        for metadata in self.components.iter().cloned().chain(table_components) {
            if names.contains_key(metadata.class_name()) {
                debug!("组件类 {} 已注册, 跳过", metadata.class_name());
                continue;
            }
            let class_name = metadata.class_name().to_string();
            let holder = reader.register_bean(metadata)?;
            names.insert(class_name, holder.bean_name().to_string());
        }
        Ok(names)
    }

    fn validate(&self, model: &ConfigurationModel) -> InfrastructureResult<Vec<(Severity, Problem)>> {
        if self.settings.fail_fast {
            let mut reporter = FailFastProblemReporter::new();
            model.validate(&mut reporter)?;
            Ok(Vec::new())
        } else {
            let mut reporter = CollectingProblemReporter::new();
            model.validate(&mut reporter)?;
            Ok(reporter.into_problems())
        }
    }
}
