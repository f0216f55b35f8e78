//! 容器构建器
//!
//! 使用构建者模式收集组件类、配置类与元数据表，`build` 时交给
//! [`ContainerBootstrapper`] 完成启动。

use crate::bootstrapper::{BootstrapSettings, ContainerBootstrapper, ExplicitConfiguration};
use crate::infrastructure::AnnotationConfigContext;
use crate::logging::{init_logging, LoggingConfig};
use config_impl::ContainerProperties;
use di_impl::KnownClasses;
use infrastructure_common::{
    ApplicationStartup, ClassMetadata, DefaultApplicationStartup, InfrastructureResult, MetadataTable, MethodMetadata,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 容器构建器
pub struct ContainerBuilder {
    /// 合并后的元数据表
    table: MetadataTable,
    /// 显式注册的组件类
    components: Vec<Arc<dyn ClassMetadata>>,
    /// 显式注册的配置类
    configurations: Vec<ExplicitConfiguration>,
    /// 属性存储，未设置时使用全局实例
    properties: Option<Arc<ContainerProperties>>,
    allow_bean_definition_overriding: Option<bool>,
    fail_fast: Option<bool>,
    known_classes: KnownClasses,
    startup: Arc<dyn ApplicationStartup>,
    /// 日志配置，未设置时不安装订阅者
    logging_config: Option<LoggingConfig>,
}

impl ContainerBuilder {
    /// 创建构建器，默认使用全局属性存储
    pub fn new() -> Self {
        Self {
            table: MetadataTable::default(),
            components: Vec::new(),
            configurations: Vec::new(),
            properties: None,
            allow_bean_definition_overriding: None,
            fail_fast: None,
            known_classes: KnownClasses::new(),
            startup: Arc::new(DefaultApplicationStartup),
            logging_config: None,
        }
    }

    /// 添加组件类
    pub fn add_component(mut self, metadata: Arc<dyn ClassMetadata>) -> Self {
        self.components.push(metadata);
        self
    }

    /// 添加配置类及其 `@Bean` 方法
    pub fn add_configuration(
        mut self,
        metadata: Arc<dyn ClassMetadata>,
        bean_methods: impl IntoIterator<Item = Arc<dyn MethodMetadata>>,
    ) -> Self {
        self.configurations.push(ExplicitConfiguration {
            metadata,
            bean_methods: bean_methods.into_iter().collect(),
        });
        self
    }

    /// 合并元数据表
    pub fn add_metadata_table(mut self, table: MetadataTable) -> Self {
        debug!("合并元数据表: {} 个类, {} 个方法", table.classes.len(), table.methods.len());
        self.table.classes.extend(table.classes);
        self.table.methods.extend(table.methods);
        self
    }

    /// 从 JSON 文件读取并合并元数据表
    pub fn add_metadata_json_file<P: AsRef<Path>>(self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        let table = MetadataTable::from_json_file(path)?;
        info!("已读取元数据文件: {}", path.display());
        Ok(self.add_metadata_table(table))
    }

    /// 使用指定的属性存储代替全局实例
    pub fn with_properties(mut self, properties: Arc<ContainerProperties>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// 覆盖 `lorn.di.allow-bean-definition-overriding` 属性
    pub fn allow_bean_definition_overriding(mut self, allow: bool) -> Self {
        self.allow_bean_definition_overriding = Some(allow);
        self
    }

    /// 覆盖 `lorn.di.fail-fast` 属性
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = Some(fail_fast);
        self
    }

    /// 声明运行环境中可用的可选类型
    pub fn with_known_classes(mut self, known_classes: KnownClasses) -> Self {
        self.known_classes = known_classes;
        self
    }

    /// 设置启动步骤记录器
    pub fn with_application_startup(mut self, startup: Arc<dyn ApplicationStartup>) -> Self {
        self.startup = startup;
        self
    }

    /// 设置日志配置
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 开发环境预设：详细日志，收集全部配置问题
    pub fn auto_configure_development(self) -> Self {
        self.with_logging(LoggingConfig::development()).fail_fast(false)
    }

    /// 生产环境预设：JSON 日志，遇到配置问题立即失败
    pub fn auto_configure_production(self) -> Self {
        self.with_logging(LoggingConfig::production()).fail_fast(true)
    }

    /// 启动容器
    pub fn build(self) -> InfrastructureResult<AnnotationConfigContext> {
        if let Some(config) = &self.logging_config {
            init_logging(config)?;
        }

        let properties: &ContainerProperties = match &self.properties {
            Some(properties) => properties.as_ref(),
            None => ContainerProperties::global(),
        };
        let settings = BootstrapSettings::resolve(properties, self.allow_bean_definition_overriding, self.fail_fast);
        debug!("容器设置: {:?}", settings);

        ContainerBootstrapper::new(
            settings,
            self.table,
            self.components,
            self.configurations,
            self.known_classes,
            self.startup,
        )
        .bootstrap()
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
