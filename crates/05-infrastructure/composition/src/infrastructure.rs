//! 注解配置上下文

use crate::builder::ContainerBuilder;
use di_abstractions::{BeanDefinitionRegistry, DependencyDescriptor, Problem, Severity};
use di_impl::DefaultListableBeanFactory;
use infrastructure_common::{
    ApplicationStartup, BeanDefinition, BeanDefinitionHolder, BeanRole, InfrastructureError, InfrastructureResult,
};
use std::fmt;
use std::sync::Arc;

/// 启动完成后的注解配置上下文
///
/// 持有已填充的 Bean 工厂以及收集模式下记录的配置问题。
pub struct AnnotationConfigContext {
    bean_factory: Arc<DefaultListableBeanFactory>,
    problems: Vec<(Severity, Problem)>,
    startup: Arc<dyn ApplicationStartup>,
}

impl AnnotationConfigContext {
    pub(crate) fn new(
        bean_factory: Arc<DefaultListableBeanFactory>,
        problems: Vec<(Severity, Problem)>,
        startup: Arc<dyn ApplicationStartup>,
    ) -> Self {
        Self {
            bean_factory,
            problems,
            startup,
        }
    }

    /// 创建构建器
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// 已填充的 Bean 工厂
    pub fn bean_factory(&self) -> &Arc<DefaultListableBeanFactory> {
        &self.bean_factory
    }

    /// 启动步骤记录器
    pub fn application_startup(&self) -> &Arc<dyn ApplicationStartup> {
        &self.startup
    }

    /// 用户定义的 Bean 名称（应用与支持角色），按注册顺序
    pub fn user_bean_names(&self) -> Vec<String> {
        self.bean_names_where(|role| role != BeanRole::Infrastructure)
    }

    /// 容器内部基础设施 Bean 名称
    pub fn infrastructure_bean_names(&self) -> Vec<String> {
        self.bean_names_where(|role| role == BeanRole::Infrastructure)
    }

    fn bean_names_where(&self, predicate: impl Fn(BeanRole) -> bool) -> Vec<String> {
        self.bean_factory
            .bean_definition_names()
            .into_iter()
            .filter(|name| {
                self.bean_factory
                    .get_bean_definition(name)
                    .map_or(false, |definition| predicate(definition.role()))
            })
            .collect()
    }

    /// 按名称或别名获取 Bean 定义
    pub fn bean_definition(&self, name: &str) -> InfrastructureResult<Arc<BeanDefinition>> {
        Ok(self.bean_factory.get_bean_definition(name)?)
    }

    /// 是否存在指定名称的 Bean 定义
    pub fn contains_bean_definition(&self, name: &str) -> bool {
        self.bean_factory.contains_bean_definition(name)
    }

    /// Bean 定义总数（含基础设施）
    pub fn bean_definition_count(&self) -> usize {
        self.bean_factory.bean_definition_count()
    }

    /// 按依赖描述查找自动装配候选，结果已排序
    pub fn find_autowire_candidates(&self, descriptor: &DependencyDescriptor) -> Vec<BeanDefinitionHolder> {
        self.bean_factory.find_autowire_candidates(descriptor)
    }

    /// 收集模式下记录的配置问题
    pub fn problems(&self) -> &[(Severity, Problem)] {
        &self.problems
    }

    /// 是否记录了配置问题
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// 存在配置问题时返回 [`InfrastructureError::ProblemsDetected`]
    pub fn ensure_no_problems(&self) -> InfrastructureResult<()> {
        if self.problems.is_empty() {
            return Ok(());
        }
        let summary = self
            .problems
            .iter()
            .map(|(_, problem)| problem.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(InfrastructureError::ProblemsDetected {
            count: self.problems.len(),
            summary,
        })
    }
}

impl fmt::Debug for AnnotationConfigContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationConfigContext")
            .field("bean_definition_count", &self.bean_definition_count())
            .field("problems", &self.problems.len())
            .finish()
    }
}
