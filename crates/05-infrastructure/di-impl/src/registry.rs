//! 默认 Bean 定义注册表
//!
//! 同时实现 [`BeanDefinitionRegistry`] 与 [`ConfigurableListableBeanFactory`]，
//! 保存定义、别名以及自动装配相关的比较器和候选解析器。

use di_abstractions::{
    AutowireCandidateResolver, BeanDefinitionRegistry, ConfigurableListableBeanFactory,
    DependencyComparator, DependencyDescriptor, SimpleAutowireCandidateResolver,
};
use infrastructure_common::{BeanDefinition, BeanDefinitionHolder, DefinitionError, DefinitionResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 注册表内部状态
#[derive(Debug, Default)]
struct RegistryState {
    definitions: HashMap<String, Arc<BeanDefinition>>,
    /// 注册顺序，保证诊断输出稳定
    names: Vec<String>,
    /// 别名 -> 目标名称
    aliases: BTreeMap<String, String>,
}

impl RegistryState {
    fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        while let Some(target) = self.aliases.get(current) {
            current = target.as_str();
        }
        current
    }

    fn has_alias_chain(&self, name: &str, alias: &str) -> bool {
        self.aliases.iter().any(|(registered_alias, target)| {
            target == name && (registered_alias == alias || self.has_alias_chain(registered_alias, alias))
        })
    }

    fn collect_aliases(&self, name: &str, result: &mut Vec<String>) {
        for (alias, target) in &self.aliases {
            if target == name {
                result.push(alias.clone());
                self.collect_aliases(alias, result);
            }
        }
    }
}

/// 默认的可列举 Bean 工厂
#[derive(Debug)]
pub struct DefaultListableBeanFactory {
    state: RwLock<RegistryState>,
    allow_bean_definition_overriding: AtomicBool,
    dependency_comparator: RwLock<Option<Arc<dyn DependencyComparator>>>,
    autowire_candidate_resolver: RwLock<Arc<dyn AutowireCandidateResolver>>,
}

impl DefaultListableBeanFactory {
    /// 创建空工厂，默认不允许覆盖同名定义
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            allow_bean_definition_overriding: AtomicBool::new(false),
            dependency_comparator: RwLock::new(None),
            autowire_candidate_resolver: RwLock::new(Arc::new(SimpleAutowireCandidateResolver)),
        }
    }

    /// 设置是否允许同名定义覆盖
    pub fn with_bean_definition_overriding(self, allow: bool) -> Self {
        self.set_allow_bean_definition_overriding(allow);
        self
    }

    /// 修改覆盖策略
    pub fn set_allow_bean_definition_overriding(&self, allow: bool) {
        self.allow_bean_definition_overriding.store(allow, Ordering::SeqCst);
    }

    /// 是否允许同名定义覆盖
    pub fn is_allow_bean_definition_overriding(&self) -> bool {
        self.allow_bean_definition_overriding.load(Ordering::SeqCst)
    }

    /// 沿别名链解析到最终名称
    pub fn canonical_name(&self, name: &str) -> String {
        self.state.read().canonical_name(name).to_string()
    }

    /// 以名称和别名包装已注册的定义
    pub fn bean_definition_holder(&self, name: &str) -> DefinitionResult<BeanDefinitionHolder> {
        let canonical = self.canonical_name(name);
        let definition = self.get_bean_definition(&canonical)?;
        let aliases = self.aliases(&canonical);
        Ok(BeanDefinitionHolder::new(definition, canonical).with_aliases(aliases))
    }

    /// 查找满足依赖描述的候选定义
    ///
    /// 先按类型过滤，再交给候选解析器判断，最后按依赖比较器排序（稳定排序，保留注册顺序）。
    pub fn find_autowire_candidates(&self, descriptor: &DependencyDescriptor) -> Vec<BeanDefinitionHolder> {
        let resolver = self.autowire_candidate_resolver();
        let mut candidates: Vec<BeanDefinitionHolder> = self
            .bean_definition_names()
            .into_iter()
            .filter_map(|name| self.bean_definition_holder(&name).ok())
            .filter(|holder| match &descriptor.type_name {
                Some(type_name) => holder.definition().bean_class_name() == Some(type_name.as_str()),
                None => true,
            })
            .filter(|holder| resolver.is_autowire_candidate(holder, descriptor))
            .collect();

        if let Some(comparator) = self.dependency_comparator() {
            candidates.sort_by(|left, right| comparator.compare(left.definition(), right.definition()));
        }
        debug!("依赖 {:?} 找到 {} 个候选定义", descriptor, candidates.len());
        candidates
    }
}

impl Default for DefaultListableBeanFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BeanDefinitionRegistry for DefaultListableBeanFactory {
    fn register_bean_definition(
        &self,
        bean_name: &str,
        definition: BeanDefinition,
    ) -> DefinitionResult<Arc<BeanDefinition>> {
        if bean_name.trim().is_empty() {
            return Err(DefinitionError::InvalidBeanName {
                message: "Bean 名称不能为空".to_string(),
            });
        }

        let allow_overriding = self.is_allow_bean_definition_overriding();
        let definition = Arc::new(definition);
        let mut state = self.state.write();

        if let Some(target) = state.aliases.get(bean_name).cloned() {
            if !allow_overriding {
                return Err(DefinitionError::DuplicateBeanName {
                    name: bean_name.to_string(),
                    existing: format!("别名 -> '{}'", target),
                });
            }
            warn!("Bean 定义 '{}' 覆盖了指向 '{}' 的同名别名", bean_name, target);
            state.aliases.remove(bean_name);
        }

        let existing = state.definitions.get(bean_name).cloned();
        match existing {
            Some(existing) if !allow_overriding => {
                return Err(DefinitionError::DuplicateBeanName {
                    name: bean_name.to_string(),
                    existing: existing.resource_description(),
                });
            }
            Some(existing) => {
                info!(
                    "覆盖 Bean 定义 '{}': {} -> {}",
                    bean_name,
                    existing.resource_description(),
                    definition.resource_description()
                );
            }
            None => {
                state.names.push(bean_name.to_string());
                debug!("注册 Bean 定义 '{}': {}", bean_name, definition.resource_description());
            }
        }

        state
            .definitions
            .insert(bean_name.to_string(), Arc::clone(&definition));
        Ok(definition)
    }

    fn remove_bean_definition(&self, bean_name: &str) -> DefinitionResult<Arc<BeanDefinition>> {
        let mut state = self.state.write();
        let removed = state
            .definitions
            .remove(bean_name)
            .ok_or_else(|| DefinitionError::NoSuchBeanDefinition {
                name: bean_name.to_string(),
            })?;
        state.names.retain(|name| name != bean_name);
        debug!("移除 Bean 定义 '{}'", bean_name);
        Ok(removed)
    }

    fn get_bean_definition(&self, bean_name: &str) -> DefinitionResult<Arc<BeanDefinition>> {
        self.state
            .read()
            .definitions
            .get(bean_name)
            .cloned()
            .ok_or_else(|| DefinitionError::NoSuchBeanDefinition {
                name: bean_name.to_string(),
            })
    }

    fn contains_bean_definition(&self, bean_name: &str) -> bool {
        self.state.read().definitions.contains_key(bean_name)
    }

    fn bean_definition_names(&self) -> Vec<String> {
        self.state.read().names.clone()
    }

    fn bean_definition_count(&self) -> usize {
        self.state.read().names.len()
    }

    fn register_alias(&self, name: &str, alias: &str) -> DefinitionResult<()> {
        if name.trim().is_empty() || alias.trim().is_empty() {
            return Err(DefinitionError::InvalidBeanName {
                message: "名称和别名都不能为空".to_string(),
            });
        }

        let mut state = self.state.write();
        if alias == name {
            state.aliases.remove(alias);
            debug!("别名 '{}' 与名称相同, 已忽略", alias);
            return Ok(());
        }

        if let Some(existing) = state.aliases.get(alias) {
            if existing == name {
                return Ok(());
            }
            if !self.is_allow_bean_definition_overriding() {
                return Err(DefinitionError::AliasConflict {
                    alias: alias.to_string(),
                    name: name.to_string(),
                    existing: existing.clone(),
                });
            }
            info!("覆盖别名 '{}': '{}' -> '{}'", alias, existing, name);
        }

        if state.has_alias_chain(alias, name) || state.canonical_name(name) == alias {
            return Err(DefinitionError::InvalidBeanName {
                message: format!("别名 '{}' -> '{}' 会形成循环引用", alias, name),
            });
        }

        state.aliases.insert(alias.to_string(), name.to_string());
        debug!("注册别名 '{}' -> '{}'", alias, name);
        Ok(())
    }

    fn aliases(&self, name: &str) -> Vec<String> {
        let mut result = Vec::new();
        self.state.read().collect_aliases(name, &mut result);
        result
    }

    fn is_alias(&self, name: &str) -> bool {
        self.state.read().aliases.contains_key(name)
    }

    fn as_bean_factory(&self) -> Option<&dyn ConfigurableListableBeanFactory> {
        Some(self)
    }
}

impl ConfigurableListableBeanFactory for DefaultListableBeanFactory {
    fn dependency_comparator(&self) -> Option<Arc<dyn DependencyComparator>> {
        self.dependency_comparator.read().clone()
    }

    fn set_dependency_comparator(&self, comparator: Option<Arc<dyn DependencyComparator>>) {
        *self.dependency_comparator.write() = comparator;
    }

    fn autowire_candidate_resolver(&self) -> Arc<dyn AutowireCandidateResolver> {
        Arc::clone(&self.autowire_candidate_resolver.read())
    }

    fn set_autowire_candidate_resolver(&self, resolver: Arc<dyn AutowireCandidateResolver>) {
        *self.autowire_candidate_resolver.write() = resolver;
    }
}

/// 以 holder 中的名称注册定义，并注册其全部别名
pub fn register_bean_definition(
    holder: &BeanDefinitionHolder,
    registry: &dyn BeanDefinitionRegistry,
) -> DefinitionResult<Arc<BeanDefinition>> {
    let registered = registry.register_bean_definition(holder.bean_name(), holder.definition().clone())?;
    for alias in holder.aliases() {
        registry.register_alias(holder.bean_name(), alias)?;
    }
    Ok(registered)
}
