//! 进程级容器属性
//!
//! 两级查找：先查本地属性（资源文件 + 运行时覆盖），再回退到系统属性。
//! 全局实例在首次访问时从约定资源加载一次，可通过 setter 覆盖，
//! 进程退出前可调用 [`ContainerProperties::reset`] 清理。

use crate::providers::{LocalPropertySource, SystemPropertySource};
use config_abstractions::{parse_flag, MutablePropertySource, PropertySource};
use infrastructure_common::ConfigResult;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 约定的本地属性资源文件名
pub const PROPERTIES_RESOURCE_LOCATION: &str = "lorn-di.toml";

/// 指定属性资源路径的环境变量
pub const PROPERTIES_LOCATION_ENV: &str = "LORN_DI_PROPERTIES";

/// 是否允许同名 Bean 定义覆盖
pub const ALLOW_BEAN_DEFINITION_OVERRIDING: &str = "lorn.di.allow-bean-definition-overriding";

/// 配置问题是否立即中止启动
pub const FAIL_FAST: &str = "lorn.di.fail-fast";

/// 全局容器属性
static GLOBAL_PROPERTIES: Lazy<ContainerProperties> = Lazy::new(ContainerProperties::load);

/// 容器属性存储
#[derive(Debug)]
pub struct ContainerProperties {
    local: RwLock<LocalPropertySource>,
    system: Box<dyn PropertySource>,
}

impl ContainerProperties {
    /// 使用指定的本地与系统属性源创建
    pub fn new(local: LocalPropertySource, system: Box<dyn PropertySource>) -> Self {
        Self {
            local: RwLock::new(local),
            system,
        }
    }

    /// 仅含系统属性的空存储
    pub fn empty() -> Self {
        Self::new(LocalPropertySource::new(), Box::new(SystemPropertySource::new()))
    }

    /// 从约定资源加载，失败时退化为空的本地属性
    pub fn load() -> Self {
        let properties = Self::empty();
        let location = Self::resource_location();
        if location.exists() {
            if let Err(e) = properties.reload_from(&location) {
                warn!("无法加载属性文件 '{}': {}", location.display(), e);
            }
        } else {
            debug!("未找到属性文件 '{}', 仅使用系统属性", location.display());
        }
        properties
    }

    /// 全局实例
    pub fn global() -> &'static ContainerProperties {
        &GLOBAL_PROPERTIES
    }

    /// 本地属性资源路径
    pub fn resource_location() -> PathBuf {
        std::env::var_os(PROPERTIES_LOCATION_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(PROPERTIES_RESOURCE_LOCATION))
    }

    /// 用文件内容替换本地属性
    pub fn reload_from(&self, path: &Path) -> ConfigResult<()> {
        let source = LocalPropertySource::from_toml_file(path)?;
        info!("已加载容器属性文件 '{}' ({} 项)", path.display(), source.len());
        *self.local.write() = source;
        Ok(())
    }

    /// 获取属性值，本地属性优先
    pub fn get_property(&self, key: &str) -> Option<String> {
        if let Some(value) = self.local.read().get_property(key) {
            return Some(value);
        }
        self.system.get_property(key)
    }

    /// 设置本地属性，`None` 表示移除
    pub fn set_property(&self, key: &str, value: Option<&str>) {
        let mut local = self.local.write();
        match value {
            Some(value) => local.set_property(key, value.to_string()),
            None => {
                local.remove_property(key);
            }
        }
    }

    /// 将本地标志设为 "true"
    pub fn set_flag(&self, key: &str) {
        self.set_property(key, Some("true"));
    }

    /// 属性值为 "true"（大小写不敏感）时返回 true
    pub fn get_flag(&self, key: &str) -> bool {
        parse_flag(self.get_property(key).as_deref())
    }

    /// 清空本地属性
    pub fn reset(&self) {
        self.local.write().clear();
        debug!("容器本地属性已清空");
    }
}
