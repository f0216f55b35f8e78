//! 属性源实现

use config_abstractions::{MutablePropertySource, PropertySource};
use infrastructure_common::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 本地属性源
///
/// 从 TOML 资源加载，嵌套表会被展开为 "." 分隔的键，
/// 之后可通过 [`MutablePropertySource`] 在运行时覆盖。
#[derive(Debug, Clone, Default)]
pub struct LocalPropertySource {
    properties: BTreeMap<String, String>,
    origin: Option<PathBuf>,
}

impl LocalPropertySource {
    /// 创建空的本地属性源
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 TOML 文本加载
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;

        let mut properties = BTreeMap::new();
        Self::flatten(&table, "", &mut properties);
        Ok(Self {
            properties,
            origin: None,
        })
    }

    /// 从 TOML 文件加载
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("加载本地属性文件: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let mut source = Self::from_toml_str(&content)?;
        source.origin = Some(path.to_path_buf());

        debug!("本地属性文件加载完成, 共 {} 项", source.properties.len());
        Ok(source)
    }

    /// 属性来源文件
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// 递归展开嵌套表
    fn flatten(table: &toml::Table, prefix: &str, out: &mut BTreeMap<String, String>) {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                toml::Value::Table(nested) => Self::flatten(nested, &full_key, out),
                other => {
                    out.insert(full_key, Self::value_to_string(other));
                }
            }
        }
    }

    fn value_to_string(value: &toml::Value) -> String {
        match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(dt) => dt.to_string(),
            toml::Value::Array(items) => items
                .iter()
                .map(Self::value_to_string)
                .collect::<Vec<_>>()
                .join(","),
            toml::Value::Table(table) => table.to_string(),
        }
    }
}

impl PropertySource for LocalPropertySource {
    fn get_property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        "localProperties"
    }
}

impl MutablePropertySource for LocalPropertySource {
    fn set_property(&mut self, key: &str, value: String) {
        self.properties.insert(key.to_string(), value);
    }

    fn remove_property(&mut self, key: &str) -> Option<String> {
        self.properties.remove(key)
    }

    fn clear(&mut self) {
        self.properties.clear();
        self.origin = None;
    }
}

/// 系统属性源（进程环境变量）
///
/// 先按原始键查找，再按大写下划线形式查找：`lorn.di.fail-fast` → `LORN_DI_FAIL_FAST`。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPropertySource;

impl SystemPropertySource {
    /// 创建系统属性源
    pub fn new() -> Self {
        Self
    }

    /// 属性键对应的环境变量名
    pub fn env_key(key: &str) -> String {
        key.chars()
            .map(|ch| match ch {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect()
    }

    fn read_env(name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(e) => {
                debug!("无法读取环境变量 '{}': {}", name, e);
                None
            }
        }
    }
}

impl PropertySource for SystemPropertySource {
    fn get_property(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains('\0') || key.contains('=') {
            return None;
        }
        Self::read_env(key).or_else(|| Self::read_env(&Self::env_key(key)))
    }

    fn property_names(&self) -> Vec<String> {
        std::env::vars_os()
            .filter_map(|(key, _)| key.into_string().ok())
            .collect()
    }

    fn name(&self) -> &str {
        "systemProperties"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_toml_tables_are_flattened() {
        let source = LocalPropertySource::from_toml_str(
            r#"
            banner = "off"

            [lorn.di]
            fail-fast = true
            max-depth = 12
            profiles = ["dev", "local"]
            "#,
        )
        .unwrap();

        assert_eq!(source.get_property("banner").as_deref(), Some("off"));
        assert_eq!(source.get_property("lorn.di.fail-fast").as_deref(), Some("true"));
        assert_eq!(source.get_property("lorn.di.max-depth").as_deref(), Some("12"));
        assert_eq!(source.get_property("lorn.di.profiles").as_deref(), Some("dev,local"));
        assert_eq!(source.len(), 4);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = LocalPropertySource::from_toml_str("not = [valid");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_load_from_file_records_origin() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\"lorn.di.allow-bean-definition-overriding\" = \"true\"").unwrap();

        let source = LocalPropertySource::from_toml_file(file.path()).unwrap();
        assert_eq!(source.origin(), Some(file.path()));
        assert!(source.contains_property("lorn.di.allow-bean-definition-overriding"));
    }

    #[test]
    fn test_local_source_is_mutable() {
        let mut source = LocalPropertySource::new();
        source.set_property("a", "1".to_string());
        assert_eq!(source.remove_property("a").as_deref(), Some("1"));
        assert!(source.is_empty());
    }

    #[test]
    fn test_env_key_mapping() {
        assert_eq!(
            SystemPropertySource::env_key("lorn.di.fail-fast"),
            "LORN_DI_FAIL_FAST"
        );
    }

    #[test]
    fn test_system_source_falls_back_to_env_key() {
        std::env::set_var("LORN_DI_TEST_SYSTEM_SOURCE_KEY", "enabled");
        let source = SystemPropertySource::new();
        assert_eq!(
            source.get_property("lorn.di.test-system-source-key").as_deref(),
            Some("enabled")
        );
        assert_eq!(source.get_property(""), None);
        std::env::remove_var("LORN_DI_TEST_SYSTEM_SOURCE_KEY");
    }
}
