//! 错误类型定义

use thiserror::Error;

/// Bean 定义错误类型
///
/// 名称冲突和缺失必需状态属于致命错误，会中止当前注册流程。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("构造型注解给出的组件名称不一致: '{existing}' 与 '{candidate}'")]
    NamingConflict { existing: String, candidate: String },

    #[error("Bean 定义未设置类名, 无法生成默认名称")]
    MissingBeanClassName,

    #[error("无法注册 Bean 定义 '{name}': 名称已绑定到 {existing}")]
    DuplicateBeanName { name: String, existing: String },

    #[error("未找到名称为 '{name}' 的 Bean 定义")]
    NoSuchBeanDefinition { name: String },

    #[error("无法为 '{name}' 注册别名 '{alias}': 该别名已指向 '{existing}'")]
    AliasConflict {
        alias: String,
        name: String,
        existing: String,
    },

    #[error("无效的 Bean 名称: {message}")]
    InvalidBeanName { message: String },

    #[error("注解属性缺失: {attribute}")]
    MissingAttribute { attribute: String },

    #[error("注解属性类型不匹配: {attribute}, 期望 {expected}")]
    AttributeTypeMismatch {
        attribute: String,
        expected: &'static str,
    },

    #[error("无效的角色代码: {code}")]
    InvalidRole { code: i64 },

    #[error("配置问题: {message}, 位置: {location}")]
    ProblemReported { message: String, location: String },
}

impl DefinitionError {
    /// 创建属性缺失错误
    pub fn missing_attribute(attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute: attribute.into(),
        }
    }

    /// 创建属性类型不匹配错误
    pub fn type_mismatch(attribute: impl Into<String>, expected: &'static str) -> Self {
        Self::AttributeTypeMismatch {
            attribute: attribute.into(),
            expected,
        }
    }

    /// 是否为名称冲突
    pub fn is_naming_conflict(&self) -> bool {
        matches!(self, Self::NamingConflict { .. })
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("Bean 定义错误: {source}")]
    DefinitionError {
        #[from]
        source: DefinitionError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },

    #[error("检测到 {count} 个配置问题: {summary}")]
    ProblemsDetected { count: usize, summary: String },
}

/// 结果类型别名
pub type DefinitionResult<T> = Result<T, DefinitionError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
