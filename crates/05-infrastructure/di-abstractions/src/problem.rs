//! 配置问题报告抽象接口
//!
//! 结构性校验不会直接返回错误，而是把 [`Problem`] 交给报告器，
//! 由报告器决定中止还是仅记录。

use infrastructure_common::{DefinitionError, DefinitionResult, SourceLocation};
use std::fmt;

/// 问题严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

/// 配置问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    message: String,
    location: SourceLocation,
}

impl Problem {
    /// 创建新的配置问题
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    /// 问题描述
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 问题位置
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// 转换为致命错误
    pub fn into_error(self) -> DefinitionError {
        DefinitionError::ProblemReported {
            message: self.message,
            location: self.location.to_string(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "配置问题: {} (位置: {})", self.message, self.location)
    }
}

/// 问题报告器 trait
pub trait ProblemReporter {
    /// 报告致命问题
    fn fatal(&mut self, problem: Problem) -> DefinitionResult<()>;

    /// 报告错误
    fn error(&mut self, problem: Problem) -> DefinitionResult<()>;

    /// 报告警告
    fn warning(&mut self, problem: Problem) -> DefinitionResult<()>;

    /// 按严重程度分发
    fn report(&mut self, severity: Severity, problem: Problem) -> DefinitionResult<()> {
        match severity {
            Severity::Fatal => self.fatal(problem),
            Severity::Error => self.error(problem),
            Severity::Warning => self.warning(problem),
        }
    }
}
