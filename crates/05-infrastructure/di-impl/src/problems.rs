//! 问题报告器实现

use di_abstractions::{Problem, ProblemReporter, Severity};
use infrastructure_common::DefinitionResult;
use tracing::{error, warn};

/// 遇到错误立即中止的报告器
///
/// 致命问题和错误转换为 [`DefinitionError::ProblemReported`](infrastructure_common::DefinitionError::ProblemReported)，
/// 警告只记录日志。
#[derive(Debug, Default, Clone, Copy)]
pub struct FailFastProblemReporter;

impl FailFastProblemReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ProblemReporter for FailFastProblemReporter {
    fn fatal(&mut self, problem: Problem) -> DefinitionResult<()> {
        error!("{}", problem);
        Err(problem.into_error())
    }

    fn error(&mut self, problem: Problem) -> DefinitionResult<()> {
        error!("{}", problem);
        Err(problem.into_error())
    }

    fn warning(&mut self, problem: Problem) -> DefinitionResult<()> {
        warn!("{}", problem);
        Ok(())
    }
}

/// 收集所有问题的报告器，由调用方决定后续处理
#[derive(Debug, Default, Clone)]
pub struct CollectingProblemReporter {
    problems: Vec<(Severity, Problem)>,
}

impl CollectingProblemReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收集的问题（报告顺序）
    pub fn problems(&self) -> &[(Severity, Problem)] {
        &self.problems
    }

    /// 是否存在错误级别以上的问题
    pub fn has_errors(&self) -> bool {
        self.problems
            .iter()
            .any(|(severity, _)| *severity >= Severity::Error)
    }

    /// 已记录的问题数量
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// 取出全部问题
    pub fn into_problems(self) -> Vec<(Severity, Problem)> {
        self.problems
    }

    fn record(&mut self, severity: Severity, problem: Problem) -> DefinitionResult<()> {
        warn!("记录配置问题 [{:?}]: {}", severity, problem);
        self.problems.push((severity, problem));
        Ok(())
    }
}

impl ProblemReporter for CollectingProblemReporter {
    fn fatal(&mut self, problem: Problem) -> DefinitionResult<()> {
        self.record(Severity::Fatal, problem)
    }

    fn error(&mut self, problem: Problem) -> DefinitionResult<()> {
        self.record(Severity::Error, problem)
    }

    fn warning(&mut self, problem: Problem) -> DefinitionResult<()> {
        self.record(Severity::Warning, problem)
    }
}
