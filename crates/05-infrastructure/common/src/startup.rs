//! 启动步骤跟踪
//!
//! 容器启动过程被划分为若干命名步骤（名称使用 "." 分隔的命名空间），
//! 默认实现不记录任何数据，[`TracingApplicationStartup`] 会把步骤输出到 tracing 并保留记录。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 启动步骤
pub trait StartupStep: Send {
    /// 步骤 ID，同一个 [`ApplicationStartup`] 内唯一
    fn id(&self) -> u64;

    /// 步骤名称
    fn name(&self) -> &str;

    /// 添加标签
    fn tag(&mut self, key: &str, value: &str);

    /// 结束步骤，重复调用无效果
    fn end(&mut self);
}

/// 启动过程记录器
pub trait ApplicationStartup: Send + Sync {
    /// 创建新步骤并标记开始
    fn start(&self, name: &str) -> Box<dyn StartupStep>;
}

/// 默认的空操作实现
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultApplicationStartup;

#[derive(Debug)]
struct NoOpStartupStep;

impl StartupStep for NoOpStartupStep {
    fn id(&self) -> u64 {
        0
    }

    fn name(&self) -> &str {
        ""
    }

    fn tag(&mut self, _key: &str, _value: &str) {}

    fn end(&mut self) {}
}

impl ApplicationStartup for DefaultApplicationStartup {
    fn start(&self, _name: &str) -> Box<dyn StartupStep> {
        Box::new(NoOpStartupStep)
    }
}

/// 已结束的启动步骤
#[derive(Debug, Clone)]
pub struct RecordedStep {
    pub id: u64,
    pub name: String,
    pub tags: Vec<(String, String)>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl RecordedStep {
    /// 耗时（毫秒）
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

/// 基于 tracing 的启动记录器
#[derive(Debug, Default)]
pub struct TracingApplicationStartup {
    next_id: Arc<AtomicU64>,
    recorded: Arc<Mutex<Vec<RecordedStep>>>,
}

impl TracingApplicationStartup {
    /// 创建启动记录器
    pub fn new() -> Self {
        Self::default()
    }

    /// 已结束步骤的快照（按结束顺序）
    pub fn recorded_steps(&self) -> Vec<RecordedStep> {
        self.recorded.lock().clone()
    }
}

impl ApplicationStartup for TracingApplicationStartup {
    fn start(&self, name: &str) -> Box<dyn StartupStep> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(step = name, id, "启动步骤开始");
        Box::new(TracingStartupStep {
            id,
            name: name.to_string(),
            tags: Vec::new(),
            started_at: Utc::now(),
            ended: false,
            recorded: Arc::clone(&self.recorded),
        })
    }
}

struct TracingStartupStep {
    id: u64,
    name: String,
    tags: Vec<(String, String)>,
    started_at: DateTime<Utc>,
    ended: bool,
    recorded: Arc<Mutex<Vec<RecordedStep>>>,
}

impl StartupStep for TracingStartupStep {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&mut self, key: &str, value: &str) {
        self.tags.push((key.to_string(), value.to_string()));
    }

    fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        let step = RecordedStep {
            id: self.id,
            name: self.name.clone(),
            tags: self.tags.clone(),
            started_at: self.started_at,
            ended_at: Utc::now(),
        };
        debug!(
            step = %step.name,
            id = step.id,
            duration_ms = step.duration_ms(),
            tags = ?step.tags,
            "启动步骤结束"
        );
        self.recorded.lock().push(step);
    }
}
