//! Submission Trigger - 提交按钮状态
//!
//! 同一时刻最多一个解析在进行。开始时禁用，guard 释放时恢复，
//! 成功、失败、提前返回都会经过 Drop。

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::analysis::FormSnapshot;

/// 提交触发器
#[derive(Debug, Default)]
pub struct SubmissionTrigger {
    in_flight: AtomicBool,
}

impl SubmissionTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试开始一次提交；已有进行中的提交时返回 None
    pub fn try_begin(&self) -> Option<SubmissionGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard { trigger: self })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// 按钮是否可用
    pub fn is_enabled(&self, snapshot: &FormSnapshot) -> bool {
        !self.is_in_flight() && snapshot.can_submit()
    }
}

/// 进行中的提交；Drop 时重新启用按钮
#[derive(Debug)]
pub struct SubmissionGuard<'a> {
    trigger: &'a SubmissionTrigger,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.trigger.in_flight.store(false, Ordering::Release);
    }
}
