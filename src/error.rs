//! 错误类型定义

use thiserror::Error;

/// 非法走法
///
/// 引擎唯一的错误类型：轮次不对、目标不在合法走法集合内、
/// 起点无子等都以该类型同步返回，不会 panic。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid move: {}", .reason.as_deref().unwrap_or("rejected by the rules"))]
pub struct InvalidMove {
    /// 可选的拒绝原因（面向用户的提示文本）
    pub reason: Option<String>,
}

impl InvalidMove {
    /// 带原因创建
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    /// 不带原因创建
    pub fn rejected() -> Self {
        Self { reason: None }
    }
}
