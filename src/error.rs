use serde::Serialize;
use thiserror::Error;

use crate::models::TableKind;

/// 引擎失败类型：单次调用内同步检测，整体失败，不产生部分结果
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("{table} file missing column: {column}")]
    MissingColumn { table: TableKind, column: String },
    #[error("{table} file could not be read: {detail}")]
    EmptyOrUnreadableInput { table: TableKind, detail: String },
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// 供传输层使用的失败分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingColumn,
    EmptyOrUnreadableInput,
    UnexpectedFailure,
}

impl ReconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconError::MissingColumn { .. } => ErrorKind::MissingColumn,
            ReconError::EmptyOrUnreadableInput { .. } => ErrorKind::EmptyOrUnreadableInput,
            ReconError::Unexpected(_) => ErrorKind::UnexpectedFailure,
        }
    }

    pub(crate) fn unreadable(table: TableKind, detail: impl ToString) -> Self {
        ReconError::EmptyOrUnreadableInput {
            table,
            detail: detail.to_string(),
        }
    }
}
