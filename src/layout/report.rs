//! 规范化过程中产生的问题记录
//!
//! 规范化从不因为内容问题失败，而是修正数据并记录一条 issue，
//! 由调用方决定是否提示编辑者。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// Issue 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IssueKind {
    MalformedDocument,
    MigratedV1,
    SectionDropped,
    SectionLimitExceeded,
    ColumnsClamped,
    BlockDropped,
    UnknownBlockType,
    BlockLimitExceeded,
    IdRegenerated,
    ColumnReassigned,
    ColSpanClamped,
    LockCleared,
    HeroInserted,
    DuplicateHeroRemoved,
    HeroRelocated,
    InvalidUrl,
    ValueClamped,
    TextTruncated,
    InvalidChoice,
    InvalidColor,
    ListTruncated,
    ItemDropped,
    FieldRenamed,
}

impl IssueKind {
    /// 稳定的 issue 代码
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::MalformedDocument => "L001",
            IssueKind::MigratedV1 => "L002",
            IssueKind::SectionDropped => "L010",
            IssueKind::SectionLimitExceeded => "L011",
            IssueKind::ColumnsClamped => "L012",
            IssueKind::BlockDropped => "L020",
            IssueKind::UnknownBlockType => "L021",
            IssueKind::BlockLimitExceeded => "L022",
            IssueKind::IdRegenerated => "L023",
            IssueKind::ColumnReassigned => "L024",
            IssueKind::ColSpanClamped => "L025",
            IssueKind::LockCleared => "L026",
            IssueKind::HeroInserted => "L030",
            IssueKind::DuplicateHeroRemoved => "L031",
            IssueKind::HeroRelocated => "L032",
            IssueKind::InvalidUrl => "L040",
            IssueKind::ValueClamped => "L041",
            IssueKind::TextTruncated => "L042",
            IssueKind::InvalidChoice => "L043",
            IssueKind::InvalidColor => "L044",
            IssueKind::ListTruncated => "L045",
            IssueKind::ItemDropped => "L046",
            IssueKind::FieldRenamed => "L047",
        }
    }

    /// Whether the issue means editor content was discarded
    pub fn is_lossy(&self) -> bool {
        matches!(
            self,
            IssueKind::SectionDropped
                | IssueKind::SectionLimitExceeded
                | IssueKind::BlockDropped
                | IssueKind::UnknownBlockType
                | IssueKind::BlockLimitExceeded
                | IssueKind::DuplicateHeroRemoved
                | IssueKind::InvalidUrl
                | IssueKind::TextTruncated
                | IssueKind::ListTruncated
                | IssueKind::ItemDropped
        )
    }
}

/// 单条规范化 issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutIssue {
    /// 文档内路径，如 `sections[0].blocks[2].data.url`
    pub path: String,
    pub kind: IssueKind,
    pub message: String,
}

impl LayoutIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.kind.code(), self.message)
        } else {
            write!(f, "[{}] {}: {}", self.kind.code(), self.path, self.message)
        }
    }
}

/// 收集 issue 的简单容器
#[derive(Debug, Default)]
pub(crate) struct IssueLog {
    issues: Vec<LayoutIssue>,
}

impl IssueLog {
    pub(crate) fn push(&mut self, path: &str, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(LayoutIssue::new(path, kind, message));
    }

    pub(crate) fn into_vec(self) -> Vec<LayoutIssue> {
        self.issues
    }
}

/// Join a parent path and a child key
pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Join a parent path and a list index
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
