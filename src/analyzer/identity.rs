//! 貢献者の識別情報と集計期間

use super::model::CommitId;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::HashSet;

/// 一人の貢献者を識別するための情報
///
/// 設定から一度だけ構築され、実行中は変更されません。
///
/// # フィールド
///
/// - `name`: 表示名
/// - `emails`: コミッターとして使われるメールアドレス
/// - `labels`: 任意のラベル（班名など）
/// - `explicit_commit_ids`: 手動でこの貢献者に帰属させるコミット
/// - `deliverable_paths`: 日誌などの提出物のパス
/// - `path_case_sensitive`: パスの照合で大文字小文字を区別するか
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub emails: HashSet<String>,
    pub labels: Vec<String>,
    pub explicit_commit_ids: HashSet<CommitId>,
    pub deliverable_paths: Option<Vec<String>>,
    pub path_case_sensitive: bool,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emails: HashSet::new(),
            labels: Vec::new(),
            explicit_commit_ids: HashSet::new(),
            deliverable_paths: None,
            path_case_sensitive: true,
        }
    }

    pub fn with_emails<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emails.extend(emails.into_iter().map(Into::into));
        self
    }

    pub fn with_commits(mut self, ids: impl IntoIterator<Item = CommitId>) -> Self {
        self.explicit_commit_ids.extend(ids);
        self
    }

    pub fn with_deliverables<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deliverable_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.path_case_sensitive = sensitive;
        self
    }

    /// パスの照合に使うキーを返します
    ///
    /// 格納と検索の両方で同じ変換を使うこと。
    pub fn path_key(&self, path: &str) -> String {
        if self.path_case_sensitive {
            path.to_string()
        } else {
            path.to_lowercase()
        }
    }
}

/// 集計期間
///
/// `index`は期間列の中での位置で、計測値と提出物確認の対応付けに使われます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub since: DateTime<FixedOffset>,
    pub until: DateTime<FixedOffset>,
    pub index: usize,
}

impl TimeWindow {
    /// 境界を含まない`(since, until)`に含まれるか
    pub fn contains(&self, t: &DateTime<FixedOffset>) -> bool {
        *t > self.since && *t < self.until
    }
}
