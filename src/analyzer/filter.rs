//! 集計対象となるコミットを選別するモジュール

use super::identity::{Identity, TimeWindow};
use super::model::{CommitId, CommitRecord};
use std::collections::HashSet;

/// 貢献者と集計期間に対するコミットの選別条件
///
/// 以下のすべてを満たすコミットのみが対象になります：
/// - 親がちょうど一つ（マージコミットは除外）
/// - 作成日時が期間`(since, until)`の内側
/// - 除外コミットに含まれない
/// - コミッターのメールアドレスが一致する、または手動で帰属させたコミットである
pub struct CommitFilter<'a> {
    identity: &'a Identity,
    window: &'a TimeWindow,
    fake_commit_ids: &'a HashSet<CommitId>,
}

impl<'a> CommitFilter<'a> {
    pub fn new(
        identity: &'a Identity,
        window: &'a TimeWindow,
        fake_commit_ids: &'a HashSet<CommitId>,
    ) -> Self {
        Self {
            identity,
            window,
            fake_commit_ids,
        }
    }

    pub fn is_eligible(&self, commit: &CommitRecord) -> bool {
        if commit.parent_ids.len() != 1 {
            return false;
        }

        let within_window = commit
            .authored_at()
            .is_some_and(|t| self.window.contains(&t));
        if !within_window {
            return false;
        }

        if self.fake_commit_ids.contains(&commit.id) {
            return false;
        }

        self.identity.emails.contains(&commit.committer_email)
            || self.identity.explicit_commit_ids.contains(&commit.id)
    }

    /// 対象となるコミットのみを取り出します
    pub fn select<'c>(&self, commits: &'c [CommitRecord]) -> Vec<&'c CommitRecord> {
        commits.iter().filter(|c| self.is_eligible(c)).collect()
    }
}

/// `CommitFilter::is_eligible`の関数形式
pub fn is_eligible(
    commit: &CommitRecord,
    identity: &Identity,
    window: &TimeWindow,
    fake_commit_ids: &HashSet<CommitId>,
) -> bool {
    CommitFilter::new(identity, window, fake_commit_ids).is_eligible(commit)
}
