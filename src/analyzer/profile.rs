//! 貢献者ごとの統計を保持するモジュール
//!
//! `ContributorProfile`はコミットの選別、差分の計測、計測値の蓄積をまとめ、
//! ファイルごとの履歴と全体・期間別の集計を提供します。

use super::classify::{ContentCategory, ContentClassifier};
use super::error::AnalyzerError;
use super::filter::CommitFilter;
use super::identity::{Identity, TimeWindow};
use super::metrics::{Measurement, WindowTag};
use super::model::{CommitId, CommitRecord, DiffSource};
use super::score;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// ファイルごとの計測履歴
///
/// 種別は作成時に一度だけ決まり、履歴は追記のみです。
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub path: String,
    pub category: ContentCategory,
    history: Vec<Measurement>,
}

impl FileRecord {
    fn new(path: String, category: ContentCategory) -> Self {
        Self {
            path,
            category,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Measurement] {
        &self.history
    }

    /// 指定した期間の計測値を持つか
    pub fn touched_in(&self, window: usize) -> bool {
        self.history
            .iter()
            .any(|m| m.window == WindowTag::Window(window))
    }

    pub fn summary(&self) -> Measurement {
        self.history.iter().sum()
    }
}

/// 一人の貢献者についての統計
pub struct ContributorProfile {
    identity: Identity,
    classifier: ContentClassifier,
    files: IndexMap<String, FileRecord>,
    commit_count: usize,
    windows_with_commits: usize,
}

impl ContributorProfile {
    pub fn new(identity: Identity, classifier: ContentClassifier) -> Self {
        Self {
            identity,
            classifier,
            files: IndexMap::new(),
            commit_count: 0,
            windows_with_commits: 0,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// 一つの集計期間についてコミットを処理し、履歴に追記します
    ///
    /// # 戻り値
    ///
    /// 対象となったコミット数。0の場合は状態を一切変更しません。
    ///
    /// # エラー
    ///
    /// 差分の取得に失敗した場合にエラーを返します。
    pub fn record_window<D: DiffSource>(
        &mut self,
        source: &D,
        commits: &[CommitRecord],
        window: &TimeWindow,
        fake_commit_ids: &HashSet<CommitId>,
    ) -> Result<usize, AnalyzerError> {
        let eligible = CommitFilter::new(&self.identity, window, fake_commit_ids).select(commits);
        if eligible.is_empty() {
            debug!(
                contributor = %self.identity.name,
                window = window.index,
                "no eligible commits"
            );
            return Ok(0);
        }

        // 途中で失敗しても部分的な履歴を残さないよう、先にすべての差分を取得する
        let mut pending = Vec::new();
        for commit in &eligible {
            for patch in source.diff(commit)? {
                if patch.status.is_scored() {
                    pending.push(patch);
                }
            }
        }

        for patch in pending {
            let key = self.identity.path_key(&patch.new_path);
            let classifier = &self.classifier;
            let record = self.files.entry(key).or_insert_with(|| {
                FileRecord::new(patch.new_path.clone(), classifier.classify(&patch.new_path))
            });
            if let Some(measurement) = score::score(record.category, &patch.hunks, patch.status) {
                record.history.push(measurement.tagged(window.index));
            }
        }

        self.commit_count += eligible.len();
        self.windows_with_commits += 1;
        debug!(
            contributor = %self.identity.name,
            window = window.index,
            commits = eligible.len(),
            "recorded window"
        );
        Ok(eligible.len())
    }

    /// 全ファイル・全期間の計測値を合計します
    pub fn summary(&self) -> Measurement {
        self.files
            .values()
            .flat_map(|f| f.history.iter())
            .sum()
    }

    /// 期間ごとに計測値を合計します
    ///
    /// 計測値のない期間は`Measurement::zero()`になります。
    pub fn summary_by_window(&self, windows: &[TimeWindow]) -> Vec<Measurement> {
        let mut sums = vec![Measurement::zero(); windows.len()];
        for m in self.files.values().flat_map(|f| f.history.iter()) {
            if let WindowTag::Window(i) = m.window {
                if let Some(slot) = sums.get_mut(i) {
                    *slot += *m;
                }
            }
        }
        sums
    }

    /// パス（大文字小文字の扱いは識別情報に従う）でファイル記録を探します
    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(&self.identity.path_key(path))
    }

    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    pub fn windows_with_commits(&self) -> usize {
        self.windows_with_commits
    }
}
