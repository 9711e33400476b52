//! 貢献度統計の中核となるモジュール
//!
//! 分析プロセスは以下の流れで行われます：
//!
//! 1. 設定から貢献者の識別情報と集計期間を構築
//! 2. リポジトリのコミット履歴を取得
//! 3. 貢献者・期間ごとに対象コミットを選別し、差分をコンテンツ種別に応じて計測
//! 4. 計測値を全体・期間別に集計し、提出物（日誌）の有無を確認
//!
//! # 主要なコンポーネント
//!
//! - `StatsAnalyzer`: 分析プロセス全体を制御する
//! - `ContributorProfile`: 貢献者ごとのファイル別履歴と集計
//! - `DeliverableVerifier`: 期間ごとの提出物の確認
//! - `Measurement`: 加算について可換・結合的な計測値

mod classify;
mod config;
mod diary;
mod error;
mod filter;
mod git;
mod identity;
mod metrics;
mod model;
mod profile;
mod score;

pub use classify::{ClassificationTable, ContentCategory, ContentClassifier};
pub use config::{ContributorConfig, StatsConfig, WindowConfig};
pub use diary::{worktree_reader, DateExtractor, DeliverableVerifier, DiaryCheck};
pub use error::AnalyzerError;
pub use filter::{is_eligible, CommitFilter};
pub use git::GitRepository;
pub use identity::{Identity, TimeWindow};
pub use metrics::{Measurement, WindowTag};
pub use model::{
    ChangeStatus, CommitId, CommitRecord, DiffLine, DiffSource, Hunk, LineOrigin, Patch,
};
pub use profile::{ContributorProfile, FileRecord};
pub use score::{score, BIBLIOGRAPHY_WORDS_MAX};

use serde::Serialize;
use std::path::Path;
use tracing::info;

/// 貢献度統計の分析を実行するメインの構造体
///
/// # フィールド
///
/// - `repo`: Gitリポジトリへのアクセスを管理するインスタンス
/// - `config`: 貢献者・集計期間などの設定
/// - `classifier`: コンテンツ種別の分類器
pub struct StatsAnalyzer {
    repo: GitRepository,
    config: StatsConfig,
    classifier: ContentClassifier,
}

/// 貢献者一人分の分析結果
#[derive(Debug, Serialize)]
pub struct ContributorReport {
    pub name: String,
    pub labels: Vec<String>,
    pub commits: usize,
    pub windows_with_commits: usize,
    pub summary: Measurement,
    pub by_window: Vec<Measurement>,
    pub deliverables: Vec<bool>,
    pub windows: Vec<TimeWindow>,
    pub files: Vec<FileRecord>,
}

impl StatsAnalyzer {
    /// 新しいStatsAnalyzerインスタンスを作成します
    ///
    /// # 引数
    ///
    /// - `path`: 分析対象のGitリポジトリパス
    /// - `config`: 分析設定
    ///
    /// # エラー
    ///
    /// 指定されたパスが作業ツリーを持つGitリポジトリでない場合にエラーを返します。
    pub fn new(path: impl AsRef<Path>, config: StatsConfig) -> Result<Self, AnalyzerError> {
        Ok(Self {
            repo: GitRepository::open(path)?,
            config,
            classifier: ContentClassifier::default(),
        })
    }

    /// 分類表を差し替えます
    pub fn with_classifier(mut self, classifier: ContentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// 全貢献者について分析を実行します
    ///
    /// # 引数
    ///
    /// - `branch`: 走査するブランチ。`None`の場合はHEAD
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します：
    /// - Gitリポジトリの操作に失敗
    /// - 日付パターンの構築に失敗
    pub fn analyze(&self, branch: Option<&str>) -> Result<Vec<ContributorReport>, AnalyzerError> {
        let commits = self.repo.commits(branch)?;
        let windows = self.config.time_windows();
        let resolve = |rev: &str| self.repo.resolve_revision(rev);
        let fake_commit_ids = self.config.fake_commit_ids(resolve);
        let verifier = DeliverableVerifier::new(self.config.diary.clone())?;
        let read_file = worktree_reader(self.repo.workdir());

        let mut reports = Vec::new();
        for identity in self.config.identities(resolve) {
            let mut profile = ContributorProfile::new(identity, self.classifier.clone());
            for window in &windows {
                profile.record_window(&self.repo, &commits, window, &fake_commit_ids)?;
            }

            let deliverables = verifier.verify(&profile, &windows, &read_file);
            info!(
                contributor = %profile.identity().name,
                commits = profile.commit_count(),
                windows = profile.windows_with_commits(),
                "analyzed contributor"
            );
            reports.push(report(&profile, &windows, deliverables));
        }

        Ok(reports)
    }
}

fn report(profile: &ContributorProfile, windows: &[TimeWindow], deliverables: Vec<bool>) -> ContributorReport {
    let identity = profile.identity();
    ContributorReport {
        name: identity.name.clone(),
        labels: identity.labels.clone(),
        commits: profile.commit_count(),
        windows_with_commits: profile.windows_with_commits(),
        summary: profile.summary(),
        by_window: profile.summary_by_window(windows),
        deliverables,
        windows: windows.to_vec(),
        files: profile.files().cloned().collect(),
    }
}
