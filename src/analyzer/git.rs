//! Gitリポジトリとの対話を担当するモジュール
//!
//! このモジュールは、libgit2を使用してGitリポジトリからコミット履歴を取得し、
//! 各コミットと第一親との差分を行単位で取り出す機能を提供します。

use super::error::AnalyzerError;
use super::model::{ChangeStatus, CommitId, CommitRecord, DiffLine, DiffSource, Hunk, Patch};
use git2::{Oid, Repository};
use std::path::Path;
use tracing::{debug, warn};

/// Gitリポジトリへのアクセスを管理する構造体
///
/// # フィールド
///
/// - `repo`: libgit2のリポジトリハンドル
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// 指定されたパスのGitリポジトリをオープンします
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します：
    /// - リポジトリのオープンに失敗
    /// - 作業ツリーを持たない（bare）リポジトリ
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let repo = Repository::open(path)?;
        if repo.workdir().is_none() {
            return Err(AnalyzerError::InvalidRepository);
        }
        Ok(Self { repo })
    }

    /// 作業ツリーのルート
    pub fn workdir(&self) -> &Path {
        // openで作業ツリーの存在を確認済み
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// リビジョン文字列をコミットIDに解決します
    ///
    /// 解決できない場合は`None`を返します。
    pub fn resolve_revision(&self, rev: &str) -> Option<CommitId> {
        match self.repo.revparse_single(rev).and_then(|o| o.peel_to_commit()) {
            Ok(commit) => Some(commit.id().into()),
            Err(e) => {
                warn!(revision = %rev, error = %e, "revision not found in repository");
                None
            }
        }
    }

    /// HEAD（またはブランチ）から辿れるコミットを新しい順に取得します
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します：
    /// - ブランチが見つからない
    /// - コミット履歴の走査に失敗
    pub fn commits(&self, branch: Option<&str>) -> Result<Vec<CommitRecord>, AnalyzerError> {
        let mut revwalk = self.repo.revwalk()?;
        match branch {
            Some(name) => {
                let reference = self.repo.resolve_reference_from_short_name(name)?;
                let oid = reference.target().ok_or_else(|| {
                    AnalyzerError::AnalysisError(format!("Branch has no target: {}", name))
                })?;
                revwalk.push(oid)?;
            }
            None => revwalk.push_head()?,
        }
        revwalk.set_sorting(git2::Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let author_time = commit.author().when();
            commits.push(CommitRecord {
                id: commit.id().into(),
                parent_ids: commit.parent_ids().map(CommitId::from).collect(),
                author_timestamp: author_time.seconds(),
                utc_offset_minutes: author_time.offset_minutes(),
                committer_email: commit.committer().email().unwrap_or("").to_string(),
            });
        }

        debug!(count = commits.len(), "collected commits");
        Ok(commits)
    }
}

impl DiffSource for GitRepository {
    fn diff(&self, commit: &CommitRecord) -> Result<Vec<Patch>, AnalyzerError> {
        let oid = Oid::from_str(commit.id.as_str())?;
        let commit = self.repo.find_commit(oid)?;
        let tree = commit.tree()?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut patches = Vec::new();
        for (idx, delta) in diff.deltas().enumerate() {
            let Some(path) = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .and_then(|p| p.to_str())
            else {
                continue;
            };

            let mut hunks = Vec::new();
            if let Some(patch) = git2::Patch::from_diff(&diff, idx)? {
                for h in 0..patch.num_hunks() {
                    let mut lines = Vec::new();
                    for l in 0..patch.num_lines_in_hunk(h)? {
                        let line = patch.line_in_hunk(h, l)?;
                        lines.push(DiffLine::new(
                            line.origin(),
                            String::from_utf8_lossy(line.content()).into_owned(),
                        ));
                    }
                    hunks.push(Hunk { lines });
                }
            }

            patches.push(Patch {
                new_path: path.to_string(),
                status: ChangeStatus::from(delta.status()),
                hunks,
            });
        }

        Ok(patches)
    }
}
