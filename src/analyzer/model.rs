//! バージョン管理システムとの境界で受け渡すデータ構造

use super::error::AnalyzerError;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// コミットID（16進文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

/// 履歴から取り出したコミット情報
///
/// # フィールド
///
/// - `id`: コミットID
/// - `parent_ids`: 親コミットのID
/// - `author_timestamp`: 作成日時（UNIX秒）
/// - `utc_offset_minutes`: 記録されたUTCオフセット（分）
/// - `committer_email`: コミッターのメールアドレス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: CommitId,
    pub parent_ids: Vec<CommitId>,
    pub author_timestamp: i64,
    pub utc_offset_minutes: i32,
    pub committer_email: String,
}

impl CommitRecord {
    /// コミット自身のUTCオフセットで解釈した作成日時
    ///
    /// オフセットまたはタイムスタンプが表現できない場合は`None`を返します。
    pub fn authored_at(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)?;
        offset.timestamp_opt(self.author_timestamp, 0).single()
    }

    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }
}

/// ファイル単位の変更種別
///
/// 集計対象は`Added`、`Deleted`、`Modified`のみです。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Unrecognized,
}

impl ChangeStatus {
    pub fn is_scored(self) -> bool {
        matches!(
            self,
            ChangeStatus::Added | ChangeStatus::Deleted | ChangeStatus::Modified
        )
    }
}

impl From<git2::Delta> for ChangeStatus {
    fn from(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Added => ChangeStatus::Added,
            git2::Delta::Deleted => ChangeStatus::Deleted,
            git2::Delta::Modified => ChangeStatus::Modified,
            git2::Delta::Renamed => ChangeStatus::Renamed,
            _ => ChangeStatus::Unrecognized,
        }
    }
}

/// 差分行の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Inserted,
    Deleted,
    Other,
}

impl From<char> for LineOrigin {
    fn from(origin: char) -> Self {
        match origin {
            '+' => LineOrigin::Inserted,
            '-' => LineOrigin::Deleted,
            _ => LineOrigin::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub origin: LineOrigin,
    pub content: String,
}

impl DiffLine {
    pub fn new(origin: impl Into<LineOrigin>, content: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            content: content.into(),
        }
    }
}

/// 連続した変更行のまとまり
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hunk {
    pub lines: Vec<DiffLine>,
}

/// 一つのコミットにおける一ファイル分の変更
///
/// # フィールド
///
/// - `new_path`: 変更後のパス（削除の場合は削除されたパス）
/// - `status`: 変更種別
/// - `hunks`: 変更行のまとまり
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub new_path: String,
    pub status: ChangeStatus,
    pub hunks: Vec<Hunk>,
}

/// コミットと第一親との差分を提供するもの
///
/// `GitRepository`が実装するほか、テストではメモリ上の差分を使います。
pub trait DiffSource {
    fn diff(&self, commit: &CommitRecord) -> Result<Vec<Patch>, AnalyzerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authored_at_uses_recorded_offset() {
        let commit = CommitRecord {
            id: CommitId::new("abc"),
            parent_ids: vec![CommitId::new("def")],
            author_timestamp: 1_614_556_800, // 2021-03-01T00:00:00Z
            utc_offset_minutes: 540,
            committer_email: "a@x.com".to_string(),
        };

        let t = commit.authored_at().unwrap();
        assert_eq!(t.to_rfc3339(), "2021-03-01T09:00:00+09:00");
        assert!(!commit.is_merge());
    }

    #[test]
    fn test_invalid_offset_yields_none() {
        let commit = CommitRecord {
            id: CommitId::new("abc"),
            parent_ids: vec![],
            author_timestamp: 0,
            utc_offset_minutes: 100_000,
            committer_email: String::new(),
        };
        assert!(commit.authored_at().is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ChangeStatus::from(git2::Delta::Added), ChangeStatus::Added);
        assert_eq!(ChangeStatus::from(git2::Delta::Renamed), ChangeStatus::Renamed);
        assert_eq!(ChangeStatus::from(git2::Delta::Typechange), ChangeStatus::Unrecognized);
        assert!(ChangeStatus::Modified.is_scored());
        assert!(!ChangeStatus::Renamed.is_scored());
        assert!(!ChangeStatus::Unrecognized.is_scored());
    }
}
