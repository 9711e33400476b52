//! 設定ファイル（TOML）の読み込み
//!
//! 貢献者ごとの識別情報、集計期間、除外コミット、提出物確認の設定を扱います。
//! 日時はRFC 3339形式の文字列で指定します。

use super::diary::DiaryCheck;
use super::error::AnalyzerError;
use super::identity::{Identity, TimeWindow};
use super::model::CommitId;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// 設定ファイル全体
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// 集計から除外するコミット（リビジョン文字列）
    #[serde(default)]
    pub fake_commits: Vec<String>,
    /// 貢献者ごとに指定がない場合の、パス照合の大文字小文字の扱い
    #[serde(default = "default_case_sensitive")]
    pub path_case_sensitive: bool,
    #[serde(default)]
    pub diary: DiaryCheck,
    pub windows: Vec<WindowConfig>,
    #[serde(default)]
    pub contributors: Vec<ContributorConfig>,
}

fn default_case_sensitive() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub since: DateTime<FixedOffset>,
    pub until: DateTime<FixedOffset>,
}

/// 貢献者一人分の設定
///
/// # フィールド
///
/// - `name`: 表示名
/// - `emails`: コミッターのメールアドレス
/// - `labels`: 任意のラベル
/// - `commits`: 手動で帰属させるコミット（リビジョン文字列）
/// - `diary`: 提出物のパス
/// - `path_case_sensitive`: パス照合の大文字小文字の扱い（全体設定を上書き）
#[derive(Debug, Clone, Deserialize)]
pub struct ContributorConfig {
    pub name: String,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub commits: Vec<String>,
    pub diary: Option<Vec<String>>,
    pub path_case_sensitive: Option<bool>,
}

impl StatsConfig {
    /// # エラー
    ///
    /// ファイルが読めない場合、TOMLとして不正な場合、
    /// または集計期間が不正な場合にエラーを返します。
    pub fn from_file(path: &Path) -> Result<Self, AnalyzerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, AnalyzerError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AnalyzerError> {
        if self.windows.is_empty() {
            return Err(AnalyzerError::Config("At least one window is required".to_string()));
        }
        for (i, w) in self.windows.iter().enumerate() {
            if w.since >= w.until {
                return Err(AnalyzerError::Config(format!(
                    "Window {} must start before it ends ({} >= {})",
                    i, w.since, w.until
                )));
            }
        }
        Ok(())
    }

    /// 設定順に番号を振った集計期間
    pub fn time_windows(&self) -> Vec<TimeWindow> {
        self.windows
            .iter()
            .enumerate()
            .map(|(index, w)| TimeWindow {
                since: w.since,
                until: w.until,
                index,
            })
            .collect()
    }

    /// 除外コミットを解決します。解決できないものは無視されます
    pub fn fake_commit_ids<F>(&self, resolve: F) -> HashSet<CommitId>
    where
        F: Fn(&str) -> Option<CommitId>,
    {
        self.fake_commits.iter().filter_map(|rev| resolve(rev.as_str())).collect()
    }

    /// 貢献者ごとの識別情報を構築します
    pub fn identities<F>(&self, resolve: F) -> Vec<Identity>
    where
        F: Fn(&str) -> Option<CommitId>,
    {
        self.contributors
            .iter()
            .map(|c| Identity {
                name: c.name.clone(),
                emails: c.emails.iter().cloned().collect(),
                labels: c.labels.clone(),
                explicit_commit_ids: c.commits.iter().filter_map(|rev| resolve(rev.as_str())).collect(),
                deliverable_paths: c.diary.clone(),
                path_case_sensitive: c.path_case_sensitive.unwrap_or(self.path_case_sensitive),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
fake_commits = ["HEAD~2", "missing"]
path_case_sensitive = false

[diary]
marker = "#"
by_commit = false

[[windows]]
since = "2021-03-01T00:00:00+09:00"
until = "2021-03-10T00:00:00+09:00"

[[windows]]
since = "2021-03-10T00:00:00+09:00"
until = "2021-03-20T00:00:00+09:00"

[[contributors]]
name = "Alice"
emails = ["a@x.com", "alice@users.noreply.github.com"]
labels = ["team-a"]
commits = ["abc123", "unknown"]
diary = ["diary/alice.md"]

[[contributors]]
name = "Bob"
emails = ["b@x.com"]
path_case_sensitive = true
"##;

    fn resolve(rev: &str) -> Option<CommitId> {
        match rev {
            "abc123" => Some(CommitId::new("abc1234567")),
            "HEAD~2" => Some(CommitId::new("fff0000000")),
            _ => None,
        }
    }

    #[test]
    fn test_parse_sample() {
        let config = StatsConfig::from_toml(SAMPLE).unwrap();

        let windows = config.time_windows();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].index, 1);
        assert_eq!(windows[0].since.to_rfc3339(), "2021-03-01T00:00:00+09:00");

        assert!(!config.diary.by_commit);
        assert!(config.diary.by_content);
        assert_eq!(config.diary.marker, '#');

        let fakes = config.fake_commit_ids(resolve);
        assert_eq!(fakes.len(), 1);
        assert!(fakes.contains(&CommitId::new("fff0000000")));
    }

    #[test]
    fn test_identities() {
        let config = StatsConfig::from_toml(SAMPLE).unwrap();
        let ids = config.identities(resolve);

        assert_eq!(ids.len(), 2);
        let alice = &ids[0];
        assert_eq!(alice.emails.len(), 2);
        assert_eq!(alice.labels, vec!["team-a"]);
        assert_eq!(alice.explicit_commit_ids.len(), 1);
        assert_eq!(alice.deliverable_paths.as_deref(), Some(&["diary/alice.md".to_string()][..]));
        assert!(!alice.path_case_sensitive);

        let bob = &ids[1];
        assert!(bob.deliverable_paths.is_none());
        assert!(bob.path_case_sensitive);
    }

    #[test]
    fn test_rejects_inverted_window() {
        let toml = r#"
[[windows]]
since = "2021-03-10T00:00:00+09:00"
until = "2021-03-01T00:00:00+09:00"
"#;
        assert!(matches!(
            StatsConfig::from_toml(toml),
            Err(AnalyzerError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_missing_windows() {
        assert!(matches!(
            StatsConfig::from_toml("windows = []"),
            Err(AnalyzerError::Config(_))
        ));
        assert!(matches!(
            StatsConfig::from_toml("[[contributors]]\nname = \"x\""),
            Err(AnalyzerError::Toml(_))
        ));
    }
}
