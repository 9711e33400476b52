//! 日誌などの定期提出物を確認するモジュール
//!
//! 集計期間ごとに、次の二つの方法のいずれかで提出を確認します：
//!
//! 1. 提出物ファイルがその期間の対象コミットで変更されている
//! 2. 提出物ファイル内の見出し行に、その期間内の日付が書かれている

use super::error::AnalyzerError;
use super::identity::TimeWindow;
use super::metrics::WindowTag;
use super::profile::ContributorProfile;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// 提出物確認の設定
///
/// # フィールド
///
/// - `marker`: 日付を探す行の先頭文字
/// - `by_commit`: コミットによる確認を行うか
/// - `by_content`: ファイル内容の日付による確認を行うか
#[derive(Debug, Clone, Deserialize)]
pub struct DiaryCheck {
    #[serde(default = "default_marker")]
    pub marker: char,
    #[serde(default = "default_true")]
    pub by_commit: bool,
    #[serde(default = "default_true")]
    pub by_content: bool,
}

fn default_marker() -> char {
    '#'
}

fn default_true() -> bool {
    true
}

impl Default for DiaryCheck {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            by_commit: true,
            by_content: true,
        }
    }
}

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

/// 行から日付を寛容に取り出すための抽出器
///
/// 書式の異なる複数のパターンを試し、行内で最も前に現れた有効な日付を採用します。
pub struct DateExtractor {
    ymd: Regex,
    compact: Regex,
    mdy: Regex,
    day_month: Regex,
    month_day: Regex,
    year_month: Regex,
    kanji: Regex,
}

impl DateExtractor {
    /// # エラー
    ///
    /// 日付パターンの正規表現が不正な場合にエラーを返します。
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            ymd: compile(r"\b(?P<y>\d{4})[-/.](?P<m>\d{1,2})[-/.](?P<d>\d{1,2})(?:\D|$)")?,
            compact: compile(r"\b(?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})\b")?,
            mdy: compile(r"\b(?P<m>\d{1,2})[-/.](?P<d>\d{1,2})[-/.](?P<y>\d{4})\b")?,
            day_month: compile(&format!(
                r"(?i)\b(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\s+(?P<mon>{MONTHS})[a-z]*\.?,?\s+(?P<y>\d{{4}})\b"
            ))?,
            month_day: compile(&format!(
                r"(?i)\b(?P<mon>{MONTHS})[a-z]*\.?\s+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?,?\s+(?P<y>\d{{4}})\b"
            ))?,
            year_month: compile(&format!(
                r"(?i)\b(?P<y>\d{{4}})\s+(?P<mon>{MONTHS})[a-z]*\.?\s+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\b"
            ))?,
            kanji: compile(r"(?P<y>\d{4})年\s*(?P<m>\d{1,2})月\s*(?P<d>\d{1,2})日")?,
        })
    }

    /// 行から日付を取り出します。見つからなければ`None`
    pub fn extract(&self, line: &str) -> Option<NaiveDate> {
        let patterns: [(&Regex, DateFields); 7] = [
            (&self.ymd, numeric_date),
            (&self.compact, numeric_date),
            (&self.mdy, month_first_date),
            (&self.kanji, numeric_date),
            (&self.day_month, named_date),
            (&self.month_day, named_date),
            (&self.year_month, named_date),
        ];

        patterns
            .into_iter()
            .flat_map(|(re, to_date)| {
                re.captures_iter(line)
                    .filter_map(move |c| Some((c.get(0)?.start(), to_date(&c)?)))
            })
            .min_by_key(|(start, _)| *start)
            .map(|(_, date)| date)
    }
}

fn compile(pattern: &str) -> Result<Regex, AnalyzerError> {
    Regex::new(pattern).map_err(|e| AnalyzerError::InvalidPattern(e.to_string()))
}

fn field<T: std::str::FromStr>(caps: &Captures, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}

type DateFields = fn(&Captures) -> Option<NaiveDate>;

fn numeric_date(caps: &Captures) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(field(caps, "y")?, field(caps, "m")?, field(caps, "d")?)
}

/// 月が12を超える場合は日と月を入れ替えて解釈します（`25.03.2021`など）
fn month_first_date(caps: &Captures) -> Option<NaiveDate> {
    let (y, m, d) = (field(caps, "y")?, field(caps, "m")?, field(caps, "d")?);
    NaiveDate::from_ymd_opt(y, m, d).or_else(|| NaiveDate::from_ymd_opt(y, d, m))
}

fn named_date(caps: &Captures) -> Option<NaiveDate> {
    let mon = caps.name("mon")?.as_str().to_lowercase();
    let month = MONTHS.split('|').position(|m| mon.starts_with(m))? as u32 + 1;
    NaiveDate::from_ymd_opt(field(caps, "y")?, month, field(caps, "d")?)
}

/// 提出物の確認を行うもの
pub struct DeliverableVerifier {
    check: DiaryCheck,
    extractor: DateExtractor,
}

impl DeliverableVerifier {
    pub fn new(check: DiaryCheck) -> Result<Self, AnalyzerError> {
        Ok(Self {
            check,
            extractor: DateExtractor::new()?,
        })
    }

    /// 期間ごとの提出有無を返します
    ///
    /// # 引数
    ///
    /// - `profile`: 対象の貢献者（履歴と提出物パスを含む）
    /// - `windows`: 集計期間の列
    /// - `read_file`: 提出物パスから内容を読むもの。存在しなければ`None`
    ///
    /// # 戻り値
    ///
    /// `windows`と同じ長さの真偽値の列。提出物パスが未設定の場合はすべて`false`です。
    pub fn verify<F>(&self, profile: &ContributorProfile, windows: &[TimeWindow], read_file: F) -> Vec<bool>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut flags = vec![false; windows.len()];
        let identity = profile.identity();
        let Some(paths) = identity.deliverable_paths.as_deref() else {
            debug!(contributor = %identity.name, "no deliverable paths");
            return flags;
        };

        if self.check.by_commit {
            for path in paths {
                let Some(record) = profile.file(path) else {
                    warn!(contributor = %identity.name, path = %path, "no commits to deliverable");
                    continue;
                };
                for m in record.history() {
                    if let WindowTag::Window(i) = m.window {
                        if let Some(flag) = flags.get_mut(i) {
                            *flag = true;
                        }
                    }
                }
            }
        }

        if self.check.by_content {
            for path in paths {
                let Some(content) = read_file(path.as_str()) else {
                    warn!(contributor = %identity.name, path = %path, "deliverable file not found");
                    continue;
                };
                let dates = self.dates_in(&content);
                if dates.is_empty() {
                    warn!(contributor = %identity.name, path = %path, "no dates found in deliverable");
                    continue;
                }
                for window in windows {
                    let (since, until) = (window.since.date_naive(), window.until.date_naive());
                    if dates.iter().any(|d| *d >= since && *d <= until) {
                        if let Some(flag) = flags.get_mut(window.index) {
                            *flag = true;
                        }
                    }
                }
            }
        }

        flags
    }

    /// 見出し行から取り出せた日付をすべて返します
    pub fn dates_in(&self, content: &str) -> Vec<NaiveDate> {
        content
            .lines()
            .filter(|line| line.starts_with(self.check.marker))
            .filter_map(|line| self.extractor.extract(line))
            .collect()
    }
}

/// 作業ツリー上のファイルを読む`read_file`を作成します
///
/// 不正なUTF-8は置換文字に変換されます。
pub fn worktree_reader(root: &Path) -> impl Fn(&str) -> Option<String> + '_ {
    move |path: &str| {
        std::fs::read(root.join(path))
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}
