//! Gitリポジトリの貢献度統計ツール
//!
//! このクレートは、Gitリポジトリのコミット履歴を貢献者・集計期間ごとに分析し、
//! 差分の大きさではなくコンテンツの種別（文章、コード、参考文献、図表）に応じて
//! 重み付けした統計を計算します。あわせて、日誌などの定期提出物が
//! 各期間に提出されているかを、コミットとファイル内容の両面から確認します。
//!
//! # 主な機能
//!
//! - 貢献者・期間ごとのコミットの選別（マージコミット・除外コミットを除く）
//! - 拡張子に基づくコンテンツ種別の判定
//! - 種別ごとの規則による差分の計測
//! - ファイル別・期間別の集計
//! - 提出物（日誌）の確認
//!
//! # 使用例
//!
//! ```no_run
//! use gitstat::{StatsAnalyzer, StatsConfig};
//! use std::path::Path;
//!
//! let config = StatsConfig::from_file(Path::new("gitstat.toml")).unwrap();
//! let analyzer = StatsAnalyzer::new("path/to/repo", config).unwrap();
//!
//! let reports = analyzer.analyze(None).unwrap();
//! ```

pub mod analyzer;
pub use analyzer::{AnalyzerError, ContributorReport, StatsAnalyzer, StatsConfig};
