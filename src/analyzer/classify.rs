//! ファイル拡張子からコンテンツ種別を判定するモジュール
//!
//! 判定は拡張子のみを対象とし、大文字小文字は区別しません。
//! 拡張子テーブルは`ClassificationTable`として明示的に保持され、
//! プロセス全体で共有される可変状態は持ちません。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// スコアリングの基準となるコンテンツ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Text,
    Code,
    Bibliography,
    VectorFigure,
    BitmapLosslessFigure,
    BitmapLossyFigure,
    Unscored,
}

impl ContentCategory {
    /// 図表ファイルの換算語数を返します
    ///
    /// 図表以外の種別では`None`を返します。
    pub fn figure_weight(self) -> Option<u64> {
        match self {
            ContentCategory::VectorFigure => Some(100),
            ContentCategory::BitmapLosslessFigure => Some(50),
            ContentCategory::BitmapLossyFigure => Some(25),
            _ => None,
        }
    }
}

const TEXT_EXTENSIONS: &[&str] = &["md", "txt", "tex", ""];
const CODE_EXTENSIONS: &[&str] = &[
    "m", "py", "h", "c", "hpp", "cpp", "java", "jl", "js", "htm", "html",
];
const BIBLIOGRAPHY_EXTENSIONS: &[&str] = &["bib"];
const VECTOR_FIGURE_EXTENSIONS: &[&str] = &["pdf", "eps", "svg"];
const BITMAP_LOSSLESS_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];
const BITMAP_LOSSY_EXTENSIONS: &[&str] = &["jpg", "jpeg", "bmp"];

/// 拡張子（小文字、ドットなし）からコンテンツ種別への対応表
///
/// 拡張子のないファイルは空文字列のキーで表現されます。
#[derive(Debug, Clone)]
pub struct ClassificationTable {
    entries: HashMap<String, ContentCategory>,
}

impl ClassificationTable {
    /// 空の対応表を作成します
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 拡張子群をひとつの種別に割り当てます
    ///
    /// 既に登録済みの拡張子は後から割り当てた種別で上書きされます。
    pub fn with(mut self, category: ContentCategory, extensions: &[&str]) -> Self {
        for ext in extensions {
            self.entries
                .insert(ext.trim_start_matches('.').to_lowercase(), category);
        }
        self
    }

    fn lookup(&self, ext: &str) -> ContentCategory {
        self.entries
            .get(ext)
            .copied()
            .unwrap_or(ContentCategory::Unscored)
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::empty()
            .with(ContentCategory::Text, TEXT_EXTENSIONS)
            .with(ContentCategory::Code, CODE_EXTENSIONS)
            .with(ContentCategory::Bibliography, BIBLIOGRAPHY_EXTENSIONS)
            .with(ContentCategory::VectorFigure, VECTOR_FIGURE_EXTENSIONS)
            .with(ContentCategory::BitmapLosslessFigure, BITMAP_LOSSLESS_EXTENSIONS)
            .with(ContentCategory::BitmapLossyFigure, BITMAP_LOSSY_EXTENSIONS)
    }
}

/// パスの拡張子からコンテンツ種別を判定する分類器
#[derive(Debug, Clone, Default)]
pub struct ContentClassifier {
    table: ClassificationTable,
}

impl ContentClassifier {
    pub fn new(table: ClassificationTable) -> Self {
        Self { table }
    }

    /// パスを分類します
    ///
    /// どの表にも含まれない拡張子は`Unscored`になります。
    /// `.gitignore`のようにドットで始まるファイル名は拡張子なしとして扱います。
    /// `draft.`のようにドットで終わるファイル名は空の拡張子を持つので`Unscored`です。
    pub fn classify(&self, path: &str) -> ContentCategory {
        match Path::new(path).extension() {
            None => self.table.lookup(""),
            Some(ext) if ext.is_empty() => ContentCategory::Unscored,
            Some(ext) => self.table.lookup(&ext.to_string_lossy().to_lowercase()),
        }
    }
}
