//! 差分をコンテンツ種別ごとの規則で計測値に変換するモジュール
//!
//! - テキスト・コード：空白以外を含む行のみを数え、行数と語数を加算
//! - 参考文献：追加語数のみを採用し、上限で打ち切り
//! - 図表：差分の内容は見ず、追加・削除ごとに固定の換算語数
//! - 対象外：計測値を生成しない

use super::classify::ContentCategory;
use super::metrics::Measurement;
use super::model::{ChangeStatus, Hunk, LineOrigin};

/// 参考文献の追加語数の上限（変更ごと）
pub const BIBLIOGRAPHY_WORDS_MAX: u64 = 50;

/// 一ファイル分の変更を計測します
///
/// 戻り値の集計期間タグは呼び出し側で設定します。
/// `Unscored`の場合は`None`を返すので、呼び出し側はそのまま読み飛ばします。
pub fn score(category: ContentCategory, hunks: &[Hunk], status: ChangeStatus) -> Option<Measurement> {
    match category {
        ContentCategory::Text | ContentCategory::Code => Some(score_lines(hunks)),
        ContentCategory::Bibliography => {
            let counted = score_lines(hunks);
            Some(Measurement {
                words_inserted: counted.words_inserted.min(BIBLIOGRAPHY_WORDS_MAX),
                ..Measurement::zero()
            })
        }
        ContentCategory::VectorFigure
        | ContentCategory::BitmapLosslessFigure
        | ContentCategory::BitmapLossyFigure => {
            let weight = category.figure_weight()?;
            Some(match status {
                ChangeStatus::Deleted => Measurement {
                    words_deleted: weight,
                    ..Measurement::zero()
                },
                _ => Measurement {
                    words_inserted: weight,
                    ..Measurement::zero()
                },
            })
        }
        ContentCategory::Unscored => None,
    }
}

fn score_lines(hunks: &[Hunk]) -> Measurement {
    let mut measurement = Measurement::zero();

    for line in hunks.iter().flat_map(|h| h.lines.iter()) {
        let words = line.content.split_whitespace().count() as u64;
        // 空行や空白のみの変更は数えない
        if words == 0 {
            continue;
        }
        match line.origin {
            LineOrigin::Inserted => {
                measurement.lines_inserted += 1;
                measurement.words_inserted += words;
            }
            LineOrigin::Deleted => {
                measurement.lines_deleted += 1;
                measurement.words_deleted += words;
            }
            LineOrigin::Other => {}
        }
    }

    measurement
}
