//! 計測値の表現と集計を担当するモジュール
//!
//! `Measurement`はフィールドごとの加算について可換モノイドをなします。
//! 結合した結果は常に`WindowTag::Aggregate`となり、
//! `Measurement::zero()`が単位元です。

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// 計測値がどの集計期間に由来するかを示すタグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowTag {
    /// 単一の集計期間（`TimeWindow::index`）
    Window(usize),
    /// 複数の計測値を結合した結果
    Aggregate,
}

/// 一回の変更、またはその集計に対する重み付き計測値
///
/// # フィールド
///
/// - `window`: 由来する集計期間
/// - `lines_inserted`: 追加された有効行数
/// - `lines_deleted`: 削除された有効行数
/// - `words_inserted`: 追加された語数（換算語数を含む）
/// - `words_deleted`: 削除された語数（換算語数を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub window: WindowTag,
    pub lines_inserted: u64,
    pub lines_deleted: u64,
    pub words_inserted: u64,
    pub words_deleted: u64,
}

impl Measurement {
    /// 集計の単位元
    pub fn zero() -> Self {
        Self {
            window: WindowTag::Aggregate,
            lines_inserted: 0,
            lines_deleted: 0,
            words_inserted: 0,
            words_deleted: 0,
        }
    }

    /// 計測値に集計期間のタグを付けます
    pub fn tagged(self, window: usize) -> Self {
        Self {
            window: WindowTag::Window(window),
            ..self
        }
    }

    /// 二つの計測値をフィールドごとに加算します
    pub fn combine(self, other: Self) -> Self {
        Self {
            window: WindowTag::Aggregate,
            lines_inserted: self.lines_inserted + other.lines_inserted,
            lines_deleted: self.lines_deleted + other.lines_deleted,
            words_inserted: self.words_inserted + other.words_inserted,
            words_deleted: self.words_deleted + other.words_deleted,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.lines_inserted == 0
            && self.lines_deleted == 0
            && self.words_inserted == 0
            && self.words_deleted == 0
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Measurement {
    type Output = Measurement;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(rhs)
    }
}

impl AddAssign for Measurement {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.combine(rhs);
    }
}

impl Sum for Measurement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Measurement::zero(), Measurement::combine)
    }
}

impl<'a> Sum<&'a Measurement> for Measurement {
    fn sum<I: Iterator<Item = &'a Measurement>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(window: usize, li: u64, ld: u64, wi: u64, wd: u64) -> Measurement {
        Measurement {
            window: WindowTag::Window(window),
            lines_inserted: li,
            lines_deleted: ld,
            words_inserted: wi,
            words_deleted: wd,
        }
    }

    #[test]
    fn test_combine_is_commutative_and_associative() {
        let samples = [
            m(0, 3, 1, 12, 4),
            m(1, 0, 0, 100, 0),
            m(2, 7, 9, 30, 41),
            Measurement::zero(),
        ];

        for a in samples {
            for b in samples {
                assert_eq!(a.combine(b), b.combine(a));
                for c in samples {
                    assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
                }
            }
        }
    }

    #[test]
    fn test_zero_is_identity() {
        let a = m(0, 3, 1, 12, 4);
        let combined = a.combine(Measurement::zero());

        assert_eq!(combined.window, WindowTag::Aggregate);
        assert_eq!(combined, Measurement { window: WindowTag::Aggregate, ..a });
        assert_eq!(Measurement::zero().combine(Measurement::zero()), Measurement::zero());
    }

    #[test]
    fn test_sum_over_iterator() {
        let total: Measurement = vec![m(0, 1, 2, 3, 4), m(1, 10, 20, 30, 40)].iter().sum();

        assert_eq!(total, Measurement {
            window: WindowTag::Aggregate,
            lines_inserted: 11,
            lines_deleted: 22,
            words_inserted: 33,
            words_deleted: 44,
        });

        let empty: Measurement = Vec::<Measurement>::new().into_iter().sum();
        assert_eq!(empty, Measurement::zero());
    }

    #[test]
    fn test_measurement_serialization() {
        let json = serde_json::to_value(m(2, 1, 0, 5, 0)).unwrap();
        assert_eq!(json["window"]["window"], 2);
        assert_eq!(json["words_inserted"], 5);

        let json = serde_json::to_value(Measurement::zero()).unwrap();
        assert_eq!(json["window"], "aggregate");
    }
}
