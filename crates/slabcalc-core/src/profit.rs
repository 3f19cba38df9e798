//! Expected-profit model for buying raw cards, grading them, and selling the
//! slabs at PSA 8/9/10 market prices.
//!
//! The model assumes a fixed grade distribution over a batch of submissions
//! (by default 3×PSA 10, 3×PSA 9, 4×PSA 8 out of 10). Revenue is the weighted
//! sum of graded prices; cost is the raw purchase price plus the grading fee
//! for every card in the batch; the sales channel takes a fraction of revenue.

use rust_decimal::Decimal;

use crate::card::{CardPriceRecord, ProfitEstimate};

/// Assumed grading outcomes across one batch of submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeYield {
    pub psa10_count: u32,
    pub psa9_count: u32,
    pub psa8_count: u32,
}

impl GradeYield {
    /// Number of cards submitted per batch.
    #[must_use]
    pub fn batch_size(&self) -> u32 {
        self.psa10_count + self.psa9_count + self.psa8_count
    }
}

impl Default for GradeYield {
    fn default() -> Self {
        Self {
            psa10_count: 3,
            psa9_count: 3,
            psa8_count: 4,
        }
    }
}

/// Fee structure and grade distribution used by [`estimate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitabilityModel {
    /// Flat grading fee charged per submitted card.
    pub grading_cost_per_card: Decimal,
    /// Fraction of gross revenue taken by the sales channel (`0.15` = 15%).
    pub selling_fee_rate: Decimal,
    pub grade_yield: GradeYield,
}

impl Default for ProfitabilityModel {
    fn default() -> Self {
        Self {
            grading_cost_per_card: Decimal::from(25),
            selling_fee_rate: Decimal::new(15, 2),
            grade_yield: GradeYield::default(),
        }
    }
}

/// Computes the expected profit of grading one batch of `record`'s card.
///
/// Returns `None` unless all four prices are present. No partial estimate is
/// ever produced. The result is unrounded.
#[must_use]
pub fn estimate(record: &CardPriceRecord, model: &ProfitabilityModel) -> Option<Decimal> {
    let raw = record.raw_price?;
    let psa8 = record.psa8_price?;
    let psa9 = record.psa9_price?;
    let psa10 = record.psa10_price?;

    let grades = &model.grade_yield;
    let batch = Decimal::from(grades.batch_size());

    let total_revenue = Decimal::from(grades.psa10_count) * psa10
        + Decimal::from(grades.psa9_count) * psa9
        + Decimal::from(grades.psa8_count) * psa8;
    let total_cost = batch * raw + batch * model.grading_cost_per_card;
    let selling_fee = total_revenue * model.selling_fee_rate;

    Some(total_revenue - total_cost - selling_fee)
}

/// Scores `record`, pairing it with its expected profit when computable.
#[must_use]
pub fn estimate_record(
    record: &CardPriceRecord,
    model: &ProfitabilityModel,
) -> Option<ProfitEstimate> {
    estimate(record, model).map(|expected_profit| ProfitEstimate {
        record: record.clone(),
        expected_profit,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn full_record() -> CardPriceRecord {
        CardPriceRecord {
            identifier: "https://www.pricecharting.com/game/pokemon-temporal-forces/card".into(),
            raw_price: Some(dec!(10)),
            psa8_price: Some(dec!(20)),
            psa9_price: Some(dec!(40)),
            psa10_price: Some(dec!(100)),
        }
    }

    #[test]
    fn default_model_matches_documented_constants() {
        let model = ProfitabilityModel::default();
        assert_eq!(model.grading_cost_per_card, dec!(25));
        assert_eq!(model.selling_fee_rate, dec!(0.15));
        assert_eq!(model.grade_yield.batch_size(), 10);
    }

    #[test]
    fn worked_example_yields_seventy_five() {
        // revenue 500, cost 350, selling fee 75
        let profit = estimate(&full_record(), &ProfitabilityModel::default());
        assert_eq!(profit, Some(dec!(75.00)));
    }

    #[test]
    fn estimate_is_deterministic() {
        let model = ProfitabilityModel::default();
        let record = full_record();
        assert_eq!(estimate(&record, &model), estimate(&record, &model));
    }

    #[test]
    fn any_missing_price_yields_none() {
        let model = ProfitabilityModel::default();
        let strip: [fn(&mut CardPriceRecord); 4] = [
            |r| r.raw_price = None,
            |r| r.psa8_price = None,
            |r| r.psa9_price = None,
            |r| r.psa10_price = None,
        ];
        for clear in strip {
            let mut record = full_record();
            clear(&mut record);
            assert!(
                estimate(&record, &model).is_none(),
                "expected None for {record:?}"
            );
        }
    }

    #[test]
    fn losing_card_yields_negative_profit() {
        let record = CardPriceRecord {
            raw_price: Some(dec!(50)),
            psa8_price: Some(dec!(30)),
            psa9_price: Some(dec!(45)),
            psa10_price: Some(dec!(80)),
            ..full_record()
        };
        // revenue 495, cost 750, fee 74.25
        assert_eq!(
            estimate(&record, &ProfitabilityModel::default()),
            Some(dec!(-329.25))
        );
    }

    #[test]
    fn custom_yield_changes_batch_size_and_weights() {
        let model = ProfitabilityModel {
            grading_cost_per_card: dec!(20),
            selling_fee_rate: dec!(0.10),
            grade_yield: GradeYield {
                psa10_count: 1,
                psa9_count: 2,
                psa8_count: 2,
            },
        };
        // revenue 100 + 80 + 40 = 220; cost 5*10 + 5*20 = 150; fee 22
        assert_eq!(estimate(&full_record(), &model), Some(dec!(48)));
    }

    #[test]
    fn estimate_record_keeps_unrounded_profit() {
        let record = CardPriceRecord {
            psa8_price: Some(dec!(20.333)),
            ..full_record()
        };
        let scored = estimate_record(&record, &ProfitabilityModel::default())
            .expect("all prices present");
        // extra revenue 4 * 0.333 = 1.332, minus 15% fee = 1.1322
        assert_eq!(scored.expected_profit, dec!(76.1322));
        assert_eq!(scored.record, record);
    }
}
