//! Per-card price records and the per-set report they roll up into.

use rust_decimal::Decimal;

/// One of the four price points scraped from a card page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Raw,
    Psa8,
    Psa9,
    Psa10,
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceField::Raw => write!(f, "raw"),
            PriceField::Psa8 => write!(f, "psa8"),
            PriceField::Psa9 => write!(f, "psa9"),
            PriceField::Psa10 => write!(f, "psa10"),
        }
    }
}

/// Prices scraped from a single card page.
///
/// Each price is `None` when the page had no usable value for that grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPriceRecord {
    /// Canonical card page URL.
    pub identifier: String,
    pub raw_price: Option<Decimal>,
    pub psa8_price: Option<Decimal>,
    pub psa9_price: Option<Decimal>,
    pub psa10_price: Option<Decimal>,
}

impl CardPriceRecord {
    /// Creates a record with no prices set.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            raw_price: None,
            psa8_price: None,
            psa9_price: None,
            psa10_price: None,
        }
    }

    #[must_use]
    pub fn price(&self, field: PriceField) -> Option<Decimal> {
        match field {
            PriceField::Raw => self.raw_price,
            PriceField::Psa8 => self.psa8_price,
            PriceField::Psa9 => self.psa9_price,
            PriceField::Psa10 => self.psa10_price,
        }
    }

    pub fn set_price(&mut self, field: PriceField, value: Decimal) {
        let slot = match field {
            PriceField::Raw => &mut self.raw_price,
            PriceField::Psa8 => &mut self.psa8_price,
            PriceField::Psa9 => &mut self.psa9_price,
            PriceField::Psa10 => &mut self.psa10_price,
        };
        *slot = Some(value);
    }

    /// Fields that are still absent, in raw/8/9/10 order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<PriceField> {
        [
            PriceField::Raw,
            PriceField::Psa8,
            PriceField::Psa9,
            PriceField::Psa10,
        ]
        .into_iter()
        .filter(|f| self.price(*f).is_none())
        .collect()
    }
}

/// A card that passed the all-four-prices gate, with its expected profit.
///
/// `expected_profit` is kept at full precision; rounding happens when the
/// report is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitEstimate {
    pub record: CardPriceRecord,
    pub expected_profit: Decimal,
}

/// Scored cards for one set, in the order they were enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetReport {
    /// Human-readable set name, also used for the output file name.
    pub set_name: String,
    pub rows: Vec<ProfitEstimate>,
}

impl SetReport {
    #[must_use]
    pub fn new(set_name: impl Into<String>, rows: Vec<ProfitEstimate>) -> Self {
        Self {
            set_name: set_name.into(),
            rows,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
