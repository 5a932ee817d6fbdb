//! The `Charge` record.

/// One card charge: the unit fed to every aggregation strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Charge {
    pub card: String,
    pub amount: f64,
}

impl Charge {
    #[inline]
    pub fn new(card: impl Into<String>, amount: f64) -> Self {
        Self {
            card: card.into(),
            amount,
        }
    }

    /// Borrowed `(key, amount)` pair, the shape the aggregators consume.
    #[inline]
    pub fn as_pair(&self) -> (&str, f64) {
        (self.card.as_str(), self.amount)
    }
}

/// Borrowed pairs for a slice of charges, in input order.
pub fn pairs(charges: &[Charge]) -> impl Iterator<Item = (&str, f64)> + '_ {
    charges.iter().map(Charge::as_pair)
}
