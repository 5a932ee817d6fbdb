//! Summary records and extreme selection.

use std::fmt;

/// A key together with the metric that made it an extreme.
#[derive(Debug, Clone, PartialEq)]
pub struct Extreme<K, T> {
    pub card: K,
    pub value: T,
}

/// Per-run result: cards with the smallest and largest totals and counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord<K> {
    pub min_payment: Extreme<K, f64>,
    pub max_payment: Extreme<K, f64>,
    pub min_transactions: Extreme<K, u32>,
    pub max_transactions: Extreme<K, u32>,
}

impl<K> SummaryRecord<K> {
    /// True when both records report the same metric values, whatever keys
    /// they picked. Strategies visit keys in different orders, so ties can
    /// resolve to different cards.
    pub fn same_metrics<J>(&self, other: &SummaryRecord<J>) -> bool {
        self.min_payment.value == other.min_payment.value
            && self.max_payment.value == other.max_payment.value
            && self.min_transactions.value == other.min_transactions.value
            && self.max_transactions.value == other.max_transactions.value
    }
}

impl<K: fmt::Display> fmt::Display for SummaryRecord<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Card with the smallest total payment: {}, Payment amount: {:.2}",
            self.min_payment.card, self.min_payment.value
        )?;
        writeln!(
            f,
            "Card with the largest total payment: {}, Payment amount: {:.2}",
            self.max_payment.card, self.max_payment.value
        )?;
        writeln!(
            f,
            "Card with the fewest transactions: {}, Number of transactions: {}",
            self.min_transactions.card, self.min_transactions.value
        )?;
        write!(
            f,
            "Card with the most transactions: {}, Number of transactions: {}",
            self.max_transactions.card, self.max_transactions.value
        )
    }
}

/// Minimum and maximum of `entries`. Ties keep the first entry seen.
pub(crate) fn select_extremes<'a, K, T, I>(entries: I) -> Option<(Extreme<K, T>, Extreme<K, T>)>
where
    K: Clone + 'a,
    T: PartialOrd + Copy + 'a,
    I: IntoIterator<Item = (&'a K, &'a T)>,
{
    let mut entries = entries.into_iter();
    let (key, value) = entries.next()?;
    let (mut min, mut max) = ((key, *value), (key, *value));
    for (key, value) in entries {
        if *value < min.1 {
            min = (key, *value);
        }
        if *value > max.1 {
            max = (key, *value);
        }
    }
    Some((
        Extreme {
            card: min.0.clone(),
            value: min.1,
        },
        Extreme {
            card: max.0.clone(),
            value: max.1,
        },
    ))
}
