//! Folding `(card, amount)` pairs into per-card totals and counts.

use std::{collections::hash_map::Entry, hash::Hash};

use ahash::AHashMap;

use crate::{
    error::{AggregateError, MapError},
    map::Map,
    summary::{select_extremes, SummaryRecord},
};

/// Per-card totals and transaction counts, each kept in its own [`Map`].
#[derive(Debug, Clone)]
pub struct Aggregator<K> {
    totals: Map<K, f64>,
    counts: Map<K, u32>,
}

impl<K: AsRef<[u8]> + Eq + Clone> Default for Aggregator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<[u8]> + Eq + Clone> Aggregator<K> {
    pub fn new() -> Self {
        Self {
            totals: Map::new(),
            counts: Map::new(),
        }
    }

    pub fn add(&mut self, key: K, amount: f64) -> Result<(), MapError> {
        match self.totals.get(&key).copied() {
            Some(existing) => self.totals.put(key.clone(), existing + amount)?,
            None => self.totals.put(key.clone(), amount)?,
        }
        if let Some(count) = self.counts.get_mut(&key) {
            *count += 1;
        } else {
            self.counts.put(key, 1)?;
        }
        Ok(())
    }

    pub fn extend<I>(&mut self, pairs: I) -> Result<(), MapError>
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        for (key, amount) in pairs {
            self.add(key, amount)?;
        }
        Ok(())
    }

    /// Folds a partial aggregation into this one. Entries of `other` are
    /// visited in its slot order.
    pub fn merge(&mut self, other: Aggregator<K>) -> Result<(), MapError> {
        let Aggregator { totals, counts } = other;
        for (key, amount) in totals {
            match self.totals.get(&key).copied() {
                Some(existing) => self.totals.put(key, existing + amount)?,
                None => self.totals.put(key, amount)?,
            }
        }
        for (key, count) in counts {
            if let Some(existing) = self.counts.get_mut(&key) {
                *existing += count;
            } else {
                self.counts.put(key, count)?;
            }
        }
        Ok(())
    }

    pub fn totals(&self) -> &Map<K, f64> {
        &self.totals
    }

    pub fn counts(&self) -> &Map<K, u32> {
        &self.counts
    }

    /// Extremes over both tables, scanning slots in index order.
    pub fn summary(&self) -> Result<SummaryRecord<K>, AggregateError> {
        let (min_payment, max_payment) =
            select_extremes(self.totals.iter()).ok_or(AggregateError::NoData)?;
        let (min_transactions, max_transactions) =
            select_extremes(self.counts.iter()).ok_or(AggregateError::NoData)?;
        Ok(SummaryRecord {
            min_payment,
            max_payment,
            min_transactions,
            max_transactions,
        })
    }
}

/// Aggregates `pairs` with the open-addressing [`Map`].
pub fn aggregate<K, I>(pairs: I) -> Result<SummaryRecord<K>, AggregateError>
where
    K: AsRef<[u8]> + Eq + Clone,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut aggregator = Aggregator::new();
    aggregator.extend(pairs)?;
    aggregator.summary()
}

/// Aggregates `pairs` with `AHashMap`, the baseline the table is timed
/// against. Extremes are picked in first-seen key order.
pub fn aggregate_builtin<K, I>(pairs: I) -> Result<SummaryRecord<K>, AggregateError>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut index: AHashMap<K, usize> = AHashMap::new();
    let mut records: Vec<(K, f64, u32)> = Vec::new();
    for (key, amount) in pairs {
        match index.entry(key) {
            Entry::Occupied(slot) => {
                let record = &mut records[*slot.get()];
                record.1 += amount;
                record.2 += 1;
            }
            Entry::Vacant(slot) => {
                records.push((slot.key().clone(), amount, 1));
                slot.insert(records.len() - 1);
            }
        }
    }

    let (min_payment, max_payment) =
        select_extremes(records.iter().map(|(key, total, _)| (key, total)))
            .ok_or(AggregateError::NoData)?;
    let (min_transactions, max_transactions) =
        select_extremes(records.iter().map(|(key, _, count)| (key, count)))
            .ok_or(AggregateError::NoData)?;
    Ok(SummaryRecord {
        min_payment,
        max_payment,
        min_transactions,
        max_transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::Extreme;

    const SAMPLE: [(&str, f64); 3] = [("A", 10.0), ("B", 5.0), ("A", 20.0)];

    fn expected() -> SummaryRecord<&'static str> {
        SummaryRecord {
            min_payment: Extreme { card: "B", value: 5.0 },
            max_payment: Extreme { card: "A", value: 30.0 },
            min_transactions: Extreme { card: "B", value: 1 },
            max_transactions: Extreme { card: "A", value: 2 },
        }
    }

    #[test]
    fn table_holds_totals_and_counts() {
        let mut aggregator = Aggregator::new();
        aggregator.extend(SAMPLE).unwrap();
        assert_eq!(aggregator.totals().get(&"A"), Some(&30.0));
        assert_eq!(aggregator.totals().get(&"B"), Some(&5.0));
        assert_eq!(aggregator.counts().get(&"A"), Some(&2));
        assert_eq!(aggregator.counts().get(&"B"), Some(&1));
        assert_eq!(aggregator.summary().unwrap(), expected());
    }

    #[test]
    fn both_strategies_agree_on_sample() {
        assert_eq!(aggregate(SAMPLE).unwrap(), expected());
        assert_eq!(aggregate_builtin(SAMPLE).unwrap(), expected());
    }

    #[test]
    fn empty_input_is_no_data() {
        let empty: Vec<(&str, f64)> = Vec::new();
        assert_eq!(aggregate(empty.clone()), Err(AggregateError::NoData));
        assert_eq!(aggregate_builtin(empty), Err(AggregateError::NoData));
    }

    #[test]
    fn input_is_left_untouched() {
        let input = SAMPLE.to_vec();
        aggregate(input.iter().copied()).unwrap();
        assert_eq!(input, SAMPLE.to_vec());
    }

    #[test]
    fn builtin_ties_follow_first_seen() {
        let pairs = [("X", 5.0), ("Y", 5.0), ("Z", 7.0)];
        let summary = aggregate_builtin(pairs).unwrap();
        assert_eq!(summary.min_payment.card, "X");
        assert_eq!(summary.min_transactions.card, "X");
        assert_eq!(summary.max_transactions.card, "X");
    }

    #[test]
    fn table_ties_follow_slot_order() {
        let pairs = [("X", 5.0), ("Y", 5.0), ("Z", 5.0)];
        let mut aggregator = Aggregator::new();
        aggregator.extend(pairs).unwrap();
        let first = *aggregator.totals().iter().next().unwrap().0;
        let summary = aggregator.summary().unwrap();
        assert_eq!(summary.min_payment.card, first);
        assert_eq!(summary.max_payment.card, first);

        let first_counted = *aggregator.counts().iter().next().unwrap().0;
        assert_eq!(summary.min_transactions.card, first_counted);
        assert_eq!(summary.max_transactions.card, first_counted);
    }

    #[test]
    fn strategies_agree_on_many_cards() {
        let cards: Vec<String> = (0..2_000).map(|i| format!("{}", 4_000_000_000_000_000u64 + i * 7)).collect();
        let pairs: Vec<(&str, f64)> = (0..20_000usize)
            .map(|i| (cards[(i * 31) % cards.len()].as_str(), (i % 991) as f64 + 10.0))
            .collect();
        let table = aggregate(pairs.iter().copied()).unwrap();
        let builtin = aggregate_builtin(pairs.iter().copied()).unwrap();
        assert!(table.same_metrics(&builtin));
    }

    #[test]
    fn merge_matches_single_pass() {
        let pairs: Vec<(String, f64)> = (0..300)
            .map(|i| (format!("card-{}", i % 40), i as f64))
            .collect();
        let (left, right) = pairs.split_at(170);

        let mut merged = Aggregator::new();
        merged.extend(left.iter().cloned()).unwrap();
        let mut tail = Aggregator::new();
        tail.extend(right.iter().cloned()).unwrap();
        merged.merge(tail).unwrap();

        let mut single = Aggregator::new();
        single.extend(pairs.iter().cloned()).unwrap();

        assert_eq!(merged.counts().len(), 40);
        for (key, count) in single.counts().iter() {
            assert_eq!(merged.counts().get(key), Some(count));
        }
        for (key, total) in single.totals().iter() {
            assert_eq!(merged.totals().get(key), Some(total));
        }
    }
}
