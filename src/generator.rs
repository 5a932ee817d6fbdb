//! Synthetic card numbers and charges.

use ahash::AHashSet;
use rand::{seq::IndexedRandom, Rng};

use crate::charge::Charge;

const CARD_RANGE: std::ops::RangeInclusive<u64> = 4_000_000_000_000_000..=4_999_999_999_999_999;
const MIN_AMOUNT: f64 = 10.0;
const MAX_AMOUNT: f64 = 1000.0;

/// `count` distinct 16-digit card numbers starting with 4, in draw order.
pub fn generate_card_numbers<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    let mut seen = AHashSet::with_capacity(count);
    let mut cards = Vec::with_capacity(count);
    while cards.len() < count {
        let number = rng.random_range(CARD_RANGE);
        if seen.insert(number) {
            cards.push(number.to_string());
        }
    }
    cards
}

/// `count` charges against cards picked uniformly from `cards`, with amounts
/// in `[10, 1000)` rounded to cents. Empty when `cards` is empty.
pub fn generate_charges<R: Rng + ?Sized>(rng: &mut R, count: usize, cards: &[String]) -> Vec<Charge> {
    if cards.is_empty() {
        return Vec::new();
    }
    (0..count)
        .filter_map(|_| {
            let card = cards.choose(rng)?;
            let amount = rng.random_range(MIN_AMOUNT..MAX_AMOUNT);
            Some(Charge::new(card.clone(), (amount * 100.0).round() / 100.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn card_numbers_are_distinct_sixteen_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        let cards = generate_card_numbers(&mut rng, 1_000);
        assert_eq!(cards.len(), 1_000);
        assert_eq!(cards.iter().collect::<AHashSet<_>>().len(), 1_000);
        for card in &cards {
            assert_eq!(card.len(), 16);
            assert!(card.starts_with('4'));
            assert!(card.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn charges_use_known_cards_and_cents() {
        let mut rng = StdRng::seed_from_u64(11);
        let cards = generate_card_numbers(&mut rng, 50);
        let charges = generate_charges(&mut rng, 2_000, &cards);
        assert_eq!(charges.len(), 2_000);
        for charge in &charges {
            assert!(cards.contains(&charge.card));
            assert!((MIN_AMOUNT..=MAX_AMOUNT).contains(&charge.amount));
            let cents = charge.amount * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let cards = generate_card_numbers(&mut rng, 20);
            generate_charges(&mut rng, 100, &cards)
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn no_cards_no_charges() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_charges(&mut rng, 10, &[]).is_empty());
    }
}
