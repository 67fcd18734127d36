// 📊 Category Model - win/loss counts per category value
// Rebuilt wholesale from the record set; never mutated incrementally

use crate::records::{Category, FightRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CategoryModel - Aggregate win/loss counts over a set of fight records
///
/// Invariants:
/// - `wins + losses == total`
/// - the values of every `win_*` map sum to `wins`
/// - the values of every `lose_*` map sum to `losses`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryModel {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,

    pub win_suit: BTreeMap<String, usize>,
    pub lose_suit: BTreeMap<String, usize>,
    pub win_animal: BTreeMap<String, usize>,
    pub lose_animal: BTreeMap<String, usize>,
    pub win_fruit: BTreeMap<String, usize>,
    pub lose_fruit: BTreeMap<String, usize>,
}

impl CategoryModel {
    /// Counts for one category on one side of the outcome
    pub fn counts(&self, category: Category, won: bool) -> &BTreeMap<String, usize> {
        match (category, won) {
            (Category::Suit, true) => &self.win_suit,
            (Category::Suit, false) => &self.lose_suit,
            (Category::Animal, true) => &self.win_animal,
            (Category::Animal, false) => &self.lose_animal,
            (Category::Fruit, true) => &self.win_fruit,
            (Category::Fruit, false) => &self.lose_fruit,
        }
    }

    /// Occurrences of `value` among wins (or losses). Unseen values count 0.
    pub fn count(&self, category: Category, won: bool, value: &str) -> usize {
        self.counts(category, won).get(value).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn counts_mut(&mut self, category: Category, won: bool) -> &mut BTreeMap<String, usize> {
        match (category, won) {
            (Category::Suit, true) => &mut self.win_suit,
            (Category::Suit, false) => &mut self.lose_suit,
            (Category::Animal, true) => &mut self.win_animal,
            (Category::Animal, false) => &mut self.lose_animal,
            (Category::Fruit, true) => &mut self.win_fruit,
            (Category::Fruit, false) => &mut self.lose_fruit,
        }
    }
}

/// Aggregate records into a fresh model. Empty input yields an all-zero model.
pub fn build_model(records: &[FightRecord]) -> CategoryModel {
    let mut model = CategoryModel::default();

    for record in records {
        model.total += 1;
        if record.won {
            model.wins += 1;
        } else {
            model.losses += 1;
        }

        for category in Category::ALL {
            *model
                .counts_mut(category, record.won)
                .entry(record.value(category).to_string())
                .or_insert(0) += 1;
        }
    }

    model
}
