// 🐉 Boss Odds - win probability for a (suit, animal, fruit) query
//
// Canonical scoring is the multiplicative, naive-Bayes-like score below.
// The per-field average is a separate policy and is never blended with it.

use crate::model::{build_model, CategoryModel};
use crate::records::{Category, FightRecord, DOMAIN_SIZE};
use serde::{Deserialize, Serialize};

/// Returned whenever there is nothing to discriminate on
pub const UNINFORMATIVE_PRIOR: f64 = 0.5;

// ============================================================================
// QUERY
// ============================================================================

/// FightQuery - The suit, animal and fruit picked for the next fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightQuery {
    pub suit: String,
    pub animal: String,
    pub fruit: String,
}

impl FightQuery {
    pub fn new(suit: impl Into<String>, animal: impl Into<String>, fruit: impl Into<String>) -> Self {
        FightQuery {
            suit: suit.into(),
            animal: animal.into(),
            fruit: fruit.into(),
        }
    }

    pub fn value(&self, category: Category) -> &str {
        match category {
            Category::Suit => &self.suit,
            Category::Animal => &self.animal,
            Category::Fruit => &self.fruit,
        }
    }

    pub fn set(&mut self, category: Category, value: impl Into<String>) {
        let value = value.into();
        match category {
            Category::Suit => self.suit = value,
            Category::Animal => self.animal = value,
            Category::Fruit => self.fruit = value,
        }
    }
}

impl Default for FightQuery {
    fn default() -> Self {
        FightQuery::new("Hearts", "Lion", "Mango")
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// Which scoring rule produces the headline probability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPolicy {
    /// Prior times per-category frequencies, normalized across win/lose
    #[default]
    Multiplicative,
    /// Mean of the three per-field win rates
    FieldAverage,
}

impl ScoringPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringPolicy::Multiplicative => "multiplicative",
            ScoringPolicy::FieldAverage => "field-average",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ScoringPolicy::Multiplicative => ScoringPolicy::FieldAverage,
            ScoringPolicy::FieldAverage => ScoringPolicy::Multiplicative,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Probability in [0, 1] that a fight with the given picks is won.
///
/// Each conditional frequency is divided by `wins * DOMAIN_SIZE` (or
/// `losses * DOMAIN_SIZE`), not by `wins` alone. A value never seen on one
/// side zeroes that side's score, which can pin the result to exactly 0.0 or
/// 1.0; that boundary behaviour is kept as-is.
pub fn probability_to_beat_boss(model: &CategoryModel, suit: &str, animal: &str, fruit: &str) -> f64 {
    if model.total == 0 {
        return UNINFORMATIVE_PRIOR;
    }

    let mut score_win = ratio(model.wins, model.total);
    let mut score_lose = ratio(model.losses, model.total);

    for (category, value) in [(Category::Suit, suit), (Category::Animal, animal), (Category::Fruit, fruit)] {
        score_win *= ratio(model.count(category, true, value), model.wins * DOMAIN_SIZE);
        score_lose *= ratio(model.count(category, false, value), model.losses * DOMAIN_SIZE);
    }

    let evidence = score_win + score_lose;
    if evidence == 0.0 {
        return UNINFORMATIVE_PRIOR;
    }

    score_win / evidence
}

/// FieldStats - Win rate of the fights that share one field value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub wins: usize,
    pub total: usize,
    /// 0 when no fight used this value
    pub prob: f64,
}

pub fn field_stats(records: &[FightRecord], category: Category, value: &str) -> FieldStats {
    let (wins, total) = records
        .iter()
        .filter(|r| r.value(category) == value)
        .fold((0, 0), |(wins, total), r| (wins + usize::from(r.won), total + 1));

    FieldStats {
        wins,
        total,
        prob: ratio(wins, total),
    }
}

/// Mean of the suit, animal and fruit win rates
pub fn average_win_rate(records: &[FightRecord], suit: &str, animal: &str, fruit: &str) -> f64 {
    let sum = field_stats(records, Category::Suit, suit).prob
        + field_stats(records, Category::Animal, animal).prob
        + field_stats(records, Category::Fruit, fruit).prob;
    sum / 3.0
}

// ============================================================================
// BOSS ODDS
// ============================================================================

/// BossEstimate - Headline probability plus the per-field breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossEstimate {
    pub query: FightQuery,
    pub policy: ScoringPolicy,
    pub probability: f64,
    pub suit: FieldStats,
    pub animal: FieldStats,
    pub fruit: FieldStats,
}

impl BossEstimate {
    /// Probability formatted as a percentage with one decimal
    pub fn percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }

    pub fn stats(&self, category: Category) -> &FieldStats {
        match category {
            Category::Suit => &self.suit,
            Category::Animal => &self.animal,
            Category::Fruit => &self.fruit,
        }
    }
}

/// BossOdds - A record snapshot together with the model built from it
#[derive(Debug, Clone, Default)]
pub struct BossOdds {
    records: Vec<FightRecord>,
    model: CategoryModel,
}

impl BossOdds {
    pub fn new(records: Vec<FightRecord>) -> Self {
        let model = build_model(&records);
        BossOdds { records, model }
    }

    pub fn records(&self) -> &[FightRecord] {
        &self.records
    }

    pub fn model(&self) -> &CategoryModel {
        &self.model
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// None when there is no data to estimate from
    pub fn estimate(&self, query: &FightQuery, policy: ScoringPolicy) -> Option<BossEstimate> {
        if self.is_empty() {
            return None;
        }

        let probability = match policy {
            ScoringPolicy::Multiplicative => {
                probability_to_beat_boss(&self.model, &query.suit, &query.animal, &query.fruit)
            }
            ScoringPolicy::FieldAverage => {
                average_win_rate(&self.records, &query.suit, &query.animal, &query.fruit)
            }
        };

        Some(BossEstimate {
            query: query.clone(),
            policy,
            probability,
            suit: field_stats(&self.records, Category::Suit, &query.suit),
            animal: field_stats(&self.records, Category::Animal, &query.animal),
            fruit: field_stats(&self.records, Category::Fruit, &query.fruit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_records() -> Vec<FightRecord> {
        vec![
            FightRecord::new("Hearts", "Lion", "Mango", true),
            FightRecord::new("Hearts", "Fox", "Mango", false),
            FightRecord::new("Clubs", "Lion", "Apple", true),
            FightRecord::new("Hearts", "Lion", "Apple", false),
        ]
    }

    #[test]
    fn test_empty_model_is_uninformative() {
        let model = build_model(&[]);
        assert_eq!(probability_to_beat_boss(&model, "Hearts", "Lion", "Mango"), 0.5);
    }

    #[test]
    fn test_single_winning_record_saturates() {
        let model = build_model(&[FightRecord::new("Hearts", "Lion", "Mango", true)]);
        assert_eq!(probability_to_beat_boss(&model, "Hearts", "Lion", "Mango"), 1.0);
    }

    #[test]
    fn test_single_losing_record_saturates_to_zero() {
        let model = build_model(&[FightRecord::new("Hearts", "Lion", "Mango", false)]);
        assert_eq!(probability_to_beat_boss(&model, "Hearts", "Lion", "Mango"), 0.0);
    }

    #[test]
    fn test_unseen_on_both_sides_falls_back() {
        let model = build_model(&mixed_records());
        assert_eq!(probability_to_beat_boss(&model, "Joker", "Lion", "Mango"), 0.5);
    }

    #[test]
    fn test_unseen_on_lose_side_pins_to_one() {
        // Clubs only ever appears in a win
        let model = build_model(&mixed_records());
        assert_eq!(probability_to_beat_boss(&model, "Clubs", "Lion", "Apple"), 1.0);
    }

    #[test]
    fn test_mixed_score_matches_hand_computation() {
        let model = build_model(&mixed_records());

        // wins=2, losses=2
        // win:  0.5 * (1/10) * (2/10) * (1/10) = 0.001
        // lose: 0.5 * (2/10) * (1/10) * (1/10) = 0.001
        let p = probability_to_beat_boss(&model, "Hearts", "Lion", "Mango");
        assert!((p - 0.5).abs() < 1e-12);

        // win:  0.5 * (1/10) * (2/10) * (1/10) = 0.001
        // lose: 0.5 * (2/10) * (1/10) * (1/10) = 0.001 with Apple
        let p = probability_to_beat_boss(&model, "Hearts", "Lion", "Apple");
        assert!((p - 0.5).abs() < 1e-12);

        // win:  0.5 * 0 ...  -> 0, lose: 0.5 * (2/10) * (1/10) * (1/10) > 0
        let p = probability_to_beat_boss(&model, "Hearts", "Fox", "Mango");
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_probability_stays_in_unit_interval() {
        let model = build_model(&mixed_records());
        for suit in crate::records::SUITS {
            for animal in crate::records::ANIMALS {
                for fruit in crate::records::FRUITS {
                    let p = probability_to_beat_boss(&model, suit, animal, fruit);
                    assert!((0.0..=1.0).contains(&p), "{suit}/{animal}/{fruit} -> {p}");
                }
            }
        }
    }

    #[test]
    fn test_field_stats() {
        let records = mixed_records();

        let hearts = field_stats(&records, Category::Suit, "Hearts");
        assert_eq!(hearts.wins, 1);
        assert_eq!(hearts.total, 3);
        assert!((hearts.prob - 1.0 / 3.0).abs() < 1e-12);

        let joker = field_stats(&records, Category::Suit, "Joker");
        assert_eq!(joker, FieldStats { wins: 0, total: 0, prob: 0.0 });
    }

    #[test]
    fn test_average_win_rate_differs_from_multiplicative() {
        let records = mixed_records();
        // suit 1/3, animal 2/3, fruit 1/2
        let avg = average_win_rate(&records, "Hearts", "Lion", "Mango");
        assert!((avg - 0.5).abs() < 1e-12);

        let model = build_model(&records);
        let avg = average_win_rate(&records, "Hearts", "Fox", "Mango");
        let mult = probability_to_beat_boss(&model, "Hearts", "Fox", "Mango");
        assert!(avg > 0.0);
        assert_eq!(mult, 0.0);
    }

    #[test]
    fn test_boss_odds_estimate() {
        let odds = BossOdds::new(mixed_records());
        let query = FightQuery::default();

        let estimate = odds.estimate(&query, ScoringPolicy::Multiplicative).unwrap();
        assert_eq!(estimate.policy, ScoringPolicy::Multiplicative);
        assert_eq!(estimate.stats(Category::Animal).total, 3);
        assert_eq!(estimate.percent(), "50.0%");

        let average = odds.estimate(&query, ScoringPolicy::FieldAverage).unwrap();
        assert_eq!(average.policy, ScoringPolicy::FieldAverage);
    }

    #[test]
    fn test_boss_odds_without_data() {
        let odds = BossOdds::new(Vec::new());
        assert!(odds.is_empty());
        assert!(odds.estimate(&FightQuery::default(), ScoringPolicy::Multiplicative).is_none());
    }

    #[test]
    fn test_query_set_and_policy_toggle() {
        let mut query = FightQuery::default();
        query.set(Category::Fruit, "Papaya");
        assert_eq!(query.value(Category::Fruit), "Papaya");
        assert_eq!(ScoringPolicy::Multiplicative.toggle(), ScoringPolicy::FieldAverage);
    }
}
