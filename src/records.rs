// 🃏 Fight Records - game_history.csv loader
// Parses historical boss fights into immutable records

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

// ============================================================================
// CATEGORY DOMAINS
// ============================================================================

pub const SUITS: [&str; 5] = ["Diamonds", "Hearts", "Spades", "Clubs", "Joker"];
pub const ANIMALS: [&str; 5] = ["Lion", "Fox", "Parrot", "Seal", "Snake"];
pub const FRUITS: [&str; 5] = ["Apple", "Bananas", "Mango", "Watermelon", "Papaya"];

/// Cardinality of every category domain.
/// The estimator divides by this, so it must stay in sync with the arrays above.
pub const DOMAIN_SIZE: usize = 5;

/// Category - One of the three attributes recorded for every fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Suit,
    Animal,
    Fruit,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Suit, Category::Animal, Category::Fruit];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Category::Suit => "Suit",
            Category::Animal => "Animal",
            Category::Fruit => "Fruit",
        }
    }

    /// Every value this category can take
    pub fn domain(&self) -> &'static [&'static str] {
        match self {
            Category::Suit => &SUITS,
            Category::Animal => &ANIMALS,
            Category::Fruit => &FRUITS,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.domain().contains(&value)
    }
}

// ============================================================================
// FIGHT RECORD
// ============================================================================

/// FightRecord - One row of game_history.csv
/// Immutable after parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightRecord {
    pub suit: String,
    pub animal: String,
    pub fruit: String,
    pub won: bool,
}

impl FightRecord {
    pub fn new(
        suit: impl Into<String>,
        animal: impl Into<String>,
        fruit: impl Into<String>,
        won: bool,
    ) -> Self {
        FightRecord {
            suit: suit.into(),
            animal: animal.into(),
            fruit: fruit.into(),
            won,
        }
    }

    /// Value this record holds for a category
    pub fn value(&self, category: Category) -> &str {
        match category {
            Category::Suit => &self.suit,
            Category::Animal => &self.animal,
            Category::Fruit => &self.fruit,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed row at line {line}: expected 4 fields, found {found}")]
    MalformedRow { line: u64, found: usize },
}

// ============================================================================
// LOADER
// ============================================================================

/// Parse CSV text into fight records.
///
/// The first line is always treated as a header and skipped. Each data row is
/// `suit,animal,fruit,won` with surrounding whitespace trimmed; `won` is true
/// only for a case-insensitive `"true"`. Blank rows are skipped, but `,,,`
/// is a record of empty values. A row with fewer than four fields fails the
/// whole parse.
pub fn parse_csv(text: &str) -> Result<Vec<FightRecord>, RecordError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.trim().as_bytes());

    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result?;

        // Whitespace-only line; a row of bare commas is still data
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }

        if row.len() < 4 {
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            return Err(RecordError::MalformedRow {
                line,
                found: row.len(),
            });
        }

        records.push(FightRecord::new(
            &row[0],
            &row[1],
            &row[2],
            row[3].eq_ignore_ascii_case("true"),
        ));
    }

    debug!(count = records.len(), "parsed fight records");
    Ok(records)
}

/// Load fight records from a CSV file on disk
pub fn load_csv(csv_path: &Path) -> Result<Vec<FightRecord>, RecordError> {
    let text = fs::read_to_string(csv_path).map_err(|source| RecordError::Read {
        path: csv_path.to_path_buf(),
        source,
    })?;

    let records = parse_csv(&text)?;
    info!(path = %csv_path.display(), count = records.len(), "loaded game history");
    Ok(records)
}

/// Load records, degrading to an empty set on any failure.
/// Callers render the empty set as "no data"; there is no retry.
pub fn load_or_empty(csv_path: &Path) -> Vec<FightRecord> {
    match load_csv(csv_path) {
        Ok(records) => records,
        Err(err) => {
            error!(path = %csv_path.display(), error = %err, "error loading CSV, discarding data set");
            Vec::new()
        }
    }
}
