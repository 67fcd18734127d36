// Demo Trio - Core Library
// Exposes all modules for use in CLI, TUI, API server, and tests

pub mod records;      // CSV loader + category domains
pub mod model;        // Win/loss counts per category value
pub mod estimator;    // Boss win probability
pub mod email;        // Email format heuristic + form state
pub mod linked_list;  // Singly linked list + editor state
pub mod brackets;     // Bracket balance check
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use records::{
    Category, FightRecord, RecordError,
    load_csv, load_or_empty, parse_csv,
    ANIMALS, DOMAIN_SIZE, FRUITS, SUITS,
};
pub use model::{build_model, CategoryModel};
pub use estimator::{
    BossEstimate, BossOdds, FieldStats, FightQuery, ScoringPolicy,
    average_win_rate, field_stats, probability_to_beat_boss,
    UNINFORMATIVE_PRIOR,
};
pub use email::{validate_email, EmailError, EmailForm};
pub use linked_list::{parse_leading_int, LinkedList, ListEditor, ListField};
pub use brackets::are_brackets_balanced;
pub use config::{ConfigError, DemoConfig, LoggingConfig, ServerConfig};
pub use logging::{init_logging, LogFallback};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
