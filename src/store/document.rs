//! Document types and their built-in defaults.

use serde_json::{json, Map, Value};
use strum::{Display, EnumIter};

/// A stored document: one untyped JSON object.
///
/// No schema is enforced. Extra or missing fields are kept as-is.
pub type Document = Map<String, Value>;

/// The two documents the service persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    /// Contribution settings (`type` + `value`).
    Contribution,
    /// Year-to-date salary, contribution and employer-match data.
    Ytd,
}

impl DocumentKind {
    /// Backing file name used when none is configured.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Contribution => "data.json",
            Self::Ytd => "ytd_data.json",
        }
    }

    /// Document served when the backing file does not exist.
    pub fn default_document(self) -> Document {
        let fields = match self {
            Self::Contribution => vec![("type", json!("percentage")), ("value", json!(5))],
            Self::Ytd => vec![
                ("salary", json!(100000)),
                ("paychecks_per_year", json!(26)),
                ("ytd_contributions", json!(5200)),
                ("employer_match_rate", json!(0.50)),
                ("employer_match_cap", json!(6)),
            ],
        };

        fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}
