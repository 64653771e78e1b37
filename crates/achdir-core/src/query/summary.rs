use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::schema::{DirectoryConfig, FlagPairDef};
use crate::model::ParticipantRow;

/// Participant counts for a set of rows.
///
/// Institution types are keyed by short code where the configuration knows
/// one. Rows without a category or institution type only count towards
/// `total` and the axis they do have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_institution_type: BTreeMap<String, usize>,
    /// category -> institution type -> count
    pub matrix: BTreeMap<String, BTreeMap<String, usize>>,
    /// flag-derived category -> institution type -> count
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flag_matrix: BTreeMap<String, BTreeMap<String, usize>>,
}

impl Summary {
    pub fn count(&self, category: &str, institution_type: &str) -> usize {
        self.matrix
            .get(category)
            .and_then(|m| m.get(institution_type))
            .copied()
            .unwrap_or(0)
    }
}

pub fn summarize<'a>(
    rows: impl IntoIterator<Item = &'a ParticipantRow>,
    config: &DirectoryConfig,
) -> Summary {
    let mut summary = Summary::default();

    for row in rows {
        summary.total += 1;

        let inst_type = row
            .institution_type
            .as_deref()
            .map(|t| config.institution_type_code(t).to_string());

        if let Some(t) = &inst_type {
            *summary.by_institution_type.entry(t.clone()).or_default() += 1;
        }

        if let Some(category) = &row.category {
            *summary.by_category.entry(category.clone()).or_default() += 1;
            if let Some(t) = &inst_type {
                *summary
                    .matrix
                    .entry(category.clone())
                    .or_default()
                    .entry(t.clone())
                    .or_default() += 1;
            }
        }

        if let Some(t) = &inst_type {
            for derived in flag_categories(row, &config.flag_pairs) {
                *summary
                    .flag_matrix
                    .entry(derived)
                    .or_default()
                    .entry(t.clone())
                    .or_default() += 1;
            }
        }
    }

    summary
}

/// Derived participation categories from sender/receiver capability flags.
///
/// Each pair is evaluated on its own, so a row can land in one QR and one
/// Non-QR category at the same time. Rows carrying neither flag of a pair
/// get nothing for that pair.
pub fn flag_categories(row: &ParticipantRow, pairs: &[FlagPairDef]) -> Vec<String> {
    pairs
        .iter()
        .filter_map(|pair| {
            let sender = row.flag(&pair.sender);
            let receiver = row.flag(&pair.receiver);
            let suffix = match (sender, receiver) {
                (true, true) => "Sender/Receiver",
                (true, false) => "Sender Only",
                (false, true) => "Receiver Only",
                (false, false) => return None,
            };
            Some(format!("{} {}", pair.label, suffix))
        })
        .collect()
}
