use serde::{Deserialize, Serialize};

use crate::config::schema::DirectoryConfig;
use crate::model::{NormalizedTable, ParticipantRow};

/// Row selection as the dashboards apply it: multi-select on category and
/// institution type, plus a free-text institution search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantFilter {
    /// Allowed categories; empty allows all.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Allowed institution types, by short code or long name; empty allows all.
    #[serde(default)]
    pub institution_types: Vec<String>,
    /// Case-insensitive substring of the institution name.
    #[serde(default)]
    pub search: String,
}

impl ParticipantFilter {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.institution_types.is_empty()
            && self.search.trim().is_empty()
    }

    /// Institution types are compared by the short code `config` resolves
    /// them to, the same key the summary counts by.
    pub fn matches(&self, row: &ParticipantRow, config: &DirectoryConfig) -> bool {
        allowed(&self.categories, row.category.as_deref())
            && self.allows_type(row.institution_type.as_deref(), config)
            && self.matches_search(&row.institution)
    }

    fn allows_type(&self, value: Option<&str>, config: &DirectoryConfig) -> bool {
        if self.institution_types.is_empty() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        let code = config.institution_type_code(value);
        self.institution_types
            .iter()
            .any(|choice| config.institution_type_code(choice).eq_ignore_ascii_case(code))
    }

    fn matches_search(&self, institution: &str) -> bool {
        let needle = self.search.trim();
        needle.is_empty() || institution.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Rows of `table` that pass the filter, in table order.
    pub fn apply<'a>(
        &self,
        table: &'a NormalizedTable,
        config: &DirectoryConfig,
    ) -> Vec<&'a ParticipantRow> {
        table.rows.iter().filter(|r| self.matches(r, config)).collect()
    }
}

fn allowed(choices: &[String], value: Option<&str>) -> bool {
    if choices.is_empty() {
        return true;
    }
    match value {
        Some(v) => choices.iter().any(|c| c.trim().eq_ignore_ascii_case(v.trim())),
        None => false,
    }
}
