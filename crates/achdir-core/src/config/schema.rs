use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete loader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub workbook: WorkbookConfig,
    pub document: DocumentConfig,
    /// Institution type short codes and the long names workbooks use for them.
    #[serde(default)]
    pub institution_types: Vec<InstitutionTypeDef>,
    /// Boolean flag columns that combine into derived participation categories.
    #[serde(default)]
    pub flag_pairs: Vec<FlagPairDef>,
}

impl DirectoryConfig {
    /// Resolve a long institution type name (or a code) to its short code.
    pub fn institution_type_code<'a>(&'a self, value: &'a str) -> &'a str {
        let value_trimmed = value.trim();
        self.institution_types
            .iter()
            .find(|t| t.name == value_trimmed || t.code == value_trimmed)
            .map(|t| t.code.as_str())
            .unwrap_or(value_trimmed)
    }
}

/// How sheet names are matched against the marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetMatch {
    #[default]
    Contains,
    EndsWith,
    All,
}

/// How the metadata row is turned into a subtitle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleMode {
    /// Only the "as of YYYY-MM-DD" fragment; empty when absent.
    #[default]
    AsOfDate,
    /// All metadata cells joined with " • ".
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookConfig {
    pub sheet_marker: String,
    #[serde(default)]
    pub sheet_match: SheetMatch,
    #[serde(default)]
    pub subtitle: SubtitleMode,
    pub columns: ColumnMapping,
    /// Per-sheet overrides of `columns`, keyed by exact sheet name.
    #[serde(default)]
    pub sheet_columns: BTreeMap<String, ColumnMapping>,
}

impl WorkbookConfig {
    pub fn is_eligible(&self, sheet_name: &str) -> bool {
        let name = sheet_name.trim();
        match self.sheet_match {
            SheetMatch::Contains => name.contains(&self.sheet_marker),
            SheetMatch::EndsWith => name.ends_with(&self.sheet_marker),
            SheetMatch::All => true,
        }
    }

    pub fn columns_for(&self, sheet_name: &str) -> &ColumnMapping {
        self.sheet_columns.get(sheet_name).unwrap_or(&self.columns)
    }
}

/// Which source columns feed which row fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub institution: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub institution_type: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Checked in order; the first marker contained in a line wins.
    pub institution_types: Vec<TypeMarkerDef>,
    /// Checked in order; the first token prefixing a line wins.
    pub roles: Vec<RoleTokenDef>,
    #[serde(default)]
    pub streams: Vec<StreamDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMarkerDef {
    pub marker: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleTokenDef {
    pub token: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDef {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionTypeDef {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagPairDef {
    pub label: String,
    pub sender: String,
    pub receiver: String,
}
