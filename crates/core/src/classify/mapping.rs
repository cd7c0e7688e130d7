//! Keyword to category-name mapping table.

use std::path::PathBuf;

use fambud_shared::config::ClassifierConfig;
use serde::Serialize;
use tracing::debug;

use super::error::ClassifyError;

const PACKAGED_MAPPING: &str = include_str!("../../resources/transaction-category-mapping.csv");

/// One `keyword,category` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRule {
    /// Keyword as written in the table.
    pub keyword: String,
    /// Name of the category to assign.
    pub category_name: String,
    #[serde(skip)]
    needle: String,
}

impl MappingRule {
    /// Creates a rule. Matching ignores the case of `keyword`.
    #[must_use]
    pub fn new(keyword: impl Into<String>, category_name: impl Into<String>) -> Self {
        let keyword = keyword.into();
        Self {
            needle: keyword.to_lowercase(),
            keyword,
            category_name: category_name.into(),
        }
    }

    fn matches(&self, lowered_description: &str) -> bool {
        lowered_description.contains(&self.needle)
    }
}

/// Ordered mapping rules. Order is the order of the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    /// Parses a headerless two-column CSV.
    ///
    /// Fields are trimmed. Rows with an empty keyword are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::MalformedMapping` for a row without exactly two
    /// columns or with invalid CSV quoting.
    pub fn parse(text: &str) -> Result<Self, ClassifyError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut rules = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ClassifyError::MalformedMapping {
                line: e.position().map_or(0, csv::Position::line),
                reason: e.to_string(),
            })?;
            let line = record.position().map_or(0, csv::Position::line);
            if record.len() != 2 {
                return Err(ClassifyError::MalformedMapping {
                    line,
                    reason: format!("expected 2 columns, found {}", record.len()),
                });
            }
            if record[0].is_empty() {
                continue;
            }
            rules.push(MappingRule::new(&record[0], &record[1]));
        }

        Ok(Self { rules })
    }

    /// First rule whose keyword occurs in `description`, ignoring case.
    #[must_use]
    pub fn first_match(&self, description: &str) -> Option<&MappingRule> {
        let lowered = description.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    /// Rules in priority order.
    #[must_use]
    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Where the mapping table is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MappingSource {
    /// Table compiled into the binary.
    #[default]
    Packaged,
    /// Table read from disk at the start of each run.
    File(PathBuf),
}

impl MappingSource {
    /// Uses the configured file if any, the packaged table otherwise.
    #[must_use]
    pub fn from_config(config: &ClassifierConfig) -> Self {
        config
            .mapping_file
            .clone()
            .map_or(Self::Packaged, Self::File)
    }

    /// Loads and parses the table.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::MappingUnavailable` if the file cannot be read,
    /// or `ClassifyError::MalformedMapping` if it does not parse.
    pub async fn load(&self) -> Result<MappingTable, ClassifyError> {
        let table = match self {
            Self::Packaged => MappingTable::parse(PACKAGED_MAPPING)?,
            Self::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ClassifyError::MappingUnavailable(format!("{}: {e}", path.display()))
                })?;
                MappingTable::parse(&text)?
            }
        };
        debug!(source = ?self, rules = table.len(), "mapping table loaded");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table() -> MappingTable {
        MappingTable::parse("tesco,Groceries\nshell,Fuel\ntesco petrol,Fuel\n").unwrap()
    }

    #[rstest]
    #[case("TESCO STORE 123", Some("Groceries"))]
    #[case("card payment tesco express", Some("Groceries"))]
    #[case("Shell Garage M4", Some("Fuel"))]
    #[case("unknown vendor", None)]
    fn test_first_match(#[case] description: &str, #[case] expected: Option<&str>) {
        let table = table();
        let found = table.first_match(description).map(|r| r.category_name.as_str());
        assert_eq!(found, expected);
    }

    #[test]
    fn test_first_rule_wins_over_longer_keyword() {
        let table = table();
        let rule = table.first_match("TESCO PETROL STATION").unwrap();
        assert_eq!(rule.keyword, "tesco");
        assert_eq!(rule.category_name, "Groceries");
    }

    #[test]
    fn test_parse_trims_and_skips_blank_keywords() {
        let table =
            MappingTable::parse("  costa , Eating Out \n,Nothing\n\nboots,Health\n").unwrap();
        assert_eq!(
            table.rules(),
            &[
                MappingRule::new("costa", "Eating Out"),
                MappingRule::new("boots", "Health"),
            ]
        );
    }

    #[rstest]
    #[case("tesco\n")]
    #[case("tesco,Groceries,extra\n")]
    fn test_parse_rejects_wrong_column_count(#[case] text: &str) {
        let err = MappingTable::parse(text).unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedMapping { line: 1, .. }));
    }

    #[test]
    fn test_packaged_table_parses() {
        let table = MappingTable::parse(PACKAGED_MAPPING).unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.rules()[0], MappingRule::new("tesco", "Groceries"));
    }

    #[test]
    fn test_source_from_config() {
        let mut config = ClassifierConfig::default();
        assert_eq!(MappingSource::from_config(&config), MappingSource::Packaged);

        config.mapping_file = Some(PathBuf::from("/etc/fambud/mapping.csv"));
        assert_eq!(
            MappingSource::from_config(&config),
            MappingSource::File(PathBuf::from("/etc/fambud/mapping.csv"))
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let source = MappingSource::File(PathBuf::from("/nonexistent/fambud/mapping.csv"));
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, ClassifyError::MappingUnavailable(_)));
    }
}
