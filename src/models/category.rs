use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Sentinel category for merchants no keyword matches.
pub const OTHER: &str = "other";

/// One entry of the matching table: a category and its lowercase keyword substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub id: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(id: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered keyword table plus the presentation order used by every aggregate view.
///
/// Matching order and display order are independent: the first governs which
/// category wins for an ambiguous merchant, the second only how results are listed.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
    display_order: Vec<String>,
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>, display_order: Vec<String>) -> Result<Self, ConfigError> {
        let rules: Vec<CategoryRule> = rules
            .into_iter()
            .map(|r| CategoryRule {
                id: r.id.trim().to_string(),
                keywords: r.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();

        let Some(last) = display_order.last() else {
            return Err(ConfigError::EmptyDisplayOrder);
        };
        if last != OTHER {
            return Err(ConfigError::DisplayOrderMustEndWithOther(last.clone()));
        }

        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.id == rule.id) {
                return Err(ConfigError::DuplicateCategory(rule.id.clone()));
            }
            if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.is_empty()) {
                return Err(ConfigError::EmptyKeywords(rule.id.clone()));
            }
            if !display_order.contains(&rule.id) {
                return Err(ConfigError::CategoryMissingFromDisplayOrder(rule.id.clone()));
            }
        }

        Ok(Self {
            rules,
            display_order,
        })
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn display_order(&self) -> &[String] {
        &self.display_order
    }

    /// True if `id` is a category this table can ever assign.
    pub fn is_known(&self, id: &str) -> bool {
        id == OTHER || self.rules.iter().any(|r| r.id == id)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            display_order: default_display_order(),
        }
    }
}

pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "groceries",
            &[
                "lidl",
                "billa",
                "malina",
                "kraj",
                "terno",
                "stary otec",
                "ah",
                "albert hein",
                "jumbo",
                "spar",
                "tesco",
                "pekaren",
                "albert heijn",
            ],
        ),
        CategoryRule::new(
            "eating out",
            &[
                "roxor",
                "dunkin donuts",
                "chokiki",
                "poseidon",
                "mcdonald",
                "kfc",
                "restauracia",
                "kaviaren",
                "ramen",
                "bowlicheck",
                "soho",
                "starbucks",
                "subway",
                "koliba",
                "pho",
                "dominos",
                "kavoaren",
                "kantina",
                "bbq",
                "burger",
                "cafe",
                "wolt",
                "noodle",
                "fresh market",
                "costa",
                "fruitisimo",
            ],
        ),
        CategoryRule::new("bolt", &["bolt", "taxi"]),
        CategoryRule::new("car wash", &["mobydick", "pasadur"]),
        CategoryRule::new("gas stations", &["orlen", "slovnaft", "omv", "shell"]),
        CategoryRule::new(
            "nabytok",
            &["ikea", "hornbach", "jysk", "mobelix", "decathlon", "bauhaus"],
        ),
        CategoryRule::new(
            "travel",
            &["flixbus", "ryanair", "airbnb", "booking", "hotels.com"],
        ),
    ]
}

pub fn default_display_order() -> Vec<String> {
    [
        "groceries",
        "eating out",
        "bolt",
        "car wash",
        "gas stations",
        "nabytok",
        "travel",
        OTHER,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
