use crate::models::{CategoryTable, OTHER};

/// Keyword matcher over an ordered category table.
///
/// The first category (in table order) with any keyword contained in the
/// lowercased merchant text wins; no scoring, no longest match.
pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    category: String,
    keywords: Vec<String>,
}

impl Categorizer {
    pub(crate) fn new(table: &CategoryTable) -> Self {
        let compiled = table
            .rules()
            .iter()
            .map(|r| CompiledRule {
                category: r.id.clone(),
                keywords: r.keywords.clone(),
            })
            .collect();

        Self { rules: compiled }
    }

    pub(crate) fn categorize(&self, merchant: &str) -> &str {
        let merchant_lower = merchant.to_lowercase();

        for rule in &self.rules {
            if rule
                .keywords
                .iter()
                .any(|keyword| merchant_lower.contains(keyword.as_str()))
            {
                return &rule.category;
            }
        }

        OTHER
    }
}

#[cfg(test)]
mod tests;
