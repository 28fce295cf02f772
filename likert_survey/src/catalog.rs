use log::debug;
use std::collections::HashSet;

pub use crate::config::*;

/// The ordered list of statements of a questionnaire.
///
/// The order is the column order of the stored rows: changing it after rows
/// have been collected scrambles the historical data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ItemCatalog {
    items: Vec<LikertItem>,
}

impl ItemCatalog {
    pub fn new(items: Vec<LikertItem>) -> Result<ItemCatalog, SurveyErrors> {
        if items.is_empty() {
            return Err(SurveyErrors::InvalidCatalog("no items".to_string()));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for item in items.iter() {
            if item.statement.trim().is_empty() {
                return Err(SurveyErrors::InvalidCatalog(
                    "empty statement".to_string(),
                ));
            }
            // The statements are column names, and headers are compared trimmed.
            if item.statement.trim() != item.statement {
                return Err(SurveyErrors::InvalidCatalog(format!(
                    "statement {:?} has surrounding whitespace",
                    item.statement
                )));
            }
            if !seen.insert(item.statement.as_str()) {
                return Err(SurveyErrors::InvalidCatalog(format!(
                    "duplicate statement {:?}",
                    item.statement
                )));
            }
            if let Some(t) = &item.trait_name {
                if t.trim().is_empty() || t.trim() != t {
                    return Err(SurveyErrors::InvalidCatalog(format!(
                        "empty trait for statement {:?}",
                        item.statement
                    )));
                }
            }
        }
        debug!("ItemCatalog: {} items", items.len());
        Ok(ItemCatalog { items })
    }

    /// The eight items of the national identity questionnaire, without traits.
    pub fn national_identity() -> ItemCatalog {
        let statements = [
            "I love the United States.",
            "Being an American is an important part of my identity.",
            "It is important to me to contribute to the United States.",
            "It is important to me to view myself as an American.",
            "I am strongly committed to the United States.",
            "It is important to me that everyone will see me as an American.",
            "It is important for me to serve my country.",
            "When I talk about Americans I usually use 'we' rather than 'they'.",
        ];
        ItemCatalog {
            items: statements.iter().map(|s| LikertItem::flat(s)).collect(),
        }
    }

    pub fn items(&self) -> &[LikertItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn statements(&self) -> Vec<String> {
        self.items.iter().map(|i| i.statement.clone()).collect()
    }

    /// The distinct traits, in the order of their first appearance.
    pub fn traits(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for t in self.items.iter().filter_map(|i| i.trait_name.as_ref()) {
            if !res.contains(t) {
                res.push(t.clone());
            }
        }
        res
    }

    pub fn position(&self, statement: &str) -> Option<usize> {
        self.items.iter().position(|i| i.statement == statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_in_first_occurrence_order() {
        let catalog = ItemCatalog::new(vec![
            LikertItem::new(Some("Openness"), "I have a vivid imagination."),
            LikertItem::flat("I live in a city."),
            LikertItem::new(Some("Extraversion"), "I am the life of the party."),
            LikertItem::new(Some("Openness"), "I enjoy abstract ideas."),
        ])
        .unwrap();
        assert_eq!(
            catalog.traits(),
            vec!["Openness".to_string(), "Extraversion".to_string()]
        );
        assert_eq!(catalog.position("I enjoy abstract ideas."), Some(3));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn rejects_invalid_catalogs() {
        assert!(ItemCatalog::new(vec![]).is_err());
        assert!(ItemCatalog::new(vec![LikertItem::flat("  ")]).is_err());
        assert!(ItemCatalog::new(vec![
            LikertItem::flat("I am quiet."),
            LikertItem::flat("I am quiet."),
        ])
        .is_err());
        assert!(ItemCatalog::new(vec![LikertItem::new(Some(""), "I am quiet.")]).is_err());
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        assert_eq!(
            ItemCatalog::new(vec![LikertItem::flat("I like maps. ")]),
            Err(SurveyErrors::InvalidCatalog(
                "statement \"I like maps. \" has surrounding whitespace".to_string()
            ))
        );
        assert!(ItemCatalog::new(vec![LikertItem::flat(" I like maps.")]).is_err());
        assert!(ItemCatalog::new(vec![LikertItem::new(Some("Openness "), "I like maps.")]).is_err());
    }

    #[test]
    fn national_identity_is_flat() {
        let catalog = ItemCatalog::national_identity();
        assert_eq!(catalog.len(), 8);
        assert!(catalog.traits().is_empty());
        assert!(ItemCatalog::new(catalog.items().to_vec()).is_ok());
    }
}
