use serde::{Deserialize, Serialize};

/// One document or artifact to gather for a prior authorization submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub category: String,
    pub item: String,
    pub mandatory: bool,
    pub reason: String,
}

impl ChecklistItem {
    pub fn new(category: &str, item: &str, mandatory: bool, reason: &str) -> Self {
        Self {
            category: category.to_string(),
            item: item.to_string(),
            mandatory,
            reason: reason.to_string(),
        }
    }
}

/// Ordered documentation checklist. Order is for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist {
    items: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn new(items: Vec<ChecklistItem>) -> Self {
        Self { items }
    }

    /// The "augmentation unavailable" checklist. Not "nothing required".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChecklistItem> {
        self.items.iter()
    }

    pub fn mandatory_count(&self) -> usize {
        self.items.iter().filter(|i| i.mandatory).count()
    }
}

impl FromIterator<ChecklistItem> for Checklist {
    fn from_iter<I: IntoIterator<Item = ChecklistItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Checklist {
    type Item = ChecklistItem;
    type IntoIter = std::vec::IntoIter<ChecklistItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Checklist {
    type Item = &'a ChecklistItem;
    type IntoIter = std::slice::Iter<'a, ChecklistItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Inputs for checklist generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistRequest {
    pub diagnosis: String,
    pub stage: String,
    pub code: String,
}

impl ChecklistRequest {
    pub fn new(diagnosis: &str, stage: &str, code: &str) -> Self {
        Self {
            diagnosis: diagnosis.to_string(),
            stage: stage.to_string(),
            code: code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_array() {
        let checklist = Checklist::new(vec![ChecklistItem::new(
            "Pathology",
            "Biopsy report",
            true,
            "Confirm diagnosis",
        )]);
        let json = serde_json::to_value(&checklist).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["category"], "Pathology");
        assert_eq!(json[0]["mandatory"], true);
    }

    #[test]
    fn mandatory_count_skips_optional_items() {
        let checklist: Checklist = vec![
            ChecklistItem::new("A", "one", true, "r"),
            ChecklistItem::new("B", "two", false, "r"),
        ]
        .into_iter()
        .collect();
        assert_eq!(checklist.len(), 2);
        assert_eq!(checklist.mandatory_count(), 1);
    }
}
