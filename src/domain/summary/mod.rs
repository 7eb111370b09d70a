//! Structured summary of a business-requirements document.
//!
//! A `Summary` is produced once per document batch, either by the LLM
//! pipeline or by the rule-based extractor. The core never mutates a
//! produced summary in place; consumers hold their own edited copies.
//!
//! All types serialize with camelCase field names so the JSON shape the
//! prompt contracts demand and the shape these types produce are identical.

use serde::{Deserialize, Serialize};

mod priority;

pub use priority::Priority;

/// Structured extraction of a business-requirements document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub project_overview: ProjectOverview,
    pub stakeholders: Vec<Stakeholder>,
    pub functional_requirements: Vec<FunctionalRequirement>,
    pub non_functional_requirements: Vec<NonFunctionalRequirement>,
    pub user_stories: Vec<UserStory>,
    pub business_rules: Vec<String>,
    pub constraints: Vec<String>,
    pub assumptions: Vec<String>,
    pub dependencies: Vec<String>,
    /// Uncategorized content that had no structured slot. An empty string
    /// means "none found"; absent means the producer did not scan for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_comments: Option<String>,
}

impl Summary {
    /// Finds a functional requirement by its `REQ-NNN` id.
    pub fn find_requirement(&self, id: &str) -> Option<&FunctionalRequirement> {
        self.functional_requirements.iter().find(|r| r.id == id)
    }

    /// Finds a user story by its `US-NNN` id.
    pub fn find_user_story(&self, id: &str) -> Option<&UserStory> {
        self.user_stories.iter().find(|s| s.id == id)
    }
}

/// Title, description, scope and objectives of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    pub title: String,
    pub description: String,
    pub scope: String,
    /// Ordered, at least one entry after normalization.
    pub objectives: Vec<String>,
}

/// A project stakeholder with their responsibilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    pub name: String,
    pub role: String,
    pub responsibilities: Vec<String>,
}

/// A functional requirement with acceptance criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalRequirement {
    /// Sequential `REQ-NNN` id, unique within the summary.
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// At least one entry after normalization.
    pub acceptance_criteria: Vec<String>,
}

/// A category of non-functional requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonFunctionalRequirement {
    pub category: String,
    pub requirements: Vec<String>,
}

/// A user story in "as a / I want / so that" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    /// Sequential `US-NNN` id, unique within the summary.
    pub id: String,
    pub as_a: String,
    pub i_want: String,
    pub so_that: String,
    pub acceptance_criteria: Vec<String>,
    pub priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> Summary {
        Summary {
            project_overview: ProjectOverview {
                title: "Acme Billing".to_string(),
                description: "Billing overhaul".to_string(),
                scope: "Invoicing".to_string(),
                objectives: vec!["Reduce errors".to_string()],
            },
            stakeholders: vec![],
            functional_requirements: vec![FunctionalRequirement {
                id: "REQ-001".to_string(),
                title: "Invoice creation".to_string(),
                description: "System shall create invoices".to_string(),
                priority: Priority::High,
                acceptance_criteria: vec!["Invoices are created".to_string()],
            }],
            non_functional_requirements: vec![],
            user_stories: vec![],
            business_rules: vec![],
            constraints: vec![],
            assumptions: vec![],
            dependencies: vec![],
            other_comments: None,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample_summary()).unwrap();
        assert!(json.get("projectOverview").is_some());
        assert!(json.get("functionalRequirements").is_some());
        assert!(json.get("nonFunctionalRequirements").is_some());
        assert_eq!(json["functionalRequirements"][0]["acceptanceCriteria"][0], "Invoices are created");
    }

    #[test]
    fn absent_other_comments_is_not_serialized() {
        let json = serde_json::to_value(sample_summary()).unwrap();
        assert!(json.get("otherComments").is_none());

        let mut with_comments = sample_summary();
        with_comments.other_comments = Some(String::new());
        let json = serde_json::to_value(with_comments).unwrap();
        assert_eq!(json["otherComments"], "");
    }

    #[test]
    fn find_requirement_by_id() {
        let summary = sample_summary();
        assert!(summary.find_requirement("REQ-001").is_some());
        assert!(summary.find_requirement("REQ-999").is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let summary = sample_summary();
        let json = serde_json::to_string(&summary).unwrap();
        let back: Summary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
