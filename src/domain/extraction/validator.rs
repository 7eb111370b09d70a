//! Schema validation and normalization of parsed model output.
//!
//! Splits failures into two classes. Missing top-level structure means the
//! model ignored the schema entirely and is a hard error. Everything below
//! that is treated as model noise and repaired in place: enum drift becomes
//! the documented default, missing arrays are backfilled from the source
//! text via the rule tables, ids are resequenced, step numbers renumbered.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::extraction::rules;
use crate::domain::summary::{
    FunctionalRequirement, NonFunctionalRequirement, Priority, ProjectOverview, Stakeholder,
    Summary, UserStory,
};
use crate::domain::testcase::{TestCase, TestCaseStatus, TestCaseType, TestStep};

/// Structural schema violations that cannot be repaired.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required key `{0}` is missing")]
    MissingKey(&'static str),
    #[error("expected a JSON {expected}, got {actual}")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("response contained zero test cases")]
    NoTestCases,
}

/// Validates a parsed summary object, repairing soft defects and
/// backfilling absent sections from `source_text` via the rule tables.
///
/// Hard errors: the value is not an object, `projectOverview` is missing
/// or not an object, `functionalRequirements` is missing or not an array.
///
/// Running the output back through this function is a no-op.
pub fn validate_summary(value: Value, source_text: &str) -> Result<Summary, SchemaError> {
    let root = match value {
        Value::Object(map) => map,
        other => {
            return Err(SchemaError::WrongKind {
                expected: "object",
                actual: kind_name(&other),
            })
        }
    };

    let overview = match root.get("projectOverview") {
        None => return Err(SchemaError::MissingKey("projectOverview")),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(SchemaError::WrongKind {
                expected: "object",
                actual: kind_name(other),
            })
        }
    };
    let requirements = match root.get("functionalRequirements") {
        None => return Err(SchemaError::MissingKey("functionalRequirements")),
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            return Err(SchemaError::WrongKind {
                expected: "array",
                actual: kind_name(other),
            })
        }
    };

    Ok(Summary {
        project_overview: normalize_overview(overview, source_text),
        stakeholders: normalize_stakeholders(root.get("stakeholders"), source_text),
        functional_requirements: normalize_requirements(requirements, source_text),
        non_functional_requirements: normalize_nfrs(
            root.get("nonFunctionalRequirements"),
            source_text,
        ),
        user_stories: normalize_user_stories(root.get("userStories"), source_text),
        business_rules: string_list_or(root.get("businessRules"), || {
            rules::business_rules(source_text)
        }),
        constraints: string_list_or(root.get("constraints"), || rules::constraints(source_text)),
        assumptions: string_list_or(root.get("assumptions"), || rules::assumptions(source_text)),
        dependencies: string_list_or(root.get("dependencies"), || {
            rules::dependencies(source_text)
        }),
        other_comments: root
            .get("otherComments")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Validates a parsed test-case array. Unlike summaries there is no
/// fallback source to backfill from, so an empty or all-garbage array is
/// a hard error. Surviving cases get per-field defaults, resequenced
/// `TC-NNN` ids, renumbered steps and a fresh `Not Started` status.
pub fn validate_test_cases(value: Value) -> Result<Vec<TestCase>, SchemaError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(SchemaError::WrongKind {
                expected: "array",
                actual: kind_name(&other),
            })
        }
    };
    if items.is_empty() {
        return Err(SchemaError::NoTestCases);
    }

    let mut cases = Vec::with_capacity(items.len());
    for item in items {
        let obj = match item {
            Value::Object(map) => map,
            _ => continue,
        };
        let index = cases.len() + 1;
        cases.push(normalize_test_case(&obj, index));
    }

    if cases.is_empty() {
        return Err(SchemaError::NoTestCases);
    }
    Ok(cases)
}

fn normalize_overview(overview: &Map<String, Value>, source_text: &str) -> ProjectOverview {
    ProjectOverview {
        title: string_field(overview, "title")
            .unwrap_or_else(|| rules::project_title(source_text)),
        description: string_field(overview, "description")
            .unwrap_or_else(|| rules::project_description(source_text)),
        scope: string_field(overview, "scope")
            .unwrap_or_else(|| rules::project_scope(source_text)),
        objectives: {
            let found = string_array(overview.get("objectives"));
            if found.is_empty() {
                rules::objectives(source_text)
            } else {
                found
            }
        },
    }
}

fn normalize_stakeholders(value: Option<&Value>, source_text: &str) -> Vec<Stakeholder> {
    let mut found = Vec::new();
    if let Some(Value::Array(items)) = value {
        for item in items {
            let Value::Object(obj) = item else { continue };
            let Some(name) = string_field(obj, "name") else { continue };
            found.push(Stakeholder {
                role: string_field(obj, "role").unwrap_or_else(|| format!("{name} Role")),
                name,
                responsibilities: {
                    let list = string_array(obj.get("responsibilities"));
                    if list.is_empty() {
                        vec!["Project stakeholder responsibilities".to_string()]
                    } else {
                        list
                    }
                },
            });
        }
    }
    if found.is_empty() {
        return rules::stakeholders(source_text);
    }
    found
}

fn normalize_requirements(items: &[Value], source_text: &str) -> Vec<FunctionalRequirement> {
    let mut found = Vec::new();
    for item in items {
        let Value::Object(obj) = item else { continue };
        let description = string_field(obj, "description").unwrap_or_else(|| {
            "System shall provide core functionality as specified in the business requirements"
                .to_string()
        });
        found.push(FunctionalRequirement {
            id: format!("REQ-{:03}", found.len() + 1),
            title: string_field(obj, "title")
                .unwrap_or_else(|| rules::requirement_title(&description)),
            priority: Priority::coerce(str_field(obj, "priority")),
            acceptance_criteria: {
                let list = string_array(obj.get("acceptanceCriteria"));
                if list.is_empty() {
                    vec![rules::acceptance_criterion(&description)]
                } else {
                    list
                }
            },
            description,
        });
    }
    if found.is_empty() {
        return rules::functional_requirements(source_text);
    }
    found
}

fn normalize_nfrs(value: Option<&Value>, source_text: &str) -> Vec<NonFunctionalRequirement> {
    let mut found = Vec::new();
    if let Some(Value::Array(items)) = value {
        for item in items {
            let Value::Object(obj) = item else { continue };
            let requirements = string_array(obj.get("requirements"));
            if requirements.is_empty() {
                continue;
            }
            found.push(NonFunctionalRequirement {
                category: string_field(obj, "category").unwrap_or_else(|| "General".to_string()),
                requirements,
            });
        }
    }
    if found.is_empty() {
        return rules::non_functional_requirements(source_text);
    }
    found
}

fn normalize_user_stories(value: Option<&Value>, source_text: &str) -> Vec<UserStory> {
    let mut found = Vec::new();
    if let Some(Value::Array(items)) = value {
        for item in items {
            let Value::Object(obj) = item else { continue };
            let description = string_field(obj, "iWant")
                .unwrap_or_else(|| "to use the system effectively".to_string());
            found.push(UserStory {
                id: format!("US-{:03}", found.len() + 1),
                as_a: string_field(obj, "asA").unwrap_or_else(|| "User".to_string()),
                so_that: string_field(obj, "soThat")
                    .unwrap_or_else(|| "I can complete my tasks effectively".to_string()),
                acceptance_criteria: {
                    let list = string_array(obj.get("acceptanceCriteria"));
                    if list.is_empty() {
                        vec![rules::acceptance_criterion(&description)]
                    } else {
                        list
                    }
                },
                priority: Priority::coerce(str_field(obj, "priority")),
                i_want: description,
            });
        }
    }
    if found.is_empty() {
        return rules::user_stories(source_text);
    }
    found
}

fn normalize_test_case(obj: &Map<String, Value>, index: usize) -> TestCase {
    let mut steps = Vec::new();
    if let Some(Value::Array(raw_steps)) = obj.get("steps") {
        for step in raw_steps {
            let Value::Object(step_obj) = step else { continue };
            steps.push(TestStep {
                step_number: steps.len() as u32 + 1,
                action: string_field(step_obj, "action")
                    .unwrap_or_else(|| "Perform action".to_string()),
                expected_result: string_field(step_obj, "expectedResult")
                    .unwrap_or_else(|| "Expected result".to_string()),
            });
        }
    }
    if steps.is_empty() {
        steps.push(TestStep {
            step_number: 1,
            action: "Perform action".to_string(),
            expected_result: "Expected result".to_string(),
        });
    }

    TestCase {
        id: format!("TC-{index:03}"),
        title: string_field(obj, "title").unwrap_or_else(|| format!("Test Case {index}")),
        description: string_field(obj, "description")
            .unwrap_or_else(|| "Verify system functionality".to_string()),
        priority: Priority::coerce(str_field(obj, "priority")),
        case_type: TestCaseType::coerce(str_field(obj, "type")),
        category: string_field(obj, "category").unwrap_or_else(|| "General".to_string()),
        preconditions: {
            let list = string_array(obj.get("preconditions"));
            if list.is_empty() {
                vec!["System is accessible".to_string()]
            } else {
                list
            }
        },
        steps,
        expected_outcome: string_field(obj, "expectedOutcome")
            .unwrap_or_else(|| "System functions as expected".to_string()),
        test_data: {
            let list = string_array(obj.get("testData"));
            if list.is_empty() {
                vec!["Test data".to_string()]
            } else {
                list
            }
        },
        estimated_time: string_field(obj, "estimatedTime")
            .unwrap_or_else(|| "30 minutes".to_string()),
        status: TestCaseStatus::NotStarted,
        related_requirement: string_field(obj, "relatedRequirement").unwrap_or_default(),
    }
}

fn str_field<'m>(obj: &'m Map<String, Value>, key: &str) -> Option<&'m str> {
    obj.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    str_field(obj, key).map(str::to_string)
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn string_list_or(value: Option<&Value>, fallback: impl FnOnce() -> Vec<String>) -> Vec<String> {
    let found = string_array(value);
    if found.is_empty() {
        fallback()
    } else {
        found
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
