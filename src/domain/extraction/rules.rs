//! Rule-based fallback extractor.
//!
//! When the LLM reply cannot be turned into a valid summary, this module
//! produces one directly from the document text. It is total: every input,
//! including the empty string, yields a complete `Summary` with every
//! section populated, falling back to documented generic defaults when a
//! pattern finds nothing. Given the same text it always produces the same
//! summary.
//!
//! Each field has an ordered table of patterns. The first pattern whose
//! capture clears the field's minimum length wins. Bullet lists inside a
//! matched section are pulled out with a leading `-`/`*`/`•` scan.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::summary::{
    FunctionalRequirement, NonFunctionalRequirement, Priority, ProjectOverview, Stakeholder,
    Summary, UserStory,
};

/// Marker emitted by text extraction when a file's bytes are not text.
/// Documents containing this marker skip the LLM entirely.
pub const BINARY_CONTENT_SENTINEL: &str = "[BINARY FILE DETECTED]";

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern}: {e}"))
}

/// Builds a complete summary from raw document text. Never fails.
pub fn extract_summary(text: &str) -> Summary {
    Summary {
        project_overview: ProjectOverview {
            title: project_title(text),
            description: project_description(text),
            scope: project_scope(text),
            objectives: objectives(text),
        },
        stakeholders: stakeholders(text),
        functional_requirements: functional_requirements(text),
        non_functional_requirements: non_functional_requirements(text),
        user_stories: user_stories(text),
        business_rules: business_rules(text),
        constraints: constraints(text),
        assumptions: assumptions(text),
        dependencies: dependencies(text),
        other_comments: Some(other_comments(text)),
    }
}

/// Template summary for documents flagged as binary. Pulls the file name
/// from a `File: <name>` line when present.
pub fn binary_file_summary(file_info: &str) -> Summary {
    static FILE_NAME: Lazy<Regex> = Lazy::new(|| re(r"File: (.+)"));

    let file_name = FILE_NAME
        .captures(file_info)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or("Unknown Document");

    Summary {
        project_overview: ProjectOverview {
            title: format!("Document Analysis: {file_name}"),
            description: "This document appears to be a binary file (PDF or Office document). \
                          For complete analysis, please convert to plain text format or \
                          copy-paste the content directly."
                .to_string(),
            scope: "Document processing with limited text extraction capabilities".to_string(),
            objectives: vec![
                "Provide document processing for binary files".to_string(),
                "Offer guidance for better document format".to_string(),
                "Enable basic analysis workflow".to_string(),
                "Support multiple document types".to_string(),
            ],
        },
        stakeholders: vec![
            Stakeholder {
                name: "Document Author".to_string(),
                role: "Content Creator".to_string(),
                responsibilities: string_vec(&["Document creation", "Content accuracy", "Format selection"]),
            },
            Stakeholder {
                name: "System User".to_string(),
                role: "Analyst".to_string(),
                responsibilities: string_vec(&["Document upload", "Content review", "Analysis validation"]),
            },
            Stakeholder {
                name: "System Administrator".to_string(),
                role: "Technical Support".to_string(),
                responsibilities: string_vec(&["File processing support", "Format guidance", "System maintenance"]),
            },
        ],
        functional_requirements: vec![
            FunctionalRequirement {
                id: "REQ-001".to_string(),
                title: "Document Upload Processing".to_string(),
                description: "System shall accept and process various document formats including binary files".to_string(),
                priority: Priority::High,
                acceptance_criteria: string_vec(&[
                    "Files can be uploaded successfully",
                    "Binary files are detected",
                    "Users receive appropriate feedback",
                ]),
            },
            FunctionalRequirement {
                id: "REQ-002".to_string(),
                title: "Format Guidance".to_string(),
                description: "System shall provide guidance for optimal document formats".to_string(),
                priority: Priority::Medium,
                acceptance_criteria: string_vec(&[
                    "Users receive format recommendations",
                    "Alternative options are provided",
                    "Clear instructions are given",
                ]),
            },
        ],
        non_functional_requirements: vec![
            NonFunctionalRequirement {
                category: "Usability".to_string(),
                requirements: string_vec(&[
                    "Clear error messages for binary files",
                    "Helpful guidance for users",
                    "Graceful handling of unsupported formats",
                ]),
            },
            NonFunctionalRequirement {
                category: "Compatibility".to_string(),
                requirements: string_vec(&[
                    "Support for multiple file types",
                    "Binary file detection",
                    "Fallback processing capabilities",
                ]),
            },
        ],
        user_stories: vec![UserStory {
            id: "US-001".to_string(),
            as_a: "User".to_string(),
            i_want: "to upload various document formats".to_string(),
            so_that: "I can analyze my business requirements regardless of format".to_string(),
            acceptance_criteria: string_vec(&[
                "File upload works for multiple formats",
                "Clear feedback is provided",
                "Alternative options are suggested",
            ]),
            priority: Priority::High,
        }],
        business_rules: string_vec(&[
            "Binary files are detected and handled gracefully",
            "Users are provided with format optimization guidance",
            "System attempts analysis even with limited text extraction",
        ]),
        constraints: string_vec(&[
            "Limited text extraction from binary formats",
            "PDF processing requires specialized libraries",
            "Office documents need format conversion for optimal results",
        ]),
        assumptions: string_vec(&[
            "Users can convert documents to text format if needed",
            "Document content is meaningful for business analysis",
            "Alternative formats are available to users",
        ]),
        dependencies: string_vec(&[
            "File upload system",
            "Binary file detection algorithms",
            "User guidance interface",
        ]),
        other_comments: None,
    }
}

pub fn project_title(text: &str) -> String {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        vec![
            re(r"(?i)project\s*name[:\s]*([^\n\r]+)"),
            re(r"(?i)project[:\s]*([A-Z][^\n\r]{10,80})"),
            re(r"(?m)##\s*([A-Z][^\n\r]{5,60})"),
            re(r"(?i)title[:\s]*([^\n\r]+)"),
            re(r"(?m)^#\s*([^\n\r]+)"),
            re(r"(?i)business\s*requirements?\s*document[:\s]*([^\n\r]+)"),
            re(r"(?i)system[:\s]*([A-Z][^\n\r]{5,50})"),
        ]
    });

    for pattern in PATTERNS.iter() {
        if let Some(raw) = first_capture(pattern, text) {
            let title: String = raw.trim().chars().filter(|c| *c != '*' && *c != '#').collect();
            if title.chars().count() > 5 {
                return title;
            }
        }
    }

    if let Some(first_line) = text.lines().next() {
        let len = first_line.chars().count();
        if len > 10 && len < 100 {
            return first_line.trim().chars().filter(|c| *c != '*' && *c != '#').collect();
        }
    }

    "Business Requirements Project".to_string()
}

pub fn project_description(text: &str) -> String {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        vec![
            section_re("project\\s*overview"),
            section_re("executive\\s*summary"),
            section_re("overview"),
            section_re("description"),
            section_re("purpose"),
            section_re("background"),
        ]
    });

    for pattern in PATTERNS.iter() {
        if let Some(raw) = first_capture(pattern, text) {
            let cleaned: String = raw.trim().chars().filter(|c| *c != '*' && *c != '-').collect();
            let (desc, truncated) = truncate_chars(&cleaned, 300);
            if desc.chars().count() > 50 {
                return if truncated { format!("{desc}...") } else { desc };
            }
        }
    }

    static SENTENCE: Lazy<Regex> = Lazy::new(|| re(r"[^.!?]*[.!?]"));
    let first_sentences: String = SENTENCE
        .find_iter(text)
        .take(3)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let first_sentences = first_sentences.trim().to_string();
    if first_sentences.chars().count() > 50 {
        let (desc, truncated) = truncate_chars(&first_sentences, 300);
        return if truncated { format!("{desc}...") } else { desc };
    }

    "Project to implement business requirements and improve operational efficiency".to_string()
}

pub fn project_scope(text: &str) -> String {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        vec![
            section_re("scope"),
            section_re("in\\s*scope"),
            section_re("project\\s*scope"),
        ]
    });

    for pattern in PATTERNS.iter() {
        if let Some(raw) = first_capture(pattern, text) {
            let cleaned: String = raw.trim().chars().filter(|c| *c != '*' && *c != '-').collect();
            let (scope, _) = truncate_chars(&cleaned, 200);
            if scope.chars().count() > 30 {
                return scope;
            }
        }
    }

    "Implementation of core business functionality and system requirements".to_string()
}

pub fn objectives(text: &str) -> Vec<String> {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        vec![
            section_re("business\\s*objectives?"),
            section_re("objectives?"),
            section_re("goals?"),
            section_re("purpose"),
        ]
    });

    let mut found = Vec::new();
    // First pattern that yields bullets wins, so overlapping section
    // labels do not emit the same bullets twice.
    for pattern in PATTERNS.iter() {
        if let Some(section) = first_capture(pattern, text) {
            for bullet in bullet_points(section) {
                if bullet.chars().count() > 10 {
                    found.push(bullet);
                }
            }
            if !found.is_empty() {
                break;
            }
        }
    }

    if found.is_empty() {
        return string_vec(&[
            "Improve business process efficiency",
            "Enhance user experience and satisfaction",
            "Ensure system reliability and performance",
            "Meet regulatory and compliance requirements",
        ]);
    }
    found.truncate(6);
    found
}

pub fn stakeholders(text: &str) -> Vec<Stakeholder> {
    static SECTION: Lazy<Regex> = Lazy::new(|| section_re("stakeholders?"));
    static TABLE_ROW: Lazy<Regex> =
        Lazy::new(|| re(r"\|[^|\n\r]+\|[^|\n\r]+\|[^|\n\r]+\|"));
    static MENTIONS: Lazy<Regex> = Lazy::new(|| {
        re(r"(?i)(project\s*manager|business\s*analyst|developers?|testers?|users?|clients?|customers?|administrators?|managers?|team\s*leads?)")
    });

    let mut found = Vec::new();

    if let Some(section) = first_capture(&SECTION, text) {
        // First matching row is the header
        for row in TABLE_ROW.find_iter(section).skip(1) {
            let columns: Vec<&str> = row
                .as_str()
                .split('|')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect();
            if columns.len() >= 2 {
                found.push(Stakeholder {
                    name: columns[0].to_string(),
                    role: columns[1].to_string(),
                    responsibilities: match columns.get(2) {
                        Some(r) => vec![(*r).to_string()],
                        None => vec!["Define and manage requirements".to_string()],
                    },
                });
            }
        }
    }

    if found.is_empty() {
        let mut seen = Vec::new();
        for m in MENTIONS.find_iter(text) {
            let lower = m.as_str().to_lowercase();
            if seen.contains(&lower) {
                continue;
            }
            seen.push(lower.clone());
            if seen.len() > 5 {
                break;
            }
            let name = capitalize(&lower);
            found.push(Stakeholder {
                role: format!("{name} Role"),
                name,
                responsibilities: vec!["Project stakeholder responsibilities".to_string()],
            });
        }
    }

    if found.is_empty() {
        return vec![
            Stakeholder {
                name: "Project Manager".to_string(),
                role: "Project Lead".to_string(),
                responsibilities: string_vec(&[
                    "Project planning and coordination",
                    "Stakeholder communication",
                    "Timeline management",
                ]),
            },
            Stakeholder {
                name: "Business Analyst".to_string(),
                role: "Requirements Owner".to_string(),
                responsibilities: string_vec(&["Requirements gathering", "Process analysis", "Documentation"]),
            },
            Stakeholder {
                name: "End Users".to_string(),
                role: "System Users".to_string(),
                responsibilities: string_vec(&["System usage", "Feedback provision", "Testing support"]),
            },
        ];
    }
    found.truncate(5);
    found
}

static REQ_LINE: Lazy<Regex> = Lazy::new(|| re(r"\*\*REQ-(\d+):\*\*\s*([^\n\r]+)"));

pub fn functional_requirements(text: &str) -> Vec<FunctionalRequirement> {
    let mut found = Vec::new();

    for caps in REQ_LINE.captures_iter(text) {
        let number = &caps[1];
        let description = caps[2].trim().to_string();
        found.push(FunctionalRequirement {
            id: format!("REQ-{number:0>3}"),
            title: requirement_title(&description),
            priority: infer_priority(&description),
            acceptance_criteria: vec![acceptance_criterion(&description)],
            description,
        });
    }

    if found.is_empty() {
        static SECTION: Lazy<Regex> = Lazy::new(|| section_re("functional\\s*requirements?"));
        if let Some(section) = first_capture(&SECTION, text) {
            for (index, bullet) in bullet_points(section).into_iter().take(10).enumerate() {
                found.push(FunctionalRequirement {
                    id: format!("REQ-{:03}", index + 1),
                    title: requirement_title(&bullet),
                    priority: infer_priority(&bullet),
                    acceptance_criteria: vec![acceptance_criterion(&bullet)],
                    description: bullet,
                });
            }
        }
    }

    if found.is_empty() {
        return vec![FunctionalRequirement {
            id: "REQ-001".to_string(),
            title: "System Functionality".to_string(),
            description: "System shall provide core functionality as specified in the business requirements".to_string(),
            priority: Priority::High,
            acceptance_criteria: string_vec(&[
                "Core functionality is implemented",
                "All requirements are met",
                "System performs as expected",
            ]),
        }];
    }
    found.truncate(15);
    found
}

pub fn non_functional_requirements(text: &str) -> Vec<NonFunctionalRequirement> {
    static CATEGORIES: Lazy<Vec<(&str, Regex)>> = Lazy::new(|| {
        vec![
            ("Performance", section_re("performance\\s*requirements?")),
            ("Security", section_re("security\\s*requirements?")),
            ("Availability", section_re("availability\\s*requirements?")),
        ]
    });

    let mut found = Vec::new();
    for (category, pattern) in CATEGORIES.iter() {
        if let Some(section) = first_capture(pattern, text) {
            let requirements = bullet_points(section);
            if !requirements.is_empty() {
                found.push(NonFunctionalRequirement {
                    category: (*category).to_string(),
                    requirements,
                });
            }
        }
    }

    if found.is_empty() {
        return vec![
            NonFunctionalRequirement {
                category: "Performance".to_string(),
                requirements: string_vec(&[
                    "System response time should be under 3 seconds",
                    "Support reasonable concurrent user load",
                    "Maintain performance under normal operating conditions",
                ]),
            },
            NonFunctionalRequirement {
                category: "Security".to_string(),
                requirements: string_vec(&[
                    "Implement appropriate access controls",
                    "Ensure data protection and privacy",
                    "Follow security best practices",
                ]),
            },
        ];
    }
    found
}

pub fn user_stories(text: &str) -> Vec<UserStory> {
    let mut found = Vec::new();

    for caps in REQ_LINE.captures_iter(text) {
        let description = caps[2].trim();
        found.push(UserStory {
            id: format!("US-{:03}", found.len() + 1),
            as_a: infer_user_type(description),
            i_want: req_to_user_want(description),
            so_that: infer_benefit(description),
            acceptance_criteria: vec![acceptance_criterion(description)],
            priority: infer_priority(description),
        });
    }

    if found.is_empty() {
        return vec![UserStory {
            id: "US-001".to_string(),
            as_a: "User".to_string(),
            i_want: "to access system functionality".to_string(),
            so_that: "I can complete my required tasks".to_string(),
            acceptance_criteria: string_vec(&[
                "User can access the system",
                "User can perform required operations",
                "System responds appropriately",
            ]),
            priority: Priority::High,
        }];
    }
    found.truncate(10);
    found
}

pub fn business_rules(text: &str) -> Vec<String> {
    static SECTION: Lazy<Regex> = Lazy::new(|| section_re("business\\s*rules?"));
    static BR_LINE: Lazy<Regex> = Lazy::new(|| re(r"\*\*BR-(\d+):\*\*\s*([^\n\r]+)"));

    let mut rules = Vec::new();
    if let Some(section) = first_capture(&SECTION, text) {
        rules.extend(bullet_points(section));
    }
    for caps in BR_LINE.captures_iter(text) {
        rules.push(caps[2].trim().to_string());
    }

    if rules.is_empty() {
        return string_vec(&[
            "Business operations follow standard procedures",
            "Data processing adheres to business policies",
            "System access is controlled according to business needs",
        ]);
    }
    rules
}

pub fn constraints(text: &str) -> Vec<String> {
    static SECTION: Lazy<Regex> = Lazy::new(|| section_re("constraints?"));

    let found = first_capture(&SECTION, text).map(bullet_points).unwrap_or_default();
    if found.is_empty() {
        return string_vec(&[
            "Budget and resource limitations",
            "Time and schedule constraints",
            "Technical and platform constraints",
            "Regulatory and compliance requirements",
        ]);
    }
    found
}

pub fn assumptions(text: &str) -> Vec<String> {
    static SECTION: Lazy<Regex> = Lazy::new(|| section_re("assumptions?"));

    let found = first_capture(&SECTION, text).map(bullet_points).unwrap_or_default();
    if found.is_empty() {
        return string_vec(&[
            "Users have necessary technical knowledge",
            "Required infrastructure is available",
            "Stakeholders will provide timely feedback",
        ]);
    }
    found
}

pub fn dependencies(text: &str) -> Vec<String> {
    static DEPS: Lazy<Regex> = Lazy::new(|| section_re("dependencies?"));
    static INTEGRATIONS: Lazy<Regex> = Lazy::new(|| section_re("integrations?"));

    let mut found = Vec::new();
    if let Some(section) = first_capture(&DEPS, text) {
        found.extend(bullet_points(section));
    }
    // Both sections contribute, but overlapping headings must not emit
    // the same bullet twice.
    if let Some(section) = first_capture(&INTEGRATIONS, text) {
        for bullet in bullet_points(section) {
            if !found.contains(&bullet) {
                found.push(bullet);
            }
        }
    }

    if found.is_empty() {
        return string_vec(&[
            "External system integrations",
            "Third-party service dependencies",
            "Infrastructure and platform requirements",
        ]);
    }
    found
}

/// Headers the structured fields already claim. Anything else found in a
/// markdown heading is swept into `otherComments` so it is not lost.
const KNOWN_SECTION_KEYWORDS: &[&str] = &[
    "project", "overview", "summary", "scope", "objective", "goal", "purpose", "background",
    "stakeholder", "requirement", "user stor", "business rule", "constraint", "assumption",
    "dependenc", "integration", "title", "description", "performance", "security", "availability",
];

/// Collects content under headings no structured field recognizes. Returns
/// an empty string when nothing uncategorized is found. Each match is
/// capped at 200 characters and at most 4 sections are kept.
pub fn other_comments(text: &str) -> String {
    static HEADED_SECTION: Lazy<Regex> =
        Lazy::new(|| re(r"(?m)^#{1,6}\s*([^\n\r]+)\r?\n([^#]+)"));

    let mut collected = Vec::new();
    for caps in HEADED_SECTION.captures_iter(text) {
        if collected.len() >= 4 {
            break;
        }
        let heading = caps[1].trim();
        let lower = heading.to_lowercase();
        if KNOWN_SECTION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            continue;
        }
        let body = caps[2].trim();
        if body.is_empty() {
            continue;
        }
        let (capped, _) = truncate_chars(body, 200);
        collected.push(format!("{heading}: {capped}"));
    }
    collected.join("\n\n")
}

// Helpers shared with the validator's backfill path.

pub(crate) fn infer_priority(description: &str) -> Priority {
    let lower = description.to_lowercase();
    if lower.contains("critical") || lower.contains("essential") || lower.contains("must") {
        return Priority::Critical;
    }
    if lower.contains("important") || lower.contains("required") || lower.contains("shall") {
        return Priority::High;
    }
    if lower.contains("should") || lower.contains("recommended") {
        return Priority::Medium;
    }
    Priority::Medium
}

pub(crate) fn requirement_title(description: &str) -> String {
    description
        .split_whitespace()
        .take(6)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}

pub(crate) fn acceptance_criterion(description: &str) -> String {
    format!("Verify that {}", description.to_lowercase())
}

fn infer_user_type(description: &str) -> String {
    let lower = description.to_lowercase();
    if lower.contains("employee") || lower.contains("staff") {
        return "Employee".to_string();
    }
    if lower.contains("manager") || lower.contains("supervisor") {
        return "Manager".to_string();
    }
    if lower.contains("hr") || lower.contains("admin") {
        return "HR Administrator".to_string();
    }
    "User".to_string()
}

fn req_to_user_want(description: &str) -> String {
    let lower = description.to_lowercase();
    if lower.contains("store") || lower.contains("maintain") {
        return "to store and manage my information".to_string();
    }
    if lower.contains("access") || lower.contains("view") {
        return "to access system features".to_string();
    }
    if lower.contains("update") || lower.contains("modify") {
        return "to update my information".to_string();
    }
    if lower.contains("approve") || lower.contains("workflow") {
        return "to manage approval workflows".to_string();
    }
    "to use the system effectively".to_string()
}

fn infer_benefit(description: &str) -> String {
    let lower = description.to_lowercase();
    if lower.contains("efficiency") || lower.contains("automate") {
        return "I can work more efficiently".to_string();
    }
    if lower.contains("compliance") || lower.contains("regulation") {
        return "the organization remains compliant".to_string();
    }
    if lower.contains("accuracy") || lower.contains("error") {
        return "data accuracy is maintained".to_string();
    }
    "I can complete my tasks effectively".to_string()
}

/// A section capture: label, optional colon, then lines up to the next
/// markdown heading.
fn section_re(label: &str) -> Regex {
    re(&format!(r"(?i){label}[:\s]*([^\n\r#]+(?:\n[^#\n\r]+)*)"))
}

fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

static BULLET: Lazy<Regex> = Lazy::new(|| re(r"[-*•]\s*([^\n\r]+)"));

fn bullet_points(section: &str) -> Vec<String> {
    BULLET
        .captures_iter(section)
        .map(|caps| caps[1].trim().to_string())
        .filter(|item| item.chars().count() > 5)
        .collect()
}

/// Returns at most `max` characters of `text` plus whether it was cut.
fn truncate_chars(text: &str, max: usize) -> (String, bool) {
    let mut out = String::new();
    let mut count = 0;
    for ch in text.chars() {
        if count >= max {
            return (out, true);
        }
        out.push(ch);
        count += 1;
    }
    (out, false)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
