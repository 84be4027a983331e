//! Candidate evaluation records — the structured output of one AI call.
//!
//! Field names on the wire are camelCase and match the report template.
//! Missing values are never `null`: the AI is instructed to emit the literal
//! sentinel "Not Available", and deserialization defaults enforce it, so the
//! renderers never branch on absence.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Sentinel for any field the AI could not determine.
pub const NOT_AVAILABLE: &str = "Not Available";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Accepts strings, numbers, and booleans from the AI; anything else
/// (null, objects) collapses to the sentinel. Providers occasionally emit
/// `"yearsWorked": 3` instead of `"3"`.
fn de_stringly<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => not_available(),
    })
}

/// YES/NO flag fields, tolerant of the sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "YES", alias = "Yes", alias = "yes")]
    Yes,
    #[serde(rename = "NO", alias = "No", alias = "no")]
    No,
    #[default]
    #[serde(rename = "Not Available")]
    #[serde(other)]
    NotAvailable,
}

impl std::fmt::Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YesNo::Yes => write!(f, "YES"),
            YesNo::No => write!(f, "NO"),
            YesNo::NotAvailable => write!(f, "{NOT_AVAILABLE}"),
        }
    }
}

/// Whether the job description marks a skill as required.
/// Unknown values fall back to Optional — the prompt instructs the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillRequirement {
    Mandatory,
    #[default]
    #[serde(other)]
    Optional,
}

impl SkillRequirement {
    pub fn is_mandatory(&self) -> bool {
        matches!(self, SkillRequirement::Mandatory)
    }
}

impl std::fmt::Display for SkillRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillRequirement::Mandatory => write!(f, "Mandatory"),
            SkillRequirement::Optional => write!(f, "Optional"),
        }
    }
}

/// One row of the skill-comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    /// 1-based ordinal; order-significant within one evaluation.
    #[serde(default)]
    pub id: u32,
    /// May carry a "Primary Skill - " / "Secondary Skill - " category prefix.
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub skill_name: String,
    #[serde(default)]
    pub mandatory: SkillRequirement,
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub projects: String,
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub years_worked: String,
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub description: String,
    /// Only emitted by some prompt variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_in_resume: Option<YesNo>,
}

/// The structured AI output for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEvaluation {
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub candidate_name: String,
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub total_experience: String,
    #[serde(default)]
    pub jd_clarification_provided: YesNo,
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub relevant_experience: String,
    #[serde(default = "not_available", deserialize_with = "de_stringly")]
    pub notice_period: String,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
}

impl CandidateEvaluation {
    /// Restores the SkillEntry invariants after deserialization:
    /// ids must be unique and monotonically increasing, so any gap,
    /// duplicate, or out-of-order id is renumbered 1..=n in received order.
    /// Duplicate skill names are kept (the table stays the size the AI
    /// returned) but logged for operators.
    pub fn normalize(&mut self) {
        let monotonic = self
            .skills
            .windows(2)
            .all(|pair| pair[0].id < pair[1].id)
            && self.skills.first().map_or(true, |s| s.id >= 1);

        if !monotonic {
            warn!(
                candidate = %self.candidate_name,
                "skill ids not strictly increasing — renumbering"
            );
            for (index, skill) in self.skills.iter_mut().enumerate() {
                skill.id = index as u32 + 1;
            }
        }

        let mut seen = std::collections::HashSet::new();
        for skill in &self.skills {
            if !seen.insert(skill.skill_name.to_lowercase()) {
                warn!(
                    candidate = %self.candidate_name,
                    skill = %skill.skill_name,
                    "duplicate skill name in evaluation"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: u32, name: &str) -> SkillEntry {
        SkillEntry {
            id,
            skill_name: name.to_string(),
            mandatory: SkillRequirement::Optional,
            projects: not_available(),
            years_worked: not_available(),
            description: not_available(),
            present_in_resume: None,
        }
    }

    #[test]
    fn test_missing_fields_default_to_sentinel() {
        let json = r#"{"candidateName": "Jane Doe"}"#;
        let eval: CandidateEvaluation = serde_json::from_str(json).unwrap();
        assert_eq!(eval.candidate_name, "Jane Doe");
        assert_eq!(eval.total_experience, NOT_AVAILABLE);
        assert_eq!(eval.notice_period, NOT_AVAILABLE);
        assert_eq!(eval.jd_clarification_provided, YesNo::NotAvailable);
        assert!(eval.skills.is_empty());
    }

    #[test]
    fn test_numeric_years_worked_is_stringified() {
        let json = r#"{"id": 1, "skillName": "Rust", "mandatory": "Mandatory", "yearsWorked": 3}"#;
        let entry: SkillEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.years_worked, "3");
        assert!(entry.mandatory.is_mandatory());
    }

    #[test]
    fn test_null_field_becomes_sentinel() {
        let json = r#"{"id": 2, "skillName": "Go", "projects": null}"#;
        let entry: SkillEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.projects, NOT_AVAILABLE);
    }

    #[test]
    fn test_yes_no_parses_sentinel_and_unknowns() {
        assert_eq!(serde_json::from_str::<YesNo>(r#""YES""#).unwrap(), YesNo::Yes);
        assert_eq!(serde_json::from_str::<YesNo>(r#""NO""#).unwrap(), YesNo::No);
        assert_eq!(
            serde_json::from_str::<YesNo>(r#""Not Available""#).unwrap(),
            YesNo::NotAvailable
        );
        assert_eq!(
            serde_json::from_str::<YesNo>(r#""maybe""#).unwrap(),
            YesNo::NotAvailable
        );
    }

    #[test]
    fn test_unknown_mandatory_value_falls_back_to_optional() {
        let req: SkillRequirement = serde_json::from_str(r#""Not Available""#).unwrap();
        assert_eq!(req, SkillRequirement::Optional);
    }

    #[test]
    fn test_normalize_renumbers_duplicate_ids() {
        let mut eval = CandidateEvaluation {
            candidate_name: "Jane".to_string(),
            total_experience: not_available(),
            jd_clarification_provided: YesNo::No,
            relevant_experience: not_available(),
            notice_period: not_available(),
            skills: vec![skill(1, "Rust"), skill(1, "Go"), skill(5, "SQL")],
        };
        eval.normalize();
        let ids: Vec<u32> = eval.skills.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_normalize_keeps_monotonic_ids_untouched() {
        let mut eval = CandidateEvaluation {
            candidate_name: "Jane".to_string(),
            total_experience: not_available(),
            jd_clarification_provided: YesNo::Yes,
            relevant_experience: not_available(),
            notice_period: not_available(),
            skills: vec![skill(1, "Rust"), skill(2, "Go")],
        };
        eval.normalize();
        let ids: Vec<u32> = eval.skills.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let eval = CandidateEvaluation {
            candidate_name: "Jane".to_string(),
            total_experience: "8 years".to_string(),
            jd_clarification_provided: YesNo::Yes,
            relevant_experience: "5 years".to_string(),
            notice_period: "30 days".to_string(),
            skills: vec![skill(1, "Primary Skill - Go")],
        };
        let json = serde_json::to_value(&eval).unwrap();
        assert_eq!(json["candidateName"], "Jane");
        assert_eq!(json["jdClarificationProvided"], "YES");
        assert_eq!(json["skills"][0]["skillName"], "Primary Skill - Go");
        assert!(json["skills"][0].get("presentInResume").is_none());
    }
}
