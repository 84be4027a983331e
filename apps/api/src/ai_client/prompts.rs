//! Prompt construction for skill evaluation. Pure string building — no I/O.
//!
//! The prompt is a hard contract with the response parser: it demands a
//! single JSON array (one object per resume), the exact field set of
//! [`CandidateEvaluation`], and the "Not Available" sentinel for anything
//! the model cannot determine.

use crate::extract::ExtractedDocument;

/// Builds the evaluation prompt for one job description and one-or-many
/// resumes. Deterministic: same inputs, same prompt.
pub fn build_prompt(job_description: &str, resumes: &[ExtractedDocument]) -> String {
    let resume_blocks = resumes
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Resume {} ({}):\n{}", i + 1, r.filename, r.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are an AI that analyzes resumes against a job description.

### Job Description:
{job_description}

### Resumes:
{resume_blocks}

---

### Task:
1. Extract **exactly 6 skills**:
   - First 3 should be **Primary Skills** (highly relevant, mostly from Job Description).
   - Next 3 should be **Secondary Skills** (supportive or additional, first from JD, if not enough then from resume).
   - Skills must be unique and sorted in the above order.
   - In the **skillName field**, prefix the category:
     - "Primary Skill - {{skill}}"
     - "Secondary Skill - {{skill}}"

2. For each skill, determine:
   - id (1-6 based on order)
   - skillName (with prefix as described above)
   - mandatory ("Mandatory"/"Optional" - based on JD if available, otherwise "Optional")
   - yearsWorked (if available)
   - projects (if available)
   - description (if available)

3. For each resume, also extract the following fields in **valid JSON format**:
   - candidateName
   - totalExperience
   - jdClarificationProvided ("YES"/"NO")
   - relevantExperience
   - noticePeriod
   - skills[] (as per above rule, always 6 skills)

### Important:
- Prioritize Job Description skills first.
- If JD provides fewer than 6 skills, fill remaining slots from the Resume.
- If info is missing, put "Not Available".
- **Output must be a single JSON array of objects (one per resume).**
- **Do not add explanations, introductions, or markdown.**
- **Return ONLY a valid JSON array. Nothing else.**
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(filename: &str, content: &str) -> ExtractedDocument {
        ExtractedDocument {
            filename: filename.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_prompt_embeds_jd_and_every_resume() {
        let prompt = build_prompt(
            "We need a Rust engineer.",
            &[
                doc("jane.pdf", "Jane writes Rust."),
                doc("bob.docx", "Bob writes Go."),
            ],
        );
        assert!(prompt.contains("We need a Rust engineer."));
        assert!(prompt.contains("Resume 1 (jane.pdf):\nJane writes Rust."));
        assert!(prompt.contains("Resume 2 (bob.docx):\nBob writes Go."));
    }

    #[test]
    fn test_prompt_demands_array_output_and_sentinel() {
        let prompt = build_prompt("JD", &[doc("cv.pdf", "text")]);
        assert!(prompt.contains("single JSON array of objects (one per resume)"));
        assert!(prompt.contains(r#"put "Not Available""#));
        assert!(prompt.contains("Return ONLY a valid JSON array"));
    }

    #[test]
    fn test_prompt_fixes_the_field_set() {
        let prompt = build_prompt("JD", &[doc("cv.pdf", "text")]);
        for field in [
            "candidateName",
            "totalExperience",
            "jdClarificationProvided",
            "relevantExperience",
            "noticePeriod",
            "skillName",
        ] {
            assert!(prompt.contains(field), "prompt missing field {field}");
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let resumes = [doc("cv.pdf", "text")];
        assert_eq!(build_prompt("JD", &resumes), build_prompt("JD", &resumes));
    }
}
