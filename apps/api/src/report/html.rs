//! Canonical HTML rendering of one candidate evaluation.
//!
//! The PDF is printed from this markup; the DOCX is built independently from
//! the same record. Every interpolated value is escaped — skill names and
//! descriptions are AI-sourced text and must not be able to inject markup.

use crate::models::evaluation::{CandidateEvaluation, SkillEntry, NOT_AVAILABLE};

const REPORT_TITLE: &str = "Contractor Connect Skill Evaluation Sheet";
const SKILLS_BANNER: &str = "MSP INPUT - Supplier Inputs";

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        .container { background-color: white; padding: 20px; border-radius: 8px;
                     box-shadow: 0 2px 10px rgba(0,0,0,0.1); max-width: 1200px; margin: 0 auto; }
        .header { text-align: center; background-color: #2c3e50; color: white; padding: 15px;
                  margin: -20px -20px 20px -20px; border-radius: 8px 8px 0 0; }
        .candidate-info { display: grid; grid-template-columns: 1fr 1fr; gap: 15px;
                          margin-bottom: 30px; background-color: #ecf0f1; padding: 20px; border-radius: 5px; }
        .info-item { display: flex; align-items: center; }
        .info-label { font-weight: bold; min-width: 150px; color: #2c3e50; }
        .info-value { color: #34495e; margin-left: 10px; }
        .skills-section { margin-top: 30px; }
        .skills-header { background-color: #3498db; color: white; padding: 10px; text-align: center;
                         font-weight: bold; margin-bottom: 20px; }
        .skills-table { width: 100%; border-collapse: collapse; margin-top: 10px;
                        box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        .skills-table th { background-color: #34495e; color: white; padding: 12px 8px; text-align: center;
                           font-weight: bold; border: 1px solid #2c3e50; font-size: 14px; }
        .skills-table td { padding: 10px 8px; border: 1px solid #bdc3c7; vertical-align: top; font-size: 13px; }
        .skills-table tr:nth-child(even) { background-color: #f8f9fa; }
        .skill-name { font-weight: bold; color: #2c3e50; max-width: 200px; word-wrap: break-word; }
        .mandatory { background-color: #e74c3c; color: white; padding: 2px 6px; border-radius: 3px;
                     font-size: 11px; font-weight: bold; }
        .optional { background-color: #f39c12; color: white; padding: 2px 6px; border-radius: 3px;
                    font-size: 11px; font-weight: bold; }
        .projects-cell { max-width: 250px; word-wrap: break-word; line-height: 1.4; }
        .years-cell { text-align: center; font-weight: bold; color: #2c3e50; }
        .description-cell { max-width: 300px; word-wrap: break-word; line-height: 1.4; color: #34495e; }
        .not-available { color: #7f8c8d; font-style: italic; }
        @media print { body { margin: 0; background-color: white; } .container { box-shadow: none; } }
"#;

/// Escapes text for safe interpolation into HTML element content and
/// attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Sentinel-aware cell content: "Not Available" gets the muted styling,
/// everything else is escaped as-is.
fn cell_value(value: &str) -> String {
    if value == NOT_AVAILABLE {
        format!(r#"<span class="not-available">{NOT_AVAILABLE}</span>"#)
    } else {
        escape_html(value)
    }
}

fn info_item(label: &str, value: &str, span_both_columns: bool) -> String {
    let style = if span_both_columns {
        r#" style="grid-column: 1 / -1;""#
    } else {
        ""
    };
    format!(
        concat!(
            "            <div class=\"info-item\"{}>\n",
            "                <span class=\"info-label\">{}:</span>\n",
            "                <span class=\"info-value\">{}</span>\n",
            "            </div>\n"
        ),
        style,
        label,
        escape_html(value)
    )
}

fn skill_row(skill: &SkillEntry) -> String {
    let badge_class = if skill.mandatory.is_mandatory() {
        "mandatory"
    } else {
        "optional"
    };
    format!(
        concat!(
            "                    <tr>\n",
            "                        <td class=\"skill-name\">{name}</td>\n",
            "                        <td style=\"text-align: center;\"><span class=\"{badge}\">{mandatory}</span></td>\n",
            "                        <td class=\"projects-cell\">{projects}</td>\n",
            "                        <td class=\"years-cell\">{years}</td>\n",
            "                        <td class=\"description-cell\">{description}</td>\n",
            "                    </tr>\n"
        ),
        name = escape_html(&skill.skill_name),
        badge = badge_class,
        mandatory = skill.mandatory,
        projects = cell_value(&skill.projects),
        years = cell_value(&skill.years_worked),
        description = cell_value(&skill.description),
    )
}

/// Renders the full report page for one candidate.
pub fn render_html(evaluation: &CandidateEvaluation) -> String {
    let mut info = String::new();
    info.push_str(&info_item("Candidate Name", &evaluation.candidate_name, false));
    info.push_str(&info_item("Total Experience", &evaluation.total_experience, false));
    info.push_str(&info_item(
        "JD Clarification Provided",
        &evaluation.jd_clarification_provided.to_string(),
        false,
    ));
    info.push_str(&info_item("Relevant Experience", &evaluation.relevant_experience, false));
    info.push_str(&info_item("Notice Period", &evaluation.notice_period, true));

    let rows = if evaluation.skills.is_empty() {
        concat!(
            "                    <tr><td colspan=\"5\" style=\"text-align: center; color: #7f8c8d;\">",
            "No skills data available</td></tr>\n"
        )
        .to_string()
    } else {
        evaluation.skills.iter().map(skill_row).collect()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{REPORT_TITLE}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{REPORT_TITLE}</h1>
        </div>

        <div class="candidate-info">
{info}        </div>

        <div class="skills-section">
            <div class="skills-header">
                {SKILLS_BANNER}
            </div>

            <table class="skills-table">
                <thead>
                    <tr>
                        <th style="width: 25%;">Candidate Skills</th>
                        <th style="width: 15%;">Mandatory/Optional</th>
                        <th style="width: 25%;">Name of Projects in which the skills were used</th>
                        <th style="width: 15%;">No. of years worked in each Project</th>
                        <th style="width: 20%;">Description of work done using the skill</th>
                    </tr>
                </thead>
                <tbody>
{rows}                </tbody>
            </table>
        </div>
    </div>
</body>
</html>"#
    )
}
