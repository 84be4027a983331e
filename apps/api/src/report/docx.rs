//! DOCX rendering — builds the report as a structured word-processing
//! document directly from the evaluation record, NOT by converting the HTML.
//! Driving docx-rs from the same data keeps cell shading and column spans in
//! step with the HTML presentation without depending on a converter's
//! fidelity.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, Paragraph, Run, ShdType, Shading, Table, TableCell, TableRow, WidthType,
};

use crate::models::evaluation::{CandidateEvaluation, SkillEntry};
use crate::report::RenderError;

const REPORT_TITLE: &str = "Contractor Connect Skill Evaluation Sheet";
const SKILLS_BANNER: &str = "MSP INPUT - Supplier Inputs";

// Palette mirrored from the HTML stylesheet.
const HEADER_FILL: &str = "2c3e50";
const BANNER_FILL: &str = "3498db";
const TABLE_HEAD_FILL: &str = "34495e";
const INFO_FILL: &str = "ecf0f1";
const MANDATORY_FILL: &str = "e74c3c";
const OPTIONAL_FILL: &str = "f39c12";
const WHITE: &str = "ffffff";

/// Column grid in twentieths of a point; 25/15/25/15/20% of a 6.5" body.
const SKILL_GRID: [usize; 5] = [2340, 1404, 2340, 1404, 1872];

/// Renders the evaluation as DOCX bytes.
pub fn render_docx(evaluation: &CandidateEvaluation) -> Result<Vec<u8>, RenderError> {
    let docx = build_document(evaluation);

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| RenderError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

fn build_document(evaluation: &CandidateEvaluation) -> Docx {
    Docx::new()
        .add_paragraph(title_paragraph())
        .add_paragraph(Paragraph::new())
        .add_table(info_table(evaluation))
        .add_paragraph(Paragraph::new())
        .add_table(skills_table(evaluation))
}

fn title_paragraph() -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(REPORT_TITLE).bold().size(32))
        .align(AlignmentType::Center)
}

fn fill(color: &str) -> Shading {
    Shading::new().shd_type(ShdType::Clear).fill(color)
}

fn plain_cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}

fn label_cell(text: &str) -> TableCell {
    TableCell::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text).bold()))
        .shading(fill(INFO_FILL))
}

fn banner_cell(text: &str, color: &str, span: usize) -> TableCell {
    TableCell::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text).bold().color(WHITE))
                .align(AlignmentType::Center),
        )
        .shading(fill(color))
        .grid_span(span)
}

fn head_cell(text: &str, width: usize) -> TableCell {
    TableCell::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text).bold().color(WHITE))
                .align(AlignmentType::Center),
        )
        .shading(fill(TABLE_HEAD_FILL))
        .width(width, WidthType::Dxa)
}

fn info_table(evaluation: &CandidateEvaluation) -> Table {
    let rows = vec![
        info_row("Candidate Name", &evaluation.candidate_name),
        info_row("Total Experience", &evaluation.total_experience),
        info_row(
            "JD Clarification Provided",
            &evaluation.jd_clarification_provided.to_string(),
        ),
        info_row("Relevant Experience", &evaluation.relevant_experience),
        info_row("Notice Period", &evaluation.notice_period),
    ];
    Table::new(rows).set_grid(vec![2808, 6552])
}

fn info_row(label: &str, value: &str) -> TableRow {
    TableRow::new(vec![label_cell(label), plain_cell(value)])
}

fn skills_table(evaluation: &CandidateEvaluation) -> Table {
    let mut rows = vec![
        TableRow::new(vec![banner_cell(SKILLS_BANNER, BANNER_FILL, SKILL_GRID.len())]),
        TableRow::new(vec![
            head_cell("Candidate Skills", SKILL_GRID[0]),
            head_cell("Mandatory/Optional", SKILL_GRID[1]),
            head_cell("Name of Projects in which the skills were used", SKILL_GRID[2]),
            head_cell("No. of years worked in each Project", SKILL_GRID[3]),
            head_cell("Description of work done using the skill", SKILL_GRID[4]),
        ]),
    ];

    if evaluation.skills.is_empty() {
        rows.push(TableRow::new(vec![banner_cell(
            "No skills data available",
            TABLE_HEAD_FILL,
            SKILL_GRID.len(),
        )]));
    } else {
        rows.extend(evaluation.skills.iter().map(skill_row));
    }

    Table::new(rows).set_grid(SKILL_GRID.to_vec())
}

fn skill_row(skill: &SkillEntry) -> TableRow {
    let badge_fill = if skill.mandatory.is_mandatory() {
        MANDATORY_FILL
    } else {
        OPTIONAL_FILL
    };

    let mandatory_cell = TableCell::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(skill.mandatory.to_string())
                        .bold()
                        .color(WHITE),
                )
                .align(AlignmentType::Center),
        )
        .shading(fill(badge_fill));

    TableRow::new(vec![
        TableCell::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(skill.skill_name.as_str()).bold()),
        ),
        mandatory_cell,
        plain_cell(&skill.projects),
        plain_cell(&skill.years_worked),
        plain_cell(&skill.description),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::{SkillRequirement, YesNo, NOT_AVAILABLE};

    fn evaluation() -> CandidateEvaluation {
        CandidateEvaluation {
            candidate_name: "Jane Doe".to_string(),
            total_experience: "8 years".to_string(),
            jd_clarification_provided: YesNo::Yes,
            relevant_experience: "5 years".to_string(),
            notice_period: NOT_AVAILABLE.to_string(),
            skills: vec![SkillEntry {
                id: 1,
                skill_name: "Primary Skill - Go".to_string(),
                mandatory: SkillRequirement::Mandatory,
                projects: "Payments gateway".to_string(),
                years_worked: "3".to_string(),
                description: NOT_AVAILABLE.to_string(),
                present_in_resume: None,
            }],
        }
    }

    #[test]
    fn test_render_docx_produces_zip_container() {
        let bytes = render_docx(&evaluation()).unwrap();
        // OOXML is a zip archive; its magic is "PK".
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_render_docx_handles_empty_skills() {
        let mut eval = evaluation();
        eval.skills.clear();
        assert!(render_docx(&eval).is_ok());
    }

    #[test]
    fn test_render_docx_accepts_markup_in_values() {
        // docx-rs escapes XML content itself; AI-sourced angle brackets
        // must not corrupt the archive.
        let mut eval = evaluation();
        eval.skills[0].skill_name = "<w:evil/> & more".to_string();
        let bytes = render_docx(&eval).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
