//! 试卷报告
//!
//! 把结构化试卷排版成可直接打印的 PDF（不含答案）

use crate::error::SerializationError;
use crate::infrastructure::pdf::{self, CHARS_PER_LINE, LINES_PER_PAGE};
use crate::models::{Assessment, Difficulty, Mcq};

const OPTION_LABELS: [char; 4] = ['a', 'b', 'c', 'd'];

/// 报告头部不展示的子章节
const HIDDEN_SUB_CHAPTERS: [&str; 2] = ["summary", "introduction"];

/// 渲染试卷 PDF
pub fn render_report(assessment: &Assessment) -> Result<Vec<u8>, SerializationError> {
    let pages = paginate(&report_lines(assessment));
    pdf::write_text_pages(&pages).map_err(|source| SerializationError::RenderFailed { source })
}

/// 报告的文本行（未换行、未分页）
pub fn report_lines(assessment: &Assessment) -> Vec<String> {
    let summary = &assessment.summary;

    let sub_chapters: Vec<&str> = summary
        .sub_chapters
        .iter()
        .map(String::as_str)
        .filter(|sc| !HIDDEN_SUB_CHAPTERS.contains(&sc.to_lowercase().as_str()))
        .collect();

    let counts = &summary.mcqs_generated;
    let question_types = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .iter()
        .map(|d| format!("{}: {}", capitalize(d.as_str()), counts.get(*d)))
        .collect::<Vec<_>>()
        .join(", ");

    let rule = "=".repeat(CHARS_PER_LINE);
    let mut lines = vec![
        format!("{:^width$}", "Assessment Test", width = CHARS_PER_LINE),
        rule.clone(),
        format!("Subject: {}", summary.chapter_name),
        format!("Sub-chapters: {}", sub_chapters.join(", ")),
        format!("Question types: {}", question_types),
        rule,
    ];

    for (index, mcq) in assessment.mcqs.iter().enumerate() {
        lines.push(String::new());
        push_mcq(&mut lines, index, mcq);
    }

    lines
}

fn push_mcq(lines: &mut Vec<String>, index: usize, mcq: &Mcq) {
    lines.push(format!("{}. {}", index + 1, mcq.question));
    for (label, option) in OPTION_LABELS.iter().zip(mcq.options.iter()) {
        lines.push(format!("  {}. {}", label, option));
    }
}

/// 按页宽折行，再按页高分页
fn paginate(lines: &[String]) -> Vec<Vec<String>> {
    let wrapped: Vec<String> = lines.iter().flat_map(|line| wrap(line)).collect();
    wrapped
        .chunks(LINES_PER_PAGE)
        .map(|chunk| chunk.to_vec())
        .collect()
}

fn wrap(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(CHARS_PER_LINE)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DifficultyCounts, Summary};

    fn sample() -> Assessment {
        Assessment {
            file_uris: vec!["gs://bucket/jemh1a1.pdf".to_string()],
            summary: Summary {
                filenames: vec!["jemh1a1.pdf".to_string()],
                chapter_name: "Real Numbers".to_string(),
                sub_chapters: vec![
                    "Introduction".to_string(),
                    "Euclid's Division Lemma".to_string(),
                    "Summary".to_string(),
                ],
                number_of_sections: 3,
                number_of_diagrams: 0,
                mcqs_generated: DifficultyCounts {
                    easy: 1,
                    medium: 0,
                    hard: 0,
                },
            },
            mcqs: vec![Mcq {
                question: "HCF of 6 and 20?".to_string(),
                options: ["1".into(), "2".into(), "3".into(), "4".into()],
                answer: "b".to_string(),
                difficulty: Difficulty::Easy,
            }],
        }
    }

    fn joined(assessment: &Assessment) -> String {
        report_lines(assessment).join("\n")
    }

    #[test]
    fn test_header_hides_intro_and_summary() {
        let report = joined(&sample());
        assert!(report.contains("Subject: Real Numbers"));
        assert!(report.contains("Sub-chapters: Euclid's Division Lemma\n"));
        assert!(report.contains("Question types: Easy: 1, Medium: 0, Hard: 0"));
    }

    #[test]
    fn test_questions_numbered_with_labelled_options() {
        let report = joined(&sample());
        assert!(report.contains("1. HCF of 6 and 20?\n  a. 1\n  b. 2\n  c. 3\n  d. 4"));
        // 报告里不出现答案
        assert!(!report.contains("answer"));
    }

    #[test]
    fn test_long_lines_wrap_and_paginate() {
        let long = "x".repeat(CHARS_PER_LINE * 2 + 1);
        assert_eq!(wrap(&long).len(), 3);

        let lines: Vec<String> = (0..LINES_PER_PAGE + 1).map(|i| i.to_string()).collect();
        let pages = paginate(&lines);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], vec![LINES_PER_PAGE.to_string()]);
    }

    #[test]
    fn test_report_is_readable_pdf() {
        let mut assessment = sample();
        let mcq = assessment.mcqs[0].clone();
        assessment.mcqs = vec![mcq; 20];

        let bytes = render_report(&assessment).unwrap();
        let pages = pdf::extract_pages("report.pdf", &bytes).unwrap();

        // 6 行表头 + 20 道题各 6 行
        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Subject: Real Numbers"));
        assert!(pages[0].contains("1. HCF of 6 and 20?"));
        assert!(pages[2].contains("20. HCF of 6 and 20?"));
    }
}
