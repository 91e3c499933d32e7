use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy")]
    Easy,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Hard", alias = "tough", alias = "Tough")]
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 各难度的题目数量，键固定为 easy / medium / hard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCounts {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl DifficultyCounts {
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn total(&self) -> u32 {
        self.easy + self.medium + self.hard
    }
}

/// 单选题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    /// 固定四个选项
    pub options: [String; 4],
    pub answer: String,
    pub difficulty: Difficulty,
}

/// 课程内容概览
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub filenames: Vec<String>,
    pub chapter_name: String,
    #[serde(default)]
    pub sub_chapters: Vec<String>,
    #[serde(default)]
    pub number_of_sections: u32,
    #[serde(default)]
    pub number_of_diagrams: u32,
    #[serde(default)]
    pub mcqs_generated: DifficultyCounts,
}

/// 生成的试卷（结构化形式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub file_uris: Vec<String>,
    pub summary: Summary,
    #[serde(default)]
    pub mcqs: Vec<Mcq>,
}

impl Assessment {
    /// 按题目实际难度统计数量
    pub fn count_by_difficulty(&self) -> DifficultyCounts {
        self.mcqs
            .iter()
            .fold(DifficultyCounts::default(), |mut counts, mcq| {
                match mcq.difficulty {
                    Difficulty::Easy => counts.easy += 1,
                    Difficulty::Medium => counts.medium += 1,
                    Difficulty::Hard => counts.hard += 1,
                }
                counts
            })
    }
}

/// Generate 步骤的产出
///
/// `raw` 总是存在；`structured` 只在模型输出符合 [`Assessment`] 结构时才有
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAssessment {
    pub raw: String,
    pub structured: Option<Assessment>,
}

impl GeneratedAssessment {
    /// 尝试结构化解析，失败时返回原始文本和解析错误
    pub fn from_cleaned(cleaned: String) -> (Self, Option<ParseError>) {
        match serde_json::from_str::<Assessment>(&cleaned) {
            Ok(assessment) => (
                Self {
                    raw: cleaned,
                    structured: Some(assessment),
                },
                None,
            ),
            Err(source) => (
                Self {
                    raw: cleaned,
                    structured: None,
                },
                Some(ParseError::InvalidJson {
                    context: "生成的试卷".to_string(),
                    source,
                }),
            ),
        }
    }
}
