//! 参考试卷结构摘要
//!
//! 摘要由 LLM 生成，字段类型不可靠：
//! - 已知字段尽量转换为具体类型（数字可以是字符串，分值可以是小数）
//! - 转换不了的字段原样保留在 `extra` 中，不会导致解析失败

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::ParseError;

/// 部分模型会把摘要包在这个键下面
const ENVELOPE_KEY: &str = "stp_analysis";

/// 原始提示词里的拼写，按同义键接受
const DISTRIBUTION_ALIAS: &str = "questions_distrubution_type";

const CONTEXT: &str = "试卷摘要";

/// 单个大题（section）的结构
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    /// 每题分值，允许半分
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_per_question: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_choice: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl SectionBreakdown {
    fn from_map(map: Map<String, JsonValue>) -> Self {
        let mut section = Self::default();

        for (key, value) in map {
            let kept = match key.as_str() {
                "question_type" => lenient_string(&value).map(|v| section.question_type = Some(v)),
                "num_questions" => lenient_u32(&value).map(|v| section.num_questions = Some(v)),
                "mark_per_question" => {
                    lenient_f64(&value).map(|v| section.mark_per_question = Some(v))
                }
                "total_marks" => lenient_f64(&value).map(|v| section.total_marks = Some(v)),
                "internal_choice" => lenient_bool(&value).map(|v| section.internal_choice = Some(v)),
                _ => None,
            };
            if kept.is_none() {
                section.extra.insert(key, value);
            }
        }

        section
    }
}

/// 参考试卷摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestPaperSummary {
    /// 大题名称，如 ["A", "B", "C"]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,
    /// 每个大题的题型与分值
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub section_breakdown: BTreeMap<String, SectionBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
    /// 题型分布，如 {"mcqs": 20, "descriptive": 18}
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub questions_distribution_type: BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub internal_choice_count: BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_compulsory: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl TestPaperSummary {
    /// 解析清洗后的模型输出
    pub fn parse(cleaned: &str) -> Result<Self, ParseError> {
        let value: JsonValue =
            serde_json::from_str(cleaned).map_err(|source| ParseError::InvalidJson {
                context: CONTEXT.to_string(),
                source,
            })?;
        Self::from_value(value)
    }

    /// 从 JSON 值构建，自动去掉 `stp_analysis` 外层
    ///
    /// 只要求是非空的 JSON 对象
    pub fn from_value(value: JsonValue) -> Result<Self, ParseError> {
        let value = match value {
            JsonValue::Object(mut map) if map.len() == 1 && map.contains_key(ENVELOPE_KEY) => {
                map.remove(ENVELOPE_KEY).unwrap_or(JsonValue::Null)
            }
            other => other,
        };

        let map = match value {
            JsonValue::Object(map) => map,
            other => {
                return Err(ParseError::UnexpectedShape {
                    context: CONTEXT.to_string(),
                    detail: format!("需要JSON对象，实际为 {}", json_kind(&other)),
                })
            }
        };

        if map.is_empty() {
            return Err(ParseError::UnexpectedShape {
                context: CONTEXT.to_string(),
                detail: "JSON对象为空".to_string(),
            });
        }

        Ok(Self::from_map(map))
    }

    fn from_map(map: Map<String, JsonValue>) -> Self {
        let mut summary = Self::default();

        for (key, value) in map {
            let kept = match key.as_str() {
                "sections" => lenient_strings(&value).map(|v| summary.sections = v),
                "section_breakdown" => {
                    breakdown_map(&value).map(|v| summary.section_breakdown = v)
                }
                "total_questions" => lenient_u32(&value).map(|v| summary.total_questions = Some(v)),
                "questions_distribution_type" | DISTRIBUTION_ALIAS => {
                    count_map(&value).map(|v| summary.questions_distribution_type = v)
                }
                "internal_choice_count" => {
                    count_map(&value).map(|v| summary.internal_choice_count = v)
                }
                "all_compulsory" => lenient_bool(&value).map(|v| summary.all_compulsory = Some(v)),
                _ => None,
            };
            if kept.is_none() {
                summary.extra.insert(key, value);
            }
        }

        summary
    }

    /// 所有大题的总分
    pub fn total_marks(&self) -> f64 {
        self.section_breakdown
            .values()
            .filter_map(|s| s.total_marks)
            .sum()
    }
}

// ========== 宽松类型转换 ==========

fn lenient_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_f64(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn lenient_u32(value: &JsonValue) -> Option<u32> {
    let number = lenient_f64(value)?;
    let in_range = number >= 0.0 && number <= f64::from(u32::MAX) && number.fract() == 0.0;
    in_range.then_some(number as u32)
}

fn lenient_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn lenient_strings(value: &JsonValue) -> Option<Vec<String>> {
    value.as_array()?.iter().map(lenient_string).collect()
}

fn count_map(value: &JsonValue) -> Option<BTreeMap<String, u32>> {
    value
        .as_object()?
        .iter()
        .map(|(k, v)| lenient_u32(v).map(|count| (k.clone(), count)))
        .collect()
}

fn breakdown_map(value: &JsonValue) -> Option<BTreeMap<String, SectionBreakdown>> {
    value
        .as_object()?
        .iter()
        .map(|(k, v)| {
            v.as_object()
                .map(|section| (k.clone(), SectionBreakdown::from_map(section.clone())))
        })
        .collect()
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
