//! 提示词渲染 - 业务能力层
//!
//! 模板文件放在 prompts 目录下，文件名为 `{template_id}.prompt`。
//! 占位符写作 `{name}`，字面量花括号写作 `{{` / `}}`。
//! 变量值按原样插入，不会被再次解析。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::TemplateError;

/// 试卷摘要模板
pub const SUMMARIZE_TEMPLATE: &str = "01-summarize-testpaper";
/// 试卷生成模板
pub const GENERATE_TEMPLATE: &str = "02-gen-testpaper";

const TEMPLATE_EXTENSION: &str = "prompt";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("占位符正则无效")
    })
}

/// 提示词渲染器
pub struct PromptRenderer {
    prompts_dir: PathBuf,
}

impl PromptRenderer {
    /// 创建渲染器
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
        }
    }

    /// 模板文件路径
    pub fn template_path(&self, template_id: &str) -> PathBuf {
        self.prompts_dir
            .join(format!("{}.{}", template_id, TEMPLATE_EXTENSION))
    }

    /// 读取模板并填充变量
    ///
    /// # 参数
    /// - `template_id`: 模板名（不含扩展名）
    /// - `variables`: 变量名 → 变量值
    ///
    /// # 返回
    /// 渲染后的提示词；模板不存在、无法读取或缺少变量时返回 [`TemplateError`]
    pub async fn render(
        &self,
        template_id: &str,
        variables: &HashMap<&str, String>,
    ) -> Result<String, TemplateError> {
        let path = self.template_path(template_id);
        let template = read_template(&path).await?;
        debug!(
            "模板 {} 读取成功，长度: {} 字符",
            template_id,
            template.len()
        );

        render_str(template_id, &template, variables)
    }
}

async fn read_template(path: &Path) -> Result<String, TemplateError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(TemplateError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(TemplateError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// 对模板字符串做变量替换
pub fn render_str(
    template_id: &str,
    template: &str,
    variables: &HashMap<&str, String>,
) -> Result<String, TemplateError> {
    let re = placeholder_regex();

    // 先检查变量是否齐全，再替换
    for caps in re.captures_iter(template) {
        if let Some(name) = caps.get(1) {
            if !variables.contains_key(name.as_str()) {
                return Err(TemplateError::MissingVariable {
                    template: template_id.to_string(),
                    variable: name.as_str().to_string(),
                });
            }
        }
    }

    let rendered = re.replace_all(template, |caps: &Captures| match caps.get(1) {
        Some(name) => variables
            .get(name.as_str())
            .cloned()
            .unwrap_or_default(),
        None if &caps[0] == "{{" => "{".to_string(),
        None => "}".to_string(),
    });

    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_placeholders_substituted() {
        let out = render_str(
            "t",
            "Paper:\n{test_paper_text}\nEnd",
            &vars(&[("test_paper_text", "Section A ...")]),
        )
        .unwrap();
        assert_eq!(out, "Paper:\nSection A ...\nEnd");
    }

    #[test]
    fn test_escaped_braces_become_literal() {
        let out = render_str(
            "t",
            r#"Return {{"sections": [...]}} for {name}"#,
            &vars(&[("name", "paper")]),
        )
        .unwrap();
        assert_eq!(out, r#"Return {"sections": [...]} for paper"#);
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = render_str(
            "t",
            "{a}|{b}",
            &vars(&[("a", "{b}"), ("b", "x")]),
        )
        .unwrap();
        assert_eq!(out, "{b}|x");
    }

    #[test]
    fn test_missing_variable() {
        let err = render_str("02-gen-testpaper", "{chapter_content_summary}", &HashMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingVariable { variable, .. } if variable == "chapter_content_summary"
        ));
    }

    #[test]
    fn test_deterministic() {
        let v = vars(&[("x", "1")]);
        assert_eq!(
            render_str("t", "{x}{x}", &v).unwrap(),
            render_str("t", "{x}{x}", &v).unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_template_file() {
        let renderer = PromptRenderer::new("no/such/dir");
        let err = renderer
            .render(SUMMARIZE_TEMPLATE, &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_bundled_templates_declare_expected_variables() {
        let renderer = PromptRenderer::new(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts"));

        let summarize = renderer
            .render(
                SUMMARIZE_TEMPLATE,
                &vars(&[("test_paper_text", "SECTION A")]),
            )
            .await
            .unwrap();
        assert!(summarize.contains("SECTION A"));

        let generate = renderer
            .render(
                GENERATE_TEMPLATE,
                &vars(&[
                    ("chapter_content_summary", "Chapter 1: Algebra"),
                    ("test_paper_analysis", r#"{"sections":["A"]}"#),
                    ("file_uris", r#"["lesson.pdf"]"#),
                ]),
            )
            .await
            .unwrap();
        assert!(generate.contains("Chapter 1: Algebra"));
        assert!(generate.contains(r#"{"sections":["A"]}"#));
    }
}
