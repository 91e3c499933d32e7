//! 工作流状态
//!
//! 一次运行只创建一个 [`WorkflowState`]，按引用在各步骤之间传递并原地修改。
//! 每个可选字段只会从"无"变为"有"一次，失败信息以第一次为准。

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::error::AppError;
use crate::models::{DocumentText, GeneratedAssessment, TestPaperSummary};

/// 工作流步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// 入口：总结参考试卷结构
    Summarize,
    /// 加载课程内容
    LoadContent,
    /// 生成试卷
    Generate,
    /// 终点：汇报结果并保存产物
    Finish,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::Summarize => "Summarize",
            Step::LoadContent => "LoadContent",
            Step::Generate => "Generate",
            Step::Finish => "Finish",
        }
    }

    /// 根据当前状态决定下一步，`Finish` 之后返回 `None`
    pub fn next(self, state: &WorkflowState) -> Option<Step> {
        match self {
            Step::Summarize if state.test_paper_summary.is_some() => Some(Step::LoadContent),
            Step::Summarize => Some(Step::Finish),
            Step::LoadContent if state.document_text.is_some() => Some(Step::Generate),
            Step::LoadContent => Some(Step::Finish),
            Step::Generate => Some(Step::Finish),
            Step::Finish => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 步骤失败信息
#[derive(Debug)]
pub struct StepFailure {
    /// 出错的步骤
    pub step: Step,
    pub error: AppError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[步骤 {}] {}", self.step, self.error)
    }
}

/// 工作流共享状态
#[derive(Debug)]
pub struct WorkflowState {
    source_document_ref: String,
    reference_test_paper_ref: String,
    document_text: Option<DocumentText>,
    test_paper_summary: Option<TestPaperSummary>,
    generated_assessment: Option<GeneratedAssessment>,
    failure: Option<StepFailure>,
    steps_run: Vec<Step>,
    artifacts: Vec<PathBuf>,
}

impl WorkflowState {
    /// 用两个输入引用创建初始状态
    pub fn new(
        source_document_ref: impl Into<String>,
        reference_test_paper_ref: impl Into<String>,
    ) -> Self {
        Self {
            source_document_ref: source_document_ref.into(),
            reference_test_paper_ref: reference_test_paper_ref.into(),
            document_text: None,
            test_paper_summary: None,
            generated_assessment: None,
            failure: None,
            steps_run: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn source_document_ref(&self) -> &str {
        &self.source_document_ref
    }

    pub fn reference_test_paper_ref(&self) -> &str {
        &self.reference_test_paper_ref
    }

    pub fn document_text(&self) -> Option<&DocumentText> {
        self.document_text.as_ref()
    }

    pub fn test_paper_summary(&self) -> Option<&TestPaperSummary> {
        self.test_paper_summary.as_ref()
    }

    pub fn generated_assessment(&self) -> Option<&GeneratedAssessment> {
        self.generated_assessment.as_ref()
    }

    pub fn failure(&self) -> Option<&StepFailure> {
        self.failure.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// 已执行的步骤（按执行顺序）
    pub fn steps_run(&self) -> &[Step] {
        &self.steps_run
    }

    /// 本次运行写入的产物文件
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    // ========== 仅供工作流引擎修改 ==========

    pub(crate) fn set_document_text(&mut self, document: DocumentText) {
        if self.document_text.is_none() {
            self.document_text = Some(document);
        }
    }

    pub(crate) fn set_test_paper_summary(&mut self, summary: TestPaperSummary) {
        if self.test_paper_summary.is_none() {
            self.test_paper_summary = Some(summary);
        }
    }

    pub(crate) fn set_generated_assessment(&mut self, generated: GeneratedAssessment) {
        if self.generated_assessment.is_none() {
            self.generated_assessment = Some(generated);
        }
    }

    /// 记录失败，已有失败时忽略后来的错误
    pub(crate) fn record_failure(&mut self, step: Step, error: AppError) {
        match &self.failure {
            Some(first) => debug!(
                "已存在失败 {}，忽略步骤 {} 的错误: {}",
                first, step, error
            ),
            None => self.failure = Some(StepFailure { step, error }),
        }
    }

    pub(crate) fn mark_step(&mut self, step: Step) {
        self.steps_run.push(step);
    }

    pub(crate) fn push_artifacts(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.artifacts.extend(paths);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;

    fn load_error(reference: &str) -> AppError {
        LoadError::NoPages {
            reference: reference.to_string(),
        }
        .into()
    }

    #[test]
    fn test_first_failure_wins() {
        let mut state = WorkflowState::new("lesson.pdf", "paper.pdf");
        state.record_failure(Step::Summarize, load_error("paper.pdf"));
        state.record_failure(Step::Generate, AppError::workflow("later"));

        let failure = state.failure().unwrap();
        assert_eq!(failure.step, Step::Summarize);
        assert!(failure.error.to_string().contains("paper.pdf"));
        assert!(failure.to_string().starts_with("[步骤 Summarize]"));
    }

    #[test]
    fn test_fields_set_only_once() {
        let mut state = WorkflowState::new("lesson.pdf", "paper.pdf");
        state.set_document_text(DocumentText::from_pages("lesson.pdf", vec!["first".into()]));
        state.set_document_text(DocumentText::from_pages("lesson.pdf", vec!["second".into()]));

        assert_eq!(state.document_text().unwrap().text, "first");
    }

    #[test]
    fn test_transitions() {
        let mut state = WorkflowState::new("lesson.pdf", "paper.pdf");
        assert_eq!(Step::Summarize.next(&state), Some(Step::Finish));
        assert_eq!(Step::LoadContent.next(&state), Some(Step::Finish));
        assert_eq!(Step::Generate.next(&state), Some(Step::Finish));
        assert_eq!(Step::Finish.next(&state), None);

        state.set_test_paper_summary(TestPaperSummary::default());
        assert_eq!(Step::Summarize.next(&state), Some(Step::LoadContent));

        state.set_document_text(DocumentText::from_pages("lesson.pdf", vec!["text".into()]));
        assert_eq!(Step::LoadContent.next(&state), Some(Step::Generate));
    }
}
