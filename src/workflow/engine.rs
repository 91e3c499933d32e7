//! 试卷生成流程 - 流程层
//!
//! 核心职责：按固定顺序执行四个步骤
//!
//! ```text
//! Summarize ──有摘要──▶ LoadContent ──有文本──▶ Generate ──▶ Finish
//!     │                     │
//!     └──────失败───────────┴──────────────────────────────▶ Finish
//! ```
//!
//! - 每个步骤自己捕获错误，写入 `WorkflowState` 的失败字段
//! - 无论成功与否，最终都会执行 Finish
//! - 不重试任何步骤

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::clients::{LlmClient, OpenAiLlmClient};
use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError, LoadError, SerializationError};
use crate::infrastructure::{DocumentLoader, PdfDocumentLoader};
use crate::models::{GeneratedAssessment, TestPaperSummary};
use crate::services::prompt_renderer::{GENERATE_TEMPLATE, SUMMARIZE_TEMPLATE};
use crate::services::{clean, render_report, ArtifactKind, ArtifactStore, PromptRenderer};
use crate::utils::logging::truncate_text;
use crate::workflow::state::{Step, WorkflowState};

/// 日志中文本预览的长度
const PREVIEW_CHARS: usize = 100;

/// 流程参数
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// 科目，用于产物文件名
    pub subject: String,
    pub summary_model: String,
    pub summary_temperature: f32,
    pub generation_model: String,
    pub generation_temperature: f32,
    /// 结构化试卷是否额外写出 PDF 报告
    pub write_report: bool,
}

impl From<&Config> for WorkflowSettings {
    fn from(config: &Config) -> Self {
        Self {
            subject: config.subject.clone(),
            summary_model: config.summary_model.clone(),
            summary_temperature: config.summary_temperature,
            generation_model: config.generation_model.clone(),
            generation_temperature: config.generation_temperature,
            write_report: config.write_report,
        }
    }
}

/// 试卷生成流程
///
/// - 编排四个步骤并决定分支
/// - 只依赖能力（loader / llm / renderer / store），不关心它们的实现
pub struct AssessmentWorkflow {
    loader: Arc<dyn DocumentLoader>,
    llm: Arc<dyn LlmClient>,
    renderer: PromptRenderer,
    store: ArtifactStore,
    settings: WorkflowSettings,
}

impl AssessmentWorkflow {
    /// 使用指定的能力创建流程
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        llm: Arc<dyn LlmClient>,
        renderer: PromptRenderer,
        store: ArtifactStore,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            loader,
            llm,
            renderer,
            store,
            settings,
        }
    }

    /// 按配置创建真实的 PDF 加载器和 LLM 客户端
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(PdfDocumentLoader::new(config)),
            Arc::new(OpenAiLlmClient::new(config)),
            PromptRenderer::new(&config.prompts_dir),
            ArtifactStore::new(&config.artifacts_dir),
            WorkflowSettings::from(config),
        )
    }

    /// 执行完整流程
    ///
    /// 永远不会返回错误：失败信息记录在返回的状态里
    pub async fn run(&self, mut state: WorkflowState) -> WorkflowState {
        let mut current = Some(Step::Summarize);

        while let Some(step) = current {
            info!("[步骤 {}] ▶ 开始", step);
            state.mark_step(step);

            let outcome = match step {
                Step::Summarize => self.summarize(&mut state).await,
                Step::LoadContent => self.load_content(&mut state).await,
                Step::Generate => self.generate(&mut state).await,
                Step::Finish => {
                    self.finish(&mut state).await;
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                warn!("[步骤 {}] ⚠️ 失败: {}", step, e);
                state.record_failure(step, e);
            }

            current = step.next(&state);
            debug!("[步骤 {}] 下一步: {:?}", step, current);
        }

        state
    }

    /// Summarize：读取参考试卷并让模型总结结构
    async fn summarize(&self, state: &mut WorkflowState) -> AppResult<()> {
        let reference = state.reference_test_paper_ref().to_string();
        info!("[步骤 Summarize] 📄 参考试卷: {}", reference);

        let paper = self.loader.load(&reference).await?;
        if paper.is_blank() {
            return Err(LoadError::EmptyText { reference }.into());
        }
        debug!(
            "[步骤 Summarize] 试卷文本预览: {}",
            truncate_text(&paper.text, PREVIEW_CHARS)
        );

        let variables = HashMap::from([("test_paper_text", paper.text)]);
        let prompt = self.renderer.render(SUMMARIZE_TEMPLATE, &variables).await?;

        let raw = self
            .llm
            .complete(
                &prompt,
                &self.settings.summary_model,
                self.settings.summary_temperature,
            )
            .await?;
        let cleaned = clean(&raw);

        let summary = TestPaperSummary::parse(&cleaned).map_err(|e| {
            debug!("[步骤 Summarize] 模型输出: {}", truncate_text(&cleaned, 500));
            e
        })?;

        info!(
            "[步骤 Summarize] ✓ 试卷摘要完成: {} 个大题, 共 {} 分",
            summary.sections.len(),
            summary.total_marks()
        );

        // 摘要保存失败不影响流程
        match self
            .store
            .persist(&summary, ArtifactKind::Summary, &self.settings.subject)
            .await
        {
            Ok(path) => state.push_artifacts([path]),
            Err(e) => warn!("[步骤 Summarize] ⚠️ 摘要保存失败: {}", e),
        }

        state.set_test_paper_summary(summary);
        Ok(())
    }

    /// LoadContent：读取课程内容
    async fn load_content(&self, state: &mut WorkflowState) -> AppResult<()> {
        let reference = state.source_document_ref().to_string();
        info!("[步骤 LoadContent] 📚 课程内容: {}", reference);

        let document = self.loader.load(&reference).await?;
        if document.is_blank() {
            return Err(LoadError::EmptyText { reference }.into());
        }

        info!(
            "[步骤 LoadContent] ✓ 课程内容加载完成: {} 页, {} 字符",
            document.page_count,
            document.text.len()
        );
        debug!(
            "[步骤 LoadContent] 文本预览: {}",
            truncate_text(&document.text, PREVIEW_CHARS)
        );

        state.set_document_text(document);
        Ok(())
    }

    /// Generate：根据课程内容和试卷摘要生成新试卷
    async fn generate(&self, state: &mut WorkflowState) -> AppResult<()> {
        let (Some(document), Some(summary)) = (state.document_text(), state.test_paper_summary())
        else {
            return Err(AppError::workflow(
                "缺少课程内容或试卷摘要，无法生成试卷",
            ));
        };

        let analysis = serde_json::to_string(summary)
            .map_err(|source| SerializationError::EncodeFailed { source })?;
        let file_uris = serde_json::to_string(&[state.source_document_ref()])
            .map_err(|source| SerializationError::EncodeFailed { source })?;

        let variables = HashMap::from([
            ("chapter_content_summary", document.text.clone()),
            ("test_paper_analysis", analysis),
            ("file_uris", file_uris),
        ]);
        let prompt = self.renderer.render(GENERATE_TEMPLATE, &variables).await?;

        info!("[步骤 Generate] 🤖 正在生成试卷...");
        let model = &self.settings.generation_model;
        let raw = self
            .llm
            .complete(&prompt, model, self.settings.generation_temperature)
            .await?;

        let cleaned = clean(&raw);
        if cleaned.is_empty() {
            return Err(LlmError::EmptyContent {
                model: model.clone(),
            }
            .into());
        }

        let (generated, parse_error) = GeneratedAssessment::from_cleaned(cleaned);
        match (&generated.structured, parse_error) {
            (Some(assessment), _) => info!(
                "[步骤 Generate] ✓ 试卷生成完成: {} ({} 道选择题)",
                assessment.summary.chapter_name,
                assessment.mcqs.len()
            ),
            (None, Some(e)) => warn!(
                "[步骤 Generate] ⚠️ 输出不是预期的试卷结构，按原始文本保留: {}",
                e
            ),
            (None, None) => {}
        }

        state.set_generated_assessment(generated);
        Ok(())
    }

    /// Finish：汇报结果，保存试卷
    async fn finish(&self, state: &mut WorkflowState) {
        match state.failure() {
            Some(failure) => error!("[步骤 Finish] ❌ 流程失败 {}", failure),
            None => info!("[步骤 Finish] ✅ 所有步骤执行成功"),
        }

        let Some(generated) = state.generated_assessment() else {
            info!("[步骤 Finish] 没有生成的试卷，跳过保存");
            return;
        };

        let paths = self.persist_assessment(generated).await;
        state.push_artifacts(paths);
    }

    /// 保存试卷，失败只记录日志
    async fn persist_assessment(&self, generated: &GeneratedAssessment) -> Vec<PathBuf> {
        let subject = &self.settings.subject;
        let mut paths = Vec::new();

        let persisted = match &generated.structured {
            Some(assessment) => {
                self.store
                    .persist(assessment, ArtifactKind::Assessment, subject)
                    .await
            }
            None => {
                self.store
                    .persist_text(&generated.raw, ArtifactKind::Assessment, subject)
                    .await
            }
        };

        match persisted {
            Ok(path) => paths.push(path),
            Err(e) => {
                error!("[步骤 Finish] ❌ 试卷保存失败: {}", e);
                return paths;
            }
        }

        if let (true, Some(assessment)) = (self.settings.write_report, &generated.structured) {
            let saved = match render_report(assessment) {
                Ok(pdf) => {
                    self.store
                        .persist_report(&pdf, ArtifactKind::Assessment, subject)
                        .await
                }
                Err(e) => Err(e),
            };
            match saved {
                Ok(path) => paths.push(path),
                Err(e) => warn!("[步骤 Finish] ⚠️ PDF 报告保存失败: {}", e),
            }
        }

        paths
    }
}
