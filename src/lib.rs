//! # Test Paper Gen
//!
//! 根据参考试卷和课程内容，用 LLM 生成新试卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure / Clients）
//! - `infrastructure/` - PDF 加载（本地路径或 `gs://` 云存储），只暴露能力
//! - `clients/` - OpenAI 兼容的 LLM 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PromptRenderer` - 提示词模板渲染
//! - `clean` - 去掉模型输出的代码块标记
//! - `ArtifactStore` - 写摘要 / 试卷产物
//! - `render_report` - 可打印的 PDF 试卷
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次生成的完整流程
//! - `WorkflowState` - 各步骤共享的状态
//! - `AssessmentWorkflow` - 流程编排（Summarize → LoadContent → Generate → Finish）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 校验配置、组装能力、运行流程、输出统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{LlmClient, OpenAiLlmClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{DocumentLoader, PdfDocumentLoader};
pub use models::{Assessment, DocumentText, GeneratedAssessment, TestPaperSummary};
pub use orchestrator::App;
pub use workflow::{AssessmentWorkflow, Step, WorkflowSettings, WorkflowState};
