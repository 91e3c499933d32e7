//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是整个系统的入口，负责应用生命周期：
//! - 校验配置
//! - 组装流程所需的能力（文档加载、LLM、模板、产物存储）
//! - 运行一次流程并输出统计
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次运行)
//!     ↓
//! workflow::AssessmentWorkflow (Summarize → LoadContent → Generate → Finish)
//!     ↓
//! services (能力层：模板 / 清洗 / 产物 / 报告)
//!     ↓
//! clients + infrastructure (LLM 客户端、PDF 加载)
//! ```

pub mod app;

pub use app::App;
