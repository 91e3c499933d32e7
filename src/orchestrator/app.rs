//! 应用入口 - 编排层
//!
//! 持有配置和流程，运行一次完整的试卷生成

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::{AssessmentWorkflow, WorkflowState};

/// 应用主结构
pub struct App {
    config: Config,
    workflow: AssessmentWorkflow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        let workflow = AssessmentWorkflow::from_config(&config);
        Ok(Self::with_workflow(config, workflow))
    }

    /// 使用已组装好的流程创建应用
    pub fn with_workflow(config: Config, workflow: AssessmentWorkflow) -> Self {
        Self { config, workflow }
    }

    /// 运行应用主逻辑
    ///
    /// 流程内部的失败记录在返回的状态里，不作为错误返回
    pub async fn run(&self) -> Result<WorkflowState> {
        log_startup(&self.config);

        let state = WorkflowState::new(
            self.config.source_document.as_str(),
            self.config.reference_test_paper.as_str(),
        );

        info!("\n🧭 开始执行试卷生成流程");
        let state = self.workflow.run(state).await;

        print_final_stats(&state);
        Ok(state)
    }
}
