//! 流程层（Workflow Layer）
//!
//! - `state` - 一次运行的共享状态和步骤定义
//! - `engine` - 四个步骤的执行和分支

pub mod engine;
pub mod state;

pub use engine::{AssessmentWorkflow, WorkflowSettings};
pub use state::{Step, StepFailure, WorkflowState};
