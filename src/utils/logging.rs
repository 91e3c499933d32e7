/// 日志工具模块
///
/// 提供启动横幅、最终统计和文本截断等辅助函数
use tracing::{error, info};

use crate::config::Config;
use crate::workflow::WorkflowState;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 本次运行的配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷生成模式");
    info!("📚 课程内容: {}", config.source_document);
    info!("📄 参考试卷: {}", config.reference_test_paper);
    info!("📘 科目: {}", config.subject);
    info!(
        "🤖 摘要模型: {} (temperature {})",
        config.summary_model, config.summary_temperature
    );
    info!(
        "🤖 生成模型: {} (temperature {})",
        config.generation_model, config.generation_temperature
    );
    info!("📁 产物目录: {}", config.artifacts_dir.display());
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `state`: 流程结束后的状态
pub fn print_final_stats(state: &WorkflowState) {
    let steps = state
        .steps_run()
        .iter()
        .map(|step| step.name())
        .collect::<Vec<_>>()
        .join(" → ");

    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🧭 执行步骤: {}", steps);

    match state.failure() {
        Some(failure) => error!("❌ 失败: {}", failure),
        None => info!("✅ 成功"),
    }

    if let Some(assessment) = state
        .generated_assessment()
        .and_then(|generated| generated.structured.as_ref())
    {
        let counts = assessment.count_by_difficulty();
        info!(
            "📝 选择题: {} 道 (Easy {}, Medium {}, Hard {})",
            assessment.mcqs.len(),
            counts.easy,
            counts.medium,
            counts.hard
        );
    }

    if state.artifacts().is_empty() {
        info!("📁 没有写入任何产物");
    } else {
        for path in state.artifacts() {
            info!("📁 产物: {}", path.display());
        }
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
