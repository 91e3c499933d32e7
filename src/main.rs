use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use test_paper_gen::{logger, App, Config};

/// 根据参考试卷和课程内容生成新试卷
#[derive(Parser, Debug)]
#[command(name = "test_paper_gen", version, about = "Generate an assessment from a lesson PDF and a reference test paper")]
struct Cli {
    /// TOML 配置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 课程内容 PDF（本地路径或 gs:// 地址）
    #[arg(long, value_name = "REF")]
    source: Option<String>,

    /// 参考试卷 PDF（本地路径或 gs:// 地址）
    #[arg(long, value_name = "REF")]
    reference: Option<String>,

    /// 科目名称
    #[arg(long)]
    subject: Option<String>,

    /// 产物输出目录
    #[arg(long, value_name = "DIR")]
    artifacts_dir: Option<PathBuf>,

    /// 显示详细日志
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// 加载顺序：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
    fn load_config(&self) -> Result<Config> {
        let base = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        let mut config = base.apply_env();

        if let Some(source) = &self.source {
            config.source_document = source.clone();
        }
        if let Some(reference) = &self.reference {
            config.reference_test_paper = reference.clone();
        }
        if let Some(subject) = &self.subject {
            config.subject = subject.clone();
        }
        if let Some(dir) = &self.artifacts_dir {
            config.artifacts_dir = dir.clone();
        }
        config.verbose_logging |= self.verbose;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let config = cli.load_config()?;

    // 初始化日志
    logger::init_with_verbose(config.verbose_logging);

    // 初始化并运行应用
    let state = App::initialize(config)?.run().await?;

    Ok(if state.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
