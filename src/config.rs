use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置文件
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 课程内容 PDF（本地路径或 gs:// 地址）
    pub source_document: String,
    /// 参考试卷 PDF（本地路径或 gs:// 地址）
    pub reference_test_paper: String,
    /// 科目名称，用于产物文件名
    pub subject: String,
    /// 产物输出目录
    pub artifacts_dir: PathBuf,
    /// 提示词模板目录
    pub prompts_dir: PathBuf,
    /// 是否额外生成可打印的文本试卷
    pub write_report: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub summary_model: String,
    pub summary_temperature: f32,
    pub generation_model: String,
    pub generation_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 云存储配置 ---
    pub gcs_endpoint: String,
    pub gcs_access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_document: String::new(),
            reference_test_paper: String::new(),
            subject: "mathematics".to_string(),
            artifacts_dir: PathBuf::from("assessments"),
            prompts_dir: PathBuf::from("prompts"),
            write_report: true,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            summary_model: "gemini-1.5-pro-002".to_string(),
            summary_temperature: 0.2,
            generation_model: "gemini-1.5-pro-002".to_string(),
            generation_temperature: 0.7,
            llm_max_tokens: 8192,
            gcs_endpoint: "https://storage.googleapis.com".to_string(),
            gcs_access_token: None,
        }
    }
}

impl Config {
    /// 从默认值和环境变量加载
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// 从 TOML 文件加载，缺省的键使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::FileReadFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖当前配置
    pub fn apply_env(self) -> Self {
        Self {
            source_document: env_or("SOURCE_DOCUMENT", self.source_document),
            reference_test_paper: env_or("REFERENCE_TEST_PAPER", self.reference_test_paper),
            subject: env_or("SUBJECT", self.subject),
            artifacts_dir: std::env::var("ARTIFACTS_DIR").map(PathBuf::from).unwrap_or(self.artifacts_dir),
            prompts_dir: std::env::var("PROMPTS_DIR").map(PathBuf::from).unwrap_or(self.prompts_dir),
            write_report: env_parse_or("WRITE_REPORT", self.write_report),
            verbose_logging: env_parse_or("VERBOSE_LOGGING", self.verbose_logging),
            llm_api_key: env_or("LLM_API_KEY", self.llm_api_key),
            llm_api_base_url: env_or("LLM_API_BASE_URL", self.llm_api_base_url),
            summary_model: env_or("SUMMARY_MODEL", self.summary_model),
            summary_temperature: env_parse_or("SUMMARY_TEMPERATURE", self.summary_temperature),
            generation_model: env_or("GENERATION_MODEL", self.generation_model),
            generation_temperature: env_parse_or("GENERATION_TEMPERATURE", self.generation_temperature),
            llm_max_tokens: env_parse_or("LLM_MAX_TOKENS", self.llm_max_tokens),
            gcs_endpoint: env_or("GCS_ENDPOINT", self.gcs_endpoint),
            gcs_access_token: std::env::var("GCS_ACCESS_TOKEN").ok().or(self.gcs_access_token),
        }
    }

    /// 检查两个输入引用是否都已配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_document.trim().is_empty() {
            return Err(ConfigError::MissingInput {
                name: "source_document".to_string(),
            });
        }
        if self.reference_test_paper.trim().is_empty() {
            return Err(ConfigError::MissingInput {
                name: "reference_test_paper".to_string(),
            });
        }
        Ok(())
    }
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

fn env_parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
