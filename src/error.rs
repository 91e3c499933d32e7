use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档加载错误
    #[error("文档加载错误: {0}")]
    Load(#[from] LoadError),
    /// 提示词模板错误
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 模型输出解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 产物写入错误
    #[error("序列化错误: {0}")]
    Serialization(#[from] SerializationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 流程前置条件不满足
    #[error("流程错误: {0}")]
    Workflow(String),
}

/// 文档加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 云存储地址格式不正确
    #[error("无效的云存储地址: {reference}")]
    InvalidLocator { reference: String },
    /// 本地文件不存在
    #[error("文件不存在: {}", path.display())]
    NotFound { path: PathBuf },
    /// 读取本地文件失败
    #[error("读取文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 请求云存储失败
    #[error("下载失败 ({reference}): {source}")]
    FetchFailed {
        reference: String,
        #[source]
        source: reqwest::Error,
    },
    /// 云存储返回非成功状态码
    #[error("下载失败 ({reference}): HTTP {status}")]
    BadStatus { reference: String, status: u16 },
    /// PDF 解析失败
    #[error("PDF解析失败 ({reference}): {source}")]
    Extraction {
        reference: String,
        #[source]
        source: lopdf::Error,
    },
    /// PDF 不包含任何页面
    #[error("PDF没有可提取的页面: {reference}")]
    NoPages { reference: String },
    /// 提取到的文本为空
    #[error("文档文本为空: {reference}")]
    EmptyText { reference: String },
    /// 后台提取任务异常退出
    #[error("提取任务失败 ({reference}): {message}")]
    TaskFailed { reference: String, message: String },
}

/// 提示词模板错误
#[derive(Debug, Error)]
pub enum TemplateError {
    /// 模板文件不存在
    #[error("模板不存在: {}", path.display())]
    NotFound { path: PathBuf },
    /// 读取模板失败
    #[error("读取模板失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 缺少模板变量
    #[error("模板 {template} 缺少变量: {variable}")]
    MissingVariable { template: String, variable: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建LLM请求失败 (模型: {model}): {source}")]
    RequestBuildFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 模型输出解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 不是合法 JSON
    #[error("{context} 不是合法的JSON: {source}")]
    InvalidJson {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    /// JSON 结构不符合预期
    #[error("{context} 的JSON结构不符合预期: {detail}")]
    UnexpectedShape { context: String, detail: String },
}

/// 产物写入错误
#[derive(Debug, Error)]
pub enum SerializationError {
    /// 原始文本不是合法 JSON
    #[error("内容不是合法的JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
    /// 序列化失败
    #[error("序列化失败: {source}")]
    EncodeFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 报告 PDF 生成失败
    #[error("PDF生成失败: {source}")]
    RenderFailed {
        #[source]
        source: lopdf::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({}): {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", path.display())]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 缺少必要的输入
    #[error("缺少必要配置: {name}")]
    MissingInput { name: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建流程前置条件错误
    pub fn workflow(message: impl Into<String>) -> Self {
        AppError::Workflow(message.into())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
