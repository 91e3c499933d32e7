//! 产物存储服务 - 业务能力层
//!
//! 只负责"把摘要 / 试卷写到磁盘"，不关心流程
//!
//! 文件布局：`{artifacts_dir}/{YYYYMMDD_HHMMSS}_{subject}_{kind}.{json|pdf}`
//!
//! 科目名中除字母、数字、`-`、`_` 以外的字符都替换为 `_`，文件只会落在产物目录内

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::SerializationError;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 产物类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Summary,
    Assessment,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Summary => "summary",
            ArtifactKind::Assessment => "assessment",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产物存储服务
pub struct ArtifactStore {
    artifacts_dir: PathBuf,
}

impl ArtifactStore {
    /// 创建产物存储服务
    pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifacts_dir: artifacts_dir.into(),
        }
    }

    /// 产物目录
    pub fn dir(&self) -> &Path {
        &self.artifacts_dir
    }

    /// 将结构化内容写为 JSON 文件
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn persist<T: Serialize + ?Sized>(
        &self,
        content: &T,
        kind: ArtifactKind,
        subject: &str,
    ) -> Result<PathBuf, SerializationError> {
        let json = serde_json::to_string_pretty(content)
            .map_err(|source| SerializationError::EncodeFailed { source })?;

        let path = self.artifact_path(subject, kind.as_str(), "json");
        self.write(&path, json.as_bytes()).await?;

        info!("✓ {} 已保存: {}", kind, path.display());
        Ok(path)
    }

    /// 将模型返回的原始文本写为 JSON 文件
    ///
    /// 文本必须是合法 JSON，否则返回 [`SerializationError::InvalidJson`]，不会写入任何文件
    pub async fn persist_text(
        &self,
        text: &str,
        kind: ArtifactKind,
        subject: &str,
    ) -> Result<PathBuf, SerializationError> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|source| SerializationError::InvalidJson { source })?;
        self.persist(&value, kind, subject).await
    }

    /// 写入可打印的 PDF 报告（`.pdf`）
    pub async fn persist_report(
        &self,
        pdf: &[u8],
        kind: ArtifactKind,
        subject: &str,
    ) -> Result<PathBuf, SerializationError> {
        let path = self.artifact_path(subject, kind.as_str(), "pdf");
        self.write(&path, pdf).await?;

        info!("✓ PDF 报告已保存: {}", path.display());
        Ok(path)
    }

    fn artifact_path(&self, subject: &str, kind: &str, extension: &str) -> PathBuf {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        self.artifacts_dir.join(format!(
            "{}_{}_{}.{}",
            timestamp,
            file_safe(subject),
            kind,
            extension
        ))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SerializationError> {
        tokio::fs::create_dir_all(&self.artifacts_dir)
            .await
            .map_err(|source| SerializationError::CreateDirFailed {
                path: self.artifacts_dir.clone(),
                source,
            })?;

        debug!("写入文件: {} ({} 字节)", path.display(), bytes.len());

        let write_failed = |source| SerializationError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(path).await.map_err(write_failed)?;
        file.write_all(bytes).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        Ok(())
    }
}

/// 把科目名转换为可以安全放进文件名的形式
fn file_safe(subject: &str) -> String {
    let safe: String = subject
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if safe.is_empty() {
        "untitled".to_string()
    } else {
        safe
    }
}
