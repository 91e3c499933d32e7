//! 文档加载器 - 基础设施层
//!
//! 只暴露"根据引用拿到 PDF 文本"的能力：
//! - `gs://bucket/object` 通过云存储 HTTP 接口下载
//! - 其他引用一律视为本地路径

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::LoadError;
use crate::infrastructure::pdf;
use crate::models::DocumentText;

/// 云存储地址前缀
pub const GCS_SCHEME: &str = "gs://";

/// 文档来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocator {
    /// 云存储对象
    Cloud { bucket: String, object: String },
    /// 本地文件
    Local(PathBuf),
}

impl DocumentLocator {
    /// 按前缀判断来源
    pub fn parse(reference: &str) -> Result<Self, LoadError> {
        let Some(rest) = reference.strip_prefix(GCS_SCHEME) else {
            return Ok(DocumentLocator::Local(PathBuf::from(reference)));
        };

        match rest.split_once('/') {
            Some((bucket, object)) if !bucket.is_empty() && !object.is_empty() => {
                Ok(DocumentLocator::Cloud {
                    bucket: bucket.to_string(),
                    object: object.to_string(),
                })
            }
            _ => Err(LoadError::InvalidLocator {
                reference: reference.to_string(),
            }),
        }
    }
}

/// 文档加载能力
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// 读取引用指向的文档文本
    async fn load(&self, reference: &str) -> Result<DocumentText, LoadError>;
}

/// PDF 文档加载器（本地 + 云存储）
pub struct PdfDocumentLoader {
    http: reqwest::Client,
    gcs_endpoint: String,
    gcs_access_token: Option<String>,
}

impl PdfDocumentLoader {
    /// 创建新的文档加载器
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            gcs_endpoint: config.gcs_endpoint.trim_end_matches('/').to_string(),
            gcs_access_token: config.gcs_access_token.clone(),
        }
    }

    /// 云存储对象的下载地址
    fn object_url(&self, bucket: &str, object: &str) -> String {
        format!("{}/{}/{}", self.gcs_endpoint, bucket, object)
    }

    async fn fetch_cloud(
        &self,
        reference: &str,
        bucket: &str,
        object: &str,
    ) -> Result<Vec<u8>, LoadError> {
        let url = self.object_url(bucket, object);
        info!("☁️ 正在从云存储下载: {}", reference);
        debug!("下载地址: {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.gcs_access_token {
            request = request.bearer_auth(token);
        }

        let fetch_failed = |source| LoadError::FetchFailed {
            reference: reference.to_string(),
            source,
        };

        let response = request.send().await.map_err(fetch_failed)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::BadStatus {
                reference: reference.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(fetch_failed)?;
        debug!("下载完成: {} 字节", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn read_local(&self, path: &Path) -> Result<Vec<u8>, LoadError> {
        info!("📄 正在读取本地文件: {}", path.display());

        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::NotFound {
                path: path.to_path_buf(),
            }),
            Err(source) => Err(LoadError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[async_trait]
impl DocumentLoader for PdfDocumentLoader {
    async fn load(&self, reference: &str) -> Result<DocumentText, LoadError> {
        let bytes = match DocumentLocator::parse(reference)? {
            DocumentLocator::Cloud { bucket, object } => {
                self.fetch_cloud(reference, &bucket, &object).await?
            }
            DocumentLocator::Local(path) => self.read_local(&path).await?,
        };

        // PDF 解析是 CPU 密集操作，放到阻塞线程池
        let owned_reference = reference.to_string();
        let pages = tokio::task::spawn_blocking(move || pdf::extract_pages(&owned_reference, &bytes))
            .await
            .map_err(|e| LoadError::TaskFailed {
                reference: reference.to_string(),
                message: e.to_string(),
            })??;

        let document = DocumentText::from_pages(reference, pages);
        info!(
            "✓ 文档加载完成: {} 页, {} 字符",
            document.page_count,
            document.text.len()
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_locator() {
        let locator =
            DocumentLocator::parse("gs://bhagavan-pub-bucket/aignite-resources/jemh1a1.pdf")
                .unwrap();
        assert_eq!(
            locator,
            DocumentLocator::Cloud {
                bucket: "bhagavan-pub-bucket".to_string(),
                object: "aignite-resources/jemh1a1.pdf".to_string(),
            }
        );
    }

    #[test]
    fn test_local_locator() {
        let locator = DocumentLocator::parse("testpapers/sample-test-paper3.pdf").unwrap();
        assert_eq!(
            locator,
            DocumentLocator::Local(PathBuf::from("testpapers/sample-test-paper3.pdf"))
        );
    }

    #[test]
    fn test_malformed_cloud_locator() {
        for reference in ["gs://", "gs://bucket", "gs://bucket/", "gs:///object.pdf"] {
            assert!(
                matches!(
                    DocumentLocator::parse(reference),
                    Err(LoadError::InvalidLocator { .. })
                ),
                "应当拒绝: {}",
                reference
            );
        }
    }

    #[test]
    fn test_object_url() {
        let config = Config {
            gcs_endpoint: "https://storage.example.com/".to_string(),
            ..Config::default()
        };
        let loader = PdfDocumentLoader::new(&config);
        assert_eq!(
            loader.object_url("bucket", "dir/file.pdf"),
            "https://storage.example.com/bucket/dir/file.pdf"
        );
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let loader = PdfDocumentLoader::new(&Config::default());
        let err = loader.load("no/such/lesson.pdf").await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_non_pdf_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"just some text, not a pdf").unwrap();

        let loader = PdfDocumentLoader::new(&Config::default());
        let err = loader.load(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, LoadError::Extraction { .. }));
    }
}
