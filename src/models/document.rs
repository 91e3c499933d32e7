use serde::{Deserialize, Serialize};

/// 从 PDF 中提取出的文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    /// 来源（本地路径或 gs:// 地址）
    pub source: String,
    /// 所有页面文本按页序以换行拼接
    pub text: String,
    /// 页数
    pub page_count: usize,
}

impl DocumentText {
    /// 按页序拼接页面文本
    pub fn from_pages(source: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            source: source.into(),
            page_count: pages.len(),
            text: pages.join("\n"),
        }
    }

    /// 是否没有任何可用文本
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
