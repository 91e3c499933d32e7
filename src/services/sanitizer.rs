//! 模型输出清洗 - 业务能力层
//!
//! 去掉模型常见的 markdown 代码块包裹，只保留正文

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// 清洗 LLM 原始输出
///
/// 去掉开头的 ```` ```json ```` / ```` ``` ```` 和结尾的 ```` ``` ````，再去掉首尾空白。
/// 对已清洗的文本再次调用不会有任何变化。
pub fn clean(raw: &str) -> String {
    let mut text = raw.trim();

    // 直到两端都没有围栏为止，保证幂等
    loop {
        let before = text;

        if let Some(rest) = text.strip_prefix(JSON_FENCE) {
            text = rest.trim();
        } else if let Some(rest) = text.strip_prefix(FENCE) {
            text = rest.trim();
        }

        if let Some(rest) = text.strip_suffix(FENCE) {
            text = rest.trim();
        }

        if text.len() == before.len() {
            break;
        }
    }

    text.to_string()
}
