//! PDF 读写
//!
//! - `extract_pages`：按页提取文本
//! - `write_text_pages`：把若干页纯文本排版成 PDF
//!
//! 都是同步函数，需要时由调用方放到阻塞线程池

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::LoadError;

/// 按页序提取每一页的文本
pub fn extract_pages(reference: &str, bytes: &[u8]) -> Result<Vec<String>, LoadError> {
    let extraction_failed = |source| LoadError::Extraction {
        reference: reference.to_string(),
        source,
    };

    let document = Document::load_mem(bytes).map_err(extraction_failed)?;

    // BTreeMap，键为从 1 开始的页码
    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(LoadError::NoPages {
            reference: reference.to_string(),
        });
    }

    pages
        .keys()
        .map(|&page_number| {
            document
                .extract_text(&[page_number])
                .map(|text| text.trim_end().to_string())
                .map_err(extraction_failed)
        })
        .collect()
}

/// A4 页面尺寸（pt）
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 10;
const LINE_HEIGHT: i64 = 14;

/// 每页可容纳的行数
pub const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_HEIGHT) as usize;

/// 每行最多字符数（Courier 10pt 每字符宽 6pt）
pub const CHARS_PER_LINE: usize = ((PAGE_WIDTH - 2 * MARGIN) / 6) as usize;

/// 把每页的文本行写成 PDF
///
/// 使用内置 Courier 字体和 WinAnsi 编码，无法编码的字符替换为 `?`
pub fn write_text_pages(pages: &[Vec<String>]) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for lines in pages {
        let content = Content {
            operations: page_operations(lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        kids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }));
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids.into_iter().map(Object::from).collect::<Vec<_>>(),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// 每行一个文本块，提取时每行各占一行
fn page_operations(lines: &[String]) -> Vec<Operation> {
    let top = PAGE_HEIGHT - MARGIN;
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .flat_map(|(row, line)| {
            let y = top - row as i64 * LINE_HEIGHT;
            [
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
                Operation::new("Td", vec![MARGIN.into(), y.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(win_ansi_bytes(line), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ]
        })
        .collect()
}

/// Latin-1 范围内的字符按原值编码，其余替换为 `?`
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
        let pages: Vec<Vec<String>> = page_texts.iter().map(|t| vec![t.to_string()]).collect();
        write_text_pages(&pages).unwrap()
    }

    #[test]
    fn test_pages_extracted_in_order() {
        let bytes = build_pdf(&["Chapter 1: Algebra", "Exercise 1.1"]);
        let pages = extract_pages("lesson.pdf", &bytes).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Chapter 1: Algebra"));
        assert!(pages[1].contains("Exercise 1.1"));
    }

    #[test]
    fn test_multiple_lines_per_page() {
        let lines = vec![
            "1. HCF of 6 and 20?".to_string(),
            String::new(),
            "  a. 1".to_string(),
        ];
        let bytes = write_text_pages(&[lines]).unwrap();
        let pages = extract_pages("report.pdf", &bytes).unwrap();

        assert_eq!(pages.len(), 1);
        let first = pages[0].find("HCF of 6 and 20?").unwrap();
        let option = pages[0].find("a. 1").unwrap();
        assert!(first < option);
    }

    #[test]
    fn test_non_latin_text_is_replaced() {
        assert_eq!(win_ansi_bytes("x²代"), vec![b'x', 0xB2, b'?']);
    }

    #[test]
    fn test_document_without_pages() {
        let bytes = build_pdf(&[]);
        let err = extract_pages("empty.pdf", &bytes).unwrap_err();
        assert!(matches!(err, LoadError::NoPages { .. }));
    }

    #[test]
    fn test_garbage_bytes() {
        let err = extract_pages("broken.pdf", b"%PDF-garbage").unwrap_err();
        assert!(matches!(err, LoadError::Extraction { .. }));
    }
}
