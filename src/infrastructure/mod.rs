pub mod document_loader;
pub mod pdf;

pub use document_loader::{DocumentLoader, DocumentLocator, PdfDocumentLoader};
