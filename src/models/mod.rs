pub mod assessment;
pub mod document;
pub mod summary;

pub use assessment::{Assessment, Difficulty, DifficultyCounts, GeneratedAssessment, Mcq, Summary};
pub use document::DocumentText;
pub use summary::{SectionBreakdown, TestPaperSummary};
