pub mod artifact_store;
pub mod prompt_renderer;
pub mod report;
pub mod sanitizer;

pub use artifact_store::{ArtifactKind, ArtifactStore};
pub use prompt_renderer::PromptRenderer;
pub use report::render_report;
pub use sanitizer::clean;
