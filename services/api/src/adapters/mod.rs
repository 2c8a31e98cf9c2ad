pub mod db;
pub mod pdf;
pub mod summary_llm;

pub use db::DbAdapter;
pub use pdf::PdfTextAdapter;
pub use summary_llm::OpenAiSummaryAdapter;
