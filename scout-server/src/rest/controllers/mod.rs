pub mod agi;
pub mod analyze;
pub mod cache;

pub use agi::AgiController;
pub use analyze::AnalyzeController;
pub use cache::CacheController;
