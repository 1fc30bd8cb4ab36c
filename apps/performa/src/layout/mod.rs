// Invoice layout engine: fixed-coordinate A4 pages built as display lists.
// Pure and CPU-bound; callers on the async runtime wrap it in spawn_blocking.

pub mod canvas;
pub mod font_metrics;
pub mod header;
pub mod item_table;
pub mod letterhead;
pub mod page;
pub mod totals;

// Re-export the public API consumed by handlers and startup.
pub use letterhead::Letterhead;
pub use page::render_document;
