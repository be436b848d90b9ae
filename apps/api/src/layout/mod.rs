// Pagination and glyph placement for poem collections.
// Pure computation: no I/O, no state kept between calls.
// Callers on the async path run it inside tokio::task::spawn_blocking.

pub mod engine;
pub mod geometry;

pub use geometry::LayoutParams;
