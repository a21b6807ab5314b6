//! Classification of finished answers into display segments.

mod cache;
mod segmenter;

pub use cache::SegmentCache;
pub use segmenter::{ContentSegment, InlineSpan, inline_spans, segment};
