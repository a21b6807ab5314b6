use std::collections::HashMap;
use std::sync::Arc;

use super::segmenter::{ContentSegment, segment};

/// Memoized segmentation, keyed by exact content string.
///
/// Unbounded; lives only as long as the session. Feed it finished text,
/// not streaming prefixes.
#[derive(Debug, Default)]
pub struct SegmentCache {
    entries: HashMap<String, Arc<Vec<ContentSegment>>>,
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments for `content`, computed once per distinct string.
    pub fn segments(&mut self, content: &str) -> Arc<Vec<ContentSegment>> {
        if let Some(hit) = self.entries.get(content) {
            return Arc::clone(hit);
        }
        let computed = Arc::new(segment(content));
        self.entries.insert(content.to_string(), Arc::clone(&computed));
        computed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
