//! Removal of `TtlNtries` summary blocks.

use crate::config::tags;
use crate::tree::{Document, NodeId};
use tracing::debug;

/// Remove every `TtlNtries` element beneath `stmt`, at any depth.
/// Returns the number of blocks removed.
pub fn remove_total_entries(doc: &mut Document, stmt: NodeId, ns: &str) -> usize {
    let mut removed = 0;
    for ttl in doc.find_descendants(stmt, ns, tags::TTL_NTRIES) {
        if doc.detach(ttl) {
            removed += 1;
        }
    }
    if removed > 0 {
        debug!(removed, "removed TtlNtries blocks");
    }
    removed
}
