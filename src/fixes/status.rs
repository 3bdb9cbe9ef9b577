//! `<Sts><Cd>BOOK</Cd></Sts>` to `<Sts>BOOK</Sts>`.

use crate::config::{tags, DEFAULT_STATUS};
use crate::tree::{Document, NodeId};
use tracing::debug;

/// Flatten a coded entry status into plain text.
///
/// Only a `Sts` without direct text that holds a `Cd` child is touched; a
/// status that already carries text is left as is. Returns `true` when the
/// status was flattened.
pub fn normalize_status(doc: &mut Document, ntry: NodeId, ns: &str) -> bool {
    let Some(sts) = doc.find_child(ntry, ns, tags::STS) else {
        return false;
    };
    let Some(cd) = doc.find_child(sts, ns, tags::CD) else {
        return false;
    };
    if doc.text_trimmed(sts).is_some() {
        return false;
    }

    let code = doc.text_trimmed(cd).unwrap_or(DEFAULT_STATUS).to_string();
    doc.clear_children(sts);
    debug!(status = %code, "flattened entry status");
    doc.set_text(sts, Some(code));
    true
}
