//! Namespace rewriting.

use crate::tree::{Document, NodeId, QName};
use tracing::debug;

/// Move every element and every namespaced attribute under `root` from
/// `old_ns` to `new_ns`.
///
/// Element names and attribute names are checked independently; unqualified
/// attributes and names in other namespaces are left alone. Returns the
/// number of names rewritten.
pub fn replace_namespace(doc: &mut Document, root: NodeId, old_ns: &str, new_ns: &str) -> usize {
    let mut rewritten = 0;

    for id in doc.subtree(root) {
        if doc.name(id).ns.as_deref() == Some(old_ns) {
            let name = QName::new(new_ns, &doc.name(id).local);
            doc.set_name(id, name);
            rewritten += 1;
        }

        for attr in doc.attributes_mut(id) {
            if attr.name.ns.as_deref() == Some(old_ns) {
                attr.name.ns = Some(new_ns.to_string());
                rewritten += 1;
            }
        }
    }

    debug!(old_ns, new_ns, rewritten, "rewrote namespace");
    rewritten
}
