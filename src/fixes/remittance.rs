//! Moving `AddtlNtryInf` into `NtryDtls/TxDtls/RmtInf/Ustrd`.

use crate::config::tags;
use crate::tree::{Document, NodeId};
use tracing::debug;

/// Copy the entry's additional information into an unstructured
/// remittance line of every `TxDtls`, then drop `AddtlNtryInf`.
///
/// `NtryDtls`, `TxDtls` and `RmtInf` are created when missing. A new
/// `Ustrd` is appended each time, even if an identical line exists; once
/// `AddtlNtryInf` is gone a second pass over the same entry does nothing.
/// Returns `true` when the entry was migrated.
pub fn move_addtl_info_into_tx(doc: &mut Document, ntry: NodeId, ns: &str) -> bool {
    let Some(addtl) = doc.find_child(ntry, ns, tags::ADDTL_NTRY_INF) else {
        return false;
    };
    let Some(text) = doc.text_trimmed(addtl).map(str::to_string) else {
        return false;
    };

    let ntry_dtls = doc.ensure_child(ntry, ns, tags::NTRY_DTLS);
    let mut tx_dtls = doc.find_all(ntry_dtls, ns, tags::TX_DTLS);
    if tx_dtls.is_empty() {
        tx_dtls.push(doc.ensure_child(ntry_dtls, ns, tags::TX_DTLS));
    }

    for &tx in &tx_dtls {
        let rmt_inf = doc.ensure_child(tx, ns, tags::RMT_INF);
        doc.append_text_element(rmt_inf, ns, tags::USTRD, text.as_str());
    }
    doc.detach(addtl);

    debug!(transactions = tx_dtls.len(), "moved AddtlNtryInf into RmtInf/Ustrd");
    true
}
