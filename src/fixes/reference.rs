//! Backfilling of `AcctSvcrRef`.

use crate::config::{tags, DERIVED_REF_PREFIX, MAX_DERIVED_REF_LEN};
use crate::tree::{Document, NodeId, QName};
use tracing::debug;

/// Make sure the entry carries a non-empty `AcctSvcrRef`.
///
/// Sources, in order: `NtryRef` verbatim, then `AddtlNtryInf` with its
/// whitespace collapsed, cut to [`MAX_DERIVED_REF_LEN`] characters and
/// prefixed with [`DERIVED_REF_PREFIX`]. A new element goes right after
/// `NtryRef` when there is one, otherwise at the end of the entry. An
/// existing but empty `AcctSvcrRef` is filled in place.
///
/// Returns `true` when a reference was written. Finding no source is not
/// an error.
pub fn ensure_acct_svcr_ref(doc: &mut Document, ntry: NodeId, ns: &str) -> bool {
    let existing = doc.find_child(ntry, ns, tags::ACCT_SVCR_REF);
    if existing.is_some_and(|acct_ref| doc.text_trimmed(acct_ref).is_some()) {
        return false;
    }

    let ntry_ref = doc.find_child(ntry, ns, tags::NTRY_REF);
    let Some(value) = derive_reference(doc, ntry, ntry_ref, ns) else {
        return false;
    };
    debug!(reference = %value, "backfilled AcctSvcrRef");

    match existing {
        Some(acct_ref) => doc.set_text(acct_ref, Some(value)),
        None => {
            let acct_ref = doc.create_element(QName::new(ns, tags::ACCT_SVCR_REF));
            doc.set_text(acct_ref, Some(value));
            match ntry_ref {
                Some(ntry_ref) => doc.insert_after(ntry_ref, acct_ref),
                None => doc.append_child(ntry, acct_ref),
            }
        }
    }
    true
}

fn derive_reference(
    doc: &Document,
    ntry: NodeId,
    ntry_ref: Option<NodeId>,
    ns: &str,
) -> Option<String> {
    if let Some(value) = ntry_ref.and_then(|ntry_ref| doc.text_trimmed(ntry_ref)) {
        return Some(value.to_string());
    }

    let addtl = doc.find_child(ntry, ns, tags::ADDTL_NTRY_INF)?;
    let info = doc.text_trimmed(addtl)?;
    let collapsed = collapse_whitespace(info);
    let truncated: String = collapsed.chars().take(MAX_DERIVED_REF_LEN).collect();
    Some(format!("{DERIVED_REF_PREFIX}{truncated}"))
}

/// Replace every run of whitespace with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixes::test_support::{child_names, entry, NS};
    use pretty_assertions::assert_eq;

    fn acct_svcr_ref(doc: &Document, ntry: NodeId) -> Option<String> {
        doc.find_child(ntry, NS, "AcctSvcrRef")
            .and_then(|id| doc.text(id))
            .map(str::to_string)
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_existing_reference_kept() {
        let (mut doc, ntry) = entry("<NtryRef>NR</NtryRef><AcctSvcrRef>BANK1</AcctSvcrRef>");
        assert!(!ensure_acct_svcr_ref(&mut doc, ntry, NS));
        assert_eq!(acct_svcr_ref(&doc, ntry).as_deref(), Some("BANK1"));
    }

    #[test]
    fn test_uses_ntry_ref_and_inserts_after_it() {
        let (mut doc, ntry) = entry(
            "<NtryRef> REF123 </NtryRef><Amt>1.00</Amt><AddtlNtryInf>info</AddtlNtryInf>",
        );
        assert!(ensure_acct_svcr_ref(&mut doc, ntry, NS));
        assert_eq!(acct_svcr_ref(&doc, ntry).as_deref(), Some("REF123"));
        assert_eq!(
            child_names(&doc, ntry),
            vec!["NtryRef", "AcctSvcrRef", "Amt", "AddtlNtryInf"]
        );
    }

    #[test]
    fn test_falls_back_to_additional_info() {
        let (mut doc, ntry) =
            entry("<Amt>1.00</Amt><AddtlNtryInf>Payment for invoice #55    extra</AddtlNtryInf>");
        assert!(ensure_acct_svcr_ref(&mut doc, ntry, NS));
        assert_eq!(
            acct_svcr_ref(&doc, ntry).as_deref(),
            Some("ADDINFO:Payment for invoice #55 extra")
        );
        assert_eq!(child_names(&doc, ntry), vec!["Amt", "AddtlNtryInf", "AcctSvcrRef"]);
    }

    #[test]
    fn test_blank_ntry_ref_falls_back() {
        let (mut doc, ntry) = entry("<NtryRef>  </NtryRef><AddtlNtryInf>x</AddtlNtryInf>");
        assert!(ensure_acct_svcr_ref(&mut doc, ntry, NS));
        assert_eq!(acct_svcr_ref(&doc, ntry).as_deref(), Some("ADDINFO:x"));
        assert_eq!(child_names(&doc, ntry), vec!["NtryRef", "AcctSvcrRef", "AddtlNtryInf"]);
    }

    #[test]
    fn test_derived_reference_truncated() {
        let info = format!("{}\n{}", "a".repeat(50), "b".repeat(50));
        let (mut doc, ntry) = entry(&format!("<AddtlNtryInf>{info}</AddtlNtryInf>"));
        assert!(ensure_acct_svcr_ref(&mut doc, ntry, NS));
        let expected = format!("ADDINFO:{} {}", "a".repeat(50), "b".repeat(9));
        assert_eq!(acct_svcr_ref(&doc, ntry), Some(expected));
    }

    #[test]
    fn test_blank_reference_filled_in_place_not_inserted_after_ntry_ref() {
        // Reused where it stands so the entry never carries two AcctSvcrRef.
        let (mut doc, ntry) = entry("<AcctSvcrRef/><NtryRef>NR</NtryRef>");
        assert!(ensure_acct_svcr_ref(&mut doc, ntry, NS));
        assert_eq!(child_names(&doc, ntry), vec!["AcctSvcrRef", "NtryRef"]);
        assert_eq!(acct_svcr_ref(&doc, ntry).as_deref(), Some("NR"));
    }

    #[test]
    fn test_no_source_leaves_reference_absent() {
        let (mut doc, ntry) = entry("<Amt>1.00</Amt><AddtlNtryInf>   </AddtlNtryInf>");
        assert!(!ensure_acct_svcr_ref(&mut doc, ntry, NS));
        assert_eq!(acct_svcr_ref(&doc, ntry), None);
    }
}
