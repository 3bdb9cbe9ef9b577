//! Runs the fixes over a whole camt.053 document.

use crate::config::{tags, CAMT_053_001_02, CAMT_053_001_10};
use crate::error::{Error, Result};
use crate::fixes;
use crate::tree::Document;
use tracing::info;

/// What [`fix_document`] did to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    /// Namespace the document ends up in.
    pub namespace: String,
    /// Whether the document was moved from camt.053.001.10 to .001.02.
    pub downgraded: bool,
    pub statements: usize,
    pub entries: usize,
    pub totals_removed: usize,
    pub statuses_flattened: usize,
    pub references_backfilled: usize,
    pub remittances_migrated: usize,
    pub dates_collapsed: usize,
}

/// Detect the working namespace, downgrade camt.053.001.10 documents and
/// apply every structural fix in place.
///
/// Documents already in another namespace (typically camt.053.001.02) keep
/// it and still get the structural fixes.
///
/// # Errors
///
/// [`Error::MissingNamespace`] when the root element is unqualified,
/// [`Error::NotACamtStatement`] when there is no `BkToCstmrStmt`.
pub fn fix_document(doc: &mut Document) -> Result<FixReport> {
    let root = doc.root();
    let mut ns = doc.name(root).ns.clone().ok_or(Error::MissingNamespace)?;

    let mut report = FixReport::default();
    if ns == CAMT_053_001_10 {
        fixes::replace_namespace(doc, root, CAMT_053_001_10, CAMT_053_001_02);
        ns = CAMT_053_001_02.to_string();
        report.downgraded = true;
    }

    if doc.find_descendants(root, &ns, tags::BK_TO_CSTMR_STMT).is_empty() {
        return Err(Error::NotACamtStatement);
    }

    for stmt in doc.find_descendants(root, &ns, tags::STMT) {
        report.statements += 1;
        report.totals_removed += fixes::remove_total_entries(doc, stmt, &ns);

        for ntry in doc.find_descendants(stmt, &ns, tags::NTRY) {
            report.entries += 1;
            if fixes::normalize_status(doc, ntry, &ns) {
                report.statuses_flattened += 1;
            }
            if fixes::ensure_acct_svcr_ref(doc, ntry, &ns) {
                report.references_backfilled += 1;
            }
            if fixes::move_addtl_info_into_tx(doc, ntry, &ns) {
                report.remittances_migrated += 1;
            }
        }
    }

    report.dates_collapsed = fixes::normalize_dates(doc, root, &ns);
    report.namespace = ns;

    info!(
        namespace = %report.namespace,
        downgraded = report.downgraded,
        statements = report.statements,
        entries = report.entries,
        totals_removed = report.totals_removed,
        statuses_flattened = report.statuses_flattened,
        references_backfilled = report.references_backfilled,
        remittances_migrated = report.remittances_migrated,
        dates_collapsed = report.dates_collapsed,
        "fixed camt.053 document"
    );
    Ok(report)
}

/// Apply [`fix_document`] and hand the same tree back.
pub fn transform(mut doc: Document) -> Result<Document> {
    fix_document(&mut doc)?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn statement_xml(ns: &str, entries: &str) -> String {
        format!(
            r#"<Document xmlns="{ns}"><BkToCstmrStmt><GrpHdr><MsgId>1</MsgId></GrpHdr><Stmt><Id>S1</Id><TxsSummry><TtlNtries><NbOfNtries>1</NbOfNtries></TtlNtries></TxsSummry>{entries}</Stmt></BkToCstmrStmt></Document>"#
        )
    }

    #[test]
    fn test_unqualified_root_rejected() {
        let mut doc = Document::parse_str("<Document><BkToCstmrStmt/></Document>").unwrap();
        assert!(matches!(fix_document(&mut doc), Err(Error::MissingNamespace)));
    }

    #[test]
    fn test_missing_envelope_rejected() {
        let xml = format!(r#"<Document xmlns="{CAMT_053_001_10}"><BkToCstmrNtfctn/></Document>"#);
        let mut doc = Document::parse_str(&xml).unwrap();
        assert!(matches!(fix_document(&mut doc), Err(Error::NotACamtStatement)));
    }

    #[test]
    fn test_envelope_in_other_namespace_rejected() {
        let xml = r#"<Document xmlns="urn:other"><BkToCstmrStmt xmlns="urn:else"/></Document>"#;
        let mut doc = Document::parse_str(xml).unwrap();
        assert!(matches!(fix_document(&mut doc), Err(Error::NotACamtStatement)));
    }

    #[test]
    fn test_report_counts() {
        let entries = "<Ntry><NtryRef>NR1</NtryRef><Sts><Cd>BOOK</Cd></Sts><BookgDt><DtTm>2024-03-15T10:30:00</DtTm></BookgDt><AddtlNtryInf>thanks</AddtlNtryInf></Ntry>\
                       <Ntry><Sts>BOOK</Sts><AcctSvcrRef>B2</AcctSvcrRef><ValDt><Dt>2024-03-15</Dt></ValDt></Ntry>";
        let mut doc = Document::parse_str(&statement_xml(CAMT_053_001_10, entries)).unwrap();
        let report = fix_document(&mut doc).unwrap();
        assert_eq!(
            report,
            FixReport {
                namespace: CAMT_053_001_02.to_string(),
                downgraded: true,
                statements: 1,
                entries: 2,
                totals_removed: 1,
                statuses_flattened: 1,
                references_backfilled: 1,
                remittances_migrated: 1,
                dates_collapsed: 1,
            }
        );
    }

    #[test]
    fn test_older_namespace_still_fixed() {
        let entries = "<Ntry><Sts><Cd>PDNG</Cd></Sts></Ntry>";
        let mut doc = Document::parse_str(&statement_xml(CAMT_053_001_02, entries)).unwrap();
        let report = fix_document(&mut doc).unwrap();
        assert!(!report.downgraded);
        assert_eq!(report.namespace, CAMT_053_001_02);
        assert_eq!(report.statuses_flattened, 1);
        assert_eq!(report.totals_removed, 1);
    }

    #[test]
    fn test_unknown_namespace_kept_as_working_namespace() {
        let ns = "urn:iso:std:iso:20022:tech:xsd:camt.053.001.08";
        let entries = "<Ntry><NtryRef>R</NtryRef></Ntry>";
        let mut doc = Document::parse_str(&statement_xml(ns, entries)).unwrap();
        let report = fix_document(&mut doc).unwrap();
        assert_eq!(report.namespace, ns);
        assert_eq!(report.references_backfilled, 1);
        assert_eq!(doc.name(doc.root()).ns.as_deref(), Some(ns));
    }

    #[test]
    fn test_statement_without_entries() {
        let mut doc = Document::parse_str(&statement_xml(CAMT_053_001_10, "")).unwrap();
        let report = fix_document(&mut doc).unwrap();
        assert_eq!(report.statements, 1);
        assert_eq!(report.entries, 0);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let entries = "<Ntry><NtryRef>NR1</NtryRef><Sts><Cd>BOOK</Cd></Sts><BookgDt><DtTm>2024-03-15T10:30:00</DtTm></BookgDt><AddtlNtryInf>thanks</AddtlNtryInf></Ntry>";
        let doc = Document::parse_str(&statement_xml(CAMT_053_001_10, entries)).unwrap();
        let once = transform(doc).unwrap();
        let first = once.to_xml_string(CAMT_053_001_02).unwrap();

        let mut twice = once;
        let report = fix_document(&mut twice).unwrap();
        let entry_fixes =
            report.statuses_flattened + report.references_backfilled + report.remittances_migrated;
        assert_eq!(entry_fixes, 0);
        assert_eq!(report.totals_removed + report.dates_collapsed, 0);
        assert_eq!(twice.to_xml_string(CAMT_053_001_02).unwrap(), first);
    }
}
