//! Fixed identifiers and limits used by the fixes.
//!
//! None of these are user-configurable: the tool only knows how to take
//! camt.053.001.10 documents down to camt.053.001.02.

/// Namespace of the newer camt.053 revision (source).
pub const CAMT_053_001_10: &str = "urn:iso:std:iso:20022:tech:xsd:camt.053.001.10";

/// Namespace of the older camt.053 revision strict importers expect (target).
pub const CAMT_053_001_02: &str = "urn:iso:std:iso:20022:tech:xsd:camt.053.001.02";

/// Maximum number of characters taken from `AddtlNtryInf` for a derived reference.
pub const MAX_DERIVED_REF_LEN: usize = 60;

/// Marks an `AcctSvcrRef` derived from free text rather than issued by the bank.
pub const DERIVED_REF_PREFIX: &str = "ADDINFO:";

/// Status written when `<Sts><Cd/></Sts>` carries no code.
pub const DEFAULT_STATUS: &str = "BOOK";

/// Deepest element nesting the parser accepts. camt.053 statements stay
/// well below a dozen levels.
pub const MAX_ELEMENT_DEPTH: usize = 256;

/// Local names of the elements the fixes address.
pub mod tags {
    pub const BK_TO_CSTMR_STMT: &str = "BkToCstmrStmt";
    pub const STMT: &str = "Stmt";
    pub const NTRY: &str = "Ntry";
    pub const TTL_NTRIES: &str = "TtlNtries";
    pub const STS: &str = "Sts";
    pub const CD: &str = "Cd";
    pub const NTRY_REF: &str = "NtryRef";
    pub const ACCT_SVCR_REF: &str = "AcctSvcrRef";
    pub const ADDTL_NTRY_INF: &str = "AddtlNtryInf";
    pub const NTRY_DTLS: &str = "NtryDtls";
    pub const TX_DTLS: &str = "TxDtls";
    pub const RMT_INF: &str = "RmtInf";
    pub const USTRD: &str = "Ustrd";
    pub const BOOKG_DT: &str = "BookgDt";
    pub const VAL_DT: &str = "ValDt";
    pub const DT: &str = "Dt";
    pub const DT_TM: &str = "DtTm";
}
