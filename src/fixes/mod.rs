//! Structural fixes applied to a camt.053 document.
//!
//! Each fix works on a [`Document`](crate::tree::Document) in place and
//! reports what it changed. Entry-level fixes take the `Ntry` element,
//! statement-level fixes the `Stmt` element, and whole-document fixes the
//! root. None of them fail on missing optional data.

pub mod dates;
pub mod namespace;
pub mod reference;
pub mod remittance;
pub mod status;
pub mod totals;

pub use dates::normalize_dates;
pub use namespace::replace_namespace;
pub use reference::ensure_acct_svcr_ref;
pub use remittance::move_addtl_info_into_tx;
pub use status::normalize_status;
pub use totals::remove_total_entries;
