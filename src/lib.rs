//! camt.053 downgrade library
//!
//! Rewrites ISO 20022 camt.053.001.10 bank statements as camt.053.001.02 and
//! smooths over the structures strict importers reject.
//!
//! # Fixes
//!
//! - Namespace `camt.053.001.10` becomes `camt.053.001.02` everywhere
//! - `TtlNtries` summary blocks are removed
//! - `<Sts><Cd>BOOK</Cd></Sts>` becomes `<Sts>BOOK</Sts>`
//! - Missing `AcctSvcrRef` is derived from `NtryRef` or `AddtlNtryInf`
//! - `AddtlNtryInf` moves into `NtryDtls/TxDtls/RmtInf/Ustrd`
//! - `DtTm` in `BookgDt`/`ValDt` collapses to `Dt`
//!
//! # Examples
//!
//! ## Fixing a file
//!
//! ```no_run
//! use std::path::Path;
//! use camt053_downgrade::{default_output_path, fix_statement_file};
//!
//! let input = Path::new("statement.xml");
//! let report = fix_statement_file(input, &default_output_path(input))?;
//! println!("{} entries fixed", report.entries);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Working on a parsed document
//!
//! ```
//! use camt053_downgrade::{transform, Document, CAMT_053_001_02};
//!
//! let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.10">
//!   <BkToCstmrStmt><Stmt><Ntry><Sts><Cd>BOOK</Cd></Sts></Ntry></Stmt></BkToCstmrStmt>
//! </Document>"#;
//!
//! let document = transform(Document::parse_str(xml)?)?;
//! let output = document.to_xml_string(CAMT_053_001_02)?;
//! assert!(output.contains("<Sts>BOOK</Sts>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod fixes;
pub mod pipeline;
pub mod tree;
pub mod xml_format;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use config::{CAMT_053_001_02, CAMT_053_001_10};
pub use error::{Error, Result};
pub use pipeline::{fix_document, transform, FixReport};
pub use tree::{Document, NodeId, QName};

/// `<stem>_FIXED<.ext>` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push("_FIXED");
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }
    input.with_file_name(name)
}

/// Read `input`, fix it, and write the indented result to `output`.
///
/// Nothing is written unless every fix succeeded.
pub fn fix_statement_file(input: &Path, output: &Path) -> Result<FixReport> {
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }

    let mut file = File::open(input)?;
    let mut document = Document::from_read(&mut file)?;
    let report = fix_document(&mut document)?;
    document.indent();

    let mut buffer = Vec::new();
    document.write_to(&mut buffer, &report.namespace)?;
    fs::write(output, buffer)?;

    Ok(report)
}
