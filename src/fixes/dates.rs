//! Collapsing `BookgDt`/`ValDt` timestamps to dates.

use crate::config::tags;
use crate::tree::{Document, NodeId};
use chrono::NaiveDate;
use tracing::{debug, warn};

const DATE_CONTAINERS: [&str; 2] = [tags::BOOKG_DT, tags::VAL_DT];

/// Turn `<BookgDt><DtTm>2024-03-15T10:30:00</DtTm></BookgDt>` into
/// `<BookgDt><Dt>2024-03-15</Dt></BookgDt>`, and the same for `ValDt`,
/// everywhere beneath `root`.
///
/// Containers that already hold a `Dt`, or hold no usable `DtTm`, are left
/// alone. Returns the number of containers changed.
pub fn normalize_dates(doc: &mut Document, root: NodeId, ns: &str) -> usize {
    let mut collapsed = 0;

    for container_tag in DATE_CONTAINERS {
        for container in doc.find_descendants(root, ns, container_tag) {
            if doc.find_child(container, ns, tags::DT).is_some() {
                continue;
            }
            let Some(dt_tm) = doc.find_child(container, ns, tags::DT_TM) else {
                continue;
            };
            let Some(timestamp) = doc.text_trimmed(dt_tm) else {
                continue;
            };

            let date = date_part(timestamp).to_string();
            if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
                warn!(
                    container = container_tag,
                    value = %date,
                    "date part is not YYYY-MM-DD, keeping it as is"
                );
            }

            doc.detach(dt_tm);
            doc.append_text_element(container, ns, tags::DT, date.as_str());
            debug!(container = container_tag, date = %date, "collapsed DtTm to Dt");
            collapsed += 1;
        }
    }

    collapsed
}

/// Everything before the first `T`.
fn date_part(timestamp: &str) -> &str {
    timestamp
        .split_once('T')
        .map_or(timestamp, |(date, _)| date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixes::test_support::{child_names, entry, NS};
    use pretty_assertions::assert_eq;

    fn dt_text(doc: &Document, ntry: NodeId, path: &str) -> Option<String> {
        doc.find_one(ntry, NS, path)
            .and_then(|dt| doc.text(dt))
            .map(str::to_string)
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2024-03-15T10:30:00"), "2024-03-15");
        assert_eq!(date_part("2024-03-15T10:30:00+01:00"), "2024-03-15");
        assert_eq!(date_part("2024-03-15"), "2024-03-15");
    }

    #[test]
    fn test_collapses_booking_and_value_dates() {
        let (mut doc, ntry) = entry(
            "<BookgDt><DtTm> 2024-03-15T10:30:00 </DtTm></BookgDt><ValDt><DtTm>2024-03-16T00:00:00.000Z</DtTm></ValDt>",
        );
        let root = doc.root();
        assert_eq!(normalize_dates(&mut doc, root, NS), 2);
        assert_eq!(dt_text(&doc, ntry, "BookgDt/Dt").as_deref(), Some("2024-03-15"));
        assert_eq!(dt_text(&doc, ntry, "ValDt/Dt").as_deref(), Some("2024-03-16"));
        let bookg = doc.find_child(ntry, NS, "BookgDt").unwrap();
        assert_eq!(child_names(&doc, bookg), vec!["Dt"]);
    }

    #[test]
    fn test_existing_date_wins() {
        let (mut doc, ntry) =
            entry("<BookgDt><Dt>2024-01-01</Dt><DtTm>2024-03-15T10:30:00</DtTm></BookgDt>");
        let root = doc.root();
        assert_eq!(normalize_dates(&mut doc, root, NS), 0);
        let bookg = doc.find_child(ntry, NS, "BookgDt").unwrap();
        assert_eq!(child_names(&doc, bookg), vec!["Dt", "DtTm"]);
    }

    #[test]
    fn test_empty_or_missing_timestamp_untouched() {
        let (mut doc, ntry) = entry("<BookgDt><DtTm> </DtTm></BookgDt><ValDt/>");
        let root = doc.root();
        assert_eq!(normalize_dates(&mut doc, root, NS), 0);
        let bookg = doc.find_child(ntry, NS, "BookgDt").unwrap();
        assert_eq!(child_names(&doc, bookg), vec!["DtTm"]);
    }

    #[test]
    fn test_nested_containers_found() {
        let (mut doc, ntry) = entry(
            "<NtryDtls><TxDtls><RltdDts><ValDt><DtTm>2024-05-01T08:00:00</DtTm></ValDt></RltdDts></TxDtls></NtryDtls>",
        );
        let root = doc.root();
        assert_eq!(normalize_dates(&mut doc, root, NS), 1);
        assert_eq!(
            dt_text(&doc, ntry, "NtryDtls/TxDtls/RltdDts/ValDt/Dt").as_deref(),
            Some("2024-05-01")
        );
        assert_eq!(normalize_dates(&mut doc, root, NS), 0);
    }
}
