//! Parsing of the `_cat/indices?v` listing.
//!
//! The listing is a plain text table, one index per line, i.e:
//!
//! ```text
//! health status index               uuid                   pri rep docs.count
//! yellow open   logstash-2021.05.11 BAtz3c9lTlud4Qn__HeqWA   1   1     104513
//! ```
//!
//! Nothing is assumed about the column layout beyond the index name appearing
//! somewhere after the first column.
use crate::date::{self, Retention, INDEX_DATE_LEN};
use crate::error::{Error, Result};
use chrono::NaiveDate;

/// An index of a family together with the date embedded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub name: String,
    pub date: NaiveDate,
}

/// Locate `<family>-YYYY.MM.DD` in a catalog line.
///
/// Returns `None` when the family is absent, starts the line, or is not
/// followed by enough bytes to hold a date token. Returns an error when the
/// token is there but is not a valid date.
pub fn match_line(line: &str, family: &str) -> Option<Result<IndexRecord>> {
    if family.is_empty() {
        return None;
    }
    // catalog lines always start with the health/status columns
    let pos = match line.find(family) {
        Some(pos) if pos > 0 => pos,
        _ => return None,
    };
    let token_start = pos + family.len() + 1;
    let end = token_start + INDEX_DATE_LEN;
    let name = line.get(pos..end)?;
    let token = line.get(token_start..end)?;

    Some(
        date::parse_index_date(token)
            .map(|date| IndexRecord { name: name.to_string(), date })
            .map_err(|source| Error::Parse {
                index: name.to_string(),
                token: token.to_string(),
                source,
            }),
    )
}

/// Yield the names of the family's indices dated before `cutoff`, in listing
/// order. Lines with a malformed date yield an error and scanning goes on.
pub fn expired_indices<'a>(
    body: &'a str, family: &'a str, policy: Retention, cutoff: NaiveDate,
) -> impl Iterator<Item = Result<String>> + 'a {
    body.lines().filter_map(move |line| match match_line(line, family)? {
        Ok(record) if policy.is_expired(record.date, cutoff) => {
            Some(Ok(record.name))
        }
        Ok(_) => None,
        Err(e) => Some(Err(e)),
    })
}
