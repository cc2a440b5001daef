use serde::Deserialize;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection failures and timeouts talking to the cluster
    #[error("{0}")]
    Transport(#[from] elasticsearch::Error),
    /// The cluster answered with a non-success status code
    #[error("{status}: {}", Reason(.body))]
    Protocol { status: u16, body: String },
    /// An index matched the family but its date suffix is malformed
    #[error("invalid date {token:?} in index {index}: {source}")]
    Parse {
        index: String,
        token: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Elasticsearch error body, i.e:
///
/// ```json
/// {
///   "error" : {
///     "root_cause" : [ ... ],
///     "type" : "index_not_found_exception",
///     "reason" : "no such index [logstash-2021.05.11]",
///     "index" : "logstash-2021.05.11"
///   },
///   "status" : 404
/// }
/// ```
#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: ErrorCause,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ErrorCause {
    Detailed {
        #[serde(rename(deserialize = "type"))]
        kind: Option<String>,
        reason: Option<String>,
    },
    Plain(String),
}

/// Renders the most useful part of a response body: the `reason` reported by
/// elasticsearch when the body is a JSON error, the raw body otherwise.
struct Reason<'a>(&'a str);

impl fmt::Display for Reason<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.0.trim();
        match serde_json::from_str::<ErrorBody>(body).map(|b| b.error) {
            Ok(ErrorCause::Detailed { reason: Some(reason), .. }) => {
                f.write_str(&reason)
            }
            Ok(ErrorCause::Detailed { kind: Some(kind), .. }) => {
                f.write_str(&kind)
            }
            Ok(ErrorCause::Plain(reason)) => f.write_str(&reason),
            _ => f.write_str(body),
        }
    }
}
