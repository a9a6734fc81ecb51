//! Session context carried from step to step.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::destination::Destination;
use crate::region::Region;
use crate::result::ResultKind;

/// Wire format of search time bounds (no offset, the time zone travels separately).
pub const SEARCH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Access id / access key pair for the search API.
///
/// The key is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_id: String,
    pub access_key: String,
}

impl Credentials {
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_id", &self.access_id)
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}

/// Rotating session cookie issued by the search API.
///
/// Holds the value of the `Cookie` request header. Every job API call may
/// return a replacement, which must be used from then on.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self(cookie.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// A search time bound in `YYYY-MM-DDTHH:MM:SS` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTime(NaiveDateTime);

impl SearchTime {
    /// Parse a time bound, rejecting offsets and fractional seconds.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, SEARCH_TIME_FORMAT).map(Self)
    }
}

impl fmt::Display for SearchTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SEARCH_TIME_FORMAT))
    }
}

impl Serialize for SearchTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SearchTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SearchTime::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// The search a job was created for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    pub from: SearchTime,
    pub to: SearchTime,
    pub time_zone: String,
}

/// Everything one step hands to the next.
///
/// Produced by the start step and re-emitted, field for field, by every later
/// step. Steps never modify a context; they build a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub endpoint: Region,

    #[serde(flatten)]
    pub credentials: Credentials,

    /// Present whenever the caller carried the search parameters forward
    #[serde(flatten)]
    pub search: Option<SearchParams>,

    pub messages: bool,
    pub records: bool,
    pub s3_bucket: String,
    pub s3_key_messages: String,
    pub s3_key_records: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sns_topic_arn: Option<String>,

    pub cookie: SessionToken,

    /// Search job id
    pub id: String,
}

impl SessionContext {
    /// Destination object for results of the given kind.
    pub fn destination(&self, kind: ResultKind) -> Destination {
        let key = match kind {
            ResultKind::Messages => &self.s3_key_messages,
            ResultKind::Records => &self.s3_key_records,
        };
        Destination::new(&self.s3_bucket, key)
    }

    /// A copy of this context carrying a replacement session token.
    pub fn with_token(&self, cookie: SessionToken) -> Self {
        Self {
            cookie,
            ..self.clone()
        }
    }
}
