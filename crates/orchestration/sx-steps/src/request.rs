//! Typed step requests, validated once from the raw event.

use sx_error::{Result, ValidationError};
use sx_types::{
    Credentials, Region, ResultKind, SearchParams, SearchTime, SessionContext, SessionToken,
    StepEvent,
};

/// Input of the start step.
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub region: Region,
    pub credentials: Credentials,
    pub search: SearchParams,
    pub messages: bool,
    pub records: bool,
    pub s3_bucket: String,
    pub keys: KeyPlan,
    pub sns_topic_arn: Option<String>,
}

/// How the destination keys of a new job are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPlan {
    messages: Option<String>,
    records: Option<String>,
    prefix: Option<String>,
}

impl KeyPlan {
    /// Key for one result kind once the job id is known.
    ///
    /// Explicit keys win; otherwise the key is `<prefix><jobId>_<kind>.csv`.
    pub fn resolve(&self, kind: ResultKind, job_id: &str) -> String {
        let explicit = match kind {
            ResultKind::Messages => &self.messages,
            ResultKind::Records => &self.records,
        };
        match explicit {
            Some(key) => key.clone(),
            None => kind.default_key(self.prefix.as_deref().unwrap_or_default(), job_id),
        }
    }
}

/// Input of the poll step.
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub context: SessionContext,
}

/// Input of a dump step that has work to do.
#[derive(Debug, Clone)]
pub struct DumpRequest {
    pub kind: ResultKind,
    pub context: SessionContext,
    pub message_count: u64,
    pub record_count: u64,
}

impl DumpRequest {
    /// Row count of the result set being dumped.
    pub fn total(&self) -> u64 {
        match self.kind {
            ResultKind::Messages => self.message_count,
            ResultKind::Records => self.record_count,
        }
    }
}

impl TryFrom<&StepEvent> for StartRequest {
    type Error = ValidationError;

    fn try_from(event: &StepEvent) -> std::result::Result<Self, Self::Error> {
        let region = region(event)?;
        let credentials = credentials(event)?;

        let query = required(&event.query, "query")?;
        let to = search_time(required(&event.to, "to")?, "to")?;
        let from = search_time(required(&event.from, "from")?, "from")?;
        let time_zone = required(&event.time_zone, "timeZone")?;

        let messages = flag(event.messages, "messages")?;
        let records = flag(event.records, "records")?;
        let s3_bucket = required(&event.s3_bucket, "s3Bucket")?;

        let prefix = optional(&event.s3_key_prefix);
        let key_messages = optional(&event.s3_key_messages);
        let key_records = optional(&event.s3_key_records);
        if prefix.is_none() {
            if key_messages.is_none() {
                return Err(ValidationError::MissingField("s3KeyMessages"));
            }
            if key_records.is_none() {
                return Err(ValidationError::MissingField("s3KeyRecords"));
            }
        }

        if !messages && !records {
            return Err(ValidationError::Constraint(
                "Either \"messages\" or \"records\" need to be true".to_string(),
            ));
        }

        Ok(Self {
            region,
            credentials,
            search: SearchParams {
                query: query.to_string(),
                from,
                to,
                time_zone: time_zone.to_string(),
            },
            messages,
            records,
            s3_bucket: s3_bucket.to_string(),
            keys: KeyPlan {
                messages: key_messages.map(str::to_string),
                records: key_records.map(str::to_string),
                prefix: prefix.map(str::to_string),
            },
            sns_topic_arn: optional(&event.sns_topic_arn).map(str::to_string),
        })
    }
}

impl TryFrom<&StepEvent> for PollRequest {
    type Error = ValidationError;

    fn try_from(event: &StepEvent) -> std::result::Result<Self, Self::Error> {
        let region = region(event)?;
        let credentials = credentials(event)?;
        let messages = flag(event.messages, "messages")?;
        let records = flag(event.records, "records")?;
        let context = session(event, region, credentials, messages, records)?;
        Ok(Self { context })
    }
}

impl DumpRequest {
    /// Validate a dump event.
    ///
    /// The selector flag and the kind's key are checked first; when the flag
    /// is false the dump has nothing to do and `None` is returned without
    /// looking at the rest of the event.
    pub fn from_event(event: &StepEvent, kind: ResultKind) -> Result<Option<Self>> {
        let (selected, key_field, key) = match kind {
            ResultKind::Messages => (event.messages, "s3KeyMessages", &event.s3_key_messages),
            ResultKind::Records => (event.records, "s3KeyRecords", &event.s3_key_records),
        };

        let selected = flag(selected, kind_field(kind))?;
        required(key, key_field)?;
        if !selected {
            return Ok(None);
        }

        let region = region(event)?;
        let credentials = credentials(event)?;
        let context = session(
            event,
            region,
            credentials,
            event.messages.unwrap_or(false),
            event.records.unwrap_or(false),
        )?;

        let message_count = event
            .message_count
            .ok_or(ValidationError::MissingField("messageCount"))?;
        let record_count = event
            .record_count
            .ok_or(ValidationError::MissingField("recordCount"))?;

        Ok(Some(Self {
            kind,
            context,
            message_count,
            record_count,
        }))
    }
}

fn kind_field(kind: ResultKind) -> &'static str {
    match kind {
        ResultKind::Messages => "messages",
        ResultKind::Records => "records",
    }
}

/// Context fields shared by poll and dump.
fn session(
    event: &StepEvent,
    region: Region,
    credentials: Credentials,
    messages: bool,
    records: bool,
) -> std::result::Result<SessionContext, ValidationError> {
    let s3_bucket = required(&event.s3_bucket, "s3Bucket")?;
    let s3_key_messages = required(&event.s3_key_messages, "s3KeyMessages")?;
    let s3_key_records = required(&event.s3_key_records, "s3KeyRecords")?;
    let cookie = required(&event.cookie, "cookie")?;
    let id = required(&event.id, "id")?;

    Ok(SessionContext {
        endpoint: region,
        credentials,
        search: carried_search(event)?,
        messages,
        records,
        s3_bucket: s3_bucket.to_string(),
        s3_key_messages: s3_key_messages.to_string(),
        s3_key_records: s3_key_records.to_string(),
        sns_topic_arn: optional(&event.sns_topic_arn).map(str::to_string),
        cookie: SessionToken::new(cookie),
        id: id.to_string(),
    })
}

/// Search parameters carried forward from start, when all are present.
fn carried_search(event: &StepEvent) -> std::result::Result<Option<SearchParams>, ValidationError> {
    let (Some(query), Some(from), Some(to), Some(time_zone)) = (
        optional(&event.query),
        optional(&event.from),
        optional(&event.to),
        optional(&event.time_zone),
    ) else {
        return Ok(None);
    };

    Ok(Some(SearchParams {
        query: query.to_string(),
        from: search_time(from, "from")?,
        to: search_time(to, "to")?,
        time_zone: time_zone.to_string(),
    }))
}

fn region(event: &StepEvent) -> std::result::Result<Region, ValidationError> {
    let raw = required(&event.endpoint, "endpoint")?;
    raw.parse::<Region>().map_err(|_| {
        let allowed: Vec<&str> = Region::ALL.iter().map(Region::as_str).collect();
        ValidationError::invalid(
            "endpoint",
            raw,
            format!("unknown endpoint, expected one of {}", allowed.join(", ")),
        )
    })
}

fn credentials(event: &StepEvent) -> std::result::Result<Credentials, ValidationError> {
    let access_id = required(&event.access_id, "accessId")?;
    let access_key = required(&event.access_key, "accessKey")?;
    Ok(Credentials::new(access_id, access_key))
}

fn search_time(
    raw: &str,
    field: &'static str,
) -> std::result::Result<SearchTime, ValidationError> {
    SearchTime::parse(raw).map_err(|e| {
        ValidationError::invalid(field, raw, format!("expected YYYY-MM-DDTHH:MM:SS ({e})"))
    })
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> std::result::Result<&'a str, ValidationError> {
    optional(value).ok_or(ValidationError::MissingField(field))
}

/// Empty strings count as absent.
fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn flag(value: Option<bool>, field: &'static str) -> std::result::Result<bool, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}
