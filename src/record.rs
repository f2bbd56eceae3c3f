//! The call detail record type and its vendor code tables.
//!
//! This module provides [`CdrRecord`], the normalized representation of one
//! CDR as it appears in the account session logs. The extractor decodes the
//! JSON payload of a matched log line into this structure; the output sinks
//! render it to text and CSV.
//!
//! # Overview
//!
//! A CDR carries summary metadata about one call or SMS event: the parties,
//! timing, network/channel, and outcome. All fields are optional — the
//! provider omits whatever does not apply to the event type — but a record is
//! only ever built from a complete, well-formed payload. A payload that fails
//! to decode produces no record at all.
//!
//! Two numeric fields, `StatusCode` and `ResponseCode`, are translated to
//! human-readable labels on output using the provider's fixed tables (see
//! [`status_code_label`] and [`response_code_label`]). Unknown codes pass
//! through numerically.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Column order for CSV output and the text-sink field order.
///
/// This is the fixed set of attributes retained from the verbose logs; the
/// CSV header names exactly these columns, in this order.
pub const COLUMNS: [&str; 17] = [
    "AccountID",
    "ApplicationId",
    "Called",
    "Caller",
    "Channel",
    "DateCreated",
    "DateUpdated",
    "DeliveryStatus",
    "Duration",
    "EndTime",
    "MessageBody",
    "Network",
    "ResponseCode",
    "SessionID",
    "StartTime",
    "Status",
    "StatusCode",
];

/// One call detail record, decoded from a matched log line.
///
/// # Fields
///
/// | Field | Log attribute | Description |
/// |-------|---------------|-------------|
/// | `account_id` | `AccountID` | Owning account |
/// | `application_id` | `ApplicationId` | Application that handled the session |
/// | `called` | `Called` | Destination party |
/// | `caller` | `Caller` | Originating party |
/// | `channel` | `Channel` | Voice or text channel |
/// | `date_created` | `DateCreated` | When the record was created |
/// | `date_updated` | `DateUpdated` | Last provider-side update |
/// | `delivery_status` | `DeliveryStatus` | SMS delivery state |
/// | `duration` | `Duration` | Call duration |
/// | `end_time` | `EndTime` | Session end |
/// | `message_body` | `MessageBody` | SMS text, if any |
/// | `network` | `Network` | Carrier network (SIP, PSTN, SMS, ...) |
/// | `response_code` | `ResponseCode` | Signaling response code |
/// | `session_id` | `SessionID` | Session identifier |
/// | `start_time` | `StartTime` | Session start |
/// | `status` | `Status` | Session status |
/// | `status_code` | `StatusCode` | SMS delivery code |
///
/// The provider is inconsistent about scalar types (a duration may arrive as
/// `42` or `"42"`), so the string-ish fields accept either and normalize to
/// `String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdrRecord {
    #[serde(rename = "AccountID", default, deserialize_with = "scalar_opt")]
    pub account_id: Option<String>,

    #[serde(rename = "ApplicationId", default, deserialize_with = "scalar_opt")]
    pub application_id: Option<String>,

    #[serde(rename = "Called", default, deserialize_with = "scalar_opt")]
    pub called: Option<String>,

    #[serde(rename = "Caller", default, deserialize_with = "scalar_opt")]
    pub caller: Option<String>,

    #[serde(rename = "Channel", default, deserialize_with = "scalar_opt")]
    pub channel: Option<String>,

    #[serde(rename = "DateCreated", default, deserialize_with = "scalar_opt")]
    pub date_created: Option<String>,

    #[serde(rename = "DateUpdated", default, deserialize_with = "scalar_opt")]
    pub date_updated: Option<String>,

    #[serde(rename = "DeliveryStatus", default, deserialize_with = "scalar_opt")]
    pub delivery_status: Option<String>,

    #[serde(rename = "Duration", default, deserialize_with = "scalar_opt")]
    pub duration: Option<String>,

    #[serde(rename = "EndTime", default, deserialize_with = "scalar_opt")]
    pub end_time: Option<String>,

    #[serde(rename = "MessageBody", default, deserialize_with = "scalar_opt")]
    pub message_body: Option<String>,

    #[serde(rename = "Network", default, deserialize_with = "scalar_opt")]
    pub network: Option<String>,

    /// Signaling response code, translated on output via [`response_code_label`].
    #[serde(rename = "ResponseCode", default)]
    pub response_code: Option<i64>,

    #[serde(rename = "SessionID", default, deserialize_with = "scalar_opt")]
    pub session_id: Option<String>,

    #[serde(rename = "StartTime", default, deserialize_with = "scalar_opt")]
    pub start_time: Option<String>,

    #[serde(rename = "Status", default, deserialize_with = "scalar_opt")]
    pub status: Option<String>,

    /// SMS delivery code, translated on output via [`status_code_label`].
    #[serde(rename = "StatusCode", default)]
    pub status_code: Option<i64>,
}

impl CdrRecord {
    /// Returns the value of a named column as it should appear in output,
    /// with the two numeric code columns translated to their labels.
    ///
    /// Returns `None` for absent fields and for column names outside
    /// [`COLUMNS`].
    pub fn field(&self, column: &str) -> Option<String> {
        match column {
            "AccountID" => self.account_id.clone(),
            "ApplicationId" => self.application_id.clone(),
            "Called" => self.called.clone(),
            "Caller" => self.caller.clone(),
            "Channel" => self.channel.clone(),
            "DateCreated" => self.date_created.clone(),
            "DateUpdated" => self.date_updated.clone(),
            "DeliveryStatus" => self.delivery_status.clone(),
            "Duration" => self.duration.clone(),
            "EndTime" => self.end_time.clone(),
            "MessageBody" => self.message_body.clone(),
            "Network" => self.network.clone(),
            "ResponseCode" => self.response_code.map(|code| {
                response_code_label(code).map_or_else(|| code.to_string(), String::from)
            }),
            "SessionID" => self.session_id.clone(),
            "StartTime" => self.start_time.clone(),
            "Status" => self.status.clone(),
            "StatusCode" => self.status_code.map(|code| {
                status_code_label(code).map_or_else(|| code.to_string(), String::from)
            }),
            _ => None,
        }
    }

    /// Returns one CSV cell per [`COLUMNS`] entry, empty for absent fields.
    pub fn csv_fields(&self) -> Vec<String> {
        COLUMNS
            .iter()
            .map(|column| self.field(column).unwrap_or_default())
            .collect()
    }

    /// Returns the present fields as a JSON map with translated code values.
    ///
    /// Key order follows [`COLUMNS`]; absent fields are omitted entirely
    /// rather than serialized as null.
    pub fn labeled_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for column in COLUMNS {
            if let Some(value) = self.field(column) {
                map.insert(column.to_string(), Value::String(value));
            }
        }
        map
    }

    /// Renders the record as one text-sink line: the creation date, a
    /// separator, then the labeled fields as a JSON object.
    pub fn text_line(&self) -> crate::Result<String> {
        let date = self.date_created.clone().unwrap_or_default();
        let body = serde_json::to_string(&self.labeled_map())?;
        Ok(format!("{date} - {body}"))
    }
}

/// Translates the provider's SMS delivery status code.
///
/// Unknown codes return `None` and are emitted numerically.
pub fn status_code_label(code: i64) -> Option<&'static str> {
    match code {
        0 => Some("Delivered"),
        -1 => Some("Bad or Unsupported Phone Number"),
        -2 => Some("Carrier Error"),
        -3 => Some("Gateway Error"),
        -4 => Some("Exceeded Rate Limit"),
        -5 => Some("Duplicate Message"),
        -7 => Some("Blocked"),
        -99 => Some("Unknown"),
        _ => None,
    }
}

/// Translates the provider's signaling response code.
///
/// Not a complete response code list; unknown codes return `None` and are
/// emitted numerically.
pub fn response_code_label(code: i64) -> Option<&'static str> {
    match code {
        200 => Some("OK"),
        400 => Some("Bad Request"),
        401 => Some("Not Authorized"),
        403 => Some("Access Denied"),
        404 => Some("Not Found"),
        405 => Some("Method Not Allowed"),
        408 => Some("User Unavailable"),
        415 => Some("Unsupported Media Type"),
        484 => Some("Number Unsupported"),
        487 => Some("Request Terminated"),
        500 => Some("Internal Server Error"),
        503 => Some("Service Unavailable"),
        -1 => Some("Delivered Successfully"),
        _ => None,
    }
}

// Accepts string, integer, float or bool and normalizes to String.
fn scalar_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Str(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}
