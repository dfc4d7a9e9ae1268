//! Core data types for the Giga Token platform

use crate::format::escape_html;
use crate::pager::PageInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Who is acting on the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Program administrator
    Admin,
    /// Internet service provider
    Isp,
    /// Registered school
    School,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Isp => write!(f, "isp"),
            Self::School => write!(f, "school"),
        }
    }
}

impl Role {
    /// Team name shown in the dashboards
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Program team",
            Self::Isp => "Provider",
            Self::School => "School",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "isp" | "provider" => Ok(Self::Isp),
            "school" => Ok(Self::School),
            other => Err(crate::Error::validation(
                "role",
                format!("unknown role '{other}'"),
            )),
        }
    }
}

/// Lifecycle of a help ticket
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HelpStatus {
    /// Waiting for an administrator
    #[default]
    Opened,
    /// Handled and removed from the queue
    Closed,
}

/// Administrator reply to a help ticket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelpAnswer {
    /// Reply subject
    pub subject: String,
    /// Reply body
    pub message: String,
    /// Address the reply was sent to
    pub to: String,
    /// When the reply was recorded
    pub answered_at: DateTime<Utc>,
}

/// Support request raised by a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelpTicket {
    /// Ticket identifier
    pub id: Uuid,
    /// Requester name
    pub name: String,
    /// Requester contact email
    pub email: String,
    /// Requester company registration number (CNPJ)
    pub cnpj: String,
    /// Short subject line
    pub subject: String,
    /// Free-form message
    pub message: String,
    /// When the ticket was opened
    pub created_at: DateTime<Utc>,
    /// Current status
    pub status: HelpStatus,
    /// Administrator reply, once answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<HelpAnswer>,
    /// When the ticket left the opened queue
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Operator who closed or answered the ticket
    #[serde(default)]
    pub closed_by: Option<String>,
    /// Team the closing operator acted for
    #[serde(default)]
    pub entity: Option<Role>,
}

impl HelpTicket {
    /// Open a new ticket from a submitted form
    #[must_use]
    pub fn open(form: NewHelpTicket, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            cnpj: form.cnpj.trim().to_string(),
            subject: form.subject.trim().to_string(),
            message: form.message.trim().to_string(),
            created_at,
            status: HelpStatus::Opened,
            answer: None,
            closed_at: None,
            closed_by: None,
            entity: None,
        }
    }

    /// Move the ticket to the closed queue, recording who closed it
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] if the ticket is already closed.
    pub fn close(&mut self, closed_by: &str, entity: Role, closed_at: DateTime<Utc>) -> crate::Result<()> {
        if !self.is_open() {
            return Err(crate::Error::Conflict(format!(
                "help ticket {} is already closed",
                self.id
            )));
        }
        self.status = HelpStatus::Closed;
        self.closed_at = Some(closed_at);
        self.closed_by = Some(closed_by.to_string());
        self.entity = Some(entity);
        Ok(())
    }

    /// Timestamp the queues are ordered by: close time once closed
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.closed_at.unwrap_or(self.created_at)
    }

    /// Subject pre-filled in the answer dialog
    #[must_use]
    pub fn reply_subject(&self) -> String {
        format!("Re: {}", self.subject)
    }

    /// Whether the ticket is still in the queue
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == HelpStatus::Opened
    }
}

/// Form submitted by a provider to open a ticket
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewHelpTicket {
    /// Requester name
    #[validate(length(max = 255))]
    pub name: String,
    /// Requester contact email
    #[validate(length(max = 255))]
    pub email: String,
    /// Company registration number
    #[validate(length(max = 32))]
    pub cnpj: String,
    /// Subject line
    #[validate(length(max = 255))]
    pub subject: String,
    /// Message body
    #[validate(length(max = 5000))]
    pub message: String,
}

/// Form submitted by an administrator to answer a ticket
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnswerRequest {
    /// Reply subject; defaults to `Re: <ticket subject>` when omitted
    #[serde(default)]
    #[validate(length(max = 255))]
    pub subject: Option<String>,
    /// Reply body
    #[validate(length(max = 5000))]
    pub message: String,
}

/// School registered in the program
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct School {
    /// School identifier
    pub id: Uuid,
    /// School name
    pub name: String,
    /// State (UF)
    pub state: String,
    /// City
    pub city: String,
    /// Postal code (CEP)
    pub zip_code: String,
    /// Street address including the number
    pub address: String,
    /// INEP census code
    pub inep_code: String,
    /// Contact email
    pub email: String,
    /// Administrative sphere (municipal, state, federal, private)
    pub administrator: String,
    /// Latitude, once geocoded
    pub lat: Option<f64>,
    /// Longitude, once geocoded
    pub lon: Option<f64>,
    /// Tokens granted to the school
    pub tokens: u64,
    /// Whether an administrator approved the registration
    pub approved: bool,
    /// When the registration was received
    pub created_at: DateTime<Utc>,
}

impl School {
    /// Map marker, if the school has coordinates
    #[must_use]
    pub fn marker(&self) -> Option<SchoolMarker> {
        Some(SchoolMarker {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
            tokens: self.tokens,
            position: Coordinates {
                lat: self.lat?,
                lon: self.lon?,
            },
        })
    }
}

/// School registration form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewSchool {
    /// School name
    #[validate(length(max = 255))]
    pub name: String,
    /// State (UF)
    #[validate(length(max = 64))]
    pub state: String,
    /// City
    #[validate(length(max = 255))]
    pub city: String,
    /// Postal code, `NNNNN-NNN`
    #[validate(length(max = 9))]
    pub zip_code: String,
    /// Street name without the number
    #[validate(length(max = 255))]
    pub address: String,
    /// Street number
    pub number: u32,
    /// INEP census code
    #[validate(length(max = 32))]
    pub inep_code: String,
    /// Contact email
    #[validate(length(max = 255))]
    pub email: String,
    /// Administrative sphere
    #[validate(length(max = 64))]
    pub administrator: String,
    /// Latitude, if known
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude, if known
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Geographic position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Default for Coordinates {
    /// Rio de Janeiro, where the map opens before a search
    fn default() -> Self {
        Self {
            lat: -22.89384,
            lon: -43.19700,
        }
    }
}

/// Pin shown on the school map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolMarker {
    /// School identifier
    pub id: Uuid,
    /// School name
    pub name: String,
    /// Street address
    pub address: String,
    /// Tokens granted
    pub tokens: u64,
    /// Marker position
    pub position: Coordinates,
}

impl SchoolMarker {
    /// Popup markup: name, address and token balance on separate lines
    #[must_use]
    pub fn popup_html(&self) -> String {
        format!(
            "{}<br />{}<br />{}",
            escape_html(&self.name),
            escape_html(&self.address),
            self.tokens
        )
    }
}

/// API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,

    /// Success status
    pub success: bool,

    /// Optional message
    pub message: Option<String>,

    /// Request timestamp
    pub timestamp: DateTime<Utc>,

    /// Pagination info (for paginated responses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            data,
            success: true,
            message: None,
            timestamp: Utc::now(),
            pagination: None,
        }
    }

    /// Create a successful response with message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            success: true,
            message: Some(message.into()),
            timestamp: Utc::now(),
            pagination: None,
        }
    }

    /// Create a paginated response
    pub fn paginated(data: T, pagination: PageInfo) -> Self {
        Self {
            data,
            success: true,
            message: None,
            timestamp: Utc::now(),
            pagination: Some(pagination),
        }
    }
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Error code
    pub code: String,

    /// Success status (always false for errors)
    pub success: bool,

    /// Error timestamp
    pub timestamp: DateTime<Utc>,

    /// Optional additional details
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Create an error response with details
    pub fn with_details(
        error: impl Into<String>,
        code: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
            timestamp: Utc::now(),
            details: Some(details),
        }
    }
}
