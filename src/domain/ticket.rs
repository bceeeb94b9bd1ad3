use std::fmt;

use base64::prelude::{BASE64_STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Media",
            Priority::Low => "Baja",
        }
    }

    /// Accepts wire names as well as the Spanish labels of the form.
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" | "alta" => Some(Priority::High),
            "medium" | "media" => Some(Priority::Medium),
            "low" | "baja" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Handling window quoted when the service does not send one.
    pub fn estimated_handling(&self) -> &'static str {
        match self {
            Priority::High => "2-4 horas",
            Priority::Medium => "24 horas",
            Priority::Low => "48 horas",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Web,
    Email,
    Phone,
    Chat,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Web => "web",
            Source::Email => "email",
            Source::Phone => "phone",
            Source::Chat => "chat",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "web" => Some(Source::Web),
            "email" => Some(Source::Email),
            "phone" => Some(Source::Phone),
            "chat" => Some(Source::Chat),
            _ => None,
        }
    }
}

/// An image carried inline as a data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub data: String,
}

impl Attachment {
    pub fn encode(filename: impl Into<String>, mime: &str, bytes: &[u8]) -> Self {
        let payload = BASE64_STANDARD.encode(bytes);
        Self {
            filename: filename.into(),
            data: format!("data:{mime};base64,{payload}"),
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.data
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
    }
}

/// A draft that passed validation, normalized for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTicket {
    pub contact_name: String,
    pub company_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub service_tags: Vec<String>,
    pub source: Source,
    pub images: Vec<Attachment>,
}

/// Fields the ticket service may echo back after accepting a ticket. Each
/// field is read on its own; one of an unexpected type is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketReceipt {
    #[serde(deserialize_with = "lenient_text")]
    pub reference: Option<String>,
    #[serde(rename = "estimatedTime", deserialize_with = "lenient_text")]
    pub estimated_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub ticket_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(rename = "createdAt", deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(rename = "assignedTo", deserialize_with = "lenient_text")]
    pub assigned_to: Option<String>,
    #[serde(deserialize_with = "lenient_flag")]
    pub using_provisional_company: Option<bool>,
}

impl TicketReceipt {
    pub fn identifier(&self) -> Option<String> {
        self.ticket_id.clone().or_else(|| self.id.clone())
    }
}

/// Strings and numbers become text; blank strings and anything else are absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        _ => None,
    })
}

pub const DEFAULT_STATUS: &str = "Abierto";
pub const DEFAULT_ASSIGNEE: &str = "Equipo de soporte";

/// What the user sees once a ticket is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    pub id: String,
    pub reference: Option<String>,
    pub created_at: String,
    pub status: String,
    pub priority: String,
    pub title: String,
    pub estimated_time: String,
    pub assigned_to: String,
    pub provisional_company: bool,
}

impl TicketSummary {
    /// Merges the service receipt with local placeholders for anything it left out.
    pub fn from_receipt(
        receipt: TicketReceipt,
        ticket: &ValidatedTicket,
        fallback_reference: String,
        now: DateTime<Utc>,
    ) -> Self {
        let id = receipt
            .identifier()
            .or_else(|| receipt.reference.clone())
            .unwrap_or_else(|| fallback_reference.clone());
        let priority = receipt
            .priority
            .as_deref()
            .map(|raw| {
                Priority::from_str(raw)
                    .map(|priority| priority.label().to_string())
                    .unwrap_or_else(|| raw.to_string())
            })
            .unwrap_or_else(|| ticket.priority.label().to_string());

        Self {
            id,
            reference: receipt.reference.or(Some(fallback_reference)),
            created_at: receipt
                .created_at
                .unwrap_or_else(|| now.format("%d/%m/%Y %H:%M").to_string()),
            status: non_blank(receipt.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            priority,
            title: non_blank(receipt.title).unwrap_or_else(|| ticket.title.clone()),
            estimated_time: non_blank(receipt.estimated_time)
                .unwrap_or_else(|| ticket.priority.estimated_handling().to_string()),
            assigned_to: non_blank(receipt.assigned_to)
                .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string()),
            provisional_company: receipt.using_provisional_company.unwrap_or(false),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ticket(priority: Priority) -> ValidatedTicket {
        ValidatedTicket {
            contact_name: "Ana Torres".to_string(),
            company_name: "Andes Logística".to_string(),
            contact_email: "ana@andes.pe".to_string(),
            contact_phone: None,
            priority,
            title: "Laptop no enciende".to_string(),
            description: "No da señal de vida.".to_string(),
            service_tags: vec!["ATX29HXS".to_string()],
            source: Source::Web,
            images: Vec::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn estimated_time_falls_back_to_priority_window() {
        for (priority, expected) in [
            (Priority::High, "2-4 horas"),
            (Priority::Medium, "24 horas"),
            (Priority::Low, "48 horas"),
        ] {
            let summary = TicketSummary::from_receipt(
                TicketReceipt::default(),
                &ticket(priority),
                "TKT-000001".to_string(),
                now(),
            );
            assert_eq!(summary.estimated_time, expected);
        }
    }

    #[test]
    fn receipt_fields_take_precedence() {
        let receipt: TicketReceipt = serde_json::from_value(serde_json::json!({
            "ticket_id": 4521,
            "reference": "REF-77",
            "estimatedTime": "1 hora",
            "createdAt": "2026-03-14T09:31:00Z",
            "status": "En progreso",
            "priority": "low",
            "assignedTo": "María",
            "using_provisional_company": true
        }))
        .unwrap();

        let summary = TicketSummary::from_receipt(
            receipt,
            &ticket(Priority::High),
            "TKT-000001".to_string(),
            now(),
        );

        assert_eq!(summary.id, "4521");
        assert_eq!(summary.reference.as_deref(), Some("REF-77"));
        assert_eq!(summary.estimated_time, "1 hora");
        assert_eq!(summary.created_at, "2026-03-14T09:31:00Z");
        assert_eq!(summary.status, "En progreso");
        assert_eq!(summary.priority, "Baja");
        assert_eq!(summary.title, "Laptop no enciende");
        assert_eq!(summary.assigned_to, "María");
        assert!(summary.provisional_company);
    }

    #[test]
    fn mistyped_receipt_field_keeps_the_others() {
        let receipt: TicketReceipt = serde_json::from_value(serde_json::json!({
            "ticket_id": 42,
            "status": 1,
            "title": {"text": "no"},
            "assignedTo": null,
            "using_provisional_company": "yes"
        }))
        .unwrap();

        assert_eq!(receipt.identifier().as_deref(), Some("42"));
        assert_eq!(receipt.status.as_deref(), Some("1"));
        assert!(receipt.title.is_none());
        assert!(receipt.assigned_to.is_none());
        assert!(receipt.using_provisional_company.is_none());

        let summary = TicketSummary::from_receipt(
            receipt,
            &ticket(Priority::High),
            "TKT-000001".to_string(),
            now(),
        );
        assert_eq!(summary.id, "42");
        assert_eq!(summary.title, "Laptop no enciende");
    }

    #[test]
    fn falls_back_from_blank_ticket_id_to_id() {
        let receipt: TicketReceipt =
            serde_json::from_value(serde_json::json!({"ticket_id": " ", "id": "TCK-7"})).unwrap();
        assert_eq!(receipt.identifier().as_deref(), Some("TCK-7"));
    }

    #[test]
    fn empty_receipt_uses_local_placeholders() {
        let summary = TicketSummary::from_receipt(
            TicketReceipt::default(),
            &ticket(Priority::Medium),
            "TKT-123456".to_string(),
            now(),
        );
        assert_eq!(summary.id, "TKT-123456");
        assert_eq!(summary.created_at, "14/03/2026 09:30");
        assert_eq!(summary.status, DEFAULT_STATUS);
        assert_eq!(summary.priority, "Media");
        assert_eq!(summary.assigned_to, DEFAULT_ASSIGNEE);
        assert!(!summary.provisional_company);
    }

    #[test]
    fn encodes_data_uri() {
        let attachment = Attachment::encode("pantalla.png", "image/png", b"abc");
        assert_eq!(attachment.data, "data:image/png;base64,YWJj");
        assert_eq!(attachment.mime_type(), Some("image/png"));
    }

    #[test]
    fn parses_priority_labels() {
        assert_eq!(Priority::from_str("Alta"), Some(Priority::High));
        assert_eq!(Priority::from_str("medium"), Some(Priority::Medium));
        assert_eq!(Priority::from_str("urgent"), None);
    }
}
