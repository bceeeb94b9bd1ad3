use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::ticket::{Attachment, TicketReceipt, ValidatedTicket};
use crate::error::{AppError, AppResult};
use crate::services::TicketApi;

pub struct HttpTicketClient {
    http: Client,
    endpoint: Option<String>,
}

impl HttpTicketClient {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { http, endpoint })
    }

    fn endpoint(&self) -> AppResult<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::Configuration("ticket API URL not configured".to_string()))
    }
}

#[async_trait]
impl TicketApi for HttpTicketClient {
    async fn create_ticket(&self, ticket: &ValidatedTicket) -> AppResult<TicketReceipt> {
        let endpoint = self.endpoint()?;
        let request_body = CreateTicketRequest::from_ticket(ticket);

        info!(
            endpoint,
            priority = ticket.priority.as_str(),
            images = ticket.images.len(),
            "submitting ticket"
        );

        let response = self
            .http
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("failed to call ticket API: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::Transport(format!("failed to read response: {err}")))?;

        if !status.is_success() {
            warn!(%status, "ticket API rejected the submission");
            return Err(rejection(status, &body));
        }

        debug!(%status, "ticket API accepted the submission");
        Ok(parse_receipt(&body))
    }
}

/// Accepted responses may carry any subset of the receipt fields, or nothing.
fn parse_receipt(body: &str) -> TicketReceipt {
    if body.trim().is_empty() {
        return TicketReceipt::default();
    }
    serde_json::from_str(body).unwrap_or_else(|err| {
        warn!("ignoring unparsable ticket API response: {err}");
        TicketReceipt::default()
    })
}

fn rejection(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|payload| payload.message);
    AppError::Rejected { status, message }
}

#[derive(Serialize)]
struct CreateTicketRequest<'a> {
    title: &'a str,
    description: &'a str,
    priority: &'static str,
    company_name: &'a str,
    service_tag_names: &'a [String],
    contact_name: &'a str,
    contact_email: &'a str,
    contact_phone: &'a str,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<&'a str>,
    images: &'a [Attachment],
}

impl<'a> CreateTicketRequest<'a> {
    fn from_ticket(ticket: &'a ValidatedTicket) -> Self {
        Self {
            title: &ticket.title,
            description: &ticket.description,
            priority: ticket.priority.as_str(),
            company_name: &ticket.company_name,
            service_tag_names: &ticket.service_tags,
            contact_name: &ticket.contact_name,
            contact_email: &ticket.contact_email,
            contact_phone: ticket.contact_phone.as_deref().unwrap_or_default(),
            source: ticket.source.as_str(),
            photo_url: None,
            images: &ticket.images,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::ticket::{Priority, Source};

    fn ticket() -> ValidatedTicket {
        ValidatedTicket {
            contact_name: "Ana Torres".to_string(),
            company_name: "Andes Logística".to_string(),
            contact_email: "ana@andes.pe".to_string(),
            contact_phone: None,
            priority: Priority::Low,
            title: "Laptop no enciende".to_string(),
            description: "No da señal de vida.".to_string(),
            service_tags: vec!["ATX29HXS".to_string(), "UMN622R".to_string()],
            source: Source::Chat,
            images: vec![Attachment::encode("foto.png", "image/png", b"abc")],
        }
    }

    #[test]
    fn serializes_wire_body() {
        let ticket = ticket();
        let body = serde_json::to_value(CreateTicketRequest::from_ticket(&ticket)).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Laptop no enciende",
                "description": "No da señal de vida.",
                "priority": "low",
                "company_name": "Andes Logística",
                "service_tag_names": ["ATX29HXS", "UMN622R"],
                "contact_name": "Ana Torres",
                "contact_email": "ana@andes.pe",
                "contact_phone": "",
                "source": "chat",
                "images": [{"filename": "foto.png", "data": "data:image/png;base64,YWJj"}]
            })
        );
    }

    #[test]
    fn rejection_carries_remote_message() {
        let err = rejection(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "Empresa no encontrada"}"#,
        );
        assert_eq!(err.user_message(), "Empresa no encontrada");
    }

    #[test]
    fn rejection_without_json_body_is_generic() {
        let err = rejection(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        match err {
            AppError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert!(message.is_none());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_or_invalid_success_body_yields_empty_receipt() {
        assert!(parse_receipt("").identifier().is_none());
        assert!(parse_receipt("ok").identifier().is_none());
        let receipt = parse_receipt(r#"{"id": "TCK-9", "status": "Abierto"}"#);
        assert_eq!(receipt.identifier().as_deref(), Some("TCK-9"));
        assert_eq!(receipt.status.as_deref(), Some("Abierto"));
    }

    #[test]
    fn mistyped_field_does_not_discard_the_ticket_id() {
        let receipt = parse_receipt(r#"{"ticket_id": 42, "status": 1}"#);
        assert_eq!(receipt.identifier().as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn missing_endpoint_is_a_configuration_error() {
        let client = HttpTicketClient::new(None, Duration::from_secs(5)).unwrap();
        let result = client.create_ticket(&ticket()).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
