use std::collections::BTreeMap;
use std::fmt;

use validator::{Validate, ValidationError};

use crate::domain::draft::TicketDraft;
use crate::domain::field::Field;
use crate::domain::ticket::{Priority, Source, ValidatedTicket};

pub const MAX_CONTACT_NAME: u64 = 100;
pub const MAX_COMPANY_NAME: u64 = 255;
pub const MAX_PHONE: u64 = 20;
pub const MAX_TITLE: u64 = 255;
pub const MAX_DESCRIPTION: u64 = 2000;
pub const MAX_SERVICE_TAG: usize = 50;

/// One message per field, from the first rule that field failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear_field(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

#[derive(Debug, Validate)]
struct TicketInput {
    #[validate(length(min = 1, max = 100))]
    contact_name: String,
    #[validate(length(min = 1, max = 255))]
    company_name: String,
    #[validate(length(min = 1), email)]
    contact_email: String,
    #[validate(length(max = 20))]
    contact_phone: String,
    #[validate(custom(function = "known_priority"))]
    priority: String,
    #[validate(length(min = 1, max = 255))]
    title: String,
    #[validate(length(min = 1, max = 2000))]
    description: String,
    #[validate(length(min = 1), custom(function = "tag_lengths"))]
    service_tag_names: Vec<String>,
    #[validate(custom(function = "known_source"))]
    source: String,
}

impl TicketInput {
    fn from_draft(draft: &TicketDraft) -> Self {
        Self {
            contact_name: draft.contact_name.trim().to_string(),
            company_name: draft.company_name.trim().to_string(),
            contact_email: draft.contact_email.trim().to_string(),
            contact_phone: draft.contact_phone.trim().to_string(),
            priority: draft.priority.trim().to_string(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            service_tag_names: draft
                .service_tags
                .iter()
                .map(|tag| tag.trim().to_string())
                .collect(),
            source: draft.source.trim().to_string(),
        }
    }

    fn is_blank(&self, field: Field) -> bool {
        match field {
            Field::ContactName => self.contact_name.is_empty(),
            Field::CompanyName => self.company_name.is_empty(),
            Field::ContactEmail => self.contact_email.is_empty(),
            Field::ContactPhone => self.contact_phone.is_empty(),
            Field::Priority => self.priority.is_empty(),
            Field::Title => self.title.is_empty(),
            Field::Description => self.description.is_empty(),
            Field::ServiceTags => self.service_tag_names.is_empty(),
            Field::Source => self.source.is_empty(),
        }
    }
}

fn known_priority(value: &str) -> Result<(), ValidationError> {
    Priority::from_str(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("priority"))
}

fn known_source(value: &str) -> Result<(), ValidationError> {
    Source::from_str(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("source"))
}

fn tag_lengths(tags: &[String]) -> Result<(), ValidationError> {
    let out_of_range = tags.iter().any(|tag| {
        let len = tag.chars().count();
        len == 0 || len > MAX_SERVICE_TAG
    });
    if out_of_range {
        return Err(ValidationError::new("service_tag_length"));
    }
    Ok(())
}

/// Checks the draft and, when every rule passes, returns it normalized for
/// transmission. Attachments are carried over untouched.
pub fn validate(draft: &TicketDraft) -> Result<ValidatedTicket, FieldErrors> {
    let input = TicketInput::from_draft(draft);

    if let Err(report) = input.validate() {
        let mut errors = FieldErrors::default();
        for (name, failures) in report.field_errors() {
            let Some(field) = Field::from_str(&name) else {
                continue;
            };
            let first = failures
                .iter()
                .min_by_key(|failure| rule_rank(&failure.code))
                .map(|failure| message_for(field, &failure.code, &input));
            if let Some(message) = first {
                errors.insert(field, message);
            }
        }
        return Err(errors);
    }

    let priority = Priority::from_str(&input.priority).unwrap_or_default();
    let source = Source::from_str(&input.source).unwrap_or_default();

    Ok(ValidatedTicket {
        contact_name: input.contact_name,
        company_name: input.company_name,
        contact_email: input.contact_email,
        contact_phone: Some(input.contact_phone).filter(|phone| !phone.is_empty()),
        priority,
        title: input.title,
        description: input.description,
        service_tags: input.service_tag_names,
        source,
        images: draft.attachments.clone(),
    })
}

// Presence is checked before format.
fn rule_rank(code: &str) -> u8 {
    match code {
        "length" => 0,
        _ => 1,
    }
}

fn message_for(field: Field, code: &str, input: &TicketInput) -> String {
    match code {
        "length" if field == Field::ServiceTags => {
            "Agrega al menos un identificador".to_string()
        }
        "length" if input.is_blank(field) => format!("{} es obligatorio", field.label()),
        "length" => format!(
            "{} no puede superar {} caracteres",
            field.label(),
            max_length(field)
        ),
        "email" => "Ingresa un email válido".to_string(),
        "service_tag_length" => format!(
            "Cada identificador debe tener entre 1 y {MAX_SERVICE_TAG} caracteres"
        ),
        "priority" => "Selecciona una prioridad válida (Alta, Media o Baja)".to_string(),
        "source" => "Origen inválido (web, email, phone o chat)".to_string(),
        other => format!("{}: regla {other} no cumplida", field.label()),
    }
}

fn max_length(field: Field) -> u64 {
    match field {
        Field::ContactName => MAX_CONTACT_NAME,
        Field::CompanyName => MAX_COMPANY_NAME,
        Field::ContactPhone => MAX_PHONE,
        Field::Title => MAX_TITLE,
        Field::Description => MAX_DESCRIPTION,
        _ => 0,
    }
}
