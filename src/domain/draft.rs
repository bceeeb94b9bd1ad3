use serde::{Deserialize, Serialize};

use crate::domain::field::Field;
use crate::domain::ticket::{Attachment, Priority, Source};

/// In-progress ticket form. Every operation is total; checking happens in
/// [`crate::domain::validation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketDraft {
    pub contact_name: String,
    pub company_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub priority: String,
    pub title: String,
    pub description: String,
    pub service_tags: Vec<String>,
    pub source: String,
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

impl Default for TicketDraft {
    fn default() -> Self {
        Self {
            contact_name: String::new(),
            company_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            priority: Priority::default().as_str().to_string(),
            title: String::new(),
            description: String::new(),
            service_tags: Vec::new(),
            source: Source::default().as_str().to_string(),
            attachments: Vec::new(),
        }
    }
}

impl TicketDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a field's text. For [`Field::ServiceTags`] the value is read as
    /// a comma separated list.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::ContactName => self.contact_name = value,
            Field::CompanyName => self.company_name = value,
            Field::ContactEmail => self.contact_email = value,
            Field::ContactPhone => self.contact_phone = value,
            Field::Priority => self.priority = value,
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Source => self.source = value,
            Field::ServiceTags => {
                self.service_tags.clear();
                for label in value.split(',') {
                    self.add_service_tag(label);
                }
            }
        }
    }

    pub fn get(&self, field: Field) -> String {
        match field {
            Field::ContactName => self.contact_name.clone(),
            Field::CompanyName => self.company_name.clone(),
            Field::ContactEmail => self.contact_email.clone(),
            Field::ContactPhone => self.contact_phone.clone(),
            Field::Priority => self.priority.clone(),
            Field::Title => self.title.clone(),
            Field::Description => self.description.clone(),
            Field::Source => self.source.clone(),
            Field::ServiceTags => self.service_tags.join(", "),
        }
    }

    /// Returns `false` when the trimmed label is empty or already present.
    pub fn add_service_tag(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.service_tags.iter().any(|tag| tag == label) {
            return false;
        }
        self.service_tags.push(label.to_string());
        true
    }

    pub fn remove_service_tag(&mut self, label: &str) -> bool {
        let before = self.service_tags.len();
        self.service_tags.retain(|tag| tag != label.trim());
        before != self.service_tags.len()
    }

    pub fn add_attachments(&mut self, batch: impl IntoIterator<Item = Attachment>) {
        self.attachments.extend(batch);
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        (index < self.attachments.len()).then(|| self.attachments.remove(index))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
