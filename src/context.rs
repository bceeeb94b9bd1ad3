use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{AttachmentSource, TicketApi};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub ticket_api: Arc<dyn TicketApi>,
    pub attachments: Arc<dyn AttachmentSource>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        ticket_api: Arc<dyn TicketApi>,
        attachments: Arc<dyn AttachmentSource>,
    ) -> Self {
        Self {
            config,
            ticket_api,
            attachments,
        }
    }
}
