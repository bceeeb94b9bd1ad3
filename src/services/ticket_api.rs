use async_trait::async_trait;

use crate::domain::ticket::{TicketReceipt, ValidatedTicket};
use crate::error::AppResult;

/// The remote ticket service. One call per submit action.
#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn create_ticket(&self, ticket: &ValidatedTicket) -> AppResult<TicketReceipt>;
}
