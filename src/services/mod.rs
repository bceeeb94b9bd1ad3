pub mod attachments;
pub mod ticket_api;

pub use attachments::AttachmentSource;
pub use ticket_api::TicketApi;
