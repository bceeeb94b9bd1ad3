pub mod draft;
pub mod field;
pub mod sample;
pub mod ticket;
pub mod validation;
