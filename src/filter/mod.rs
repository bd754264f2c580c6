pub mod error;
pub mod ticket;

pub use error::FilterError;
pub use ticket::TicketFilter;
