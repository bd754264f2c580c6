pub mod company;
pub mod technician;
pub mod ticket;
pub mod user;

pub use company::Company;
pub use technician::Technician;
pub use ticket::Ticket;
pub use user::{User, UserSummary};
