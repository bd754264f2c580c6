// Wire types shared by the HTTP handlers and the client
pub mod format;
pub mod requests;

pub use format::{Envelope, ErrorBody};
pub use requests::*;
