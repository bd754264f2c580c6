pub mod events;
pub mod hub;
pub mod socket;

pub use events::{BroadcastMessage, BroadcastTarget, RelayEvent, Viewer};
pub use hub::RelayHub;
pub use socket::relay_socket;
