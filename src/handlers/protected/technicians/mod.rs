pub mod duty;
pub mod list;

pub use duty::update_duty;
pub use list::list;
