pub mod dashboard;
pub mod workload;

pub use dashboard::DashboardStats;
pub use workload::{attach_workload, technicians_with_workload};
