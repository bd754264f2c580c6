use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid date range: 'from' must not be after 'to'")]
    InvalidRange,

    #[error("Cannot filter by company {0} outside your own tenant")]
    ForeignCompany(i64),
}
