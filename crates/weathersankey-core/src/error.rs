pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown weather condition: {condition} (raw value {raw:?})")]
    UnknownCondition { condition: String, raw: String },

    #[error("Record {index} is missing field {field:?}")]
    MissingField { index: usize, field: String },

    #[error("Record {index} has an invalid {field:?} field: {message}")]
    InvalidField {
        index: usize,
        field: String,
        message: String,
    },

    #[error("Record {index} has an unparseable date: {value:?}")]
    InvalidDate { index: usize, value: String },

    #[error("Duplicate date in weather series: {date}")]
    DuplicateDate { date: String },

    #[error("Duplicate condition category id: {id}")]
    DuplicateCategory { id: String },

    #[error("Duplicate condition sort index: {sort_index}")]
    DuplicateSortIndex { sort_index: u32 },
}
