use chrono::NaiveDate;

/// Errors surfaced at the roster boundary.
///
/// The optimizer itself never fails once its input has been validated;
/// everything here is either malformed input or an I/O problem in the loaders.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("unknown slot `{slot}` requested by {staff} on {date}")]
    UnknownSlot {
        date: NaiveDate,
        staff: String,
        slot: String,
    },

    #[error("slot `{slot}` requested twice by {staff} on {date}")]
    DuplicateSlot {
        date: NaiveDate,
        staff: String,
        slot: String,
    },

    #[error("invalid schedule configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid date `{value}` on line {line}")]
    InvalidDate { value: String, line: u64 },

    #[error("missing column `{0}` in availability CSV")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RosterError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
