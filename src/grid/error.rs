use thiserror::Error;

/// Errors raised while constructing a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
}

/// Contract violations when starting a gesture.
///
/// None of these touch an already active session; the caller simply does not
/// get a new one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("a drag session for appointment {active} is already in progress")]
    SessionActive { active: i64 },

    #[error("appointment {0} is not part of the current snapshot")]
    UnknownAppointment(i64),

    #[error("appointment {0} is not in the displayed week")]
    NotInWeek(i64),
}
