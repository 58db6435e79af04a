use thiserror::Error;

pub type WnResult<T> = Result<T, WnError>;

#[derive(Error, Debug)]
pub enum WnError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Malformed clock time '{text}': expected HH:MM")]
    MalformedClockTime { text: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
