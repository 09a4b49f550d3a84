use thiserror::Error;

/// Errors produced while rendering a weather message.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid observation time '{input}', expected a value like \"16 Aug 11:14\"")]
    InvalidTime {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}
