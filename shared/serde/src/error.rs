use thiserror::Error;

/// Errors raised while decoding or encoding a packet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// A read needed more bytes than the packet had left
    #[error("Packet underflow: needed {needed} byte(s) but only {remaining} remain")]
    Underflow { needed: usize, remaining: usize },

    /// A numeric field sent as text could not be parsed
    #[error("Invalid numeric text `{text}`")]
    InvalidNumber { text: String },

    /// A count prefix was negative
    #[error("Invalid length prefix {length}")]
    InvalidLength { length: i64 },

    /// A text field did not follow its expected layout
    #[error("Invalid {field} `{text}`")]
    InvalidFormat { field: &'static str, text: String },

    /// A string is too long for its 16-bit length prefix
    #[error("String of {length} bytes does not fit a 16-bit length prefix")]
    StringTooLong { length: usize },
}
