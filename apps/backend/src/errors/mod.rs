//! Error codes shared by the wire protocol and HTTP error responses.

pub mod error_code;

pub use error_code::ErrorCode;
