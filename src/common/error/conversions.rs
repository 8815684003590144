//! Error conversion implementations.
//!
//! This module contains From trait implementations for the XML layer. ZIP
//! and I/O errors are not converted blanket-wise because the same error type
//! means "unreadable archive" on the read side and "write failed" on the
//! write side; those call sites map explicitly.

use super::types::Error;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedMarkup(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::MalformedMarkup(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::MalformedMarkup(format!("Invalid UTF-8 in markup: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::MalformedMarkup(format!("Invalid UTF-8 in markup: {}", err))
    }
}
