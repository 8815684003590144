//! XML text helpers shared by the markup adapter and the render driver.

mod escape;

pub use escape::{escape_attribute, escape_text, unescape_xml};
pub(crate) use escape::decode_reference;
