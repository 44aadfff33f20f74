//! XML plumbing shared by the generator and the response parser.

mod document;
mod writer;

pub(crate) use document::Element;
pub(crate) use writer::XmlWriter;
