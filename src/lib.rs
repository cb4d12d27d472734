//! webthumb-xml - binding-driven XML deserializer for WebThumb API responses
//!
//! Target types declare, per field, which attribute, child element or text
//! feeds it ([`FieldBinding`]). A single generic routine parses the document
//! into an [`XmlNode`] tree and walks it, coercing raw text into integers,
//! doubles, flags and `YYYY-MM-DD hh:mm:ss` timestamps.
//!
//! # Quick Start
//!
//! ```
//! use webthumb_xml::{from_xml_str, Response};
//! # fn main() -> Result<(), webthumb_xml::Error> {
//! let xml = "<webthumb><jobs>\
//!            <job estimate='20' time='2008-02-27 16:49:48' url='http://a' cost='1'>wt1</job>\
//!            </jobs></webthumb>";
//! let response: Response = from_xml_str(xml)?;
//! assert_eq!(response.jobs.len(), 1);
//! assert_eq!(response.jobs.first().map(|job| job.estimate), Some(20));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use tracing::debug;

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod config;
pub use config::Config;

mod cursor;

pub mod xml;
pub use xml::{Parser, XmlNode};

pub mod binding;
pub use binding::{FieldBinding, FromXml, Nested, Source, ValueKind};

pub mod registry;
pub use registry::{BindingSet, Registry};

pub mod coerce;

pub mod value;
pub use value::{Field, FieldValue};

pub mod materialize;
pub use materialize::materialize;

pub mod webthumb;
pub use webthumb::{Credits, Job, JobStatus, Response, Status};

/// Parse XML text into a node tree
pub fn parse(xml: &str) -> Result<XmlNode> {
    parse_with_config(xml, Config::default())
}

/// Parse XML text with custom limits
pub fn parse_with_config(xml: &str, config: Config) -> Result<XmlNode> {
    Parser::with_config(xml.as_bytes(), config).parse()
}

/// Parse XML text and materialize it as `T`
pub fn from_xml_str<T: FromXml>(xml: &str) -> Result<T> {
    from_xml_str_with_config(xml, Config::default())
}

/// Parse XML bytes and materialize them as `T`
pub fn from_xml_bytes<T: FromXml>(bytes: &[u8]) -> Result<T> {
    let root = Parser::new(bytes).parse()?;
    from_node(&root)
}

/// Parse with custom limits and materialize as `T`
pub fn from_xml_str_with_config<T: FromXml>(xml: &str, config: Config) -> Result<T> {
    let root = parse_with_config(xml, config)?;
    from_node(&root)
}

/// Materialize an already-parsed tree through the global registry
pub fn from_node<T: FromXml>(root: &XmlNode) -> Result<T> {
    debug!(
        root = %root.name,
        target_type = std::any::type_name::<T>(),
        "mapping document"
    );
    materialize(Registry::global(), root)
}
