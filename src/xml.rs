//! XML tree walker: text to a schema-agnostic node tree

pub mod node;
pub mod parser;

pub use node::XmlNode;
pub use parser::Parser;
