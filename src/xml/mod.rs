//! XML plumbing shared by all dialects: typed queries over a parsed tree
//! (`roxmltree`), a profile-gated writer (`quick-xml`) and number/date
//! formatting.

pub mod format;
mod query;
mod writer;

pub use format::{format_decimal, parse_date};
pub use query::{Namespaces, XmlQuery, parse_code};
pub use writer::ProfileAwareXmlWriter;
