pub mod memory;
pub mod parsing;
pub mod source;
pub mod sparql;

pub use memory::MemorySource;
pub use parsing::parse_sparql_results;
pub use source::{RecordSource, SourceError, SourceHeaders};
pub use sparql::SparqlClient;
