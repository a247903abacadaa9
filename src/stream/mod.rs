pub mod splitter;
pub mod parser;

pub use splitter::{CompleteLines, LineSplitter};
pub use parser::{parse_record, ParsedRecord, RecordParseError};
