pub mod error;
pub mod generate;
mod grammar;
pub mod indent;
pub mod io;
pub mod parser;
pub mod patch;
pub mod stream;
pub mod types;

// Re-export key types for easier usage
pub use error::CmlError;
pub use generate::generate_cml_block;
pub use indent::remove_cml_indentation;
pub use parser::{CmlParser, merge_block_lists};
pub use patch::apply_patch;
pub use stream::CmlStream;
pub use types::{BlockKind, ParseResult, StreamEvent};
