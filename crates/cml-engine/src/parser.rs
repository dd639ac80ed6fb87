use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::CmlError;
use crate::grammar::Grammar;
use crate::stream::CmlStream;
use crate::types::ParseResult;

/// Parser for Cogni Markup Language (CML).
///
/// Holds the compiled tag grammar, fixed at construction and reusable
/// across any number of independent parse calls; no per-call state is
/// retained.
#[derive(Debug)]
pub struct CmlParser {
    grammar: Grammar,
}

impl CmlParser {
    pub fn new() -> Result<Self, CmlError> {
        Ok(Self {
            grammar: Grammar::compile()?,
        })
    }

    /// Extract every OUT span into a name → content mapping.
    ///
    /// Matches are folded in document order, so a later span sharing a
    /// name overwrites an earlier one.
    pub fn parse_out_blocks(&self, content: &str) -> Result<BTreeMap<String, String>, CmlError> {
        let mut out = BTreeMap::new();
        let mut at = 0;
        while let Some(m) = self.grammar.next_out(content, at) {
            at = m.end;
            out.insert(m.tag, m.content);
        }
        Ok(out)
    }

    /// Extract every BLOCK span as ordered (identifier, content) pairs.
    ///
    /// Duplicates and document order are both preserved, since block
    /// spans may repeat and their order matters for reconstruction.
    pub fn parse_code_blocks(&self, content: &str) -> Result<Vec<(String, String)>, CmlError> {
        let mut blocks = Vec::new();
        let mut at = 0;
        while let Some(m) = self.grammar.next_block(content, at) {
            at = m.end;
            blocks.push((m.tag, m.content));
        }
        Ok(blocks)
    }

    /// Run both extractions over in-memory text.
    ///
    /// A failure from either sub-extraction is wrapped into a single
    /// content parse error, with the original failure as its chained
    /// cause.
    pub fn parse_content(&self, content: &str) -> Result<ParseResult, CmlError> {
        let extract = || -> Result<ParseResult, CmlError> {
            Ok(ParseResult {
                out: self.parse_out_blocks(content)?,
                block: self.parse_code_blocks(content)?,
            })
        };
        extract().map_err(|e| CmlError::Content {
            source: Box::new(e),
        })
    }

    /// Read a file as text and parse its content.
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult, CmlError> {
        let content = crate::io::read_file(path)?;
        self.parse_content(&content)
    }

    /// Incrementally parse a line-oriented source, yielding spans as soon
    /// as they are complete. See [`CmlStream`].
    pub fn parse_stream<R: BufRead>(&self, reader: R) -> CmlStream<'_, R> {
        CmlStream::new(&self.grammar, reader)
    }
}

/// Concatenate block lists, preserving each list's internal order and the
/// order of the lists themselves. No de-duplication, no reordering.
pub fn merge_block_lists<I>(lists: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = Vec<(String, String)>>,
{
    lists.into_iter().flatten().collect()
}
