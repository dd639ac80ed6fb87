use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CmlError;

/// The two tag families of CML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Single-segment-identified span, e.g. `[[cc.out.summary]]...[[/cc.out.summary]]`.
    Out,
    /// Dotted, optionally comment-prefixed span, e.g.
    /// `# [[cc.block.class.Foo]]...[[/cc.block.class.Foo]]`.
    Block,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Out => write!(f, "out"),
            BlockKind::Block => write!(f, "block"),
        }
    }
}

impl FromStr for BlockKind {
    type Err = CmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "out" => Ok(BlockKind::Out),
            "block" => Ok(BlockKind::Block),
            other => Err(CmlError::InvalidBlockType(other.to_string())),
        }
    }
}

/// Result of a whole-content parse.
///
/// The two containers are deliberately different: OUT spans model unique
/// named outputs, so later duplicates overwrite earlier ones; BLOCK spans
/// model possibly repeated source regions whose document order matters
/// for reconstruction, so duplicates and order are both preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    pub out: BTreeMap<String, String>,
    pub block: Vec<(String, String)>,
}

/// A single completed span produced by the streaming parser.
///
/// Content is the literal text between the markers; no trimming, no
/// re-encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub tag: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_block_kind_round_trips_through_str() {
        assert_eq!("out".parse::<BlockKind>().unwrap(), BlockKind::Out);
        assert_eq!("block".parse::<BlockKind>().unwrap(), BlockKind::Block);
        assert_eq!(BlockKind::Out.to_string(), "out");
        assert_eq!(BlockKind::Block.to_string(), "block");
    }

    #[test]
    fn test_unknown_kind_is_rejected_by_name() {
        let err = "code".parse::<BlockKind>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid block type: code");
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert!("Out".parse::<BlockKind>().is_err());
        assert!("BLOCK".parse::<BlockKind>().is_err());
    }
}
