use regex::Regex;

use crate::error::CmlError;
use crate::types::BlockKind;

/// Open marker for OUT spans, capturing the name.
const OUT_OPEN: &str = r"\[\[cc\.out\.(\w+)\]\]";

/// Open marker for BLOCK spans, anchored at start of line, capturing the
/// dotted qualifier suffix with its leading separator.
const BLOCK_OPEN: &str = r"(?m)^(?:#\s*)?\[\[cc\.block((?:\.\w+)*)\]\]";

/// A complete open..close span located in a haystack.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TagMatch {
    pub kind: BlockKind,
    /// Byte offset of the open marker, including any comment prefix.
    pub start: usize,
    /// Byte offset just past the close marker.
    pub end: usize,
    /// OUT name, or BLOCK qualifier path without its leading `.`.
    pub tag: String,
    /// Literal text between the markers.
    pub content: String,
}

/// Compiled tag rules.
///
/// Immutable after construction; safe to share read-only across any
/// number of independent parses.
///
/// The regex crate has no backreferences, so identifier pairing is
/// two-phase: locate the next open marker and its captured identifier,
/// then scan forward for the nearest close marker carrying the identical
/// identifier. A close with a different identifier is ordinary text, and
/// an open with no matching close is silently skipped.
#[derive(Debug)]
pub(crate) struct Grammar {
    out_open: Regex,
    block_open: Regex,
}

impl Grammar {
    pub(crate) fn compile() -> Result<Self, CmlError> {
        Ok(Self {
            out_open: Regex::new(OUT_OPEN).map_err(|e| CmlError::Syntax(e.to_string()))?,
            block_open: Regex::new(BLOCK_OPEN).map_err(|e| CmlError::Syntax(e.to_string()))?,
        })
    }

    /// Next complete OUT span at or after `from`. Earliest identical-name
    /// close wins.
    pub(crate) fn next_out(&self, text: &str, from: usize) -> Option<TagMatch> {
        let mut search = from;
        while let Some(caps) = self.out_open.captures_at(text, search) {
            let open = caps.get(0).unwrap();
            let name = &caps[1];
            let close = format!("[[/cc.out.{name}]]");
            if let Some(rel) = text[open.end()..].find(&close) {
                let content_end = open.end() + rel;
                return Some(TagMatch {
                    kind: BlockKind::Out,
                    start: open.start(),
                    end: content_end + close.len(),
                    tag: name.to_string(),
                    content: text[open.end()..content_end].to_string(),
                });
            }
            search = open.end();
        }
        None
    }

    /// Next complete BLOCK span at or after `from`. The close must carry
    /// the identical dotted suffix and may be comment-prefixed
    /// independently of the open.
    pub(crate) fn next_block(&self, text: &str, from: usize) -> Option<TagMatch> {
        let mut search = from;
        while let Some(caps) = self.block_open.captures_at(text, search) {
            let open = caps.get(0).unwrap();
            let suffix = &caps[1];
            let close = format!("[[/cc.block{suffix}]]");
            if let Some(rel) = text[open.end()..].find(&close) {
                let close_start = open.end() + rel;
                let content_end = close_prefix_start(text, open.end(), close_start);
                return Some(TagMatch {
                    kind: BlockKind::Block,
                    start: open.start(),
                    end: close_start + close.len(),
                    tag: suffix.strip_prefix('.').unwrap_or(suffix).to_string(),
                    content: text[open.end()..content_end].to_string(),
                });
            }
            search = open.end();
        }
        None
    }

    /// Earliest complete span of either family at or after `from`.
    ///
    /// OUT and BLOCK markers can never begin at the same offset, so
    /// ordering by start offset is total.
    pub(crate) fn next_match(&self, text: &str, from: usize) -> Option<TagMatch> {
        match (self.next_out(text, from), self.next_block(text, from)) {
            (Some(out), Some(block)) => Some(if out.start <= block.start { out } else { block }),
            (out, block) => out.or(block),
        }
    }

    /// Start of the earliest open marker of either family at or after
    /// `from`, whether or not a close for it has arrived yet.
    pub(crate) fn first_open(&self, text: &str, from: usize) -> Option<usize> {
        let out = self.out_open.find_at(text, from).map(|m| m.start());
        let block = self.block_open.find_at(text, from).map(|m| m.start());
        match (out, block) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// A close marker may be comment-prefixed; the `#` and the whitespace
/// after it belong to the marker, not the content.
fn close_prefix_start(text: &str, content_start: usize, close_start: usize) -> usize {
    let between = &text[content_start..close_start];
    match between.trim_end().strip_suffix('#') {
        Some(kept) => content_start + kept.len(),
        None => close_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grammar() -> Grammar {
        Grammar::compile().unwrap()
    }

    #[test]
    fn test_out_span_captures_name_and_verbatim_content() {
        let m = grammar()
            .next_out("x [[cc.out.summary]]two\nlines[[/cc.out.summary]] y", 0)
            .unwrap();
        assert_eq!(m.tag, "summary");
        assert_eq!(m.content, "two\nlines");
        assert_eq!(m.start, 2);
    }

    #[test]
    fn test_out_close_with_different_name_is_ordinary_text() {
        let g = grammar();
        assert_eq!(g.next_out("[[cc.out.a]]text[[/cc.out.b]]", 0), None);
    }

    #[test]
    fn test_out_earliest_close_wins() {
        let m = grammar()
            .next_out("[[cc.out.a]]x[[/cc.out.a]]y[[/cc.out.a]]", 0)
            .unwrap();
        assert_eq!(m.content, "x");
    }

    #[test]
    fn test_out_skips_dangling_open_before_complete_span() {
        let m = grammar()
            .next_out("[[cc.out.gone]] [[cc.out.kept]]v[[/cc.out.kept]]", 0)
            .unwrap();
        assert_eq!(m.tag, "kept");
    }

    #[test]
    fn test_block_dotted_path_strips_leading_separator_only() {
        let m = grammar()
            .next_block("[[cc.block.a.b]] X [[/cc.block.a.b]]", 0)
            .unwrap();
        assert_eq!(m.tag, "a.b");
        assert_eq!(m.content, " X ");
    }

    #[test]
    fn test_block_root_token_alone_matches_with_empty_path() {
        let m = grammar().next_block("[[cc.block]]c[[/cc.block]]", 0).unwrap();
        assert_eq!(m.tag, "");
        assert_eq!(m.content, "c");
    }

    #[test]
    fn test_block_suffix_mismatch_is_silently_skipped() {
        let g = grammar();
        assert_eq!(g.next_block("[[cc.block.x]]text[[/cc.block.y]]", 0), None);
    }

    #[test]
    fn test_block_open_must_start_a_line() {
        let g = grammar();
        assert_eq!(g.next_block("code [[cc.block.a]]x[[/cc.block.a]]", 0), None);

        let m = g
            .next_block("code\n[[cc.block.a]]x[[/cc.block.a]]", 0)
            .unwrap();
        assert_eq!(m.tag, "a");
    }

    #[test]
    fn test_block_comment_prefix_is_optional_at_each_end_independently() {
        let g = grammar();

        let m = g
            .next_block("# [[cc.block.a]]\nbody\n[[/cc.block.a]]", 0)
            .unwrap();
        assert_eq!(m.content, "\nbody\n");

        let m = g
            .next_block("[[cc.block.a]]\nbody\n# [[/cc.block.a]]", 0)
            .unwrap();
        assert_eq!(m.content, "\nbody\n");
    }

    #[test]
    fn test_close_comment_prefix_absorbs_one_hash_with_whitespace() {
        let g = grammar();

        // Only the final `#` and its trailing whitespace belong to the
        // close marker.
        let m = g.next_block("[[cc.block.a]]x## [[/cc.block.a]]", 0).unwrap();
        assert_eq!(m.content, "x#");

        // A `#` separated from the marker by non-whitespace stays content.
        let m = g.next_block("[[cc.block.a]]x#y [[/cc.block.a]]", 0).unwrap();
        assert_eq!(m.content, "x#y ");
    }

    #[test]
    fn test_rules_are_case_sensitive() {
        let g = grammar();
        assert_eq!(g.next_out("[[CC.OUT.a]]x[[/CC.OUT.a]]", 0), None);
        assert_eq!(g.next_block("[[cc.Block.a]]x[[/cc.Block.a]]", 0), None);
    }

    #[test]
    fn test_next_match_orders_families_by_start_offset() {
        let g = grammar();
        let text = "[[cc.block.b]]1[[/cc.block.b]] [[cc.out.o]]2[[/cc.out.o]]";

        let first = g.next_match(text, 0).unwrap();
        assert_eq!((first.kind, first.tag.as_str()), (BlockKind::Block, "b"));

        let second = g.next_match(text, first.end).unwrap();
        assert_eq!((second.kind, second.tag.as_str()), (BlockKind::Out, "o"));
    }

    #[test]
    fn test_first_open_reports_dangling_markers() {
        let g = grammar();
        assert_eq!(g.first_open("text [[cc.out.pending]] more", 0), Some(5));
        assert_eq!(g.first_open("no tags here", 0), None);
    }
}
