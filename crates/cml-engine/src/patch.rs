/// Apply parsed patch blocks to original text.
///
/// Blocks are applied in order. An identifier containing `remove`
/// deletes the named block (every `remove.` stripped from the
/// identifier); any other block replaces the existing comment-prefixed
/// block of the same identifier in place, or is appended at the end when
/// the original has none.
pub fn apply_patch(original: &str, blocks: &[(String, String)]) -> String {
    let mut patched = original.to_string();
    for (tag, content) in blocks {
        if tag.contains("remove") {
            patched = remove_block(&patched, &tag.replace("remove.", ""));
        } else {
            patched = add_or_replace_block(&patched, tag, content);
        }
    }
    patched
}

fn markers(tag: &str) -> (String, String) {
    (
        format!("# [[cc.block.{tag}]]"),
        format!("# [[/cc.block.{tag}]]"),
    )
}

fn add_or_replace_block(content: &str, tag: &str, block_content: &str) -> String {
    let (block_start, block_end) = markers(tag);
    // Canonical framing: surrounding newlines come from the markers, not
    // the patch content.
    let body = block_content.trim_matches('\n');
    let full_block = format!("{block_start}\n{body}\n{block_end}");

    match (content.find(&block_start), content.find(&block_end)) {
        (Some(start), Some(end)) => {
            let end = end + block_end.len();
            format!("{}{}{}", &content[..start], full_block, &content[end..])
        }
        _ => {
            if !content.is_empty() && !content.ends_with('\n') {
                format!("{content}\n{full_block}")
            } else {
                format!("{content}{full_block}")
            }
        }
    }
}

fn remove_block(content: &str, tag: &str) -> String {
    let (block_start, block_end) = markers(tag);
    match (content.find(&block_start), content.find(&block_end)) {
        (Some(start), Some(end)) => {
            format!("{}{}", &content[..start], &content[end + block_end.len()..])
        }
        _ => content.to_string(),
    }
}
