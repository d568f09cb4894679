//! Text Rewriter (§4.9): replaces each accepted entity span with a
//! `||surface||id||` tag, right-to-left so earlier offsets stay valid.
//!
//! Grounded in `scanner::document::DocumentCortex`'s tag-insertion pass,
//! which walks mentions from the end of the document backward for the
//! same reason — rewriting forward would invalidate every subsequent
//! span's offsets.

use crate::types::{CanonicalEntity, Mention};

pub const DELIMITER: &str = "||";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedSurface {
    pub start: usize,
    pub end: usize,
}

pub struct RewriteOutcome {
    pub rewritten_text: String,
    /// Mentions dropped because their surface contained the literal `||`
    /// delimiter (§7 `SurfaceContainsDelimiter`) — the single mention is
    /// rejected, not the whole entity.
    pub rejected: Vec<RejectedSurface>,
}

/// Rewrites `document`, tagging every mention of every canonical entity.
/// `entities` need not be pre-sorted; mentions are collected, sorted by
/// start offset descending, and applied back-to-front.
pub fn rewrite(document: &str, entities: &[CanonicalEntity]) -> RewriteOutcome {
    struct TaggedMention<'a> {
        mention: &'a Mention,
        id: &'a str,
    }

    let mut mentions: Vec<TaggedMention> = entities
        .iter()
        .flat_map(|e| e.mentions.iter().map(move |m| TaggedMention { mention: m, id: e.id.as_str() }))
        .collect();
    mentions.sort_by(|a, b| b.mention.start.cmp(&a.mention.start));

    let mut rewritten = document.to_string();
    let mut rejected = Vec::new();

    for tagged in mentions {
        let m = tagged.mention;
        if m.surface.contains(DELIMITER) {
            rejected.push(RejectedSurface { start: m.start, end: m.end });
            continue;
        }
        let tag = format!("{d}{surface}{d}{id}{d}", d = DELIMITER, surface = m.surface, id = tagged.id);
        rewritten.replace_range(m.start..m.end, &tag);
    }

    RewriteOutcome { rewritten_text: rewritten, rejected }
}

/// Strips every `||surface||id||` tag back to `surface`, for the P5
/// round-trip property test.
pub fn strip_tags(rewritten: &str) -> String {
    let mut out = String::with_capacity(rewritten.len());
    let mut rest = rewritten;
    while let Some(open) = rest.find(DELIMITER) {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + DELIMITER.len()..];
        let Some(mid) = after_open.find(DELIMITER) else {
            // No closing delimiter pair: not a well-formed tag, copy through.
            out.push_str(&rest[open..]);
            return out;
        };
        let surface = &after_open[..mid];
        let after_surface = &after_open[mid + DELIMITER.len()..];
        let Some(close) = after_surface.find(DELIMITER) else {
            out.push_str(&rest[open..]);
            return out;
        };
        out.push_str(surface);
        rest = &after_surface[close + DELIMITER.len()..];
    }
    out.push_str(rest);
    out
}
