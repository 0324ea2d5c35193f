//! Single-pass tokenizer that splits message text into prose and fenced-code
//! segments.
//!
//! A fence is three backticks, an optional alphanumeric language tag, a
//! required newline, a lazily-matched body, and a closing three backticks.
//! Fences never nest; scanning is one left-to-right pass. Text without any
//! complete fence yields a single plain segment equal to the input.

use memchr::memmem;

/// Language assigned to a fenced block that carries no tag.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

const FENCE: &[u8] = b"```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Prose, passed through verbatim.
    Plain(String),
    /// A fenced code block. `content` is the body with surrounding
    /// whitespace trimmed; `language` defaults to [`DEFAULT_LANGUAGE`].
    Code { language: String, content: String },
}

/// Split `text` into an ordered, non-overlapping sequence of segments.
pub fn segment_text(text: &str) -> Vec<Segment> {
    let bytes = text.as_bytes();
    let finder = memmem::Finder::new(FENCE);
    let mut segments = Vec::new();
    let mut last = 0usize;
    let mut pos = 0usize;
    let mut matched_any = false;

    while let Some(off) = finder.find(&bytes[pos..]) {
        let open = pos + off;
        let tag_start = open + FENCE.len();
        let mut tag_end = tag_start;
        while tag_end < bytes.len()
            && (bytes[tag_end].is_ascii_alphanumeric() || bytes[tag_end] == b'_')
        {
            tag_end += 1;
        }
        if tag_end >= bytes.len() || bytes[tag_end] != b'\n' {
            // Not an opener here; resume one byte later so runs of more than
            // three backticks are still examined.
            pos = open + 1;
            continue;
        }
        let body_start = tag_end + 1;
        let Some(close_off) = finder.find(&bytes[body_start..]) else {
            // Unterminated fence: the remainder stays prose.
            break;
        };
        let close = body_start + close_off;

        if open > last {
            segments.push(Segment::Plain(text[last..open].to_string()));
        }
        let language = if tag_start == tag_end {
            DEFAULT_LANGUAGE
        } else {
            &text[tag_start..tag_end]
        };
        segments.push(Segment::Code {
            language: language.to_string(),
            content: text[body_start..close].trim().to_string(),
        });
        last = close + FENCE.len();
        pos = last;
        matched_any = true;
    }

    if last < text.len() {
        segments.push(Segment::Plain(text[last..].to_string()));
    } else if !matched_any {
        segments.push(Segment::Plain(text.to_string()));
    }
    segments
}
