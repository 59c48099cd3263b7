//! Hashtag facets for Bluesky posts.
//!
//! Bluesky does not parse `#tags` out of plain text; the client must attach a facet
//! per tag with UTF-8 byte offsets into the post text.

use serde::Serialize;

const MAX_TAG_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<TagFeature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagFeature {
    #[serde(rename = "$type")]
    pub kind: &'static str,
    pub tag: String,
}

/// Find hashtags: `#` at the start or after whitespace, running to the next whitespace,
/// minus trailing punctuation. Pure-digit tags are not tags.
pub fn hashtag_facets(text: &str) -> Vec<Facet> {
    let mut facets = Vec::new();
    let mut prev: Option<char> = None;

    for (start, c) in text.char_indices() {
        let at_boundary = prev.is_none_or(char::is_whitespace);
        prev = Some(c);
        if c != '#' || !at_boundary {
            continue;
        }

        let body_start = start + c.len_utf8();
        let rest = &text[body_start..];
        let raw_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let tag = rest[..raw_len].trim_end_matches(|ch: char| ch.is_ascii_punctuation() || is_unicode_punct(ch));

        if tag.is_empty()
            || tag.starts_with('#')
            || tag.chars().all(|ch| ch.is_ascii_digit())
            || tag.chars().count() > MAX_TAG_CHARS
        {
            continue;
        }

        facets.push(Facet {
            index: ByteSlice {
                byte_start: start,
                byte_end: body_start + tag.len(),
            },
            features: vec![TagFeature {
                kind: "app.bsky.richtext.facet#tag",
                tag: tag.to_string(),
            }],
        });
    }
    facets
}

fn is_unicode_punct(c: char) -> bool {
    matches!(c, '…' | '¡' | '¿' | '“' | '”' | '‘' | '’' | '—' | '–' | '«' | '»')
}
