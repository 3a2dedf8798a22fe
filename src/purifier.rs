//! HTML purification seam.
//!
//! The cage treats the purification engine as a black box behind the
//! [`Purifier`] trait: anything that turns untrusted markup into sanitized
//! markup can be injected. [`DefaultPurifier`] is the engine a cage creates
//! lazily when none was supplied — a deliberately conservative allowlist
//! stripper, not a full HTML rewriter.

/// A pluggable HTML sanitization engine.
///
/// Implementations take untrusted markup and return markup that is safe to
/// embed. The cage calls this synchronously from
/// [`purified_html`](crate::Cage::purified_html).
pub trait Purifier {
    /// Sanitizes one HTML fragment.
    fn purify(&self, html: &str) -> String;
}

/// Tags the default engine lets through (with all attributes dropped).
const ALLOWED_TAGS: &[&str] = &[
    "a",
    "b",
    "blockquote",
    "br",
    "code",
    "em",
    "i",
    "li",
    "ol",
    "p",
    "pre",
    "strong",
    "ul",
];

/// The built-in allowlist purifier.
///
/// Behavior:
/// - tags on the allowlist are kept, lowercased, with every attribute
///   dropped (`<A HREF="x">` becomes `<a>`);
/// - `script` and `style` elements are removed together with their content;
/// - every other tag is stripped, its inner text kept;
/// - a bare `<` or `>` outside any tag is entity-escaped.
///
/// It does not rebalance malformed nesting; swap in a full engine via
/// [`Cage::set_purifier`](crate::Cage::set_purifier) when that matters.
///
/// # Examples
///
/// ```
/// use input_cage::{DefaultPurifier, Purifier};
///
/// let engine = DefaultPurifier;
/// let out = engine.purify("<IMG \"\"\"><SCRIPT>alert(\"XSS\")</SCRIPT>\">");
/// assert_eq!(out, "\"&gt;");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPurifier;

struct TagToken {
    name: String,
    closing: bool,
    /// Byte index just past the terminating `>` (or end of input when the
    /// tag is unterminated).
    end: usize,
}

impl Purifier for DefaultPurifier {
    fn purify(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let bytes = html.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'>' => {
                    out.push_str("&gt;");
                    i += 1;
                }
                b'<' => match read_tag(html, i) {
                    Some(tag) => {
                        if tag.name == "script" || tag.name == "style" {
                            i = if tag.closing {
                                tag.end
                            } else {
                                skip_element(html, tag.end, &tag.name)
                            };
                        } else if ALLOWED_TAGS.contains(&tag.name.as_str()) {
                            out.push('<');
                            if tag.closing {
                                out.push('/');
                            }
                            out.push_str(&tag.name);
                            out.push('>');
                            i = tag.end;
                        } else {
                            i = tag.end;
                        }
                    }
                    None => {
                        out.push_str("&lt;");
                        i += 1;
                    }
                },
                _ => {
                    let next = html[i..]
                        .find(['<', '>'])
                        .map_or(html.len(), |pos| i + pos);
                    out.push_str(&html[i..next]);
                    i = next;
                }
            }
        }
        out
    }
}

/// Reads a tag token starting at the `<` at byte `start`. Returns `None`
/// when what follows is not tag-shaped (the `<` is then literal text).
fn read_tag(html: &str, start: usize) -> Option<TagToken> {
    let bytes = html.as_bytes();
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    if !bytes.get(i).is_some_and(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let name_start = i;
    while bytes.get(i).is_some_and(|b| b.is_ascii_alphanumeric()) {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();
    // an unterminated tag swallows the rest of the input
    let end = html[i..].find('>').map_or(html.len(), |pos| i + pos + 1);
    Some(TagToken { name, closing, end })
}

/// Skips past the matching `</name>` (case-insensitive), or to the end of
/// input when the element is never closed.
fn skip_element(html: &str, from: usize, name: &str) -> usize {
    let lowered = html[from..].to_ascii_lowercase();
    let needle = format!("</{}", name);
    match lowered.find(&needle) {
        Some(pos) => {
            let close_start = from + pos;
            html[close_start..]
                .find('>')
                .map_or(html.len(), |gt| close_start + gt + 1)
        }
        None => html.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_elements_vanish_with_their_content() {
        let engine = DefaultPurifier;
        assert_eq!(
            engine.purify("<IMG \"\"\"><SCRIPT>alert(\"XSS\")</SCRIPT>\">"),
            "\"&gt;"
        );
        assert_eq!(engine.purify("a<style>p{}</style>b"), "ab");
        assert_eq!(engine.purify("a<script>never closed"), "a");
    }

    #[test]
    fn allowed_tags_survive_without_attributes() {
        let engine = DefaultPurifier;
        assert_eq!(
            engine.purify("<A HREF=\"javascript:evil()\">hi</A>"),
            "<a>hi</a>"
        );
        assert_eq!(
            engine.purify("<p onclick=\"x()\">text</p>"),
            "<p>text</p>"
        );
    }

    #[test]
    fn disallowed_tags_are_stripped_keeping_text() {
        let engine = DefaultPurifier;
        assert_eq!(engine.purify("<img id=\"475\">yes</img>"), "yes");
        assert_eq!(engine.purify("<div><em>kept</em></div>"), "<em>kept</em>");
    }

    #[test]
    fn bare_angle_brackets_are_escaped() {
        let engine = DefaultPurifier;
        assert_eq!(engine.purify("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
        assert_eq!(engine.purify("<3"), "&lt;3");
    }

    #[test]
    fn malformed_nesting_passes_through_unbalanced() {
        // the default engine filters, it does not rewrite structure
        let engine = DefaultPurifier;
        assert_eq!(
            engine.purify("<p>This is a malformed fragment of <em>HTML</p></em>"),
            "<p>This is a malformed fragment of <em>HTML</p></em>"
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        let engine = DefaultPurifier;
        assert_eq!(engine.purify("nothing to do here"), "nothing to do here");
        assert_eq!(engine.purify(""), "");
    }
}
