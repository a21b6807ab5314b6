//! Line-oriented segmentation of answer text.
//!
//! A single left-to-right scan over trimmed lines. List markers are
//! checked before heading-like text rules, so `1) **Bold**:` is a
//! numbered item rather than a heading. Paragraph lines are joined with
//! single spaces, not newlines.

/// Longest body (in characters, excluding the trailing colon) a
/// capitalized line may have and still be treated as a heading.
const SHORT_HEADING_MAX_CHARS: usize = 56;

/// One classified block of a finished answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSegment {
    Paragraph(String),
    Heading(String),
    BulletList(Vec<String>),
    NumberedList(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

/// Classify `content` into ordered display segments.
pub fn segment(content: &str) -> Vec<ContentSegment> {
    let mut segments = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut items: Vec<String> = Vec::new();
    let mut list_kind: Option<ListKind> = None;

    fn flush_paragraph(segments: &mut Vec<ContentSegment>, paragraph: &mut Vec<&str>) {
        if !paragraph.is_empty() {
            segments.push(ContentSegment::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
    }

    fn flush_list(
        segments: &mut Vec<ContentSegment>,
        items: &mut Vec<String>,
        list_kind: &mut Option<ListKind>,
    ) {
        if !items.is_empty() {
            let segment = match list_kind {
                Some(ListKind::Numbered) => ContentSegment::NumberedList(std::mem::take(items)),
                _ => ContentSegment::BulletList(std::mem::take(items)),
            };
            segments.push(segment);
        }
        *list_kind = None;
    }

    for line in content.split('\n') {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_paragraph(&mut segments, &mut paragraph);
            flush_list(&mut segments, &mut items, &mut list_kind);
            continue;
        }

        if let Some(text) = strip_heading_marker(trimmed) {
            flush_paragraph(&mut segments, &mut paragraph);
            flush_list(&mut segments, &mut items, &mut list_kind);
            segments.push(ContentSegment::Heading(text.to_string()));
            continue;
        }

        if let Some(item) = strip_bullet_marker(trimmed) {
            flush_paragraph(&mut segments, &mut paragraph);
            if list_kind.is_some_and(|kind| kind != ListKind::Bullet) {
                flush_list(&mut segments, &mut items, &mut list_kind);
            }
            list_kind = Some(ListKind::Bullet);
            items.push(item.to_string());
            continue;
        }

        if let Some(item) = strip_numbered_marker(trimmed) {
            flush_paragraph(&mut segments, &mut paragraph);
            if list_kind.is_some_and(|kind| kind != ListKind::Numbered) {
                flush_list(&mut segments, &mut items, &mut list_kind);
            }
            list_kind = Some(ListKind::Numbered);
            items.push(item.to_string());
            continue;
        }

        flush_list(&mut segments, &mut items, &mut list_kind);

        if let Some(text) = strip_bold_heading(trimmed) {
            flush_paragraph(&mut segments, &mut paragraph);
            segments.push(ContentSegment::Heading(text.to_string()));
            continue;
        }

        if let Some(text) = strip_short_heading(trimmed) {
            flush_paragraph(&mut segments, &mut paragraph);
            segments.push(ContentSegment::Heading(text.to_string()));
            continue;
        }

        paragraph.push(trimmed);
    }

    flush_paragraph(&mut segments, &mut paragraph);
    flush_list(&mut segments, &mut items, &mut list_kind);

    segments
}

/// `# `, `## `, or `### ` prefix; four or more hashes is ordinary text.
fn strip_heading_marker(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// `-`, `*`, or `•` followed by whitespace.
fn strip_bullet_marker(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('•'))?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Digits followed by `.` or `)` and whitespace.
fn strip_numbered_marker(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// A whole line wrapped in `**…**`, optionally with a trailing colon
/// either inside or outside the markers.
fn strip_bold_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("**")?;
    let inner = rest
        .strip_suffix("**:")
        .or_else(|| rest.strip_suffix("**"))?;
    if inner.is_empty() {
        return None;
    }
    Some(inner.strip_suffix(':').unwrap_or(inner))
}

/// A short capitalized line ending in a colon, e.g. `Key skills:`.
fn strip_short_heading(line: &str) -> Option<&str> {
    let body = line.strip_suffix(':')?;
    let mut chars = body.chars();
    if !chars.next()?.is_ascii_uppercase() {
        return None;
    }
    let tail: Vec<char> = chars.collect();
    if tail.len() > SHORT_HEADING_MAX_CHARS - 1 {
        return None;
    }
    if tail.iter().any(|c| matches!(c, '.' | '!' | '?')) {
        return None;
    }
    Some(body)
}

/// A run of inline text, either plain or strong-emphasized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub strong: bool,
}

/// Split `**bold**` spans out of a segment's text for rendering. Unpaired
/// markers are kept as literal text.
pub fn inline_spans(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        if close == 0 {
            // "****": no content between markers, treat as literal.
            let (head, tail) = rest.split_at(open + 4);
            spans.push(InlineSpan {
                text: head.to_string(),
                strong: false,
            });
            rest = tail;
            continue;
        }
        if open > 0 {
            spans.push(InlineSpan {
                text: rest[..open].to_string(),
                strong: false,
            });
        }
        spans.push(InlineSpan {
            text: after_open[..close].to_string(),
            strong: true,
        });
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        spans.push(InlineSpan {
            text: rest.to_string(),
            strong: false,
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn headings_lists_and_paragraphs_in_order() {
        let segments = segment("# Skills\n- Go\n- Rust\n\nOther text");

        assert_eq!(
            segments,
            vec![
                ContentSegment::Heading("Skills".to_string()),
                ContentSegment::BulletList(vec!["Go".to_string(), "Rust".to_string()]),
                ContentSegment::Paragraph("Other text".to_string()),
            ]
        );
    }

    #[test]
    fn paragraph_lines_join_with_spaces() {
        let segments = segment("first line\nsecond line");
        assert_eq!(
            segments,
            vec![ContentSegment::Paragraph("first line second line".to_string())]
        );
    }

    #[test]
    fn all_bullet_markers_are_recognized() {
        let segments = segment("- one\n* two\n• three");
        assert_eq!(
            segments,
            vec![ContentSegment::BulletList(vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
            ])]
        );
    }

    #[test]
    fn numbered_items_accept_dot_and_paren() {
        let segments = segment("1. first\n2) second");
        assert_eq!(
            segments,
            vec![ContentSegment::NumberedList(vec![
                "first".to_string(),
                "second".to_string(),
            ])]
        );
    }

    #[test]
    fn switching_list_kind_flushes_the_pending_list() {
        let segments = segment("- a\n1. b");
        assert_eq!(
            segments,
            vec![
                ContentSegment::BulletList(vec!["a".to_string()]),
                ContentSegment::NumberedList(vec!["b".to_string()]),
            ]
        );
    }

    #[test]
    fn numbered_item_wins_over_bold_heading() {
        let segments = segment("1) **Bold**:");
        assert_eq!(
            segments,
            vec![ContentSegment::NumberedList(vec!["**Bold**:".to_string()])]
        );
    }

    #[test]
    fn bold_line_becomes_heading_with_decoration_stripped() {
        assert_eq!(
            segment("**Projects**:"),
            vec![ContentSegment::Heading("Projects".to_string())]
        );
        assert_eq!(
            segment("**Projects:**"),
            vec![ContentSegment::Heading("Projects".to_string())]
        );
    }

    #[test]
    fn short_capitalized_colon_line_is_a_heading() {
        assert_eq!(
            segment("Key skills:"),
            vec![ContentSegment::Heading("Key skills".to_string())]
        );

        // Too long past the cap stays a paragraph.
        let long = format!("A{}:", "x".repeat(60));
        assert_eq!(segment(&long), vec![ContentSegment::Paragraph(long.clone())]);

        // Sentence punctuation keeps it a paragraph.
        assert_eq!(
            segment("Done. Next:"),
            vec![ContentSegment::Paragraph("Done. Next:".to_string())]
        );
    }

    #[test]
    fn four_hashes_are_ordinary_text() {
        assert_eq!(
            segment("#### not a heading"),
            vec![ContentSegment::Paragraph("#### not a heading".to_string())]
        );
    }

    #[test]
    fn mixed_document_segments_in_reading_order() {
        let text = indoc! {"
            ## Experience
            Silvio has worked across finance and software.

            **Highlights:**
            1. Built a streaming relay
            2. Published a research library

            Reach out any time.
        "};

        let segments = segment(text);
        assert_eq!(
            segments,
            vec![
                ContentSegment::Heading("Experience".to_string()),
                ContentSegment::Paragraph("Silvio has worked across finance and software.".to_string()),
                ContentSegment::Heading("Highlights".to_string()),
                ContentSegment::NumberedList(vec![
                    "Built a streaming relay".to_string(),
                    "Published a research library".to_string(),
                ]),
                ContentSegment::Paragraph("Reach out any time.".to_string()),
            ]
        );
    }

    #[test]
    fn segmentation_is_deterministic() {
        let text = "# A\n- b\ntail";
        assert_eq!(segment(text), segment(text));
    }

    #[test]
    fn inline_spans_split_bold_runs() {
        let spans = inline_spans("uses **Rust** and **Go** daily");
        assert_eq!(
            spans,
            vec![
                InlineSpan { text: "uses ".to_string(), strong: false },
                InlineSpan { text: "Rust".to_string(), strong: true },
                InlineSpan { text: " and ".to_string(), strong: false },
                InlineSpan { text: "Go".to_string(), strong: true },
                InlineSpan { text: " daily".to_string(), strong: false },
            ]
        );
    }

    #[test]
    fn unpaired_bold_marker_stays_literal() {
        let spans = inline_spans("a ** b");
        assert_eq!(
            spans,
            vec![InlineSpan { text: "a ** b".to_string(), strong: false }]
        );
    }
}
