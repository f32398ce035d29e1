//! Plain-text card format used by the admin pathway editor
//!
//! ```text
//! Portfolio basics
//! - [x] Pick three projects
//! - [ ] Write case studies
//!
//! Networking
//! - [ ] Join a local design meetup
//! ```
//!
//! Non-blank, non-item lines open a card; `- [ ] ` / `- [x] ` lines add items
//! to the open card; blank lines close it. Parsing never fails.
//!
//! A title line may start with `\`, which is dropped. The formatter adds it to
//! titles that would otherwise read back as items or lose a leading `\`.

use tracing::warn;

use crate::models::{Card, Item, DEFAULT_CARD_TITLE};

/// Title given to a card implicitly opened by an item with no preceding title
pub const UNTITLED_CARD: &str = "Untitled Card";

const INCOMPLETE_MARKER: &str = "- [ ]";
const COMPLETE_MARKER: &str = "- [x]";
const TITLE_ESCAPE: char = '\\';

/// Classification of a single trimmed line
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Item { text: &'a str, completed: bool },
    Title(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }

    for (marker, completed) in [(INCOMPLETE_MARKER, false), (COMPLETE_MARKER, true)] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            // "- [ ]" alone is an item with empty text; "- [ ]abc" is a title
            if rest.is_empty() || rest.starts_with(' ') {
                return Line::Item {
                    text: rest.trim(),
                    completed,
                };
            }
        }
    }

    Line::Title(trimmed)
}

/// Parse an editor text blob into an ordered card sequence
pub fn parse_cards_text(text: &str) -> Vec<Card> {
    let mut cards = Vec::new();
    let mut open: Option<Card> = None;

    for line in text.lines() {
        match classify(line) {
            Line::Blank => {
                if let Some(card) = open.take() {
                    cards.push(card);
                }
            }
            Line::Item { text, .. } if text.is_empty() => {
                let title = open.as_ref().map_or(UNTITLED_CARD, |card| card.title.as_str());
                warn!("Skipping item with empty text in card '{}'", title);
            }
            Line::Item { text, completed } => {
                let card = open.get_or_insert_with(|| {
                    warn!("Orphaned item \"{}\" assigned to '{}'", text, UNTITLED_CARD);
                    Card::new(UNTITLED_CARD, Vec::new())
                });
                card.items.push(Item::new(text, completed));
            }
            Line::Title(title) => {
                if let Some(card) = open.take() {
                    cards.push(card);
                }
                open = Some(Card::new(unescape_title(title), Vec::new()));
            }
        }
    }

    if let Some(card) = open {
        if !card.title.is_empty() || !card.items.is_empty() {
            cards.push(card);
        }
    }

    cards
}

/// Render cards in the editor text format
///
/// Inverse of [`parse_cards_text`] for cards whose titles and item texts are
/// single-line and non-blank.
pub fn format_cards_text(cards: &[Card]) -> String {
    let blocks: Vec<String> = cards
        .iter()
        .map(|card| {
            let title = single_line(&card.title);
            let mut block = if title.is_empty() {
                DEFAULT_CARD_TITLE.to_string()
            } else {
                escape_title(title)
            };
            for item in &card.items {
                let marker = if item.completed {
                    COMPLETE_MARKER
                } else {
                    INCOMPLETE_MARKER
                };
                block.push('\n');
                block.push_str(marker);
                block.push(' ');
                block.push_str(&single_line(&item.text));
            }
            block
        })
        .collect();

    blocks.join("\n\n")
}

fn unescape_title(line: &str) -> &str {
    match line.strip_prefix(TITLE_ESCAPE) {
        Some(rest) if !rest.trim().is_empty() => rest.trim_start(),
        _ => line,
    }
}

fn escape_title(title: String) -> String {
    if title.starts_with(TITLE_ESCAPE) || classify(&title) != Line::Title(title.as_str()) {
        format!("{}{}", TITLE_ESCAPE, title)
    } else {
        title
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
