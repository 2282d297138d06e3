//! Message grouping: partitioning log segments into sendable messages.
//!
//! The platform allows exactly one text body and a bounded number of cards
//! per message, and always renders text before cards. One log call can carry
//! more content than that, so the segments get split into groups where each
//! group is representable as exactly one remote message and the caller's
//! left-to-right order is preserved within that constraint.

use serde::Serialize;

use crate::card::Card;
use crate::level::LogLevel;
use crate::segment::LogSegment;

pub const MAX_CARDS_PER_GROUP: usize = 10;

/// One sendable message: an optional text body plus up to
/// [`MAX_CARDS_PER_GROUP`] cards. Never empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MessageGroup {
    pub text: Option<String>,
    pub cards: Vec<Card>,
}

impl MessageGroup {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.cards.is_empty()
    }
}

#[derive(Default)]
struct GroupBuilder {
    texts: Vec<String>,
    cards: Vec<Card>,
}

impl GroupBuilder {
    fn finish(&mut self, out: &mut Vec<MessageGroup>) {
        if self.texts.is_empty() && self.cards.is_empty() {
            return;
        }
        out.push(MessageGroup {
            // Multiple text fragments in one group merge with a single space.
            text: if self.texts.is_empty() {
                None
            } else {
                Some(self.texts.join(" "))
            },
            cards: std::mem::take(&mut self.cards),
        });
        self.texts.clear();
    }
}

/// Partitions an ordered segment sequence into ordered message groups.
///
/// Single pass, left to right. Text arriving after a card closes the group
/// (text must render before cards); a card that would push the group past
/// `max_cards` closes the group first. Under a force-card level, plain text
/// segments are promoted to description-only cards.
pub fn group_segments(
    segments: &[LogSegment],
    level: LogLevel,
    max_cards: usize,
) -> Vec<MessageGroup> {
    let mut groups = Vec::new();
    let mut current = GroupBuilder::default();

    let push_card = |current: &mut GroupBuilder, groups: &mut Vec<MessageGroup>, mut card: Card| {
        if current.cards.len() >= max_cards {
            current.finish(groups);
        }
        if card.color.is_none() {
            card.color = Some(level.color());
        }
        current.cards.push(card);
    };

    for segment in segments {
        match segment {
            LogSegment::Text(s) if !level.force_card() => {
                if !current.cards.is_empty() {
                    current.finish(&mut groups);
                }
                current.texts.push(s.clone());
            }
            LogSegment::Text(s) => {
                push_card(&mut current, &mut groups, Card::from_text(s).with_color(level.color()));
            }
            LogSegment::Card(card) => push_card(&mut current, &mut groups, card.clone()),
        }
    }

    current.finish(&mut groups);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::LogSegment;

    fn text(s: &str) -> LogSegment {
        LogSegment::Text(s.to_string())
    }

    fn card(title: &str) -> LogSegment {
        LogSegment::Card(Card::new().with_title(title))
    }

    fn titles(group: &MessageGroup) -> Vec<String> {
        group
            .cards
            .iter()
            .map(|c| c.title.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn text_then_cards_then_text_makes_two_groups() {
        let segments = vec![text("a"), card("1"), card("2"), text("b")];
        let groups = group_segments(&segments, LogLevel::Regular, MAX_CARDS_PER_GROUP);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text.as_deref(), Some("a"));
        assert_eq!(titles(&groups[0]), ["1", "2"]);
        assert_eq!(groups[1].text.as_deref(), Some("b"));
        assert!(groups[1].cards.is_empty());
    }

    #[test]
    fn card_count_never_exceeds_the_cap() {
        let segments: Vec<LogSegment> = (0..25).map(|i| card(&i.to_string())).collect();
        let groups = group_segments(&segments, LogLevel::Regular, 10);

        assert_eq!(groups.len(), 3);
        for group in &groups {
            assert!(!group.is_empty());
            assert!(group.cards.len() <= 10);
        }
        assert_eq!(groups[0].cards.len(), 10);
        assert_eq!(groups[1].cards.len(), 10);
        assert_eq!(groups[2].cards.len(), 5);
    }

    #[test]
    fn grouping_preserves_segment_order_and_content() {
        let segments = vec![
            text("one"),
            text("two"),
            card("c1"),
            text("three"),
            card("c2"),
            card("c3"),
        ];
        let groups = group_segments(&segments, LogLevel::Regular, 10);

        // Concatenating all groups reproduces the original order.
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text.as_deref(), Some("one two"));
        assert_eq!(titles(&groups[0]), ["c1"]);
        assert_eq!(groups[1].text.as_deref(), Some("three"));
        assert_eq!(titles(&groups[1]), ["c2", "c3"]);
    }

    #[test]
    fn forced_levels_turn_text_into_cards() {
        let segments = vec![text("a"), text("b")];
        let groups = group_segments(&segments, LogLevel::Warn, 10);

        assert_eq!(groups.len(), 1);
        assert!(groups[0].text.is_none());
        assert_eq!(groups[0].cards.len(), 2);
        assert_eq!(groups[0].cards[0].description.as_deref(), Some("a"));
        assert_eq!(groups[0].cards[0].color, Some(LogLevel::Warn.color()));
    }

    #[test]
    fn colorless_cards_get_the_level_accent() {
        let groups = group_segments(&[card("c")], LogLevel::Error, 10);
        assert_eq!(groups[0].cards[0].color, Some(LogLevel::Error.color()));
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = group_segments(&[], LogLevel::Regular, 10);
        assert!(groups.is_empty());
    }
}
