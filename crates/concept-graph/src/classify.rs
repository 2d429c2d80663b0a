use crate::model::NodeType;

const PLACE_WORDS: [&str; 6] =
    ["city", "village", "town", "river", "forest", "street"];

/// One step of the inference chain. `len` is the trimmed length in
/// characters.
struct Rule {
    node_type: NodeType,
    matches: fn(text: &str, len: usize) -> bool,
}

/// Evaluated top to bottom, first match wins.
const RULES: &[Rule] = &[
    Rule {
        node_type: NodeType::Default,
        matches: |_, len| len == 0,
    },
    Rule {
        node_type: NodeType::Character,
        matches: |text, len| {
            len <= 20 && !text.chars().any(char::is_whitespace)
        },
    },
    Rule {
        node_type: NodeType::Place,
        matches: |text, len| len <= 30 && mentions_place(text),
    },
    Rule {
        node_type: NodeType::Idea,
        matches: |_, len| len > 60,
    },
    Rule {
        node_type: NodeType::Theme,
        matches: |_, len| len > 30,
    },
];

/// Guess a node type from the raw selected text.
pub fn infer_node_type(text: &str) -> NodeType {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    RULES
        .iter()
        .find(|rule| (rule.matches)(trimmed, len))
        .map(|rule| rule.node_type)
        .unwrap_or(NodeType::Default)
}

/// Whole-word, case-insensitive match against [`PLACE_WORDS`].
fn mentions_place(text: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| {
            PLACE_WORDS.iter().any(|p| word.eq_ignore_ascii_case(p))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_default() {
        assert_eq!(infer_node_type(""), NodeType::Default);
        assert_eq!(infer_node_type("   \n"), NodeType::Default);
    }

    #[test]
    fn test_single_short_word_is_character() {
        assert_eq!(infer_node_type("Ishmael"), NodeType::Character);
        assert_eq!(infer_node_type("  Ahab  "), NodeType::Character);
        // Character wins over place for single words.
        assert_eq!(infer_node_type("River"), NodeType::Character);
    }

    #[test]
    fn test_place_words_match_whole_words_only() {
        assert_eq!(infer_node_type("the old river"), NodeType::Place);
        assert_eq!(infer_node_type("Main STREET corner"), NodeType::Place);
        assert_eq!(infer_node_type("the riverbank at dawn"), NodeType::Default);
    }

    #[test]
    fn test_length_thresholds() {
        let theme = "a".repeat(10) + " " + &"b".repeat(25);
        assert_eq!(infer_node_type(&theme), NodeType::Theme);

        let idea = "word ".repeat(13);
        assert!(idea.trim().chars().count() > 60);
        assert_eq!(infer_node_type(&idea), NodeType::Idea);

        // A 31 character phrase with a place word is no longer a place.
        let long_place = "a long walk through the forest.";
        assert_eq!(long_place.chars().count(), 31);
        assert_eq!(infer_node_type(long_place), NodeType::Theme);
    }

    #[test]
    fn test_long_unbroken_token_is_default_or_theme() {
        assert_eq!(infer_node_type(&"x".repeat(21)), NodeType::Default);
        assert_eq!(infer_node_type(&"x".repeat(31)), NodeType::Theme);
    }
}
