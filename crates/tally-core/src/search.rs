//! Search query tokenizing
//!
//! A query is split into exact phrases (text between double quotes) and
//! free words (everything with the quotes stripped, split on spaces).

use serde::Serialize;

/// Extract the phrases enclosed in double quotes
///
/// Quotes are paired left to right. Empty pairs are skipped and a trailing
/// unterminated quote runs to the end of the text.
pub fn check_quotes(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('"') {
        let after = &rest[open + 1..];
        let (phrase, next) = match after.find('"') {
            Some(close) => (&after[..close], &after[close + 1..]),
            None => (after, ""),
        };

        if !phrase.is_empty() {
            phrases.push(phrase.to_string());
        }
        rest = next;
    }

    phrases
}

/// Extract every space-separated word, ignoring quotes
pub fn check_text(text: &str) -> Vec<String> {
    text.replace('"', "")
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract the space-separated words that sit outside any quoted phrase
pub fn unquoted_words(text: &str) -> Vec<String> {
    let mut outside = String::with_capacity(text.len());
    let mut quoted = false;

    for ch in text.chars() {
        if ch == '"' {
            quoted = !quoted;
            // A closing quote still separates words
            outside.push(' ');
        } else if !quoted {
            outside.push(ch);
        }
    }

    check_text(&outside)
}

/// A tokenized search query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    /// Phrases that must appear as written
    pub phrases: Vec<String>,
    /// Individual words, including those inside phrases
    pub words: Vec<String>,
    /// Words outside any phrase
    pub loose_words: Vec<String>,
}

impl SearchQuery {
    pub fn parse(text: &str) -> Self {
        Self {
            phrases: check_quotes(text),
            words: check_text(text),
            loose_words: unquoted_words(text),
        }
    }

    /// True if the query has neither phrases nor words
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_quotes() {
        assert_eq!(check_quotes("\"red apple\" fruit"), vec!["red apple"]);
        assert_eq!(
            check_quotes("\"one\" and \"two words\""),
            vec!["one", "two words"]
        );
    }

    #[test]
    fn test_check_quotes_unterminated() {
        assert_eq!(check_quotes("fruit \"red app"), vec!["red app"]);
        assert!(check_quotes("fruit \"").is_empty());
    }

    #[test]
    fn test_check_quotes_empty_pair() {
        assert_eq!(check_quotes("\"\" \"x\""), vec!["x"]);
        assert!(check_quotes("no quotes here").is_empty());
        assert!(check_quotes("").is_empty());
    }

    #[test]
    fn test_check_text() {
        assert_eq!(check_text("\"red apple\" fruit"), vec!["red", "apple", "fruit"]);
        assert_eq!(check_text("  math   homework "), vec!["math", "homework"]);
        assert!(check_text("\"\"").is_empty());
    }

    #[test]
    fn test_check_text_only_splits_on_space() {
        assert_eq!(check_text("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn test_unquoted_words() {
        assert_eq!(unquoted_words("\"red apple\" fruit"), vec!["fruit"]);
        assert_eq!(unquoted_words("a \"b c\"d e"), vec!["a", "d", "e"]);
        assert_eq!(unquoted_words("x \"open ended"), vec!["x"]);
    }

    #[test]
    fn test_search_query_parse() {
        let query = SearchQuery::parse("\"chapter 3\" essay");
        assert_eq!(query.phrases, vec!["chapter 3"]);
        assert_eq!(query.words, vec!["chapter", "3", "essay"]);
        assert_eq!(query.loose_words, vec!["essay"]);
        assert!(!query.is_empty());
        assert!(SearchQuery::parse("  ").is_empty());
    }
}
