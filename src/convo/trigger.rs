/// Strip the first matching trigger phrase from a transcript.
///
/// Matching is a case-insensitive prefix test against the ordered phrase
/// list. Returns the remaining message (with leading punctuation and
/// surrounding whitespace removed) when the utterance is addressed to the
/// bot, `None` otherwise. A `None` is the normal "not talking to me" case,
/// not an error.
pub fn strip_trigger(transcript: &str, phrases: &[String]) -> Option<String> {
    let trimmed = transcript.trim();

    for phrase in phrases {
        let n = phrase.len();
        if trimmed.len() >= n
            && trimmed.is_char_boundary(n)
            && trimmed[..n].eq_ignore_ascii_case(phrase)
        {
            let rest = trimmed[n..]
                .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '!' | ':' | ';'))
                .trim_end();
            return Some(rest.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases() -> Vec<String> {
        vec![
            "bom dia".to_string(),
            "boa tarde".to_string(),
            "boa noite".to_string(),
        ]
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let cleaned = strip_trigger("Bom Dia, como vai?", &phrases());
        assert_eq!(cleaned.as_deref(), Some("como vai?"));
    }

    #[test]
    fn no_trigger_means_not_addressed() {
        assert_eq!(strip_trigger("oi tudo bem", &phrases()), None);
    }

    #[test]
    fn trigger_in_the_middle_does_not_count() {
        assert_eq!(strip_trigger("hoje foi um bom dia", &phrases()), None);
    }

    #[test]
    fn later_phrases_in_the_list_match_too() {
        let cleaned = strip_trigger("  BOA NOITE preciso de ajuda  ", &phrases());
        assert_eq!(cleaned.as_deref(), Some("preciso de ajuda"));
    }

    #[test]
    fn bare_trigger_yields_empty_message() {
        let cleaned = strip_trigger("bom dia", &phrases());
        assert_eq!(cleaned.as_deref(), Some(""));
    }
}
