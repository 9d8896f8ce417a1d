use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STAGE_DIRECTION: Regex = Regex::new(r"\*([^*]*)\*").unwrap();
}

/// Render `*...*` stage directions as emphasized text for display.
pub fn emphasize(text: &str) -> String {
    STAGE_DIRECTION.replace_all(text, "***$1***").into_owned()
}

/// Remove `*...*` stage directions, e.g. before speech synthesis.
pub fn strip(text: &str) -> String {
    STAGE_DIRECTION.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{emphasize, strip};

    #[test]
    fn test_emphasize() {
        assert_eq!(
            emphasize("*looks away* I don't know."),
            "***looks away*** I don't know."
        );
        assert_eq!(emphasize("no markup here"), "no markup here");
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip("*looks away* I don't know."), "I don't know.");
        assert_eq!(strip("*sighs*"), "");
        assert_eq!(strip("plain text"), "plain text");
    }

    #[test]
    fn test_strip_multiple_directions() {
        assert_eq!(
            strip("*pauses* I guess so. *shrugs*"),
            "I guess so."
        );
    }
}
