use std::fmt::Display;

use console::{style, StyledObject};

/// Section titles.
pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

/// Job names and other identifiers the user typed or will type.
pub fn highlight(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn success(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn failure(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().red()
}

/// Jenkins page URLs.
pub fn link(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).underlined().cyan()
}

pub fn muted(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn banner(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_keep_text_and_apply_codes() {
        let link = link("https://ci/job/app/").force_styling(true).to_string();
        assert!(link.contains("https://ci/job/app/"));
        assert!(link.contains("\u{1b}["));

        let muted = muted("No builds yet").force_styling(true).to_string();
        assert!(muted.contains("No builds yet"));
        assert_ne!(muted, "No builds yet");
    }

    #[test]
    fn test_unstyled_output_is_plain_text() {
        assert_eq!(heading("Jobs").force_styling(false).to_string(), "Jobs");
        assert_eq!(banner("jenkins-dash").force_styling(false).to_string(), "jenkins-dash");
    }
}
