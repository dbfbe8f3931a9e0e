//! Compose-box input hygiene.
//!
//! Pasted text arrives with whatever the terminal lets through; before it
//! enters the compose box it is normalized (tabs to spaces, CR to LF,
//! other control characters dropped) and cut to the remaining character
//! budget so the maximum message length holds for pastes too.

/// Normalize pasted text so it cannot corrupt the TUI.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => sanitized.push('\n'),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

/// Cut `text` to at most `capacity` characters. Character-based, not
/// byte-based, so multi-byte input never splits mid-scalar.
pub fn clip_to_capacity(text: &str, capacity: usize) -> String {
    text.chars().take(capacity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize_text_input("hola mundo"), "hola mundo");
    }

    #[test]
    fn tabs_become_spaces_and_cr_becomes_lf() {
        assert_eq!(sanitize_text_input("a\tb\rc"), "a    b\nc");
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(sanitize_text_input("ho\x07la\x1b[31m"), "hola[31m");
    }

    #[test]
    fn newlines_survive_sanitizing() {
        assert_eq!(sanitize_text_input("uno\ndos\ntres"), "uno\ndos\ntres");
    }

    #[test]
    fn clipping_counts_characters_not_bytes() {
        assert_eq!(clip_to_capacity("señal", 3), "señ");
        assert_eq!(clip_to_capacity("corto", 100), "corto");
        assert_eq!(clip_to_capacity("algo", 0), "");
    }
}
