/// Strip the leading command echo and the trailing prompt line from raw
/// SSH channel output (§4.2).
///
/// Only the first non-empty line (if it matches the echoed command) and the
/// last non-empty line (if it matches the session prompt) are ever removed;
/// everything between is preserved verbatim, and a non-matching echo/prompt
/// is left untouched rather than guessed at.
pub fn sanitize(raw: &str, command: &str, prompt: &str) -> String {
    let mut lines: Vec<&str> = raw.split('\n').collect();

    if let Some(first_idx) = lines.iter().position(|l| !l.trim().is_empty()) {
        if lines[first_idx].trim() == command.trim() {
            lines.remove(first_idx);
        }
    }

    if let Some(last_idx) = lines.iter().rposition(|l| !l.trim().is_empty()) {
        if !prompt.is_empty() && lines[last_idx].trim() == prompt.trim() {
            lines.remove(last_idx);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_echo_and_prompt() {
        let raw = "show version\nRouter uptime is 3 days\nrouter#";
        let out = sanitize(raw, "show version", "router#");
        assert_eq!(out, "Router uptime is 3 days");
    }

    #[test]
    fn preserves_content_that_does_not_match() {
        let raw = "unrelated first line\nbody\nunrelated last line";
        let out = sanitize(raw, "show version", "router#");
        assert_eq!(out, raw);
    }

    #[test]
    fn preserves_intervening_blank_lines() {
        let raw = "show version\nline one\n\nline two\nrouter#";
        let out = sanitize(raw, "show version", "router#");
        assert_eq!(out, "line one\n\nline two");
    }

    #[test]
    fn empty_prompt_never_strips_trailing_line() {
        let raw = "show version\nbody\ntrailing";
        let out = sanitize(raw, "show version", "");
        assert_eq!(out, "body\ntrailing");
    }
}
