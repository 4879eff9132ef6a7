//! Picks console-bound messages out of raw client lines.
//!
//! Only two line shapes can reach the console:
//!
//! ```text
//! [@tags] [:source] PRIVMSG <target> :<text>
//! [@tags] [:source] ZNC <target> <text>
//! ```

/// Strip a leading `@tags` or `:source` word.
fn skip_word<'a>(line: &'a str, marker: char) -> Option<&'a str> {
    if line.starts_with(marker) {
        line.split_once(' ').map(|(_, rest)| rest.trim_start())
    } else {
        Some(line)
    }
}

/// Split a raw client line into `(target, text)`.
///
/// Returns `None` for any other command and for lines without a target.
pub fn parse_client_line(raw: &str) -> Option<(&str, &str)> {
    let line = raw.trim_end_matches(['\r', '\n']).trim_start();
    let line = skip_word(line, '@')?;
    let line = skip_word(line, ':')?;

    let (command, rest) = line.split_once(' ')?;
    if !command.eq_ignore_ascii_case("PRIVMSG") && !command.eq_ignore_ascii_case("ZNC") {
        return None;
    }

    let rest = rest.trim_start();
    let (target, text) = match rest.split_once(' ') {
        Some((target, text)) => (target, text.trim_start()),
        None => (rest, ""),
    };
    if target.is_empty() {
        return None;
    }
    Some((target, text.strip_prefix(':').unwrap_or(text)))
}
