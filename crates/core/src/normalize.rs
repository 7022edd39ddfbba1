/// Canonical text cleanup applied before tokenization and classification:
/// lowercase, keep only `[a-z0-9 ]`, collapse whitespace runs, trim.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else if ch == ' ' {
            pending_space = true;
        }
    }

    out
}
