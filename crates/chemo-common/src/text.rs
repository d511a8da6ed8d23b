//! String helpers shared by normalization and rule checks.

/// Trims and replaces every run of two or more whitespace characters with a
/// single space. Lone whitespace characters are kept as they are.
///
/// ```
/// use chemo_common::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  homo   sapiens "), "homo sapiens");
/// assert_eq!(collapse_whitespace("a\tb"), "a\tb");
/// ```
pub fn collapse_whitespace(value: &str) -> String {
    let trimmed = value.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut run = String::new();
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            run.push(ch);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(ch);
    }
    flush_run(&mut out, &mut run);
    out
}

fn flush_run(out: &mut String, run: &mut String) {
    match run.chars().count() {
        0 => {}
        1 => out.push_str(run),
        _ => out.push(' '),
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace_runs() {
        assert_eq!(collapse_whitespace("ec50 \n\t value"), "ec50 value");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
