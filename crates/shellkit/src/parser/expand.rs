//! Variable expansion.
//!
//! Single-pass, left to right: `${NAME}`, `$?`, `$#`, and `$NAME` (greedy
//! over `[A-Za-z0-9_]`, which also covers positional parameters like `$1`).
//! Undefined variables expand to the empty string. An unterminated `${`
//! and any `$` not followed by a word character pass through literally.
//! Substituted text is never re-expanded.

use crate::env::Environment;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expand variable references in a single token.
pub fn expand(input: &str, env: &Environment) -> String {
    let mut out = String::with_capacity(input.len());
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '$' {
            out.push(c);
            i += 1;
            continue;
        }
        // `$` at end of input is literal.
        let Some(&next) = chars.get(i + 1) else {
            out.push('$');
            i += 1;
            continue;
        };
        if next == '{' {
            match chars[i + 2..].iter().position(|&c| c == '}') {
                Some(len) => {
                    let name: String = chars[i + 2..i + 2 + len].iter().collect();
                    out.push_str(env.value(&name));
                    i += 2 + len + 1;
                }
                None => {
                    // Unterminated `${` is literal text.
                    out.push('$');
                    i += 1;
                }
            }
        } else if next == '?' || next == '#' {
            out.push_str(env.value(&next.to_string()));
            i += 2;
        } else if is_word_char(next) {
            let mut end = i + 1;
            while end < chars.len() && is_word_char(chars[end]) {
                end += 1;
            }
            let name: String = chars[i + 1..end].iter().collect();
            out.push_str(env.value(&name));
            i = end;
        } else {
            out.push('$');
            i += 1;
        }
    }
    out
}
