//! Line tokenizer.
//!
//! Splits a raw line into shell tokens: whitespace outside quotes
//! separates tokens, single and double quotes toggle literal regions
//! (mutually exclusive), a backslash outside quotes escapes the next
//! character and is consumed, and an unquoted `|` is always emitted as a
//! standalone token. Unterminated quotes are treated as if closed at end
//! of line; this is a deliberate lenient-parsing choice, not an error.
//!
//! No tilde or glob expansion happens here.

mod expand;

pub use expand::expand;

/// Split a line into tokens, honoring quoting and escaping.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut cur = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut escape = false;

    for c in line.chars() {
        if escape {
            cur.push(c);
            escape = false;
            continue;
        }
        if c == '\\' && !in_single && !in_double {
            escape = true;
            continue;
        }
        if c == '\'' && !in_double {
            in_single = !in_single;
            continue;
        }
        if c == '"' && !in_single {
            in_double = !in_double;
            continue;
        }
        if !in_single && !in_double {
            if c == ' ' || c == '\t' {
                push_token(&mut tokens, &mut cur);
                continue;
            }
            if c == '|' {
                push_token(&mut tokens, &mut cur);
                tokens.push("|".to_string());
                continue;
            }
        }
        cur.push(c);
    }
    push_token(&mut tokens, &mut cur);
    tokens
}

fn push_token(tokens: &mut Vec<String>, cur: &mut String) {
    if !cur.is_empty() {
        tokens.push(std::mem::take(cur));
    }
}

/// True for tokens the expander must leave untouched: the pipeline
/// separator and redirection tokens.
pub fn is_operator(token: &str) -> bool {
    token == "|" || token.starts_with('<') || token.starts_with('>')
}
