//! Line-oriented `if/elif/else/fi` interpretation.
//!
//! A stack of frames tracks nesting; a line executes only while every
//! frame on the stack permits it. Condition lines and body lines are fed
//! back through the full line-execution engine, so a condition can be any
//! command, including a pipeline.

use super::{Interpreter, MAX_SCRIPT_DEPTH};

/// One level of `if/elif/else` nesting.
///
/// `executing` is true iff this frame and every ancestor currently permit
/// execution; `taken` records whether some branch has already fired, which
/// gives `elif`/`else` their exclusivity.
struct Frame {
    executing: bool,
    taken: bool,
}

fn all_executing(frames: &[Frame]) -> bool {
    frames.iter().all(|f| f.executing)
}

/// Split `COND then [rest]` at the first standalone `then` word.
///
/// The boundary on both sides must be whitespace, `;`, or the string edge.
/// A trailing `;` on the condition (as in `if [ -f x ]; then`) is dropped.
fn split_cond_then(text: &str) -> Option<(&str, &str)> {
    for (idx, _) in text.match_indices("then") {
        let before_ok = text[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || c == ';');
        let after_ok = text[idx + 4..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == ';');
        if before_ok && after_ok {
            let cond = text[..idx].trim().trim_end_matches(';').trim_end();
            return Some((cond, &text[idx + 4..]));
        }
    }
    None
}

impl Interpreter {
    /// Interpret text line by line under the current environment.
    ///
    /// Returns the exit code of the last line actually executed, 0 if
    /// none. A malformed control-flow line is fatal: interpretation stops
    /// with exit code 2.
    pub(crate) async fn run_script(&mut self, text: &str, out: &mut String) -> i32 {
        if self.depth >= MAX_SCRIPT_DEPTH {
            out.push_str("script: nesting too deep\n");
            return 1;
        }
        self.depth += 1;
        let code = self.run_frames(text, out).await;
        self.depth -= 1;
        code
    }

    async fn run_frames(&mut self, text: &str, out: &mut String) -> i32 {
        let mut frames: Vec<Frame> = Vec::new();
        let mut last_code = 0;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let first = line.split_whitespace().next().unwrap_or("");
            match first {
                "if" => {
                    let Some((cond, rest)) = split_cond_then(&line[2..]) else {
                        out.push_str("syntax error: expected 'then'\n");
                        return 2;
                    };
                    let ancestors = all_executing(&frames);
                    let taken = if ancestors {
                        self.run_line(cond.to_string(), out).await == 0
                    } else {
                        false
                    };
                    frames.push(Frame {
                        executing: ancestors && taken,
                        taken,
                    });
                    if let Err(code) = self
                        .run_inline(rest, &mut frames, &mut last_code, out)
                        .await
                    {
                        return code;
                    }
                }
                "elif" => {
                    if frames.is_empty() {
                        out.push_str("syntax error: 'elif' without 'if'\n");
                        return 2;
                    }
                    let Some((cond, rest)) = split_cond_then(&line[4..]) else {
                        out.push_str("syntax error: expected 'then'\n");
                        return 2;
                    };
                    let ancestors = all_executing(&frames[..frames.len() - 1]);
                    let taken_already = frames[frames.len() - 1].taken;
                    let fires = if ancestors && !taken_already {
                        self.run_line(cond.to_string(), out).await == 0
                    } else {
                        false
                    };
                    if let Some(frame) = frames.last_mut() {
                        frame.executing = fires;
                        if fires {
                            frame.taken = true;
                        }
                    }
                    if let Err(code) = self
                        .run_inline(rest, &mut frames, &mut last_code, out)
                        .await
                    {
                        return code;
                    }
                }
                "else" => {
                    if frames.is_empty() {
                        out.push_str("syntax error: 'else' without 'if'\n");
                        return 2;
                    }
                    let ancestors = all_executing(&frames[..frames.len() - 1]);
                    if let Some(frame) = frames.last_mut() {
                        frame.executing = ancestors && !frame.taken;
                        frame.taken = true;
                    }
                }
                "fi" => {
                    if frames.pop().is_none() {
                        out.push_str("syntax error: 'fi' without 'if'\n");
                        return 2;
                    }
                }
                _ => {
                    if all_executing(&frames) {
                        last_code = self.run_line(line.to_string(), out).await;
                    }
                }
            }
        }
        last_code
    }

    /// Run `;`-separated trailing commands after an inline `then`.
    ///
    /// An inline `fi` pops the frame; an inline `else`/`elif` is not
    /// supported on the same line and stops inline processing, deferred to
    /// subsequent lines.
    async fn run_inline(
        &mut self,
        rest: &str,
        frames: &mut Vec<Frame>,
        last_code: &mut i32,
        out: &mut String,
    ) -> Result<(), i32> {
        for part in rest.split(';') {
            let part = part.trim();
            match part {
                "" => {}
                "fi" => {
                    if frames.pop().is_none() {
                        out.push_str("syntax error: 'fi' without 'if'\n");
                        return Err(2);
                    }
                }
                "else" | "elif" => break,
                _ if part.starts_with("elif ") => break,
                _ => {
                    if all_executing(frames) {
                        *last_code = self.run_line(part.to_string(), out).await;
                    }
                }
            }
        }
        Ok(())
    }
}
