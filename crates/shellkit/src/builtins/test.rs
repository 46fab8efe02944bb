//! test and [ builtin commands

use async_trait::async_trait;

use super::{Command, Context};

/// The test builtin, registered both as `test` and as `[`.
pub struct Test {
    name: &'static str,
}

impl Test {
    /// The `test` spelling.
    pub fn test() -> Self {
        Self { name: "test" }
    }

    /// The `[` spelling, which requires a closing `]`.
    pub fn bracket() -> Self {
        Self { name: "[" }
    }
}

#[async_trait]
impl Command for Test {
    fn name(&self) -> &str {
        self.name
    }

    fn help(&self) -> &str {
        "test: evaluate a conditional expression\n\
         Synopsis:\n  test EXPR\n  [ EXPR ]\n\
         Operators:\n  -z STRING     True if STRING is empty\n  -n STRING     True if STRING is non-empty\n  \
         -e PATH       True if PATH exists\n  -f PATH       True if PATH is a regular file\n  \
         -d PATH       True if PATH is a directory\n  S1 = S2       True if the strings are equal\n  \
         S1 != S2      True if the strings differ\n\
         Notes:\n  A single operand is true when non-empty. Exit code 0 means true, 1 false.\n\
         Examples:\n  test -f /etc/execdb\n  [ \"$USER\" = alice ]\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let mut operands: Vec<&str> = ctx.args[1..].iter().map(String::as_str).collect();
        if self.name == "[" {
            // The closing bracket may carry a trailing ';' from an inline
            // `if [ ... ]; then` condition.
            if operands.last() == Some(&";") {
                operands.pop();
            }
            if operands.pop() != Some("]") {
                ctx.out.push_str("[: missing ']'\n");
                return 2;
            }
        }

        match operands.as_slice() {
            [] => 1,
            [value] => {
                if value.is_empty() {
                    1
                } else {
                    0
                }
            }
            ["-z", value] => {
                if value.is_empty() {
                    0
                } else {
                    1
                }
            }
            ["-n", value] => {
                if value.is_empty() {
                    1
                } else {
                    0
                }
            }
            [op @ ("-e" | "-f" | "-d"), path] => {
                let Ok(host) = ctx.fs.resolve_secure(ctx.cwd, path) else {
                    return 1;
                };
                match *op {
                    "-e" => {
                        if ctx.fs.exists(&host).await.unwrap_or(false) {
                            0
                        } else {
                            1
                        }
                    }
                    _ => match ctx.fs.stat(&host).await {
                        Ok(info) if *op == "-d" => {
                            if info.is_dir {
                                0
                            } else {
                                1
                            }
                        }
                        Ok(info) => {
                            if info.is_dir {
                                1
                            } else {
                                0
                            }
                        }
                        Err(_) => 1,
                    },
                }
            }
            [lhs, "=", rhs] => {
                if lhs == rhs {
                    0
                } else {
                    1
                }
            }
            [lhs, "!=", rhs] => {
                if lhs != rhs {
                    0
                } else {
                    1
                }
            }
            _ => {
                ctx.out
                    .push_str(&format!("{}: unsupported expression\n", self.name));
                2
            }
        }
    }
}
