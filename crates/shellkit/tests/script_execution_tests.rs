//! Tests for executing script files by path and via `source`.
//!
//! Covers: permission gating, exit code propagation, positional
//! parameters, environment isolation vs. live mutation, branching, and
//! nesting depth.

use shellkit::Shell;
use tempfile::TempDir;

fn shell() -> (TempDir, Shell) {
    let dir = TempDir::new().unwrap();
    let shell = Shell::new(dir.path()).unwrap();
    (dir, shell)
}

/// Script by absolute path runs once marked executable
#[tokio::test]
async fn exec_script_by_absolute_path() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("test.sh"), "echo hello\n").unwrap();

    let result = shell.exec("/test.sh").await;
    assert_eq!(result.exit_code, 126);

    shell.exec("chmod +x /test.sh").await;
    let result = shell.exec("/test.sh").await;
    assert_eq!(result.stdout, "hello\n");
    assert_eq!(result.exit_code, 0);
}

/// Script by relative path resolves against the virtual cwd
#[tokio::test]
async fn exec_script_by_relative_path() {
    let (dir, mut shell) = shell();
    std::fs::create_dir_all(dir.path().join("bin")).unwrap();
    std::fs::write(dir.path().join("bin/run.sh"), "echo from bin\n").unwrap();

    shell.exec("chmod +x /bin/run.sh").await;
    shell.exec("cd /bin").await;
    let result = shell.exec("./run.sh").await;
    assert_eq!(result.stdout, "from bin\n");
}

/// Positional parameters $0, $1..$N and $# are seeded
#[tokio::test]
async fn exec_script_with_args() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("greet.sh"), "echo Hello, $1 and $2!\n").unwrap();

    shell.exec("chmod +x /greet.sh").await;
    let result = shell.exec("/greet.sh world moon").await;
    assert_eq!(result.stdout, "Hello, world and moon!\n");
}

/// Script exit code propagates into $?
#[tokio::test]
async fn exec_script_exit_code_propagates() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("fail.sh"), "cat /no-such-file\n").unwrap();

    shell.exec("chmod +x /fail.sh").await;
    let result = shell.exec("/fail.sh").await;
    assert_eq!(result.exit_code, 1);
    let result = shell.exec("echo $?").await;
    assert_eq!(result.stdout, "1\n");
}

/// Script-by-path variables do not leak back to the caller
#[tokio::test]
async fn exec_script_isolated_env() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("leak.sh"), "LEAK=yes\n").unwrap();

    shell.exec("chmod +x /leak.sh").await;
    shell.exec("/leak.sh").await;
    assert_eq!(shell.env().get("LEAK"), None);
}

/// source runs with the caller's live environment
#[tokio::test]
async fn source_mutates_caller_env() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("setup.sh"), "PROFILE=dev\n").unwrap();

    let result = shell.exec("source /setup.sh").await;
    assert_eq!(result.exit_code, 0);
    assert_eq!(shell.env().get("PROFILE"), Some("dev"));
}

/// source does not consult the execute-permission database
#[tokio::test]
async fn source_does_not_need_exec_permission() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("plain.sh"), "echo sourced\n").unwrap();

    let result = shell.exec("source /plain.sh").await;
    assert_eq!(result.stdout, "sourced\n");
    assert_eq!(result.exit_code, 0);
}

/// Branch selection follows the condition's exit code
#[tokio::test]
async fn script_branching() {
    let (dir, mut shell) = shell();
    std::fs::write(
        dir.path().join("branch.sh"),
        "if [ -f /flag ]; then\necho yes\nelse\necho no\nfi\n",
    )
    .unwrap();

    shell.exec("chmod +x /branch.sh").await;
    let result = shell.exec("/branch.sh").await;
    assert_eq!(result.stdout, "no\n");

    shell.exec("touch /flag").await;
    let result = shell.exec("/branch.sh").await;
    assert_eq!(result.stdout, "yes\n");
}

/// Lines inside a false branch are skipped entirely
#[tokio::test]
async fn script_skips_false_branch_side_effects() {
    let (dir, mut shell) = shell();
    std::fs::write(
        dir.path().join("guard.sh"),
        "if [ -f /flag ]; then\ntouch /created\nfi\n",
    )
    .unwrap();

    shell.exec("chmod +x /guard.sh").await;
    shell.exec("/guard.sh").await;
    let result = shell.exec("test -e /created").await;
    assert_eq!(result.exit_code, 1);
}

/// A script sourcing itself stops at the nesting limit
#[tokio::test]
async fn source_recursion_bounded() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("loop.sh"), "source /loop.sh\n").unwrap();

    let result = shell.exec("source /loop.sh").await;
    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("nesting too deep"));
}

/// A bare fi outside any if is a fatal syntax error
#[tokio::test]
async fn mismatched_fi_is_fatal() {
    let (dir, mut shell) = shell();
    std::fs::write(dir.path().join("bad.sh"), "echo before\nfi\necho after\n").unwrap();

    shell.exec("chmod +x /bad.sh").await;
    let result = shell.exec("/bad.sh").await;
    assert_eq!(result.exit_code, 2);
    assert!(result.stdout.contains("before"));
    assert!(!result.stdout.contains("after"));
}
