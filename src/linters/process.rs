//! Subprocess execution for external linters.
//!
//! Runs a tool in the repository root with captured output, a per-adapter
//! timeout and cooperative cancellation.

use super::{AdapterFailure, RunContext};
use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::debug;

/// Maximum number of output lines kept in failure messages.
pub const FAILURE_MAX_LINES: usize = 20;

/// Maximum total characters kept in failure messages.
pub const FAILURE_MAX_CHARS: usize = 2048;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured output of a finished tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run `program args...` and wait for it.
///
/// `accept` decides which exit codes mean "the tool ran"; linters commonly
/// exit non-zero when they find problems. Any other exit code, death by
/// signal, a timeout, or cancellation is an `AdapterFailure`.
pub fn run_tool(
    program: &str,
    args: &[String],
    ctx: &RunContext,
    accept: impl Fn(i32) -> bool,
) -> Result<ToolOutput, AdapterFailure> {
    run_tool_with_input(program, args, None, ctx, accept)
}

/// Like [`run_tool`], but writes `input` to the tool's stdin.
pub fn run_tool_with_input(
    program: &str,
    args: &[String],
    input: Option<&str>,
    ctx: &RunContext,
    accept: impl Fn(i32) -> bool,
) -> Result<ToolOutput, AdapterFailure> {
    debug!("running {} with {} argument(s)", program, args.len());

    let stdin = if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    };

    let mut child = Command::new(program)
        .args(args)
        .current_dir(&ctx.root)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| AdapterFailure::Spawn {
            program: program.to_string(),
            source,
        })?;

    // Drain both pipes on their own threads so a chatty tool cannot block
    // on a full pipe while we poll for its exit.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let writer = feed(child.stdin.take(), input);

    let status = wait_with_timeout(&mut child, ctx)?;
    if let Some(writer) = writer {
        let _ = writer.join();
    }

    let stdout = join_output(stdout);
    let stderr = join_output(stderr);

    let exit_code = match status.code() {
        Some(code) => code,
        None => {
            return Err(AdapterFailure::Crashed {
                exit_code: None,
                output: truncate_output(&stderr, FAILURE_MAX_LINES, FAILURE_MAX_CHARS),
            });
        }
    };

    if !accept(exit_code) {
        let combined = if stderr.trim().is_empty() { &stdout } else { &stderr };
        return Err(AdapterFailure::Crashed {
            exit_code: Some(exit_code),
            output: truncate_output(combined, FAILURE_MAX_LINES, FAILURE_MAX_CHARS),
        });
    }

    Ok(ToolOutput {
        stdout,
        stderr,
        exit_code,
    })
}

/// Split a command string into program and arguments (shell-words, no shell).
pub fn split_command(command: &str) -> Result<(String, Vec<String>), AdapterFailure> {
    let mut args = shell_words::split(command.trim()).map_err(|e| {
        AdapterFailure::Config(format!(
            "failed to parse command '{}': {} (check for unmatched quotes)",
            command, e
        ))
    })?;

    if args.is_empty() {
        return Err(AdapterFailure::Config("command is empty".to_string()));
    }

    let program = args.remove(0);
    Ok((program, args))
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

/// Write `input` to the child's stdin and close it.
fn feed(pipe: Option<ChildStdin>, input: Option<&str>) -> Option<JoinHandle<()>> {
    let mut pipe = pipe?;
    let input = input?.to_string();
    Some(std::thread::spawn(move || {
        // A tool may exit without reading everything; that is not our error.
        let _ = pipe.write_all(input.as_bytes());
    }))
}

fn join_output(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Wait for a child process, honouring the timeout and the cancel token.
fn wait_with_timeout(child: &mut Child, ctx: &RunContext) -> Result<ExitStatus, AdapterFailure> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if ctx.cancel.is_cancelled() {
                    kill_process(child);
                    return Err(AdapterFailure::Cancelled);
                }
                if let Some(timeout) = ctx.timeout {
                    if start.elapsed() >= timeout {
                        kill_process(child);
                        return Err(AdapterFailure::TimedOut(timeout));
                    }
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                kill_process(child);
                return Err(AdapterFailure::Unparsable(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a process and wait for it to terminate.
fn kill_process(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}

/// Keep the tail of a tool's output for failure messages.
pub fn truncate_output(output: &str, max_lines: usize, max_chars: usize) -> String {
    let lines: Vec<&str> = output.trim_end().lines().collect();

    let relevant_lines: &[&str] = if lines.len() > max_lines {
        &lines[lines.len() - max_lines..]
    } else {
        &lines
    };

    let mut result = relevant_lines.join("\n");

    if result.len() > max_chars {
        let mut cut = result.len() - max_chars;
        while !result.is_char_boundary(cut) {
            cut += 1;
        }
        result = format!("...(truncated)...\n{}", &result[cut..]);
    }

    result
}
