//! Shared subprocess runner for engine adapters.
//!
//! Each engine invocation is a scoped resource: the child is spawned with
//! captured output, polled against an optional deadline, and killed and
//! reaped on the timeout path so no process outlives its run.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::adapter::ExecutionFailure;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` to completion, enforcing `timeout` if given.
///
/// Returns the captured output on a zero exit status. A non-zero status is
/// an `ExecutionFailure::NonZeroExit` carrying the child's stderr; hitting
/// the deadline kills the child and returns `TimedOut`.
pub(crate) fn run_command(
    mut command: Command,
    timeout: Option<Duration>,
) -> Result<CommandOutput, ExecutionFailure> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(ExecutionFailure::Launch)?;
    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = match timeout {
        None => child.wait().map_err(ExecutionFailure::Io)?,
        Some(limit) => {
            let deadline = Instant::now() + limit;
            loop {
                match child.try_wait().map_err(ExecutionFailure::Io)? {
                    Some(status) => break status,
                    None if Instant::now() >= deadline => {
                        let _ = child.kill();
                        let _ = child.wait();
                        let _ = stdout_reader.join();
                        let _ = stderr_reader.join();
                        return Err(ExecutionFailure::TimedOut { limit });
                    }
                    None => thread::sleep(POLL_INTERVAL),
                }
            }
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    if !status.success() {
        return Err(ExecutionFailure::NonZeroExit {
            code: status.code(),
            stderr,
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut source) = source {
            let _ = source.read_to_string(&mut text);
        }
        text
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("/bin/sh");
        command.arg("-c").arg(script);
        command
    }

    #[test]
    fn captures_stdout_on_success() {
        let output = run_command(sh("echo hello"), None).unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn nonzero_exit_carries_code_and_stderr() {
        let failure = run_command(sh("echo oops >&2; exit 3"), None)
            .expect_err("exit 3 should fail");
        match failure {
            ExecutionFailure::NonZeroExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "oops");
            }
            other => panic!("unexpected failure {other:?}"),
        }
    }

    #[test]
    fn deadline_kills_the_child() {
        let started = Instant::now();
        let failure = run_command(sh("sleep 5"), Some(Duration::from_millis(100)))
            .expect_err("sleep should time out");
        assert!(matches!(failure, ExecutionFailure::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_binary_is_a_launch_failure() {
        let command = Command::new("/nonexistent/engine-binary");
        let failure = run_command(command, None).expect_err("spawn should fail");
        assert!(matches!(failure, ExecutionFailure::Launch(_)));
    }
}
