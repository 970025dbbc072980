//! Test driver for black-box tests of command-line binaries.
//!
//! Spawns a binary with piped stdout and stderr, drains both on background
//! threads so the child never blocks on a full pipe, and hands back what was
//! captured once the child exits.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

/// A running child process.
pub struct TestSession {
    child: Child,
    /// Captured stdout, populated by background thread.
    stdout_capture: Arc<Mutex<Vec<u8>>>,
    /// Captured stderr, populated by background thread.
    stderr_capture: Arc<Mutex<Vec<u8>>>,
    stdout_thread: thread::JoinHandle<()>,
    stderr_thread: thread::JoinHandle<()>,
}

impl TestSession {
    /// Spawn `binary` with the given arguments.
    ///
    /// `env` are additional environment variables to set; `unset` are
    /// removed from the inherited environment.
    pub fn spawn(
        binary: &str,
        args: &[&str],
        env: &[(&str, &str)],
        unset: &[&str],
    ) -> std::io::Result<TestSession> {
        let mut cmd = Command::new(binary);
        cmd.args(args);
        for (k, v) in env {
            cmd.env(k, v);
        }
        for k in unset {
            cmd.env_remove(k);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;

        let stdout_capture = Arc::new(Mutex::new(Vec::new()));
        let stdout_thread = drain(child.stdout.take(), Arc::clone(&stdout_capture));
        let stderr_capture = Arc::new(Mutex::new(Vec::new()));
        let stderr_thread = drain(child.stderr.take(), Arc::clone(&stderr_capture));

        Ok(TestSession {
            child,
            stdout_capture,
            stderr_capture,
            stdout_thread,
            stderr_thread,
        })
    }

    /// Wait for the child to exit and assert the exit code.
    pub fn wait_exit(mut self, expected_code: i32) -> SessionOutput {
        let status = self.child.wait().expect("failed to wait for child");
        let code = status.code().unwrap_or(-1);

        // The drain threads finish once the child's pipes close.
        let _ = self.stdout_thread.join();
        let _ = self.stderr_thread.join();

        let stdout = String::from_utf8_lossy(&self.stdout_capture.lock().unwrap()).to_string();
        let stderr = String::from_utf8_lossy(&self.stderr_capture.lock().unwrap()).to_string();

        assert_eq!(
            code, expected_code,
            "expected exit code {expected_code}, got {code}\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );

        SessionOutput { stdout, stderr }
    }
}

fn drain<R: Read + Send + 'static>(
    source: Option<R>,
    capture: Arc<Mutex<Vec<u8>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut source = match source {
            Some(source) => source,
            None => return,
        };
        let mut buf = [0u8; 4096];
        loop {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => capture.lock().unwrap().extend_from_slice(&buf[..n]),
                Err(e) => {
                    eprintln!("drain error: {e}");
                    break;
                }
            }
        }
    })
}

/// Run `binary` to completion and assert its exit code.
pub fn run(binary: &str, args: &[&str], env: &[(&str, &str)], expected_code: i32) -> SessionOutput {
    TestSession::spawn(binary, args, env, &[])
        .expect("failed to spawn")
        .wait_exit(expected_code)
}

/// Output captured from a completed session.
pub struct SessionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl SessionOutput {
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }

    pub fn stderr_lines(&self) -> Vec<&str> {
        self.stderr.lines().collect()
    }
}
