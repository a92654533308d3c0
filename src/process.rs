//! # Subprocess Supervision
//!
//! Two ways of running an external tool:
//!
//! - [`run_to_completion`] runs a [`Command`] synchronously and returns its
//!   [`ProcessOutput`] (exit code plus captured stdout/stderr). A non-zero
//!   exit is *not* an error; only a failure to launch is.
//! - [`ManagedProcess`] owns a long-lived child with an
//!   idle → running → stopped lifecycle. [`ManagedProcess::stop`] asks the
//!   child to terminate and kills it if it is still alive after
//!   [`STOP_TIMEOUT`].
//!
//! The child's stdout/stderr are piped and drained by background threads
//! into a shared buffer, so a chatty child never blocks on a full pipe.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::error::{Error, Result};

/// How long [`ManagedProcess::stop`] waits after the graceful signal before
/// killing the child.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long to let the pipe readers catch up once the child is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// True when the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn from_output(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Render a command as a shell-like line for logging.
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `command` to completion, capturing stdout and stderr.
///
/// Blocks until the process exits. There is no timeout.
pub fn run_to_completion(command: &mut Command) -> Result<ProcessOutput> {
    let line = describe(command);
    debug!("running: {}", line);

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::spawn(command.get_program().to_string_lossy(), e))?;

    let output = ProcessOutput::from_output(output);
    debug!("{} exited with {:?}", line, output.code);
    Ok(output)
}

/// What to launch for a [`ManagedProcess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Build the [`Command`] this spec describes.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

/// Output captured from a running child so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

struct Running {
    child: Child,
    drains: Vec<JoinHandle<()>>,
}

/// A long-lived child process with start/stop lifecycle.
///
/// The handle exclusively owns its child. Dropping the handle stops it.
pub struct ManagedProcess {
    name: String,
    spec: ProcessSpec,
    running: Option<Running>,
    captured: Arc<Mutex<CapturedOutput>>,
}

impl ManagedProcess {
    /// Create an idle handle. `name` is only used in log messages.
    pub fn new(name: impl Into<String>, spec: ProcessSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            running: None,
            captured: Arc::new(Mutex::new(CapturedOutput::default())),
        }
    }

    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }

    /// Whether a child is currently held.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// OS process id of the live child.
    pub fn pid(&self) -> Option<u32> {
        self.running.as_ref().map(|r| r.child.id())
    }

    /// Spawn the child.
    ///
    /// If a child is already held this only logs a warning and returns
    /// `Ok(())`; no second process is started.
    pub fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            warn!(
                "{} is already running. Use `stop()` to stop it before starting a new one.",
                self.name
            );
            return Ok(());
        }

        let mut command = self.spec.command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("spawning: {}", describe(&command));

        let mut child = command
            .spawn()
            .map_err(|e| Error::spawn(self.spec.program.to_string_lossy(), e))?;

        if let Ok(mut captured) = self.captured.lock() {
            *captured = CapturedOutput::default();
        }

        let mut drains = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            drains.push(self.drain(stdout, false));
        }
        if let Some(stderr) = child.stderr.take() {
            drains.push(self.drain(stderr, true));
        }

        info!("{} started (pid {}).", self.name, child.id());
        self.running = Some(Running { child, drains });
        Ok(())
    }

    fn drain<R: Read + Send + 'static>(&self, stream: R, is_stderr: bool) -> JoinHandle<()> {
        let captured = Arc::clone(&self.captured);
        let name = self.name.clone();
        thread::spawn(move || {
            for line in BufReader::new(stream).lines() {
                let Ok(line) = line else { break };
                debug!("[{}] {}", name, line);
                if let Ok(mut captured) = captured.lock() {
                    let buffer = if is_stderr {
                        &mut captured.stderr
                    } else {
                        &mut captured.stdout
                    };
                    buffer.push_str(&line);
                    buffer.push('\n');
                }
            }
        })
    }

    /// Everything the child has written since it started, or since the last
    /// [`take_new_output`](Self::take_new_output).
    pub fn captured_output(&self) -> CapturedOutput {
        self.captured
            .lock()
            .map(|captured| captured.clone())
            .unwrap_or_default()
    }

    /// Remove and return what has been captured since the previous call.
    ///
    /// A caller relaying output while the child runs should use this, so the
    /// buffer only ever holds text that has not been relayed yet.
    pub fn take_new_output(&self) -> CapturedOutput {
        self.captured
            .lock()
            .map(|mut captured| std::mem::take(&mut *captured))
            .unwrap_or_default()
    }

    /// Stop the child: graceful signal, wait up to [`STOP_TIMEOUT`], then kill.
    ///
    /// The handle is cleared whichever way the child ended. Calling this with
    /// no live child does nothing.
    pub fn stop(&mut self) {
        let Some(Running { mut child, drains }) = self.running.take() else {
            return;
        };

        request_termination(&mut child);

        let deadline = Instant::now() + STOP_TIMEOUT;
        let exited = loop {
            match child.try_wait() {
                Ok(Some(_)) => break true,
                Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
                Ok(None) => break false,
                Err(e) => {
                    warn!("{}: failed to poll child: {}", self.name, e);
                    break false;
                }
            }
        };

        if !exited {
            warn!(
                "{} did not exit within {:?}; killing it.",
                self.name, STOP_TIMEOUT
            );
            if let Err(e) = child.kill() {
                warn!("{}: kill failed: {}", self.name, e);
            }
            let _ = child.wait();
        }

        finish_drains(drains);
        info!("{} stopped.", self.name);
    }

    /// Block until the child exits on its own, then clear the handle.
    ///
    /// Returns `None` if no child was running.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>> {
        let Some(Running { mut child, drains }) = self.running.take() else {
            return Ok(None);
        };
        let status = child.wait()?;
        finish_drains(drains);
        info!("{} exited with {}.", self.name, status);
        Ok(Some(status))
    }

    /// Non-blocking check whether the child has exited; clears the handle if
    /// it has.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        let status = match self.running.as_mut() {
            Some(running) => running.child.try_wait()?,
            None => return Ok(None),
        };
        if status.is_some() {
            if let Some(running) = self.running.take() {
                finish_drains(running.drains);
            }
        }
        Ok(status)
    }
}

impl Drop for ManagedProcess {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Join the pipe readers, giving up after [`DRAIN_GRACE`].
///
/// A grandchild that inherited the pipes can keep them open long after the
/// child is gone; readers still blocked then are detached.
fn finish_drains(drains: Vec<JoinHandle<()>>) {
    let deadline = Instant::now() + DRAIN_GRACE;
    while drains.iter().any(|d| !d.is_finished()) && Instant::now() < deadline {
        thread::sleep(POLL_INTERVAL);
    }
    for drain in drains {
        if drain.is_finished() {
            let _ = drain.join();
        } else {
            debug!("output pipe still held open; detaching its reader");
        }
    }
}

#[cfg(unix)]
fn request_termination(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(child.id()) else {
        let _ = child.kill();
        return;
    };
    if let Err(errno) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
        debug!("SIGTERM to {} failed: {}", pid, errno);
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) {
    let _ = child.kill();
}
