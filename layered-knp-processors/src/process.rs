//! A supervised analyzer subprocess.
//!
//! One [`AnalyzerProcess`] owns one child. A request writes its input to the
//! child's stdin and reads stdout up to a terminator line. The exchange runs
//! on a worker thread while the caller waits on a channel with a deadline,
//! so a hung analyzer costs one timeout instead of a stuck caller.

use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError};
use layered_knp::codec::{EOD, EOS};

use crate::config::AnalyzerConfig;
use crate::errors::{ProcessorError, ProcessorResult};

/// The line that closes a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `EOS` after each sentence. The line is part of the reply.
    Eos,
    /// `EOD` after each document. The line is dropped from the reply.
    Eod,
}

impl Terminator {
    pub fn line(self) -> &'static str {
        match self {
            Terminator::Eos => EOS,
            Terminator::Eod => EOD,
        }
    }

    fn is_kept(self) -> bool {
        self == Terminator::Eos
    }
}

struct Pipes {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

struct Running {
    child: Child,
    /// Lent to the worker thread for the length of a request.
    pipes: Option<Pipes>,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.pipes = None;
        if let Err(err) = self.child.kill() {
            tracing::debug!("kill pid {}: {}", self.child.id(), err);
        }
        let _ = self.child.wait();
    }
}

/// A long-lived analyzer child guarded by a mutex.
pub struct AnalyzerProcess {
    name: String,
    config: AnalyzerConfig,
    terminator: Terminator,
    running: Mutex<Option<Running>>,
}

impl fmt::Debug for AnalyzerProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerProcess")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("terminator", &self.terminator)
            .finish()
    }
}

impl AnalyzerProcess {
    /// Start the child. A failure to start is logged; requests will retry
    /// the start and report [`ProcessorError::AnalyzerUnavailable`].
    pub fn new(name: impl Into<String>, config: AnalyzerConfig, terminator: Terminator) -> Self {
        let name = name.into();
        let running = match spawn(&name, &config) {
            Ok(running) => Some(running),
            Err(err) => {
                tracing::warn!("failed to start {}: {}", name, err);
                None
            }
        };
        AnalyzerProcess {
            name,
            config,
            terminator,
            running: Mutex::new(running),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// True while the child is running.
    pub fn is_available(&self) -> bool {
        match self.lock().as_mut() {
            Some(running) => matches!(running.child.try_wait(), Ok(None)),
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unavailable(&self, reason: impl Into<String>) -> ProcessorError {
        ProcessorError::AnalyzerUnavailable {
            analyzer: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn restart(&self, running: Running) -> Option<Running> {
        drop(running);
        tracing::info!("restarting {}", self.name);
        match spawn(&self.name, &self.config) {
            Ok(running) => Some(running),
            Err(err) => {
                tracing::warn!("failed to restart {}: {}", self.name, err);
                None
            }
        }
    }

    /// Send `input` and return everything the child prints up to the terminator.
    ///
    /// Concurrent callers wait for each other. On timeout the child is killed
    /// and restarted; a child found dead is restarted as well. Neither case
    /// retries the request.
    pub fn communicate(&self, input: &str) -> ProcessorResult<String> {
        let mut slot = self.lock();
        let mut running = match slot.take() {
            Some(running) => running,
            None => spawn(&self.name, &self.config)
                .map_err(|err| self.unavailable(format!("cannot start: {}", err)))?,
        };
        if let Some(status) = running.child.try_wait()? {
            *slot = self.restart(running);
            return Err(self.unavailable(format!("exited with {}", status)));
        }
        let pipes = match running.pipes.take() {
            Some(pipes) => pipes,
            None => {
                *slot = self.restart(running);
                return Err(self.unavailable("pipes were lost by an earlier request"));
            }
        };

        let mut request = input.to_string();
        if !request.ends_with('\n') {
            request.push('\n');
        }
        let terminator = self.terminator;
        let (tx, rx) = channel::bounded(1);
        thread::Builder::new()
            .name(format!("{}-request", self.name))
            .spawn(move || {
                let mut pipes = pipes;
                let reply = exchange(&mut pipes, &request, terminator);
                // the caller may have timed out and gone
                let _ = tx.send((pipes, reply));
            })?;

        let timeout = Duration::from_secs(self.config.timeout_secs);
        match rx.recv_timeout(timeout) {
            Ok((pipes, Ok(Some(reply)))) => {
                running.pipes = Some(pipes);
                *slot = Some(running);
                Ok(reply)
            }
            Ok((_, Ok(None))) => {
                *slot = self.restart(running);
                Err(self.unavailable("closed its output"))
            }
            Ok((_, Err(err))) => {
                *slot = self.restart(running);
                Err(err.into())
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    "{} did not answer within {}s",
                    self.name,
                    self.config.timeout_secs
                );
                *slot = self.restart(running);
                Err(ProcessorError::AnalyzerTimeout {
                    analyzer: self.name.clone(),
                    timeout_secs: self.config.timeout_secs,
                })
            }
            Err(RecvTimeoutError::Disconnected) => {
                *slot = self.restart(running);
                Err(self.unavailable("request worker stopped"))
            }
        }
    }
}

/// One request/reply round trip. `Ok(None)` means stdout closed first.
fn exchange(pipes: &mut Pipes, request: &str, terminator: Terminator) -> io::Result<Option<String>> {
    pipes.stdin.write_all(request.as_bytes())?;
    pipes.stdin.flush()?;
    let mut reply = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        if pipes.stdout.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.trim_end_matches(['\n', '\r']) == terminator.line() {
            if terminator.is_kept() {
                reply.push_str(&line);
            }
            return Ok(Some(reply));
        }
        reply.push_str(&line);
    }
}

fn spawn(name: &str, config: &AnalyzerConfig) -> io::Result<Running> {
    let mut child = config
        .command()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
        (Some(stdin), Some(stdout)) => (stdin, stdout),
        _ => {
            let _ = child.kill();
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "analyzer pipes were not captured",
            ));
        }
    };
    if let Some(stderr) = child.stderr.take() {
        drain_stderr(name, stderr);
    }
    tracing::debug!("started {} (pid {})", name, child.id());
    Ok(Running {
        child,
        pipes: Some(Pipes {
            stdin,
            stdout: BufReader::new(stdout),
        }),
    })
}

/// Forward the child's stderr to the log until it closes.
fn drain_stderr(name: &str, stderr: ChildStderr) {
    let analyzer = name.to_string();
    let spawned = thread::Builder::new()
        .name(format!("{}-stderr", name))
        .spawn(move || {
            for line in BufReader::new(stderr).lines() {
                match line {
                    Ok(line) => tracing::debug!(analyzer = %analyzer, "{}", line),
                    Err(_) => break,
                }
            }
        });
    if let Err(err) = spawned {
        tracing::warn!("cannot read stderr of {}: {}", name, err);
    }
}
