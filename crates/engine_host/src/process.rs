//! Engine subprocess: spawn, feed lines in, stream lines out.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use xiangqi_core::EngineCommand;

/// How long a `quit` is given to take effect before the child is killed.
const QUIT_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub path: PathBuf,
    pub args: Vec<String>,
}

impl EngineConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to start engine {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("engine process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// What the engine process reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// One non-blank line of standard output.
    Output(String),
    /// The process is gone. Sent once, after all of its output.
    Exited { code: Option<i32> },
}

/// Cheap, cloneable sender side of a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<String>,
    alive: Arc<AtomicBool>,
    kill: Arc<Notify>,
}

impl EngineHandle {
    /// Start the engine and send it `uci`.
    ///
    /// Must be called from within a tokio runtime. The child runs in the
    /// directory holding its binary and is killed if the host goes away.
    pub fn spawn(
        config: &EngineConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<EngineEvent>), HostError> {
        // Resolve before changing the child's working directory.
        let program = std::fs::canonicalize(&config.path).unwrap_or_else(|_| config.path.clone());

        let mut cmd = Command::new(&program);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = program.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| HostError::Spawn {
            path: config.path.clone(),
            source,
        })?;
        let stdin = child.stdin.take().ok_or(HostError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(HostError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(HostError::MissingPipe("stderr"))?;

        tracing::info!(path = %config.path.display(), pid = ?child.id(), "engine started");

        let alive = Arc::new(AtomicBool::new(true));
        let kill = Arc::new(Notify::new());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(write_loop(stdin, cmd_rx, alive.clone()));
        tokio::spawn(log_stderr(stderr));
        let reader = tokio::spawn(read_loop(stdout, event_tx.clone()));
        tokio::spawn(supervise(child, reader, event_tx, alive.clone(), kill.clone()));

        let handle = EngineHandle {
            tx: cmd_tx,
            alive,
            kill,
        };
        handle.send(&EngineCommand::Uci);
        Ok((handle, event_rx))
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Queue a command line. Commands to a dead engine are dropped and
    /// `false` is returned.
    pub fn send(&self, cmd: &EngineCommand) -> bool {
        if !self.is_alive() {
            tracing::debug!(%cmd, "engine not running, command dropped");
            return false;
        }
        tracing::debug!(%cmd, "-> engine");
        self.tx.send(cmd.to_string()).is_ok()
    }

    /// Ask the engine to quit, then make sure it goes.
    pub fn shutdown(&self) {
        self.send(&EngineCommand::Quit);
        self.kill.notify_one();
    }
}

async fn write_line(stdin: &mut ChildStdin, line: &str) -> std::io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}

async fn write_loop(
    mut stdin: ChildStdin,
    mut rx: mpsc::UnboundedReceiver<String>,
    alive: Arc<AtomicBool>,
) {
    while let Some(line) = rx.recv().await {
        if let Err(e) = write_line(&mut stdin, &line).await {
            tracing::warn!(error = %e, "engine stdin closed");
            alive.store(false, Ordering::SeqCst);
            break;
        }
    }
}

/// Read one line, decoding invalid UTF-8 lossily. `None` at end of stream.
async fn next_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buf).trim_end().to_string()))
}

async fn read_loop(stdout: ChildStdout, events: mpsc::UnboundedSender<EngineEvent>) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        match next_line_lossy(&mut reader, &mut buf).await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                tracing::trace!(%line, "<- engine");
                if events.send(EngineEvent::Output(line)).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read engine output");
                break;
            }
        }
    }
}

async fn log_stderr(stderr: ChildStderr) {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    loop {
        match next_line_lossy(&mut reader, &mut buf).await {
            Ok(Some(line)) => tracing::warn!(%line, "engine stderr"),
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "engine stderr closed");
                break;
            }
        }
    }
}

async fn supervise(
    mut child: Child,
    reader: JoinHandle<()>,
    events: mpsc::UnboundedSender<EngineEvent>,
    alive: Arc<AtomicBool>,
    kill: Arc<Notify>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill.notified() => stop_child(&mut child).await,
    };
    alive.store(false, Ordering::SeqCst);

    // Deliver whatever the engine printed before it went away.
    if let Err(e) = reader.await {
        tracing::warn!(error = %e, "engine output task failed");
    }

    let code = match status {
        Ok(s) => s.code(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to reap engine");
            None
        }
    };
    tracing::info!(?code, "engine exited");
    let _ = events.send(EngineEvent::Exited { code });
}

async fn stop_child(child: &mut Child) -> std::io::Result<ExitStatus> {
    match tokio::time::timeout(QUIT_GRACE, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            tracing::info!("engine ignored quit, killing it");
            child.kill().await?;
            child.wait().await
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod process_tests;
