use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use hookline_runtime::{HookDescriptor, HookError, HookTransport, ProcessOutput};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Upper bound kept from each of stdout and stderr
pub const MAX_STREAM_BYTES: usize = 1024 * 1024;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs each hook script as a child process, one request per process
pub struct ProcessTransport {
    timeout: Duration,
}

impl ProcessTransport {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Configure the deadline for a whole invocation (write, read, exit)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ProcessTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// ETXTBSY: the script is still open for writing somewhere
const TEXT_FILE_BUSY: i32 = 26;
const SPAWN_ATTEMPTS: u32 = 3;

async fn spawn(path: &Path) -> std::io::Result<Child> {
    let mut attempt = 1;
    loop {
        let result = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        match result {
            Err(e) if e.raw_os_error() == Some(TEXT_FILE_BUSY) && attempt < SPAWN_ATTEMPTS => {
                debug!(path = ?path, attempt, "Hook script busy, retrying spawn");
                tokio::time::sleep(Duration::from_millis(20 * u64::from(attempt))).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Read a stream to EOF, keeping at most `MAX_STREAM_BYTES`
async fn drain<R: AsyncRead + Unpin>(
    mut reader: R,
    stream: &'static str,
) -> std::io::Result<Vec<u8>> {
    let mut kept = Vec::new();
    let mut buf = [0u8; 8192];
    let mut capped = false;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let room = MAX_STREAM_BYTES - kept.len();
        if n > room {
            kept.extend_from_slice(&buf[..room]);
            if !capped {
                warn!(stream, max_bytes = MAX_STREAM_BYTES, "Hook output truncated");
                capped = true;
            }
        } else {
            kept.extend_from_slice(&buf[..n]);
        }
    }

    Ok(kept)
}

#[async_trait]
impl HookTransport for ProcessTransport {
    async fn invoke(
        &self,
        descriptor: &HookDescriptor,
        request: &[u8],
    ) -> Result<ProcessOutput, HookError> {
        let hook = descriptor.hook_name.to_string();
        let io_err = |source: std::io::Error| HookError::Io {
            hook: hook.clone(),
            source,
        };

        let mut child = spawn(&descriptor.path).await.map_err(|source| HookError::Spawn {
            hook: hook.clone(),
            path: descriptor.path.clone(),
            source,
        })?;

        debug!(hook = %hook, path = ?descriptor.path, pid = ?child.id(), "Hook process spawned");

        let mut stdin = child.stdin.take().ok_or_else(|| {
            io_err(std::io::Error::new(ErrorKind::Other, "child stdin not captured"))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            io_err(std::io::Error::new(ErrorKind::Other, "child stdout not captured"))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            io_err(std::io::Error::new(ErrorKind::Other, "child stderr not captured"))
        })?;

        let exchange = async {
            let write = async {
                // A script may exit without reading its input
                match stdin.write_all(request).await {
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        debug!(hook = %hook, "Hook closed stdin before reading the request");
                    }
                    other => other?,
                }
                drop(stdin);
                Ok::<_, std::io::Error>(())
            };

            let (written, out, err) =
                tokio::join!(write, drain(stdout, "stdout"), drain(stderr, "stderr"));
            written?;
            // stdout stays raw for the decoder; stderr is only diagnostics
            let (stdout, stderr) = (out?, String::from_utf8_lossy(&err?).into_owned());

            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout, stderr))
        };

        let outcome = tokio::time::timeout(self.timeout, exchange).await;
        let (status, stdout, stderr) = match outcome {
            Ok(result) => result.map_err(io_err)?,
            Err(_) => {
                warn!(
                    hook = %hook,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Hook timed out, killing process"
                );
                if let Err(e) = child.kill().await {
                    warn!(hook = %hook, error = ?e, "Failed to kill hook process");
                }
                return Err(HookError::TimedOut {
                    hook: hook.clone(),
                    timeout: self.timeout,
                });
            }
        };

        let exit_code = status.code().unwrap_or(-1);
        debug!(
            hook = %hook,
            exit_code,
            stdout_len = stdout.len(),
            stderr_len = stderr.len(),
            "Hook process finished"
        );

        Ok(ProcessOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}
