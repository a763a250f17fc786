//! Streaming reader over the resolver process output.
//!
//! [`ModuleReader`] owns the resolver child process and decodes module
//! records from its stdout as they arrive. Reads are pulled in batches into
//! caller-supplied slots; the process is shut down with [`ModuleReader::close`]
//! (or on drop).
//!
//! # Shutdown
//!
//! Closing sends `SIGTERM` and waits for the process to exit for at most the
//! shutdown timeout. If the process is still alive afterwards a
//! [`CloseError::Timeout`] is returned and the process is left alone; it is
//! never killed forcibly.

use std::io::{self, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};
use tracing::{debug, warn};

use super::error::{CloseError, PullError, ReaderError, ReaderResult};
use super::record::ModuleRecord;
use super::resolver::ResolverCommand;

/// How long [`ModuleReader::close`] waits for the process to exit.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

/// Slots allocated by the first [`ModuleReader::read_all`] batch.
const INITIAL_BATCH: usize = 16;

/// Interval between exit checks while closing.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

type RecordStream = StreamDeserializer<'static, IoRead<BufReader<ChildStdout>>, ModuleRecord>;

/// Outcome of a successful batched read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pull {
    /// Number of slots filled, starting at index 0.
    pub count: usize,

    /// The resolver output is exhausted. Further reads fill nothing.
    pub end_of_stream: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Open,
    Exhausted,
    Failed,
}

struct Process {
    child: Child,
    closed: Option<Result<(), CloseError>>,
}

impl Process {
    fn terminate(&mut self, timeout: Duration) -> Result<(), CloseError> {
        let pid = self.child.id();

        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid, %status, "Module resolver already exited");
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => {
                return Err(CloseError::Wait {
                    pid,
                    reason: e.to_string(),
                })
            }
        }

        // SAFETY: the child has not been reaped yet, so its pid cannot have
        // been reused by another process.
        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if rc != 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::ESRCH) {
                return Err(CloseError::Signal {
                    pid,
                    reason: err.to_string(),
                });
            }
        }

        let deadline = Instant::now() + timeout;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!(pid, %status, "Module resolver exited");
                    return Ok(());
                }
                Ok(None) if Instant::now() >= deadline => {
                    return Err(CloseError::Timeout { pid, timeout });
                }
                Ok(None) => thread::sleep(EXIT_POLL_INTERVAL),
                Err(e) => {
                    return Err(CloseError::Wait {
                        pid,
                        reason: e.to_string(),
                    })
                }
            }
        }
    }
}

/// Pull-based reader of module records from a resolver process.
///
/// Reads take `&mut self` and are meant for a single owner. [`close`] takes
/// `&self` and serializes concurrent callers.
///
/// [`close`]: ModuleReader::close
pub struct ModuleReader {
    records: RecordStream,
    state: StreamState,
    process: Mutex<Process>,
    pid: u32,
    shutdown_timeout: Duration,
}

impl ModuleReader {
    /// Start the resolver in `dir` and attach to its stdout.
    pub fn spawn(dir: &Path, resolver: &dyn ResolverCommand) -> ReaderResult<Self> {
        let mut cmd = resolver.list_modules(dir);
        let program = cmd.get_program().to_string_lossy().into_owned();

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ReaderError::Spawn { program, error: e })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReaderError::MissingStdout);
        };

        let pid = child.id();
        debug!(pid, dir = %dir.display(), "Started module resolver");

        Ok(Self {
            records: Deserializer::from_reader(BufReader::new(stdout)).into_iter(),
            state: StreamState::Open,
            process: Mutex::new(Process {
                child,
                closed: None,
            }),
            pid,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        })
    }

    /// Override how long [`close`](Self::close) waits for the process.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Process id of the resolver.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Decode up to `buf.len()` records into `buf`.
    ///
    /// Stops early at end of stream, reported through
    /// [`Pull::end_of_stream`]. A malformed record is fatal: the error
    /// carries the number of slots filled before it, and every later read
    /// fails with [`ReaderError::Abandoned`].
    pub fn read(&mut self, buf: &mut [ModuleRecord]) -> Result<Pull, PullError> {
        match self.state {
            StreamState::Open => {}
            StreamState::Exhausted => {
                return Ok(Pull {
                    count: 0,
                    end_of_stream: true,
                })
            }
            StreamState::Failed => {
                return Err(PullError {
                    count: 0,
                    error: ReaderError::Abandoned,
                })
            }
        }

        for (count, slot) in buf.iter_mut().enumerate() {
            match self.records.next() {
                Some(Ok(record)) => *slot = record,
                Some(Err(e)) => {
                    self.state = StreamState::Failed;
                    return Err(PullError {
                        count,
                        error: ReaderError::Decode(e),
                    });
                }
                None => {
                    self.state = StreamState::Exhausted;
                    return Ok(Pull {
                        count,
                        end_of_stream: true,
                    });
                }
            }
        }

        Ok(Pull {
            count: buf.len(),
            end_of_stream: false,
        })
    }

    /// Read every remaining record.
    ///
    /// The buffer doubles whenever it fills up. On error nothing read so far
    /// is returned.
    pub fn read_all(&mut self) -> ReaderResult<Vec<ModuleRecord>> {
        let mut modules = vec![ModuleRecord::default(); INITIAL_BATCH];
        let mut len = 0;

        loop {
            if len == modules.len() {
                modules.resize(modules.len() * 2, ModuleRecord::default());
            }

            let pull = self.read(&mut modules[len..]).map_err(|e| e.error)?;
            len += pull.count;

            if pull.end_of_stream {
                modules.truncate(len);
                return Ok(modules);
            }
        }
    }

    /// Terminate the resolver process.
    ///
    /// Idempotent: later calls return the outcome of the first.
    pub fn close(&self) -> Result<(), CloseError> {
        let mut process = self.process.lock();
        if let Some(outcome) = &process.closed {
            return outcome.clone();
        }

        let outcome = process.terminate(self.shutdown_timeout);
        process.closed = Some(outcome.clone());
        outcome
    }

    /// Read every record, then close the resolver.
    ///
    /// A close failure after a complete read is logged and does not discard
    /// the records.
    pub fn into_modules(mut self) -> ReaderResult<Vec<ModuleRecord>> {
        let modules = self.read_all();

        if let Err(e) = self.close() {
            warn!(pid = self.pid, error = %e, "Module resolver did not shut down cleanly");
        }

        let modules = modules?;
        debug!(count = modules.len(), "Listed modules");
        Ok(modules)
    }
}

impl std::fmt::Debug for ModuleReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleReader")
            .field("pid", &self.pid)
            .field("state", &self.state)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish_non_exhaustive()
    }
}

impl Drop for ModuleReader {
    fn drop(&mut self) {
        if self.process.get_mut().closed.is_some() {
            return;
        }
        if let Err(e) = self.close() {
            warn!(pid = self.pid, error = %e, "Failed to shut down module resolver");
        }
    }
}

/// Run the resolver in `dir` and collect every module it reports, using
/// [`DEFAULT_SHUTDOWN_TIMEOUT`] to close it.
pub fn list_modules(
    dir: &Path,
    resolver: &dyn ResolverCommand,
) -> ReaderResult<Vec<ModuleRecord>> {
    ModuleReader::spawn(dir, resolver)?.into_modules()
}
