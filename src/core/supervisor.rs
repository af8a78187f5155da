use crate::config::types::{resolve_parts, HarnessError, Part, Result};
use crate::core::types::{
    CommandSpec, InvocationOutcome, OrchestratorConfig, ParsedResult, ResolvedBackend,
};
use crate::core::watchdog::GraceWatchdog;
use crate::utils::output::{LineBuffer, OutputTail, SolutionCollector};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::unistd::pipe2;
use std::fs::File;
use std::io::Write;
use std::os::fd::AsFd;
use std::path::Path;
use std::process::{Child, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const MIN_DRAIN_WAIT: Duration = Duration::from_millis(1);

fn spawn_error(spec: &CommandSpec, source: std::io::Error) -> HarnessError {
    HarnessError::Spawn {
        command: spec.to_string(),
        source,
    }
}

/// Spawn `spec` with stdout and stderr merged into a single pipe.
fn spawn_merged(spec: &CommandSpec) -> Result<(Child, File)> {
    let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC)?;
    let stderr_end = write_end.try_clone()?;

    let mut command = spec.to_command()?;
    command
        .stdin(Stdio::null())
        .stdout(Stdio::from(write_end))
        .stderr(Stdio::from(stderr_end));

    let child = command.spawn().map_err(|e| spawn_error(spec, e))?;
    // Drop our copies of the write end so EOF is observable once the child
    // (and anything it forked) closes its side.
    drop(command);

    Ok((child, File::from(read_end)))
}

/// Wait until `file` is readable (or hung up) for at most `timeout`.
fn wait_readable(file: &File, timeout: Duration) -> Result<bool> {
    let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
    let mut fds = [PollFd::new(file.as_fd(), PollFlags::POLLIN)];
    match poll(&mut fds, PollTimeout::from(millis)) {
        Ok(0) => Ok(false),
        Ok(_) => Ok(fds[0].revents().is_some_and(|events| {
            events.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
        })),
        Err(Errno::EINTR) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Per-invocation state: the pipe, parsed results, and the output tail.
struct Session {
    lines: LineBuffer<File>,
    collector: SolutionCollector,
    tail: OutputTail,
    echo: bool,
}

impl Session {
    fn new(reader: File, parts: Vec<Part>, config: &OrchestratorConfig) -> Self {
        Self {
            lines: LineBuffer::new(reader),
            collector: SolutionCollector::new(parts),
            tail: OutputTail::new(config.tail_lines),
            echo: config.echo,
        }
    }

    /// One readiness wait followed by at most one read.
    fn pump(&mut self, timeout: Duration) -> Result<()> {
        if !wait_readable(self.lines.source(), timeout)? {
            return Ok(());
        }
        self.lines.fill()?;
        while let Some(line) = self.lines.next_line() {
            self.handle_line(&line)?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<()> {
        if self.echo {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{line}")?;
            stdout.flush()?;
        }
        self.tail.push(line);
        if self.collector.observe(line) {
            log::debug!("Parsed structured result line: {line}");
        }
        Ok(())
    }
}

/// Builds and runs solver processes, multiplexing their output into
/// structured results.
///
/// Every invocation owns its child, pipe, and result list; nothing is cached
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Build (when the backend has a build step), then run on `input`.
    pub fn run(
        &self,
        backend: &ResolvedBackend,
        input: &Path,
        part: Option<Part>,
    ) -> InvocationOutcome {
        self.build(backend)?;
        self.execute(backend, input, part)
    }

    /// Run the backend's build command to completion.
    pub fn build(&self, backend: &ResolvedBackend) -> Result<()> {
        let Some(build) = &backend.build else {
            return Ok(());
        };

        log::info!("Building {} ...", backend.backend_id);
        log::info!("{}", build);
        let started = Instant::now();

        let output = build
            .to_command()?
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(build, e))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(HarnessError::BuildFailed {
                command: build.to_string(),
                exit_code: output.status.code(),
                output: combined,
            });
        }

        log::info!("Build OK ({} ms)", started.elapsed().as_millis());
        Ok(())
    }

    /// Run an already-built backend on `input` and collect its results.
    pub fn execute(
        &self,
        backend: &ResolvedBackend,
        input: &Path,
        part: Option<Part>,
    ) -> InvocationOutcome {
        let spec = backend.run_command_for(input, part);
        let command_line = spec.to_string();
        log::info!("Running {} ...", backend.backend_id);
        log::info!("{}", command_line);

        let (mut child, reader) = spawn_merged(&spec)?;
        let mut session = Session::new(reader, resolve_parts(part), &self.config);

        let status = match self.watch_running(&mut child, &mut session) {
            Ok(status) => status,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };
        log::debug!("{} exited with {}", backend.backend_id, status);

        let timed_out = self.drain(&mut session)?;
        let Session {
            collector, tail, ..
        } = session;

        if !status.success() {
            return Err(HarnessError::ProcessFailed {
                command: command_line,
                exit_code: status.code(),
                output: tail.render(),
            });
        }

        if collector.is_complete() {
            let results: Vec<ParsedResult> = collector.into_results();
            return Ok(results);
        }

        let missing = collector.missing();
        if timed_out {
            Err(HarnessError::DrainTimeout {
                command: command_line,
                grace: self.config.grace_window,
                missing,
            })
        } else {
            Err(HarnessError::MissingSolutionOutput {
                command: command_line,
                missing,
            })
        }
    }

    /// Multiplex output while the child is alive.
    fn watch_running(&self, child: &mut Child, session: &mut Session) -> Result<ExitStatus> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if session.lines.at_eof() {
                thread::sleep(self.config.poll_interval);
            } else {
                session.pump(self.config.poll_interval)?;
            }
        }
    }

    /// Drain buffered output after exit. Returns true when the grace window
    /// expired before every requested part was seen.
    fn drain(&self, session: &mut Session) -> Result<bool> {
        let watchdog = GraceWatchdog::arm(self.config.grace_window);
        let token = watchdog.token();

        while !session.collector.is_complete() && !session.lines.at_eof() {
            if token.is_cancelled() {
                break;
            }
            let wait = token
                .remaining()
                .clamp(MIN_DRAIN_WAIT, self.config.poll_interval.max(MIN_DRAIN_WAIT));
            session.pump(wait)?;
        }

        let fired = watchdog.disarm();
        if fired {
            log::warn!(
                "Grace window of {:?} elapsed with part(s) {:?} still missing",
                self.config.grace_window,
                session.collector.missing()
            );
        }
        Ok(fired && !session.collector.is_complete())
    }
}
