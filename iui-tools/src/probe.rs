use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use wait_timeout::ChildExt;

use crate::compiler::{CompilerEnv, CompilerFamily};
use crate::error::ProbeError;

/// How long a compiler gets to answer `--version`.
pub const DEFAULT_VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether an Emscripten driver is reachable through `PATH`.
///
/// Only resolves the name; `emcc` is never executed.
pub fn have_emcc() -> bool {
    match which::which("emcc") {
        Ok(path) => {
            debug!("found emcc at {}", path.display());
            true
        }
        Err(err) => {
            debug!("emcc not found: {err}");
            false
        }
    }
}

/// Runs `<invocation> --version` and returns its stdout.
///
/// The invocation is split with shell word rules so wrappers such as
/// `ccache gcc` work. Output is only returned for a zero exit status within
/// `timeout`; a child that overruns is killed. The deadline also covers
/// reading stdout, which a backgrounded grandchild can hold open after the
/// compiler itself has exited.
pub fn query_version(invocation: &str, timeout: Duration) -> Result<String, ProbeError> {
    let argv = shlex::split(invocation)
        .filter(|argv| !argv.is_empty())
        .ok_or_else(|| ProbeError::InvalidInvocation(invocation.to_string()))?;
    let program = argv[0].clone();

    let start = Instant::now();
    let mut child = Command::new(&program)
        .args(&argv[1..])
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ProbeError::Spawn {
            program: program.clone(),
            source,
        })?;

    // Drain stdout on a separate thread so a large banner can't fill the pipe
    // while we wait on the child. The thread is never joined.
    let (tx, rx) = mpsc::channel();
    let stdout = child.stdout.take();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stdout) = stdout {
            let _ = stdout.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProbeError::Timeout { program, timeout });
        }
        Err(source) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProbeError::Wait { program, source });
        }
    };

    if !status.success() {
        return Err(ProbeError::Failed { program, status });
    }

    let output = match rx.recv_timeout(timeout.saturating_sub(start.elapsed())) {
        Ok(output) => output,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            return Err(ProbeError::Timeout { program, timeout })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Vec::new(),
    };
    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Resolves, runs and classifies the active compiler.
///
/// Returns `None` when no version banner could be obtained, whatever the
/// reason; the reason is logged at debug level.
pub fn detect(env: &CompilerEnv, timeout: Duration) -> Option<CompilerFamily> {
    let invocation = env.invocation();
    debug!("probing compiler `{invocation}`");

    match query_version(&invocation, timeout) {
        Ok(banner) if !banner.is_empty() => {
            let family = CompilerFamily::classify(&banner);
            debug!("classified `{invocation}` as {family}");
            Some(family)
        }
        Ok(_) => {
            debug!("`{invocation} --version` printed nothing");
            None
        }
        Err(err) => {
            debug!("{err}");
            None
        }
    }
}
