//! Runs embedded `PostgreSQL` lifecycle steps for the integration tests.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! The payload is the JSON [`WorkerPayload`] written by the test harness:
//! `PostgreSQL` settings plus environment overrides. When started as root
//! the worker re-executes itself as `nobody`, because `initdb` and
//! `postgres` refuse to run with superuser privileges.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::env;
#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io::{self, Read};
#[cfg(unix)]
use std::process::{Command, ExitStatus};
#[cfg(unix)]
use thiserror::Error;


#[cfg(unix)]
const REEXEC_MARKER: &str = "MODELGATE_PG_WORKER_REEXEC";
#[cfg(unix)]
const TRUSTED_PATH: &str = "/usr/sbin:/usr/bin:/sbin:/bin";
#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures while driving the embedded cluster.
#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("usage error: {0}")]
    Usage(String),
    #[error("failed to read payload: {0}")]
    PayloadRead(#[source] BoxError),
    #[error("failed to parse payload: {0}")]
    PayloadParse(#[source] serde_json::Error),
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error("failed to build runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to drop privileges: {0}")]
    Privileges(String),
    #[error("postgres {operation} failed: {message}")]
    Postgres {
        operation: &'static str,
        message: String,
    },
}

/// Lifecycle step requested by the harness.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Operation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

#[cfg(unix)]
impl TryFrom<&str> for Operation {
    type Error = WorkerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::Usage(format!(
                "unknown operation '{other}'; expected setup, start or stop"
            ))),
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let args = collect_args()?;
    reexec_unprivileged_if_root(&args)?;
    let (operation, payload_path) = parse_args(&args)?;
    run(operation, &payload_path).map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker only runs on Unix platforms".into())
}

#[cfg(unix)]
fn collect_args() -> Result<Vec<String>, WorkerError> {
    env::args_os()
        .map(|arg| {
            arg.into_string()
                .map_err(|_| WorkerError::Usage("arguments must be valid UTF-8".to_owned()))
        })
        .collect()
}

#[cfg(unix)]
fn parse_args(args: &[String]) -> Result<(Operation, Utf8PathBuf), WorkerError> {
    match args {
        [_, operation, payload] => Ok((
            Operation::try_from(operation.as_str())?,
            Utf8PathBuf::from(payload),
        )),
        [_] | [] => Err(WorkerError::Usage(
            "expected an operation and a payload path".to_owned(),
        )),
        [_, _] => Err(WorkerError::Usage("missing payload path".to_owned())),
        [_, _, _, extra, ..] => Err(WorkerError::Usage(format!(
            "unexpected extra argument: {extra}"
        ))),
    }
}

#[cfg(unix)]
fn run(operation: Operation, payload_path: &Utf8Path) -> Result<(), WorkerError> {
    let payload = load_payload(payload_path)?;
    drop_privileges_if_root(UNPRIVILEGED_USER)?;
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;
    let mut postgres = PostgreSQL::new(settings);
    runtime.block_on(async {
        match operation {
            Operation::Setup => {
                postgres
                    .setup()
                    .await
                    .map_err(|err| postgres_error(operation, &err))?;
                ensure_started(&mut postgres, operation).await
            }
            Operation::Start => ensure_started(&mut postgres, operation).await,
            Operation::Stop => postgres
                .stop()
                .await
                .map_err(|err| postgres_error(operation, &err)),
        }
    })?;

    if operation == Operation::Start {
        // The server must outlive this process.
        std::mem::forget(postgres);
    }
    Ok(())
}

#[cfg(unix)]
async fn ensure_started(postgres: &mut PostgreSQL, operation: Operation) -> Result<(), WorkerError> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres
        .start()
        .await
        .map_err(|err| postgres_error(operation, &err))
}

#[cfg(unix)]
fn postgres_error(operation: Operation, err: &impl std::fmt::Display) -> WorkerError {
    WorkerError::Postgres {
        operation: operation.as_str(),
        message: err.to_string(),
    }
}

#[cfg(unix)]
fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let bytes = read_payload(path).map_err(WorkerError::PayloadRead)?;
    serde_json::from_slice(&bytes).map_err(WorkerError::PayloadParse)
}

#[cfg(unix)]
fn read_payload(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    let mut file = dir.open(relative.as_std_path())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(unix)]
fn reexec_unprivileged_if_root(args: &[String]) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() || env::var_os(REEXEC_MARKER).is_some() {
        return Ok(());
    }
    let exe = env::current_exe()
        .map_err(WorkerError::Runtime)?
        .into_os_string()
        .into_string()
        .map_err(|_| WorkerError::Privileges("executable path is not valid UTF-8".to_owned()))?;
    let forwarded = args.get(1..).unwrap_or_default();

    let status = match Command::new("runuser")
        .args(["-u", UNPRIVILEGED_USER, "--", exe.as_str()])
        .args(forwarded)
        .env(REEXEC_MARKER, "1")
        .env("PATH", TRUSTED_PATH)
        .status()
    {
        Ok(status) => status,
        Err(err) if err.kind() == io::ErrorKind::NotFound => run_via_su(&exe, forwarded)?,
        Err(err) => return Err(WorkerError::Privileges(err.to_string())),
    };
    std::process::exit(status.code().unwrap_or(1));
}

#[cfg(unix)]
fn run_via_su(exe: &str, forwarded: &[String]) -> Result<ExitStatus, WorkerError> {
    let command = std::iter::once(shell_escape(exe))
        .chain(forwarded.iter().map(|arg| shell_escape(arg)))
        .collect::<Vec<_>>()
        .join(" ");
    Command::new("/bin/su")
        .args(["-s", "/bin/sh", UNPRIVILEGED_USER, "-c"])
        .arg(format!("{REEXEC_MARKER}=1 exec {command}"))
        .env("PATH", TRUSTED_PATH)
        .status()
        .map_err(|err| WorkerError::Privileges(err.to_string()))
}

/// Quotes a value for a POSIX shell using single quotes.
#[cfg(unix)]
fn shell_escape(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn drop_privileges_if_root(username: &str) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }
    let user = User::from_name(username)
        .map_err(|err| WorkerError::Privileges(err.to_string()))?
        .ok_or_else(|| WorkerError::Privileges(format!("user '{username}' not found")))?;
    let name = CString::new(user.name.clone())
        .map_err(|err| WorkerError::Privileges(format!("invalid user name: {err}")))?;
    initgroups(&name, user.gid).map_err(|err| WorkerError::Privileges(err.to_string()))?;
    setgid(user.gid).map_err(|err| WorkerError::Privileges(err.to_string()))?;
    setuid(user.uid).map_err(|err| WorkerError::Privileges(err.to_string()))?;

    // SAFETY: the worker is single-threaded at this point.
    unsafe {
        env::set_var("HOME", user.dir);
        env::set_var("USER", &user.name);
        env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: the worker is single-threaded and owns its environment.
        unsafe {
            match value {
                Some(secret) => env::set_var(key, secret.expose()),
                None => env::remove_var(key),
            }
        }
    }
}
