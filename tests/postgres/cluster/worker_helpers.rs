//! Discovery and preparation of the `pg_worker` binary for root runs.

use super::BoxError;
use super::fs_utils::open_parent_dir;
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use cap_std::fs::{Permissions, PermissionsExt};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::sync::{Mutex, OnceLock};

const WORKER_NAME: &str = "pg_worker";

static WORKER_CACHE: OnceLock<Mutex<HashMap<Utf8PathBuf, Utf8PathBuf>>> = OnceLock::new();

/// Finds the worker binary.
///
/// Looks at `CARGO_BIN_EXE_pg_worker` at run time, then at build time, then
/// beside the test executable's target directory, then on `PATH`.
pub(super) fn locate_pg_worker_path() -> Option<Utf8PathBuf> {
    std::env::var("CARGO_BIN_EXE_pg_worker")
        .ok()
        .or_else(|| option_env!("CARGO_BIN_EXE_pg_worker").map(str::to_owned))
        .map(Utf8PathBuf::from)
        .filter(|path| path.is_file())
        .or_else(worker_beside_test_binary)
        .or_else(worker_on_path)
}

fn worker_beside_test_binary() -> Option<Utf8PathBuf> {
    let exe = Utf8PathBuf::try_from(std::env::current_exe().ok()?).ok()?;
    // Test binaries live in target/<profile>/deps.
    let profile_dir = exe.parent()?.parent()?;
    Some(profile_dir.join(WORKER_NAME)).filter(|path| path.is_file())
}

fn worker_on_path() -> Option<Utf8PathBuf> {
    let path = std::env::var("PATH").ok()?;
    std::env::split_paths(&path)
        .filter_map(|dir| Utf8PathBuf::try_from(dir).ok())
        .map(|dir| dir.join(WORKER_NAME))
        .find(|candidate| candidate.is_file())
}

/// Copies the worker to the temp directory behind a `runuser` wrapper.
///
/// Build output is often unreadable to `nobody`, so the copy and its
/// wrapper are made world-executable. Repeated calls for the same source
/// reuse the first copy.
pub(super) fn prepare_pg_worker(worker: &Utf8Path) -> Result<Utf8PathBuf, BoxError> {
    let key = worker.to_path_buf();
    let cache = WORKER_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut prepared = cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(path) = prepared.get(&key) {
        return Ok(path.clone());
    }

    let temp_dir = Utf8PathBuf::try_from(std::env::temp_dir())?;
    let mut hasher = DefaultHasher::new();
    key.as_str().hash(&mut hasher);
    let wrapper_path = temp_dir.join(format!(
        "{WORKER_NAME}_{pid}_{hash:x}",
        pid = std::process::id(),
        hash = hasher.finish(),
    ));
    let binary_path = wrapper_path.with_extension("bin");

    let (source_dir, source_name) = open_parent_dir(worker)?;
    let (wrapper_dir, wrapper_name) = open_parent_dir(&wrapper_path)?;
    let (binary_dir, binary_name) = open_parent_dir(&binary_path)?;
    for (dir, name) in [(&wrapper_dir, wrapper_name), (&binary_dir, binary_name)] {
        match dir.remove_file(name) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }

    source_dir.copy(source_name, &binary_dir, binary_name)?;
    let mut wrapper = wrapper_dir.create(wrapper_name)?;
    wrapper.write_all(wrapper_script(&binary_path).as_bytes())?;
    drop(wrapper);

    #[cfg(unix)]
    {
        wrapper_dir.set_permissions(wrapper_name, Permissions::from_mode(0o755))?;
        binary_dir.set_permissions(binary_name, Permissions::from_mode(0o755))?;
    }

    prepared.insert(key, wrapper_path.clone());
    Ok(wrapper_path)
}

fn wrapper_script(binary: &Utf8Path) -> String {
    format!(
        concat!(
            "#!/bin/sh\n",
            "if [ \"$(id -u)\" -eq 0 ]; then\n",
            "  exec /usr/sbin/runuser -u nobody -- '{worker}' \"$@\"\n",
            "fi\n",
            "exec '{worker}' \"$@\"\n",
        ),
        worker = binary.as_str()
    )
}

#[cfg(test)]
mod tests {
    //! Tests for `pg_worker` discovery and preparation.

    use super::{locate_pg_worker_path, prepare_pg_worker, wrapper_script};
    use crate::test_helpers::EnvVarGuard;
    use camino::{Utf8Path, Utf8PathBuf};
    use cap_std::ambient_authority;
    use cap_std::fs_utf8::Dir;
    use std::ffi::OsString;
    use std::io::Write;

    fn temp_dir(prefix: &str) -> Result<Utf8PathBuf, Box<dyn std::error::Error>> {
        let base = Utf8PathBuf::try_from(std::env::temp_dir())?;
        let name = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
        Dir::open_ambient_dir(&base, ambient_authority())?.create_dir(&name)?;
        Ok(base.join(name))
    }

    fn write_worker(dir: &Utf8Path) -> Result<Utf8PathBuf, Box<dyn std::error::Error>> {
        let mut file = Dir::open_ambient_dir(dir, ambient_authority())?.create("pg_worker")?;
        file.write_all(b"#!/bin/sh\nexit 0\n")?;
        Ok(dir.join("pg_worker"))
    }

    #[test]
    fn cargo_variable_wins_over_path() -> Result<(), Box<dyn std::error::Error>> {
        let cargo_dir = temp_dir("pg_worker_cargo")?;
        let cargo_worker = write_worker(&cargo_dir)?;
        let path_dir = temp_dir("pg_worker_path")?;
        write_worker(&path_dir)?;

        let guard = EnvVarGuard::set_many(&[
            (
                OsString::from("CARGO_BIN_EXE_pg_worker"),
                Some(OsString::from(cargo_worker.as_str())),
            ),
            (OsString::from("PATH"), Some(OsString::from(path_dir.as_str()))),
        ]);
        let located = locate_pg_worker_path();
        drop(guard);

        assert_eq!(located, Some(cargo_worker));
        Ok(())
    }

    #[test]
    fn preparation_is_cached_and_executable() -> Result<(), Box<dyn std::error::Error>> {
        let source = write_worker(&temp_dir("pg_worker_source")?)?;

        let first = prepare_pg_worker(&source).map_err(|e| e as Box<dyn std::error::Error>)?;
        let second = prepare_pg_worker(&source).map_err(|e| e as Box<dyn std::error::Error>)?;

        assert_eq!(first, second);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(first.as_std_path())?.permissions().mode();
            assert_ne!(mode & 0o111, 0, "wrapper must be executable, mode {mode:o}");
        }
        Ok(())
    }

    #[test]
    fn wrapper_drops_to_nobody_when_root() {
        let script = wrapper_script(Utf8Path::new("/tmp/pg_worker_1.bin"));

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("runuser -u nobody -- '/tmp/pg_worker_1.bin'"));
    }
}
