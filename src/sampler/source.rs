//! Access to the raw per-process attribute source.

use crate::error::{CollectorError, Result};
use crate::sampler::data::Pid;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default mount point of the process table.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Source of process identifiers and per-process attributes.
///
/// Every per-process read may fail with [`io::ErrorKind::NotFound`] (or any
/// other I/O error) when the process exits between enumeration and sampling.
pub trait ProcessDataSource {
    /// List the identifiers of all live processes.
    ///
    /// An error here means the table itself is unreadable, which is
    /// different from an empty table.
    fn list_pids(&self) -> Result<Vec<Pid>>;

    /// Raw invocation arguments, NUL separated.
    fn read_cmdline(&self, pid: Pid) -> io::Result<Vec<u8>>;

    /// The single-line stat record.
    fn read_stat(&self, pid: Pid) -> io::Result<String>;

    /// The `key: value` I/O accounting record.
    fn read_io(&self, pid: Pid) -> io::Result<String>;
}

/// [`ProcessDataSource`] backed by a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcFs {
    /// Create a source reading from the given procfs root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The procfs root this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pid_file(&self, pid: Pid, name: &str) -> PathBuf {
        self.root.join(pid.to_string()).join(name)
    }
}

impl ProcessDataSource for ProcFs {
    fn list_pids(&self) -> Result<Vec<Pid>> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| CollectorError::enumeration_failed(&self.root, e))?;

        let mut pids = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                // Racing with an exiting process
                Err(_) => continue,
            };

            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }

            let name = entry.file_name();
            if let Some(pid) = name.to_str().and_then(|n| n.parse::<Pid>().ok()) {
                pids.push(pid);
            }
        }

        Ok(pids)
    }

    fn read_cmdline(&self, pid: Pid) -> io::Result<Vec<u8>> {
        fs::read(self.pid_file(pid, "cmdline"))
    }

    fn read_stat(&self, pid: Pid) -> io::Result<String> {
        fs::read_to_string(self.pid_file(pid, "stat"))
    }

    fn read_io(&self, pid: Pid) -> io::Result<String> {
        fs::read_to_string(self.pid_file(pid, "io"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    fn scratch_root() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "procio-source-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_list_pids_only_numeric_dirs() {
        let root = scratch_root();
        fs::create_dir(root.join("1")).unwrap();
        fs::create_dir(root.join("4242")).unwrap();
        fs::create_dir(root.join("self")).unwrap();
        fs::create_dir(root.join("sys")).unwrap();
        fs::write(root.join("99"), b"not a dir").unwrap();

        let source = ProcFs::new(&root);
        let mut pids = source.list_pids().unwrap();
        pids.sort();
        assert_eq!(pids, vec![Pid(1), Pid(4242)]);

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_missing_root_is_enumeration_failure() {
        let source = ProcFs::new("/definitely/not/a/proc/root");
        let err = source.list_pids().unwrap_err();
        assert!(matches!(err, CollectorError::EnumerationFailed { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_reads_pid_files() {
        let root = scratch_root();
        let pid_dir = root.join("7");
        fs::create_dir(&pid_dir).unwrap();
        fs::write(pid_dir.join("cmdline"), b"sleep\x0010\x00").unwrap();
        fs::write(pid_dir.join("stat"), "7 (sleep) S 1 7 7 0").unwrap();
        fs::write(pid_dir.join("io"), "rchar: 1\n").unwrap();

        let source = ProcFs::new(&root);
        assert_eq!(source.read_cmdline(Pid(7)).unwrap(), b"sleep\x0010\x00");
        assert!(source.read_stat(Pid(7)).unwrap().starts_with("7 (sleep)"));
        assert_eq!(source.read_io(Pid(7)).unwrap(), "rchar: 1\n");
        assert_eq!(
            source.read_io(Pid(8)).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        fs::remove_dir_all(root).unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_live_proc_contains_self() {
        let source = ProcFs::default();
        let pids = source.list_pids().unwrap();
        assert!(pids.contains(&Pid(std::process::id())));
    }
}
