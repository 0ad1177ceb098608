// These tests run the kgrep binary and check its output and exit status.
// Engine semantics are covered by the thompson_nfa crate's own tests.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

mod options;

/// The result of one kgrep run
pub struct Run {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for Run {
    fn from(output: Output) -> Run {
        Run {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Run kgrep with `args`, feeding `stdin`, from the directory `cwd`
pub fn kgrep_in(cwd: &Path, args: &[&str], stdin: &str) -> anyhow::Result<Run> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_kgrep"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut pipe) = child.stdin.take() {
        // kgrep may exit before reading stdin, e.g. on a usage error.
        match pipe.write_all(stdin.as_bytes()) {
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => return Err(err.into()),
            _ => {}
        }
    }
    Ok(child.wait_with_output()?.into())
}

pub fn kgrep(args: &[&str], stdin: &str) -> anyhow::Result<Run> {
    kgrep_in(&std::env::temp_dir(), args, stdin)
}

/// A scratch directory that is removed when dropped
pub struct Dir {
    root: PathBuf,
}

impl Dir {
    pub fn new(name: &str) -> anyhow::Result<Dir> {
        let root = std::env::temp_dir().join(format!("kgrep-test-{}-{}", name, std::process::id()));
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Dir { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn create(&self, relative: &str, contents: &str) -> anyhow::Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Drop for Dir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
