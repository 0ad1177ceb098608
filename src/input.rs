use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

/// One thing to search
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Read the whole source into memory
    pub fn read(&self) -> io::Result<Vec<u8>> {
        match *self {
            Source::Stdin => {
                let mut buf = Vec::new();
                io::stdin().lock().read_to_end(&mut buf)?;
                Ok(buf)
            }
            Source::File(ref path) => fs::read(path),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Source::Stdin => write!(f, "(standard input)"),
            Source::File(ref path) => write!(f, "{}", path.display()),
        }
    }
}

/// The sources named on the command line, with directories expanded
#[derive(Debug)]
pub struct Inputs {
    pub sources: Vec<Source>,
    /// Some source came from walking a directory
    pub walked: bool,
}

impl Inputs {
    /// Resolve command line paths into sources.
    ///
    /// No paths means stdin, or the current directory under `-r`. A path of
    /// `-` is stdin. Missing paths, and directories without `recursive`, are
    /// errors.
    pub fn collect(paths: &[PathBuf], recursive: bool) -> anyhow::Result<Inputs> {
        let mut inputs = Inputs {
            sources: Vec::new(),
            walked: false,
        };

        if paths.is_empty() {
            if recursive {
                inputs.walked = true;
                let mut found = Vec::new();
                walk(Path::new("."), &mut found).context("failed to walk the current directory")?;
                inputs.sources.extend(found.into_iter().map(|path| {
                    Source::File(path.strip_prefix(".").map(Path::to_path_buf).unwrap_or(path))
                }));
            } else {
                inputs.sources.push(Source::Stdin);
            }
            return Ok(inputs);
        }

        for path in paths {
            if path.as_os_str() == "-" {
                inputs.sources.push(Source::Stdin);
                continue;
            }
            let metadata = fs::metadata(path).with_context(|| format!("{}", path.display()))?;
            if !metadata.is_dir() {
                inputs.sources.push(Source::File(path.clone()));
            } else if recursive {
                inputs.walked = true;
                let mut found = Vec::new();
                walk(path, &mut found).with_context(|| format!("failed to walk {}", path.display()))?;
                inputs.sources.extend(found.into_iter().map(Source::File));
            } else {
                bail!("{}: is a directory", path.display());
            }
        }

        Ok(inputs)
    }
}

/// Push every regular file under `dir`, visiting entries in sorted order.
/// Symbolic links are not followed.
fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push((entry.path(), entry.file_type()?));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in entries {
        if file_type.is_dir() {
            walk(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// Split `haystack` into lines on `\n`.
///
/// The terminator is not included, and a final terminator does not start an
/// extra empty line.
pub fn lines(haystack: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    let mut start = 0;
    let mut ends = memchr::memchr_iter(b'\n', haystack);

    std::iter::from_fn(move || {
        if let Some(end) = ends.next() {
            let line = &haystack[start..end];
            start = end + 1;
            Some(line)
        } else if start < haystack.len() {
            let line = &haystack[start..];
            start = haystack.len();
            Some(line)
        } else {
            None
        }
    })
}
