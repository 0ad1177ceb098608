use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

pub const USAGE: &str = "usage: kgrep [-o] [-r] [--color[=WHEN]] -E PATTERN [PATH...]";

/// When to color output, as given to `--color`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorWhen {
    Never,
    Always,
    /// Only when stdout is a terminal
    Auto,
}

impl ColorWhen {
    fn parse(value: &str) -> anyhow::Result<ColorWhen> {
        match value {
            "never" => Ok(ColorWhen::Never),
            "always" => Ok(ColorWhen::Always),
            "auto" => Ok(ColorWhen::Auto),
            _ => bail!("invalid --color value {:?} (expected never, always or auto)", value),
        }
    }
}

/// Parsed command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Args {
    pub pattern: String,
    pub only_matching: bool,
    pub recursive: bool,
    pub color: ColorWhen,
    pub paths: Vec<PathBuf>,
}

impl Args {
    pub fn parse() -> anyhow::Result<Args> {
        Args::parse_from(std::env::args_os().skip(1))
    }

    /// Parse arguments, not including the program name.
    ///
    /// Short flags may be bundled (`-or`); when `E` is bundled it must come
    /// last and takes the next argument as the pattern.
    pub fn parse_from<I>(args: I) -> anyhow::Result<Args>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut pattern = None;
        let mut only_matching = false;
        let mut recursive = false;
        let mut color = ColorWhen::Never;
        let mut paths = Vec::new();
        let mut positional_only = false;

        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            let flag = match arg.into_string() {
                Ok(flag) => flag,
                Err(path) => {
                    paths.push(PathBuf::from(path));
                    continue;
                }
            };
            if positional_only || flag == "-" || !flag.starts_with('-') {
                paths.push(PathBuf::from(flag));
                continue;
            }

            match flag.as_str() {
                "--" => positional_only = true,
                "--only-matching" => only_matching = true,
                "--recursive" => recursive = true,
                "--color" | "--colour" => color = ColorWhen::Auto,
                "--extended-regexp" => pattern = Some(next_pattern(&mut it)?),
                _ if flag.starts_with("--color=") || flag.starts_with("--colour=") => {
                    let (_, value) = flag.split_once('=').unwrap_or_default();
                    color = ColorWhen::parse(value)?;
                }
                _ if flag.starts_with("--") => bail!("unrecognized option '{}'\n{}", flag, USAGE),
                _ => {
                    let bundle = &flag[1..];
                    for (i, short) in bundle.char_indices() {
                        match short {
                            'o' => only_matching = true,
                            'r' | 'R' => recursive = true,
                            'E' if i + 1 == bundle.len() => pattern = Some(next_pattern(&mut it)?),
                            'E' => bail!("option -E must come last in '{}'", flag),
                            _ => bail!("invalid option -- '{}'\n{}", short, USAGE),
                        }
                    }
                }
            }
        }

        let pattern = pattern.ok_or_else(|| anyhow!("expected a pattern given with -E\n{}", USAGE))?;
        Ok(Args {
            pattern,
            only_matching,
            recursive,
            color,
            paths,
        })
    }
}

fn next_pattern<I: Iterator<Item = OsString>>(it: &mut I) -> anyhow::Result<String> {
    let value = it.next().context("option -E requires a pattern")?;
    value
        .into_string()
        .map_err(|value| anyhow!("pattern {:?} is not valid UTF-8", value))
}
