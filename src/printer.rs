use std::io::{self, IsTerminal, Write};

use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};
use thompson_nfa::Match;

use crate::args::ColorWhen;

/// Resolve `--color` against where stdout goes
pub fn color_choice(when: ColorWhen) -> ColorChoice {
    match when {
        ColorWhen::Never => ColorChoice::Never,
        ColorWhen::Always => ColorChoice::Always,
        // termcolor's Auto still honors TERM=dumb and NO_COLOR.
        ColorWhen::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
        ColorWhen::Auto => ColorChoice::Never,
    }
}

/// Writes matching lines, or just their matches under `-o`
pub struct Printer {
    writer: BufferWriter,
    buf: Buffer,
    only_matching: bool,
    with_path: bool,
    path_spec: ColorSpec,
    separator_spec: ColorSpec,
    match_spec: ColorSpec,
}

impl Printer {
    pub fn new(choice: ColorChoice, only_matching: bool, with_path: bool) -> Self {
        let writer = BufferWriter::stdout(choice);
        let buf = writer.buffer();

        let mut path_spec = ColorSpec::new();
        path_spec.set_fg(Some(Color::Magenta));
        let mut separator_spec = ColorSpec::new();
        separator_spec.set_fg(Some(Color::Cyan));
        let mut match_spec = ColorSpec::new();
        match_spec.set_fg(Some(Color::Red)).set_bold(true);

        Printer {
            writer,
            buf,
            only_matching,
            with_path,
            path_spec,
            separator_spec,
            match_spec,
        }
    }

    /// True if output needs match spans rather than a yes/no per line
    pub fn wants_spans(&self) -> bool {
        self.only_matching || self.buf.supports_color()
    }

    /// Print one matching line. `matches` may be empty when spans were not
    /// needed, see [`Printer::wants_spans`].
    pub fn print(&mut self, label: &str, line: &[char], matches: &[Match]) -> io::Result<()> {
        if self.only_matching {
            for m in matches.iter().filter(|m| !m.is_empty()) {
                self.prefix(label)?;
                self.colored(&line[m.range()], true)?;
                writeln!(self.buf)?;
            }
        } else {
            self.prefix(label)?;
            let mut at = 0;
            for m in matches {
                self.colored(&line[at..m.start], false)?;
                self.colored(&line[m.range()], true)?;
                at = m.end();
            }
            self.colored(&line[at..], false)?;
            writeln!(self.buf)?;
        }
        self.flush_if_large()
    }

    /// Write everything buffered so far
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.print(&self.buf)?;
        self.buf.clear();
        Ok(())
    }

    fn flush_if_large(&mut self) -> io::Result<()> {
        if self.buf.as_slice().len() >= 64 * 1024 {
            self.flush()?;
        }
        Ok(())
    }

    fn prefix(&mut self, label: &str) -> io::Result<()> {
        if !self.with_path {
            return Ok(());
        }
        self.buf.set_color(&self.path_spec)?;
        write!(self.buf, "{}", label)?;
        self.buf.set_color(&self.separator_spec)?;
        write!(self.buf, ":")?;
        self.buf.reset()
    }

    fn colored(&mut self, text: &[char], highlight: bool) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let text: String = text.iter().collect();
        if highlight {
            self.buf.set_color(&self.match_spec)?;
            write!(self.buf, "{}", text)?;
            self.buf.reset()
        } else {
            write!(self.buf, "{}", text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn output(printer: &Printer) -> String {
        String::from_utf8_lossy(printer.buf.as_slice()).into_owned()
    }

    #[test]
    fn test_whole_line_plain() {
        let mut printer = Printer::new(ColorChoice::Never, false, false);
        printer.print("-", &chars("hello"), &[]).unwrap();
        printer.print("-", &chars("world"), &[Match::new(1, 2)]).unwrap();
        assert_eq!(output(&printer), "hello\nworld\n");
        assert!(!printer.wants_spans());
    }

    #[test]
    fn test_only_matching_skips_empty_spans() {
        let mut printer = Printer::new(ColorChoice::Never, true, false);
        let line = chars("a1b22");
        let matches = [Match::new(0, 0), Match::new(1, 1), Match::new(3, 2)];
        printer.print("-", &line, &matches).unwrap();
        assert_eq!(output(&printer), "1\n22\n");
        assert!(printer.wants_spans());
    }

    #[test]
    fn test_path_prefix() {
        let mut printer = Printer::new(ColorChoice::Never, true, true);
        printer.print("notes.txt", &chars("abc"), &[Match::new(1, 1)]).unwrap();
        assert_eq!(output(&printer), "notes.txt:b\n");
    }

    #[test]
    fn test_highlighting_wraps_matches() {
        let mut printer = Printer::new(ColorChoice::Always, false, false);
        assert!(printer.wants_spans());
        printer.print("-", &chars("xaby"), &[Match::new(1, 2)]).unwrap();
        let out = output(&printer);
        assert!(out.starts_with('x'));
        assert!(out.contains("\x1b["));
        assert!(out.contains("ab"));
        assert!(out.ends_with("y\n"));
    }
}
