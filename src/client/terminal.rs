use std::io::{BufRead, StdinLock, Stdout, Write};

use super::{Backend, InputOptions, Metadata};
use crate::error::ClientError;

/// Backend for running outside an op container: prompts on a line-based reader,
/// prints to a writer and reports events through the log.
pub struct TerminalBackend<R, W> {
    reader: R,
    writer: W,
}

impl TerminalBackend<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        TerminalBackend::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalBackend<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        TerminalBackend { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Backend for TerminalBackend<R, W> {
    fn track(
        &mut self,
        tags: &[&str],
        event: &str,
        metadata: &Metadata,
    ) -> Result<(), ClientError> {
        let metadata = serde_json::to_string(metadata).unwrap_or_default();
        tracing::info!(target: "howdy_op::track", ?tags, %metadata, "{event}");
        Ok(())
    }

    fn input(
        &mut self,
        _name: &str,
        message: &str,
        options: &InputOptions,
    ) -> Result<String, ClientError> {
        write!(self.writer, "{message} ")?;
        self.writer.flush()?;

        let mut line = String::new();
        // zero bytes read means end of input, handled like an empty answer
        self.reader.read_line(&mut line)?;
        let answer = line.trim_end_matches(&['\r', '\n'][..]);

        match (&options.default_value, answer.is_empty()) {
            (Some(default), true) => Ok(default.clone()),
            _ => Ok(answer.to_owned()),
        }
    }

    fn print(&mut self, text: &str) -> Result<(), ClientError> {
        writeln!(self.writer, "{text}")?;
        self.writer.flush()?;
        Ok(())
    }
}
