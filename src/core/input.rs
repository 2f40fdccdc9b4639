use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Produces search-box submissions, one per Enter press.
#[async_trait]
pub trait SubmitSource: Send {
    /// `None` once the input is closed.
    async fn next_submit(&mut self) -> Result<Option<String>>;
}

pub struct StdinSubmits {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinSubmits {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinSubmits {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmitSource for StdinSubmits {
    async fn next_submit(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

/// Fixed list of submissions, used for `--search` and in tests.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSubmits {
    queue: VecDeque<String>,
}

impl ScriptedSubmits {
    pub fn new<I, S>(submits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: submits.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SubmitSource for ScriptedSubmits {
    async fn next_submit(&mut self) -> Result<Option<String>> {
        Ok(self.queue.pop_front())
    }
}
