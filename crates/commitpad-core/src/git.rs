//! Commit operation backed by the git command line

use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use commitpad_session::{CoAuthor, CommitOperation, Draft};

/// Runs `git commit -F -` in a working directory, feeding the rendered
/// message on stdin.
pub struct GitCommitOperation {
    program: String,
    workdir: PathBuf,
    co_authors: RwLock<Vec<CoAuthor>>,
}

impl GitCommitOperation {
    pub fn new(program: impl Into<String>, workdir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.as_ref().to_path_buf(),
            co_authors: RwLock::new(Vec::new()),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Co-authors appended as trailers to every commit made from now on
    pub fn set_co_authors(&self, co_authors: Vec<CoAuthor>) {
        *self.co_authors.write() = co_authors;
    }

    pub fn co_authors(&self) -> Vec<CoAuthor> {
        self.co_authors.read().clone()
    }

    async fn run(&self, message: &str) -> std::io::Result<bool> {
        let mut child = Command::new(&self.program)
            .current_dir(&self.workdir)
            .args(["commit", "-F", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(message.as_bytes()).await?;
            // dropping stdin closes the pipe so git sees EOF
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                workdir = %self.workdir.display(),
                status = ?output.status.code(),
                stderr = %stderr.trim(),
                "git commit failed"
            );
        }

        Ok(output.status.success())
    }
}

#[async_trait]
impl CommitOperation for GitCommitOperation {
    async fn create(&self, draft: &Draft) -> bool {
        let message = {
            let co_authors = self.co_authors.read();
            draft.commit_message(&co_authors)
        };

        match self.run(&message).await {
            Ok(success) => success,
            Err(e) => {
                tracing::warn!(
                    program = %self.program,
                    workdir = %self.workdir.display(),
                    "Failed to run git commit: {}",
                    e
                );
                false
            }
        }
    }
}
