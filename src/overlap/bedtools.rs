use crate::error::{Error, Result};
use crate::genome::SampledRegion;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Runs `bedtools intersect` against a reference feature file for one
/// region at a time.
///
/// Each query gets its own uniquely named temporary file that is removed on
/// every exit path, so concurrent calls never collide.
#[derive(Debug, Clone)]
pub struct BedtoolsRunner {
    executable: PathBuf,
    features_path: PathBuf,
    timeout: Duration,
}

impl BedtoolsRunner {
    pub fn new(executable: impl Into<PathBuf>, features_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            features_path: features_path.into(),
            timeout,
        }
    }

    /// Intersects `region` with the feature file and returns the raw
    /// `-wb` output lines in bedtools order.
    pub fn find_overlaps(&self, region: &SampledRegion) -> Result<Vec<String>> {
        let query = self.write_query(region)?;

        let mut child = Command::new(&self.executable)
            .arg("intersect")
            .arg("-a")
            .arg(query.path())
            .arg("-b")
            .arg(&self.features_path)
            .arg("-wb")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::ExternalEngineFailure(format!(
                    "could not start {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        let stdout = child.stdout.take().expect("stdout is piped");
        let stderr = child.stderr.take().expect("stderr is piped");

        let (sender, receiver) = bounded(1);
        let reader_thread = thread::spawn(move || {
            let lines: std::io::Result<Vec<String>> = BufReader::new(stdout).lines().collect();
            let mut err_text = String::new();
            let _ = BufReader::new(stderr).read_to_string(&mut err_text);
            let _ = sender.send((lines, err_text));
        });

        match receiver.recv_timeout(self.timeout) {
            Ok((lines, err_text)) => {
                let status = child
                    .wait()
                    .map_err(|e| Error::io("Waiting for bedtools", e))?;
                let _ = reader_thread.join();
                if !status.success() {
                    return Err(Error::ExternalEngineFailure(format!(
                        "bedtools exited with {} on region {}: {}",
                        status,
                        region,
                        err_text.trim()
                    )));
                }
                lines.map_err(|e| Error::io("Reading bedtools output", e))
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader_thread.join();
                Err(Error::ExternalEngineFailure(format!(
                    "bedtools timed out after {}s on region {}",
                    self.timeout.as_secs(),
                    region
                )))
            }
        }
    }

    fn write_query(&self, region: &SampledRegion) -> Result<NamedTempFile> {
        let mut query =
            NamedTempFile::new().map_err(|e| Error::io("Creating bedtools query file", e))?;
        writeln!(query, "{}", region)
            .and_then(|_| query.flush())
            .map_err(|e| Error::io("Writing bedtools query file", e))?;
        Ok(query)
    }

    pub fn features_path(&self) -> &Path {
        &self.features_path
    }
}
