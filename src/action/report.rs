use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Which operation produced a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Single image download.
    Download,
    /// Vertical stitch.
    Stitch,
    /// Animated GIF.
    Gif,
}

/// Summary of one successful operation.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationReport {
    /// Operation that ran.
    pub kind: ActionKind,
    /// Final output path.
    pub output: PathBuf,
    /// Images that made it into the output.
    pub frames: usize,
    /// Sources or frames that were skipped after a failure.
    pub skipped: usize,
    /// Output size in bytes.
    pub bytes: u64,
    /// Wall time of the whole operation.
    pub elapsed: Duration,
}

impl fmt::Display for OperationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        let out = self.output.display();
        match self.kind {
            ActionKind::Download => {
                write!(f, "downloaded '{out}' ({} bytes) in {secs:.2}s", self.bytes)
            }
            ActionKind::Stitch => write!(
                f,
                "stitched {} image(s) into '{out}' ({} bytes) in {secs:.2}s",
                self.frames, self.bytes
            ),
            ActionKind::Gif => write!(
                f,
                "created gif '{out}' from {} frame(s) ({} bytes) in {secs:.2}s",
                self.frames, self.bytes
            ),
        }?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}
