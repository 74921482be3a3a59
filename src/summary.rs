use std::fmt::{Display, Formatter, Result as FmtResult};
use stockscan_scanner::ScanOutcome;
use stockscan_scanner::error::ErrorKind;

/// Tally of a run over many scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub added: usize,
    pub updated: usize,
    pub duplicates: usize,
    pub rejected: usize,
}
impl Summary {
    pub fn scanned(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::Ignored => {},
            ScanOutcome::Created(_) => self.added += 1,
            ScanOutcome::Updated { .. } => self.updated += 1,
        }
    }

    pub fn failed(&mut self, kind: &ErrorKind) {
        match kind {
            ErrorKind::DuplicateSerial(_) => self.duplicates += 1,
            _ => self.rejected += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.added + self.updated + self.duplicates + self.rejected
    }

    /// Whether any scan changed the table.
    pub fn changed(&self) -> bool {
        self.added + self.updated > 0
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} scans: {} rows added, {} rows updated, {} duplicates, {} rejected",
            self.total(),
            self.added,
            self.updated,
            self.duplicates,
            self.rejected,
        )
    }
}
