//! Statistics collection and export for a board session.
//!
//! [`BoardStats`] is updated by the board as it schedules, applies and drops
//! events. It can be exported as JSON, CSV or a human-readable summary.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::types::SimTime;

/// Counters for one board session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStats {
    /// Simulation time at the last update
    pub final_time: SimTime,

    /// Scheduler steps executed
    pub steps_executed: u64,

    /// Events inserted into the queue
    pub events_scheduled: u64,

    /// Events applied to a live pin
    pub events_applied: u64,

    /// Events discarded because their pin was removed
    pub events_dropped: u64,

    /// Transfer-function evaluations
    pub operations: u64,

    /// Largest queue size observed
    pub peak_queue_size: usize,
}

impl BoardStats {
    /// Creates a new empty statistics container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new queue size, keeping the peak.
    pub fn observe_queue(&mut self, len: usize) {
        self.peak_queue_size = self.peak_queue_size.max(len);
    }

    /// Exports statistics to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Exports statistics to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Exports statistics to CSV.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("metric,value\n");
        csv.push_str(&format!("final_time,{}\n", self.final_time));
        csv.push_str(&format!("steps_executed,{}\n", self.steps_executed));
        csv.push_str(&format!("events_scheduled,{}\n", self.events_scheduled));
        csv.push_str(&format!("events_applied,{}\n", self.events_applied));
        csv.push_str(&format!("events_dropped,{}\n", self.events_dropped));
        csv.push_str(&format!("operations,{}\n", self.operations));
        csv.push_str(&format!("peak_queue_size,{}\n", self.peak_queue_size));

        csv
    }

    /// Exports statistics to a CSV file.
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.to_csv())
    }

    /// Writes a human-readable summary to a writer.
    pub fn write_summary<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        writeln!(w, "=== Board Statistics ===")?;
        writeln!(w)?;
        writeln!(w, "Final simulation time: {}", self.final_time)?;
        writeln!(w, "Steps executed: {}", self.steps_executed)?;
        writeln!(w, "Operations: {}", self.operations)?;
        writeln!(w)?;

        writeln!(w, "--- Events ---")?;
        writeln!(w, "Scheduled: {}", self.events_scheduled)?;
        writeln!(w, "Applied: {}", self.events_applied)?;
        writeln!(w, "Dropped: {}", self.events_dropped)?;
        writeln!(w, "Peak queue size: {}", self.peak_queue_size)?;

        Ok(())
    }

    /// Returns the summary as a string.
    pub fn summary(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_summary(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_json_export() {
        let stats = BoardStats {
            final_time: 1000,
            steps_executed: 100,
            ..BoardStats::default()
        };

        let json = stats.to_json().unwrap();
        assert!(json.contains("\"final_time\": 1000"));
        assert!(json.contains("\"steps_executed\": 100"));
    }

    #[test]
    fn test_stats_csv_export() {
        let stats = BoardStats {
            events_applied: 500,
            events_dropped: 2,
            ..BoardStats::default()
        };

        let csv = stats.to_csv();
        assert!(csv.starts_with("metric,value\n"));
        assert!(csv.contains("events_applied,500"));
        assert!(csv.contains("events_dropped,2"));
    }

    #[test]
    fn test_peak_queue_size() {
        let mut stats = BoardStats::new();
        stats.observe_queue(3);
        stats.observe_queue(7);
        stats.observe_queue(1);
        assert_eq!(stats.peak_queue_size, 7);
    }

    #[test]
    fn test_summary_output() {
        let stats = BoardStats {
            final_time: 42,
            operations: 9,
            ..BoardStats::default()
        };

        let summary = stats.summary();
        assert!(summary.contains("Final simulation time: 42"));
        assert!(summary.contains("Operations: 9"));
    }

    #[test]
    fn test_file_exports() {
        let dir = tempfile::tempdir().unwrap();
        let stats = BoardStats::new();

        let json_path = dir.path().join("stats.json");
        stats.to_json_file(&json_path).unwrap();
        let restored: BoardStats =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(restored, stats);

        let csv_path = dir.path().join("stats.csv");
        stats.to_csv_file(&csv_path).unwrap();
        assert!(std::fs::read_to_string(&csv_path).unwrap().contains("operations,0"));
    }
}
