//! Pipeline Driver
//!
//! For each split, in order (train, then test):
//! 1. `<split>_ssh_raw.json` → simulated labels → `<split>_ssh_raw.csv`
//! 2. `<split>_ssh_ai.json` read leniently
//! 3. detection events correlated against the CSV, written back in place

use crate::config::{Config, SplitPaths};
use crate::constants::SPLITS;
use crate::error::LabelResult;
use crate::logic::dataset::{self, export, LabelStats};
use crate::logic::labeling::{CorrelationStats, Correlator, DetectionEvent, SimulatedAttackLabeler};

/// What happened to one split
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub split: String,
    pub simulated: LabelStats,
    pub detected: CorrelationStats,
    /// Final label counts of the written CSV
    pub final_stats: LabelStats,
}

pub struct Pipeline {
    config: Config,
    simulated: SimulatedAttackLabeler,
    correlator: Correlator,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            simulated: SimulatedAttackLabeler::from_config(&config),
            correlator: Correlator::from_config(&config),
            config,
        }
    }

    /// Run every split, stopping at the first fatal error
    pub fn run(&self) -> LabelResult<Vec<SplitReport>> {
        let mut reports = Vec::with_capacity(SPLITS.len());
        for split in SPLITS {
            let paths = self.config.split_paths(split);
            reports.push(self.run_split(&paths)?);
        }
        Ok(reports)
    }

    pub fn run_split(&self, paths: &SplitPaths) -> LabelResult<SplitReport> {
        log::info!("Labeling {} split", paths.name);

        let simulated = self.simulated.label_file(&paths.raw_json, &paths.raw_csv)?;

        let mut events: Vec<DetectionEvent> = dataset::read_jsonl_lenient(&paths.events_json)?
            .into_iter()
            .map(DetectionEvent::new)
            .collect();
        log::info!("Loaded {} detection events from {:?}", events.len(), paths.events_json);

        let detected = self
            .correlator
            .label_file(&mut events, &paths.raw_csv, &paths.raw_csv)?;

        if self.config.export_events_csv {
            let values: Vec<_> = events.into_iter().map(DetectionEvent::into_value).collect();
            export::values_to_csv(&values, &paths.events_csv)?;
        }

        let final_stats = detected.labels;
        log::info!(
            "{} split done: {} of {} flows labeled as attack",
            paths.name,
            final_stats.positive,
            final_stats.total
        );

        Ok(SplitReport {
            split: paths.name.clone(),
            simulated,
            detected,
            final_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ATTACKER_FINGERPRINT, VICTIM_FINGERPRINT};
    use crate::logic::dataset::{read_csv, Label};
    use crate::logic::fingerprint::fingerprint;
    use crate::error::LabelError;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_lines(path: &Path, lines: &[serde_json::Value]) {
        let body: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        fs::write(path, body.join("\n") + "\n").unwrap();
    }

    fn seed_split(dir: &Path, split: &str) {
        let paths = SplitPaths::new(dir, split);
        write_lines(
            &paths.raw_json,
            &[
                json!({"@timestamp": "2024-03-01T09:00:00", "source_ip": ATTACKER_FINGERPRINT, "dest_ip": VICTIM_FINGERPRINT, "bytes": 120}),
                json!({"@timestamp": "2024-03-01T10:01:00", "source_ip": fingerprint("1.2.3.4"), "dest_ip": fingerprint("10.0.0.1"), "bytes": 80}),
                json!({"@timestamp": "2024-03-01T10:30:00", "source_ip": fingerprint("1.2.3.4"), "dest_ip": fingerprint("10.0.0.1"), "bytes": 60}),
                json!({"@timestamp": "2024-03-01T10:02:00", "source_ip": fingerprint("5.5.5.5"), "dest_ip": fingerprint("10.0.0.1"), "bytes": 40}),
            ],
        );
        fs::write(
            &paths.events_json,
            format!(
                "{}\nnot json at all\n",
                json!({
                    "event": {"start": ["2024-03-01T10:00:00+0000"], "end": ["2024-03-01T10:05:00+0000"]},
                    "related": {"ip": ["1.2.3.4"]},
                    "message": "SSH brute force"
                })
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_pipeline_labels_both_splits() {
        let temp_dir = TempDir::new().unwrap();
        seed_split(temp_dir.path(), "train");
        seed_split(temp_dir.path(), "test");

        let config = Config { data_dir: temp_dir.path().to_path_buf(), ..Config::default() };
        let reports = Pipeline::new(config).run().unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].split, "train");
        assert_eq!(reports[1].split, "test");

        for report in &reports {
            assert_eq!(report.simulated.positive, 1);
            assert_eq!(report.detected.promoted, 1);
            assert_eq!(report.final_stats.positive, 2);
            assert_eq!(report.final_stats.unlabeled, 0);
        }

        let table = read_csv(&temp_dir.path().join("train_ssh_raw.csv")).unwrap();
        let labels: Vec<Label> = table.records().iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![Label::Positive, Label::Positive, Label::Negative, Label::Negative]);
        assert_eq!(table.columns(), ["@timestamp", "source_ip", "dest_ip", "bytes"]);
    }

    #[test]
    fn test_pipeline_exports_events_when_enabled() {
        let temp_dir = TempDir::new().unwrap();
        seed_split(temp_dir.path(), "train");

        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            export_events_csv: true,
            ..Config::default()
        };
        let paths = config.split_paths("train");
        Pipeline::new(config).run_split(&paths).unwrap();

        let content = fs::read_to_string(&paths.events_csv).unwrap();
        assert_eq!(content.lines().count(), 2); // header + 1 event
        assert!(content.lines().next().unwrap().starts_with("event,related,message"));
    }

    #[test]
    fn test_pipeline_missing_raw_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config { data_dir: temp_dir.path().to_path_buf(), ..Config::default() };

        let result = Pipeline::new(config).run();
        assert!(matches!(result, Err(LabelError::Io { .. })));
    }
}
