use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Category;

/// A single parsed incident report.
///
/// Records are immutable once created: they are appended to the dataset and
/// never edited in place. `incident_type` is advisory only — the checklist
/// builder always reclassifies from `description` at aggregation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Unique identifier for this record (UUID)
    pub record_id: String,
    /// Where the report came from (file path, upload name, manual entry)
    pub source: String,
    /// Date the report was processed
    pub date: NaiveDate,
    /// Reporting department label
    pub department: String,
    /// Category assigned at parse time (advisory, recomputed at build time)
    pub incident_type: Category,
    /// What happened. Never empty: the parser falls back to a prefix of the
    /// whole document when marker extraction fails.
    pub description: String,
    /// Root cause text, empty when the report had no cause section
    pub cause: String,
    /// Remediation text mined for candidate checklist items
    pub prevention: String,
    /// Severity label (fixed to 不明 for parsed documents)
    pub impact: String,
}

/// The ordered, append-only incident dataset.
///
/// `version` increases on every append and keys the checklist cache, so a
/// cached document built for an older version is never served for a newer
/// dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentDataset {
    /// Monotonically increasing dataset version
    pub version: u64,
    /// All records in insertion order
    records: Vec<IncidentRecord>,
}

impl IncidentDataset {
    /// Append a record and bump the dataset version
    pub fn append(&mut self, record: IncidentRecord) {
        self.records.push(record);
        self.version += 1;
    }

    /// All records in insertion order
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(description: &str) -> IncidentRecord {
        IncidentRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            source: "test".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            department: "test".to_string(),
            incident_type: Category::Other,
            description: description.to_string(),
            cause: String::new(),
            prevention: String::new(),
            impact: "不明".to_string(),
        }
    }

    #[test]
    fn test_append_bumps_version() {
        let mut dataset = IncidentDataset::default();
        assert_eq!(dataset.version, 0);
        assert!(dataset.is_empty());

        dataset.append(sample_record("点滴の接続を誤った"));
        dataset.append(sample_record("採血の検体を取り違えた"));

        assert_eq!(dataset.version, 2);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].description, "点滴の接続を誤った");
    }

    #[test]
    fn test_dataset_serde_round_trip() {
        let mut dataset = IncidentDataset::default();
        dataset.append(sample_record("輸血の準備中に製剤を取り違えそうになった"));

        let json = serde_json::to_string_pretty(&dataset).unwrap();
        let back: IncidentDataset = serde_json::from_str(&json).unwrap();

        assert_eq!(back.version, 1);
        assert_eq!(back.records()[0].description, dataset.records()[0].description);
    }
}
