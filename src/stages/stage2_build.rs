use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::heuristics::{classify_procedure, extract_action_items};
use crate::models::{
    Category, ChecklistDocument, IncidentRecord, DERIVED_BULLET, REFERENCE_HEADER_PREFIX,
    SECTION_HEADER_PREFIX, STANDARD_BULLET,
};
use crate::pipeline::PipelineConfig;
use crate::stages::stage0_sanitize::is_garbled;

/// Result of a checklist build
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Formatted checklist block per category label
    pub document: ChecklistDocument,
    /// Records considered, including garbled ones
    pub total_records: usize,
    /// Records that passed the garbled-description gate
    pub accepted_records: usize,
}

/// Build the full checklist document from the dataset.
///
/// Records with a garbled description are excluded before classification.
/// The category of every surviving record is recomputed from its description;
/// the stored `incident_type` is never trusted here. The whole document is
/// regenerated on every call, so two builds over the same records are
/// byte-identical.
pub fn build_checklists(records: &[IncidentRecord], config: &PipelineConfig) -> BuildResult {
    let accepted: Vec<&IncidentRecord> = records
        .iter()
        .filter(|r| !is_garbled(&r.description, &config.normalizer))
        .collect();

    let mut causes: HashMap<Category, Vec<String>> = HashMap::new();
    let mut derived: HashMap<Category, Vec<String>> = HashMap::new();

    for record in &accepted {
        let category = classify_procedure(&record.description, &config.classifier);

        let cause = record.cause.trim();
        if !cause.is_empty() {
            causes.entry(category).or_default().push(cause.to_string());
        }
        if !record.prevention.is_empty() {
            derived
                .entry(category)
                .or_default()
                .extend(extract_action_items(&record.prevention, &config.extractor));
        }
    }

    // All categories with standard items plus the catch-all, in code-point
    // order of their labels
    let mut categories: Vec<Category> = config
        .standard_items
        .categories()
        .chain(std::iter::once(Category::Other))
        .collect();
    categories.sort_by_key(|c| c.label());

    let mut document = ChecklistDocument::new();

    for category in categories {
        let mut lines: Vec<String> = Vec::new();

        // 1. Standard section, unconditional whenever standard items exist
        let standard_items = config.standard_items.get(category);
        if !standard_items.is_empty() {
            lines.push(format!(
                "{SECTION_HEADER_PREFIX}【標準安全手順（{}）】",
                category.label()
            ));
            for item in standard_items {
                lines.push(format!("{STANDARD_BULLET}{item}"));
            }
        }

        // 2. Items mined from past incidents: deduplicated, sorted, minus
        // anything identical to a standard item
        let unique_actions: BTreeSet<String> = derived
            .remove(&category)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let additional: Vec<String> = unique_actions
            .into_iter()
            .filter(|a| !standard_items.contains(a))
            .collect();
        if !additional.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("{SECTION_HEADER_PREFIX}【過去の事例に学ぶ追加チェック】"));
            for item in additional {
                lines.push(format!("{DERIVED_BULLET}{item}"));
            }
        }

        // 3. Reference list of past causes
        let unique_causes: BTreeSet<String> =
            causes.remove(&category).unwrap_or_default().into_iter().collect();
        if !unique_causes.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("{REFERENCE_HEADER_PREFIX}(参考) 過去の主な原因"));
            for cause in unique_causes {
                lines.push(format!("- {cause}"));
            }
        }

        if lines.is_empty() {
            debug!(category = category.label(), "no sections, omitting category");
        } else {
            document.insert(category.label().to_string(), lines.join("\n"));
        }
    }

    BuildResult {
        document,
        total_records: records.len(),
        accepted_records: accepted.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(description: &str, cause: &str, prevention: &str) -> IncidentRecord {
        IncidentRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            source: "test".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            department: "test".to_string(),
            incident_type: Category::Other,
            description: description.to_string(),
            cause: cause.to_string(),
            prevention: prevention.to_string(),
            impact: "不明".to_string(),
        }
    }

    #[test]
    fn test_empty_dataset_renders_standard_sections_only() {
        let config = PipelineConfig::default();
        let result = build_checklists(&[], &config);

        assert_eq!(result.total_records, 0);
        assert_eq!(result.accepted_records, 0);

        // Scenario A: 輸血 holds exactly its five standard items
        let transfusion = &result.document["輸血"];
        let expected = "### 【標準安全手順（輸血）】\n".to_string()
            + &config
                .standard_items
                .get(Category::Transfusion)
                .iter()
                .map(|item| format!("- ✅ {item}"))
                .collect::<Vec<_>>()
                .join("\n");
        assert_eq!(transfusion, &expected);

        // Every category with standard items is present even with no data
        for category in config.standard_items.categories() {
            assert!(result.document.contains_key(category.label()));
        }
        // その他 has no standard items and nothing derivable
        assert!(!result.document.contains_key("その他"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let config = PipelineConfig::default();
        let records = vec![
            record(
                "採血の際に検体ラベルを貼り間違えそうになった",
                "確認不足",
                "採血前に患者の氏名を確認する。念のため記録する。",
            ),
            record("胃カメラの洗浄履歴が不明のまま使用した", "記録の不備", ""),
        ];

        let first = build_checklists(&records, &config);
        let second = build_checklists(&records, &config);
        assert_eq!(first.document, second.document);
    }

    #[test]
    fn test_scenario_b_sections() {
        let config = PipelineConfig::default();
        let records = vec![record(
            "採血の際に検体ラベルを貼り間違えそうになった",
            "確認不足",
            "採血前に患者の氏名を確認する。念のため記録する。",
        )];

        let result = build_checklists(&records, &config);
        assert_eq!(result.accepted_records, 1);

        let block = &result.document["採血"];
        assert!(block.contains("### 【過去の事例に学ぶ追加チェック】"));
        assert!(block.contains("- □ 採血前に患者の氏名を確認する"));
        assert!(block.contains("- □ 念のため記録する"));
        assert!(block.contains("#### (参考) 過去の主な原因"));
        assert!(block.contains("\n- 確認不足"));
    }

    #[test]
    fn test_duplicate_extractions_appear_once() {
        let config = PipelineConfig::default();
        let prevention = "駆血帯は抜針前に緩めることを徹底する。";
        let records = vec![
            record("採血中に駆血帯を外し忘れた", "", prevention),
            record("採血の抜針時に駆血帯が残っていた", "", prevention),
        ];

        let result = build_checklists(&records, &config);
        let block = &result.document["採血"];
        let needle = "- □ 駆血帯は抜針前に緩めることを徹底する";
        assert_eq!(block.matches(needle).count(), 1);
    }

    #[test]
    fn test_derived_item_identical_to_standard_is_dropped() {
        let config = PipelineConfig::default();
        let standard_item = config.standard_items.get(Category::BloodDraw)[0].clone();
        let records = vec![record(
            "採血管の取り扱いを誤った",
            "",
            &format!("{standard_item}。"),
        )];

        let result = build_checklists(&records, &config);
        let block = &result.document["採血"];
        assert!(!block.contains(&format!("- □ {standard_item}")));
    }

    #[test]
    fn test_garbled_record_excluded_from_aggregation() {
        let config = PipelineConfig::default();
        let records = vec![
            record("ЖЖЖЖЖЖЖЖЖЖ", "接続ミス", "接続部の識別表示を確認する。"),
            record("点滴の流量設定を誤った", "設定確認の省略", ""),
        ];

        let result = build_checklists(&records, &config);
        assert_eq!(result.total_records, 2);
        assert_eq!(result.accepted_records, 1);

        // The garbled record's cause and prevention contribute nothing
        let doc_text: String = result.document.values().cloned().collect();
        assert!(!doc_text.contains("接続ミス"));
        assert!(doc_text.contains("設定確認の省略"));
    }

    #[test]
    fn test_causes_sorted_and_deduplicated() {
        let config = PipelineConfig::default();
        let records = vec![
            record("点滴の流量設定を誤った", "疲労", ""),
            record("輸液ポンプの単位を読み違えた", "思い込み", ""),
            record("点滴ルートの接続を誤った", "疲労", ""),
        ];

        let result = build_checklists(&records, &config);
        let block = &result.document["点滴・薬剤"];
        let causes_at = block.find("#### (参考) 過去の主な原因").unwrap();
        let tail = &block[causes_at..];
        assert_eq!(tail.matches("- 疲労").count(), 1);
        // BTreeSet ordering: 思い込み sorts before 疲労 by code point
        assert!(tail.find("- 思い込み").unwrap() < tail.find("- 疲労").unwrap());
    }
}
