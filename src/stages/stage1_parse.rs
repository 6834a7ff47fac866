use chrono::Local;
use uuid::Uuid;

use crate::heuristics::{classify_procedure, ClassifierConfig};
use crate::models::IncidentRecord;

/// Section markers and field caps for report parsing
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Marker opening the incident overview section
    pub overview_marker: String,
    /// Marker opening the root-cause section
    pub cause_marker: String,
    /// Marker opening the countermeasure section
    pub countermeasure_marker: String,
    /// Fallback marker when no countermeasure section exists
    pub prevention_marker: String,
    /// Maximum description length in characters
    pub description_cap: usize,
    /// Maximum cause length in characters
    pub cause_cap: usize,
    /// Maximum prevention length in characters
    pub prevention_cap: usize,
    /// Descriptions shorter than this fall back to a prefix of the whole text
    pub min_description_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            overview_marker: "概要".to_string(),
            cause_marker: "原因".to_string(),
            countermeasure_marker: "対策".to_string(),
            prevention_marker: "再発防止".to_string(),
            description_cap: 200,
            cause_cap: 200,
            prevention_cap: 300,
            min_description_chars: 10,
        }
    }
}

/// Split sanitized report text into a structured incident record.
///
/// Each marker is searched independently and only its first occurrence is
/// used; repeated or out-of-order markers get best-effort truncation, not an
/// error. A missing cause or countermeasure section yields an empty field,
/// and a missing or too-short overview falls back to a prefix of the whole
/// text, so `description` is non-empty whenever the input is.
pub fn parse_report(
    text: &str,
    source: &str,
    department: &str,
    parser: &ParserConfig,
    classifier: &ClassifierConfig,
) -> IncidentRecord {
    let mut description =
        after_marker(text, &parser.overview_marker, parser.description_cap).unwrap_or_default();
    let cause = after_marker(text, &parser.cause_marker, parser.cause_cap).unwrap_or_default();
    let prevention = after_marker(text, &parser.countermeasure_marker, parser.prevention_cap)
        .or_else(|| after_marker(text, &parser.prevention_marker, parser.prevention_cap))
        .unwrap_or_default();

    if description.chars().count() < parser.min_description_chars {
        description = truncate_chars(text, parser.description_cap).to_string();
    }

    let description = clean_field(&description);

    IncidentRecord {
        record_id: Uuid::new_v4().to_string(),
        source: source.to_string(),
        date: Local::now().date_naive(),
        department: department.to_string(),
        incident_type: classify_procedure(&description, classifier),
        description,
        cause: clean_field(&cause),
        prevention: clean_field(&prevention),
        impact: "不明".to_string(),
    }
}

/// Text following the first occurrence of `marker`, capped at `cap` characters
fn after_marker(text: &str, marker: &str, cap: usize) -> Option<String> {
    text.find(marker)
        .map(|idx| truncate_chars(&text[idx + marker.len()..], cap).to_string())
}

/// Prefix of `text` holding at most `max_chars` characters (not bytes)
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn clean_field(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> IncidentRecord {
        parse_report(
            text,
            "report.pdf",
            "PDF解析",
            &ParserConfig::default(),
            &ClassifierConfig::default(),
        )
    }

    #[test]
    fn test_parse_all_sections() {
        let record = parse("概要輸血のポンピング中に製剤を取り違えそうになった 原因照合手順の省略 対策二人での声出し照合を徹底する");
        assert!(record.description.starts_with("輸血のポンピング中に"));
        assert!(record.cause.starts_with("照合手順の省略"));
        assert!(record.prevention.starts_with("二人での声出し照合を徹底する"));
        assert_eq!(record.incident_type.label(), "輸血");
        assert_eq!(record.impact, "不明");
        assert_eq!(record.department, "PDF解析");
    }

    #[test]
    fn test_prevention_marker_fallback() {
        let record = parse("概要点滴のルート接続を誤ってしまった事例 再発防止接続部の識別表示を変更する");
        assert!(record.prevention.starts_with("接続部の識別表示を変更する"));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let record = parse("概要内視鏡のスコープ洗浄が行われていなかった事例");
        assert!(record.cause.is_empty());
        assert!(record.prevention.is_empty());
    }

    #[test]
    fn test_short_description_falls_back_to_prefix() {
        // 概要 is present but followed by fewer than 10 characters
        let text = "この報告書では手術中のガーゼカウント不一致を扱う 概要は簡潔";
        let record = parse(text);
        assert!(record.description.starts_with("この報告書では"));
    }

    #[test]
    fn test_no_overview_marker_uses_prefix() {
        let text = "気管挿管のチューブ固定が不十分で計画外抜管に至った";
        let record = parse(text);
        assert_eq!(record.description, text);
    }

    #[test]
    fn test_caps_are_character_counts() {
        let filler = "あ".repeat(300);
        let record = parse(&format!("概要{filler}"));
        assert_eq!(record.description.chars().count(), 200);

        let record = parse(&format!("対策{filler}概要採血の穿刺部位の選択を誤った事例"));
        assert_eq!(record.prevention.chars().count(), 300);
    }

    #[test]
    fn test_first_marker_occurrence_wins() {
        let record = parse("概要最初の概要説明がここにある 概要二番目の概要は無視される");
        assert!(record.description.starts_with("最初の概要説明が"));
    }
}
