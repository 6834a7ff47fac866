use crate::stages::stage0_sanitize::default_noise_phrases;

/// Configuration for action item extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// A segment must contain at least one of these to become an item
    pub action_keywords: Vec<String>,
    /// Segments containing any of these are discarded outright
    pub noise_phrases: Vec<String>,
    /// Minimum segment length in characters
    pub min_segment_chars: usize,
    /// Maximum segment length in characters
    pub max_segment_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            action_keywords: [
                "確認",
                "照合",
                "二重",
                "固定",
                "緩める",
                "実施",
                "記録",
                "徹底",
                "維持",
                "変更",
                "抜針",
                "駆血帯",
                "止血",
                "部位",
                "選択",
                "アセスメント",
                "把握",
                "指示",
                "遵守",
                "識別",
                "注意",
                "カウント",
                "測定",
                "比較",
                "観察",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
            noise_phrases: default_noise_phrases(),
            min_segment_chars: 5,
            max_segment_chars: 100,
        }
    }
}

/// Mine remediation text for candidate checklist action strings.
///
/// Splits on sentence punctuation and line breaks, keeps segments of
/// reasonable length that carry an action keyword and no noise phrase, and
/// strips list markers and trailing punctuation. Encounter order is kept and
/// duplicates are not removed here; the builder deduplicates per category.
pub fn extract_action_items(prevention_text: &str, config: &ExtractorConfig) -> Vec<String> {
    let mut actions = Vec::new();

    for segment in prevention_text.split(['。', '\n']) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let length = segment.chars().count();
        if length < config.min_segment_chars || length > config.max_segment_chars {
            continue;
        }
        if config.noise_phrases.iter().any(|noise| segment.contains(noise.as_str())) {
            continue;
        }
        if !config.action_keywords.iter().any(|word| segment.contains(word.as_str())) {
            continue;
        }

        let cleaned = segment
            .strip_suffix('、')
            .or_else(|| segment.strip_suffix('。'))
            .unwrap_or(segment);
        let cleaned = cleaned
            .trim_start_matches(|c: char| {
                c == '-' || c == '.' || c == '・' || c.is_ascii_digit() || c.is_whitespace()
            })
            .trim();
        actions.push(cleaned.to_string());
    }

    actions
}
