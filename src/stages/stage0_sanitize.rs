use regex::Regex;

/// Configuration for text quality detection and cleanup
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Boilerplate phrases deleted from text and used to discard segments
    pub noise_phrases: Vec<String>,
    /// Texts shorter than this many characters are always garbled
    pub min_chars: usize,
    /// Minimum fraction of allowed-script characters for readable text
    pub min_valid_ratio: f64,
    /// URL-like substrings mark extraction artifacts, not prose
    pub url_pattern: Regex,
    /// Whitespace runs collapsed to a single space during sanitizing
    pub whitespace_run: Regex,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            noise_phrases: default_noise_phrases(),
            min_chars: 5,
            min_valid_ratio: 0.1,
            url_pattern: Regex::new(r"https?://|[a-zA-Z]{3,4}://").unwrap(),
            whitespace_run: Regex::new(r"\s+").unwrap(),
        }
    }
}

/// Boilerplate phrases common in published incident-report PDFs.
///
/// Removal is literal substring deletion, deliberately not word-boundary
/// aware: the short numeric entries can truncate longer tokens, and that
/// behavior is part of the extraction contract.
pub fn default_noise_phrases() -> Vec<String> {
    [
        "再発防止に努める",
        "ご理解いただければ幸い",
        "情報提供と位置づけ",
        "施行されている",
        "再発防止に向けて取り組んでいる姿を",
        "再発防止に資する",
        "情報提供と位置づけております",
        "ヒヤリ・ハット事例収集事業",
        "資料３",
        "全般コード化情報",
        "製造（輸入販売）業者名",
        "定点医療機関一覧",
        "平成",
        "月日現在",
        "定点医療機関とは",
        "事故の内容医療",
        "発生場面",
        "事例の概要",
        "全般コード化",
        "原因分析",
        "再発防止策",
        "実施した医療行為の目的",
        "検討結果",
        "病院名",
        "部門名",
        "職種",
        "性別",
        "年齢",
        "購入年月",
        "1517",
        "16",
        "発生要因",
        "対応と対策",
        "経過と結末",
        "背景要因",
        "別紙",
        "参照",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Decode raw document bytes, dropping invalid sequences.
///
/// Never fails: undecodable input degrades to an empty or garbled string
/// that later gates reject.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != '\u{FFFD}')
        .collect()
}

/// Whether text is likely mojibake or a failed extraction.
///
/// True for very short text, text whose allowed-script fraction (CJK
/// ideographs, kana, ascii printable, fullwidth forms) falls below the
/// threshold, and text containing URL-like substrings. Pure and total.
pub fn is_garbled(text: &str, config: &NormalizerConfig) -> bool {
    let total = text.chars().count();
    if total < config.min_chars {
        return true;
    }

    let valid = text.chars().filter(|&c| is_valid_script_char(c)).count();
    if (valid as f64 / total as f64) < config.min_valid_ratio {
        return true;
    }

    config.url_pattern.is_match(text)
}

fn is_valid_script_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'   // CJK ideographs
        | '\u{3040}'..='\u{309F}' // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
        | '\u{0020}'..='\u{007E}' // ascii printable
        | '\u{FF00}'..='\u{FFEF}' // fullwidth forms
    )
}

/// Delete every literal occurrence of each noise phrase
pub fn strip_noise(text: &str, noise_phrases: &[String]) -> String {
    let mut cleaned = text.to_string();
    for phrase in noise_phrases {
        cleaned = cleaned.replace(phrase.as_str(), "");
    }
    cleaned
}

/// Clean raw extracted text into classifiable prose.
///
/// Drops the decode-failure marker and control characters, normalizes
/// no-break and ideographic spaces, collapses whitespace runs, removes noise
/// phrases, and finally deletes every character outside the allowed set
/// (CJK ideographs, kana, CJK symbols, ascii printable, fullwidth digits).
pub fn sanitize(raw_text: &str, config: &NormalizerConfig) -> String {
    let text: String = raw_text
        .chars()
        .filter(|&c| c != '\u{FFFD}' && !c.is_control())
        .map(|c| if c == '\u{00A0}' || c == '\u{3000}' { ' ' } else { c })
        .collect();

    let text = config.whitespace_run.replace_all(&text, " ");
    let text = strip_noise(text.trim(), &config.noise_phrases);

    text.chars().filter(|&c| is_allowed_char(c)).collect()
}

fn is_allowed_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'   // CJK ideographs
        | '\u{3040}'..='\u{309F}' // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
        | '\u{3000}'..='\u{303F}' // CJK symbols, 、 and 。 included
        | '\u{0020}'..='\u{007E}' // ascii printable
        | '\u{FF10}'..='\u{FF19}' // fullwidth digits
        | '\n'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_garbled() {
        let config = NormalizerConfig::default();
        assert!(is_garbled("", &config));
        assert!(is_garbled("点滴", &config));
        assert!(is_garbled("あいうえ", &config));
    }

    #[test]
    fn test_foreign_script_is_garbled() {
        let config = NormalizerConfig::default();
        // Entirely outside the allowed script set
        assert!(is_garbled("ЖЖЖЖЖЖЖЖЖЖ", &config));
        assert!(is_garbled("\u{0391}\u{0392}\u{0393}\u{0394}\u{0395}\u{0396}", &config));
    }

    #[test]
    fn test_url_is_garbled() {
        let config = NormalizerConfig::default();
        assert!(is_garbled("詳細は https://example.com/report.pdf を参照", &config));
        assert!(is_garbled("ftp://files.example.jp にある資料です", &config));
    }

    #[test]
    fn test_normal_text_is_not_garbled() {
        let config = NormalizerConfig::default();
        assert!(!is_garbled("輸血の準備中に血液型の確認を怠った", &config));
        assert!(!is_garbled("Checked the patient wristband twice", &config));
    }

    #[test]
    fn test_strip_noise_is_literal() {
        let phrases = vec!["平成".to_string(), "16".to_string()];
        // Not word-boundary aware: 16 is deleted out of 160
        assert_eq!(strip_noise("平成30年、160件", &phrases), "30年、0件");
    }

    #[test]
    fn test_sanitize_collapses_and_filters() {
        let config = NormalizerConfig::default();
        let raw = "概要\u{FFFD}  点滴の\u{0007}速度を　誤った★☆\u{00A0}ため";
        assert_eq!(sanitize(raw, &config), "概要 点滴の速度を 誤った ため");
    }

    #[test]
    fn test_sanitize_strips_noise_phrases() {
        let config = NormalizerConfig::default();
        let raw = "事例の概要 採血の際に転倒した";
        // 事例の概要 is a noise phrase; the leading space it leaves survives
        // because noise removal runs after whitespace collapsing
        assert_eq!(sanitize(raw, &config), " 採血の際に転倒した");
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        let mut bytes = "採血".as_bytes().to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice("確認".as_bytes());
        assert_eq!(decode_lossy(&bytes), "採血確認");
    }
}
