use crate::models::Category;

/// Keyword table for procedure classification.
///
/// The table is ordered and the first category with a matching keyword wins,
/// so overlapping keyword sets (血液 under 採血 vs 血液製剤 under 輸血)
/// resolve deterministically.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// (category, keywords) pairs checked in order
    pub keyword_table: Vec<(Category, Vec<String>)>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            keyword_table: vec![
                (
                    Category::PatientGuidance,
                    owned(&["患者", "確認", "指導", "説明", "同意", "アレルギー"]),
                ),
                (
                    Category::BloodDraw,
                    owned(&["採血", "血液", "静脈", "血管", "穿刺"]),
                ),
                (
                    Category::Transfusion,
                    owned(&["輸血", "血液製剤", "血液型", "ポンピング"]),
                ),
                (
                    Category::InfusionMedication,
                    owned(&[
                        "点滴",
                        "輸液",
                        "IV",
                        "薬剤投与",
                        "シリンジポンプ",
                        "輸液ポンプ",
                        "抗凝固薬",
                        "抗てんかん薬",
                    ]),
                ),
                (
                    Category::Surgery,
                    owned(&["手術", "オペ", "術中", "麻酔", "執刀", "ガーゼカウント"]),
                ),
                (
                    Category::Endoscopy,
                    owned(&["内視鏡", "胃カメラ", "大腸", "スコープ", "CF", "GF"]),
                ),
                (
                    Category::Intubation,
                    owned(&["挿管", "気道", "換気", "チューブ", "抜管"]),
                ),
                (
                    Category::CentralLine,
                    owned(&["CVC", "中心静脈", "カテーテル", "CV", "ガイドワイヤー"]),
                ),
                (
                    Category::DrainageManagement,
                    owned(&["ドレナージ", "脳室", "腰椎", "シャント", "髄液"]),
                ),
                (
                    Category::Neurosurgical,
                    owned(&["意識レベル", "瞳孔", "麻痺", "頭蓋内圧", "クッシング"]),
                ),
            ],
        }
    }
}

/// Classify free text into a procedure category.
///
/// Literal substring containment, no normalization. Total and deterministic:
/// empty text or text matching no keyword yields `Category::Other`.
pub fn classify_procedure(text: &str, config: &ClassifierConfig) -> Category {
    if text.is_empty() {
        return Category::Other;
    }
    for (category, keywords) in &config.keyword_table {
        if keywords.iter().any(|word| text.contains(word.as_str())) {
            return *category;
        }
    }
    Category::Other
}
