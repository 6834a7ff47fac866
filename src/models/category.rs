use std::fmt;

use serde::{Deserialize, Serialize};

/// Clinical procedure categories used to group incidents and checklists.
///
/// Declaration order matters: the classifier walks its keyword table in this
/// order and the first category with a matching keyword wins, so reordering
/// variants changes classification results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// 患者確認・指導
    #[serde(rename = "患者確認・指導")]
    PatientGuidance,
    /// 採血
    #[serde(rename = "採血")]
    BloodDraw,
    /// 輸血
    #[serde(rename = "輸血")]
    Transfusion,
    /// 点滴・薬剤
    #[serde(rename = "点滴・薬剤")]
    InfusionMedication,
    /// 手術
    #[serde(rename = "手術")]
    Surgery,
    /// 内視鏡
    #[serde(rename = "内視鏡")]
    Endoscopy,
    /// 気管挿管
    #[serde(rename = "気管挿管")]
    Intubation,
    /// 中心静脈カテーテル
    #[serde(rename = "中心静脈カテーテル")]
    CentralLine,
    /// ドレナージ管理
    #[serde(rename = "ドレナージ管理")]
    DrainageManagement,
    /// 脳神経外科管理
    #[serde(rename = "脳神経外科管理")]
    Neurosurgical,
    /// その他 (catch-all)
    #[serde(rename = "その他")]
    Other,
}

impl Category {
    /// All categories in classifier declaration order
    pub const ALL: [Category; 11] = [
        Category::PatientGuidance,
        Category::BloodDraw,
        Category::Transfusion,
        Category::InfusionMedication,
        Category::Surgery,
        Category::Endoscopy,
        Category::Intubation,
        Category::CentralLine,
        Category::DrainageManagement,
        Category::Neurosurgical,
        Category::Other,
    ];

    /// The Japanese label used in checklist documents and stored records
    pub fn label(&self) -> &'static str {
        match self {
            Category::PatientGuidance => "患者確認・指導",
            Category::BloodDraw => "採血",
            Category::Transfusion => "輸血",
            Category::InfusionMedication => "点滴・薬剤",
            Category::Surgery => "手術",
            Category::Endoscopy => "内視鏡",
            Category::Intubation => "気管挿管",
            Category::CentralLine => "中心静脈カテーテル",
            Category::DrainageManagement => "ドレナージ管理",
            Category::Neurosurgical => "脳神経外科管理",
            Category::Other => "その他",
        }
    }

    /// Look up a category by its Japanese label
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
