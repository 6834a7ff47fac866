use std::collections::BTreeMap;

use super::Category;

/// Prefix marking a section header line.
///
/// The four line shapes below are a contract with the presentation layer,
/// which parses rendered blocks back into interactive elements. Changing any
/// of them requires a synchronized change on that side.
pub const SECTION_HEADER_PREFIX: &str = "### ";
/// Prefix marking a reference sub-header line (the past-causes section)
pub const REFERENCE_HEADER_PREFIX: &str = "#### ";
/// Bullet marking a mandatory standard checklist item
pub const STANDARD_BULLET: &str = "- ✅ ";
/// Bullet marking a pending item derived from past incidents
pub const DERIVED_BULLET: &str = "- □ ";

/// The final artifact: category label mapped to its formatted checklist
/// block. A BTreeMap keeps entries in code-point order of the label.
pub type ChecklistDocument = BTreeMap<String, String>;

/// Curated, always-present checklist items per category.
///
/// Reference data, not derived from incidents: the standard section of a
/// category renders even when the dataset is empty. Loaded once at startup
/// and never mutated.
#[derive(Debug, Clone)]
pub struct StandardItemSet {
    items: Vec<(Category, Vec<String>)>,
}

impl StandardItemSet {
    /// Standard items for a category; empty for categories with none
    pub fn get(&self, category: Category) -> &[String] {
        self.items
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    /// Categories that have standard items, in table order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.items.iter().map(|(c, _)| *c)
    }
}

impl Default for StandardItemSet {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            items: vec![
                (
                    Category::Transfusion,
                    owned(&[
                        "【準備】同意書の確認および患者への説明を行いましたか？",
                        "【準備】交差適合試験の結果と血液製剤、指示書の内容（患者氏名、血液型、放射線照射有無）が一致しているか確認しましたか？",
                        "【実施前】患者氏名、ID、血液型、製剤の有効期限、外観（凝集・変色・破損）を医師・看護師の2名で声出し確認しましたか？",
                        "【実施中】投与開始直前および開始後5分、15分にバイタルサインを測定・観察しましたか？",
                        "【実施後】副作用の有無を確認し、空バッグを所定の方法で保管・廃棄しましたか？",
                    ]),
                ),
                (
                    Category::PatientGuidance,
                    owned(&[
                        "【確認】患者の氏名とIDをリストバンドと照合し、本人に名乗ってもらい確認しましたか？",
                        "【確認】アレルギー歴（特に造影剤アレルギー）を再確認し、記録しましたか？",
                        "【指導】処置・検査前に、体動リスクを評価し、体動しないよう具体的かつ簡潔に説明しましたか？",
                        "【説明】患者または家族に対し、これから行う処置や治療内容を説明し、同意を得ましたか？",
                    ]),
                ),
                (
                    Category::InfusionMedication,
                    owned(&[
                        "【FIVE-RIGHTs】医師・薬剤師の指示書に基づき、正しい薬剤、量、時間、経路であることをダブルチェックしましたか？",
                        "【抗凝固薬】手術や侵襲的処置の前に、休薬指示と最終投与時間を確認しましたか？",
                        "【高浸透圧薬】Mannitolなどの高浸透圧薬に結晶化や沈殿物がないか確認し、投与速度は指示通りですか？",
                        "【抗てんかん薬】処方開始・変更時に、適切な血中濃度採血オーダーがされているか確認しましたか？",
                        "【持続点滴】ポンプ設定（薬剤名、単位、設定量）を2名のスタッフで声出し確認しましたか？",
                        "【管理】麻薬・向精神薬は投与前後の残薬確認、記録、施錠保管を複数人で行いましたか？",
                    ]),
                ),
                (
                    Category::CentralLine,
                    owned(&[
                        "【準備】エコーガイド下穿刺の準備（プローブカバー等）はできていますか？",
                        "【実施中】ガイドワイヤー挿入時、抵抗がないことを確認しましたか？（無理な挿入は禁止）",
                        "【実施中】動脈穿刺の除外（短軸・長軸像での確認、圧波形など）を行いましたか？",
                        "【実施後】ガイドワイヤーが体内に残存していないことを本数確認しましたか？",
                        "【実施後】カテーテル先端位置確認のためのX線撮影オーダーを行いましたか？",
                        "【観察】刺入部の感染兆候（発赤・腫脹）の有無を毎日チェックしましたか？",
                    ]),
                ),
                (
                    Category::DrainageManagement,
                    owned(&[
                        "【指示確認】ドレナージバッグの**高さ（cmH2O）**、クランプ・開放指示が明確ですか？",
                        "【操作確認】体位変換や移送前後で、指示されたドレナージラインのクランプ操作を確実に実施しましたか？",
                        "【排液観察】排液の**量（時間毎）**、色、混濁を記録し、急激な変化や異常な量はありませんか？",
                        "【閉塞確認】ラインの屈曲、閉塞がないか確認しましたか？ ",
                        "【刺入部】刺入部に感染兆候がないか確認し、無菌操作でドレッシング材を交換しましたか？",
                    ]),
                ),
                (
                    Category::Neurosurgical,
                    owned(&[
                        "【意識レベル】JCSまたはGCSに基づき、正確かつ経時的に意識レベルを評価・記録しましたか？",
                        "【瞳孔所見】瞳孔径と対光反射を左右で比較し、急激な**左右差の出現**や**散瞳**がないか確認しましたか？",
                        "【麻痺評価】運動麻痺や感覚麻痺の有無、および昨日からの**進行・悪化**がないか詳細に評価しましたか？",
                        "【バイタル】**クッシング現象**（徐脈、血圧上昇）などの頭蓋内圧亢進症状のサインがないか確認しましたか？",
                        "【緊急体制】意識障害や呼吸状態の急変時、どの医師に**何分以内**に連絡するか確認されていますか？",
                    ]),
                ),
                (
                    Category::BloodDraw,
                    owned(&[
                        "【準備】検査指示書と採血管のラベル（氏名、ID、検査項目）を照合しましたか？",
                        "【実施前】患者本人に氏名を名乗ってもらい、リストバンドと照合しましたか？",
                        "【実施中】神経損傷予防のため、穿刺時の激痛やしびれの有無を患者に確認しましたか？",
                        "【実施中】駆血帯は1分以内に解除しましたか？（特に抜針前の解除忘れに注意）",
                        "【実施後】止血確認を行い、採血管の転倒混和を適切に行いましたか？",
                    ]),
                ),
                (
                    Category::Surgery,
                    owned(&[
                        "【Sign In】患者確認、手術部位、術式の確認、麻酔器・モニターのチェックは完了しましたか？",
                        "【Time Out】執刀直前に全スタッフの手が止まり、患者名・術式・部位・予想される危険操作を全員で共有しましたか？",
                        "【Time Out】予防的抗菌薬の投与は執刀60分以内に行われましたか？",
                        "【Sign Out】ガーゼ・器械・縫合針のカウント数は一致しましたか？",
                        "【Sign Out】摘出標本のラベル（患者名・検体名）は正しいですか？",
                    ]),
                ),
                (
                    Category::Intubation,
                    owned(&[
                        "【準備】喉頭鏡のライト点灯、カフの破損がないか確認しましたか？",
                        "【準備】困難気道が予想される場合、ビデオ喉頭鏡やブジーなどの代替器具を準備しましたか？",
                        "【実施中】挿管後、聴診（5点聴診）およびカプノメータで二酸化炭素の波形を確認しましたか？",
                        "【実施後】チューブの固定位置（歯列のcm）を記録し、確実に固定しましたか？",
                        "【実施後】胸部X線でチューブ先端位置を確認しましたか？",
                    ]),
                ),
                (
                    Category::Endoscopy,
                    owned(&[
                        "【準備】内視鏡洗浄消毒履歴を確認し、使用機器の動作確認を行いましたか？",
                        "【実施前】抗血栓薬の休薬状況、アレルギー歴、既往歴を確認しましたか？",
                        "【実施前】鎮静を行う場合、同意書の確認と蘇生用具（酸素、アンビュー等）の準備はできていますか？",
                        "【実施中】患者のSpO2、呼吸状態、血圧のモニタリングを継続していますか？",
                        "【実施後】覚醒状態を確認し、飲水・食事開始の指示を明確にしましたか？",
                    ]),
                ),
            ],
        }
    }
}

/// Explicit versioned cache for the last generated checklist document.
///
/// Keyed by dataset version: `document_for` only returns a hit when the
/// caller's version matches the one the document was built from, and `store`
/// replaces the whole entry, so readers see either the old complete document
/// or the new one, never a mix.
#[derive(Debug, Clone, Default)]
pub struct ChecklistCache {
    version: u64,
    document: Option<ChecklistDocument>,
}

impl ChecklistCache {
    /// The cached document, if it was built from exactly this dataset version
    pub fn document_for(&self, version: u64) -> Option<&ChecklistDocument> {
        match &self.document {
            Some(doc) if self.version == version => Some(doc),
            _ => None,
        }
    }

    /// Replace the cached document with one built from `version`
    pub fn store(&mut self, version: u64, document: ChecklistDocument) {
        self.version = version;
        self.document = Some(document);
    }

    /// Drop the cached document entirely
    pub fn invalidate(&mut self) {
        self.document = None;
    }
}
