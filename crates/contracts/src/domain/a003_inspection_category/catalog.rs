use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::shared::form_schema::{Category, Field, ValidationRules, OTHER_OPTION};
use crate::system::permissions::Permission;

/// Value of a condition field that counts as a normal finding
pub const NORMAL_VALUE: &str = "ปกติ";
const ABNORMAL_VALUE: &str = "ผิดปกติ";

/// Fields whose answers feed the condition summary
pub const CONDITION_FIELDS: [&str; 2] = [VISUAL_CONDITION, OIL_RESULT];

const VISUAL_CONDITION: &str = "สภาพ";
const DAMAGE_CAUSE: &str = "สาเหตุความเสียหาย";
const OIL_RESULT: &str = "ผลการประเมิน";
const REMARK: &str = "หมายเหตุ";

pub const OIL_AGING_ID: &str = "oil_aging";

/// Which kind of work a category records. Decides the write permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    OilTest,
    VisualInspection,
}

impl CategoryKind {
    pub fn of(category_id: &str) -> Option<Self> {
        match category_id {
            OIL_AGING_ID => Some(Self::OilTest),
            id if find(id).is_some() => Some(Self::VisualInspection),
            _ => None,
        }
    }

    /// Permission needed to record results of this kind
    pub fn write_permission(&self) -> Permission {
        match self {
            Self::OilTest => Permission::RecordOilTests,
            Self::VisualInspection => Permission::RecordVisualInspections,
        }
    }
}

static CATALOG: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        oil_aging(),
        visual(
            "bushing",
            "บุชชิ่ง",
            &["รอยแตกร้าว", "คราบสกปรก", "น้ำมันรั่วซึม"],
        ),
        visual("main_tank", "ตัวถังหลัก", &["สนิม", "รอยรั่ว", "สีลอก"]),
        visual(
            "conservator",
            "ถังอนุรักษ์น้ำมัน",
            &["ระดับน้ำมันต่ำ", "ซิลิกาเจลเปลี่ยนสี", "รอยรั่ว"],
        ),
        visual(
            "cooling",
            "ระบบระบายความร้อน",
            &["พัดลมไม่ทำงาน", "ครีบระบายความร้อนอุดตัน", "รอยรั่ว"],
        ),
        visual(
            "oltc",
            "อุปกรณ์เปลี่ยนแทปขณะจ่ายโหลด (OLTC)",
            &["ตัวนับจำนวนครั้งผิดปกติ", "น้ำมันรั่วซึม", "เสียงผิดปกติ"],
        ),
    ]
});

/// Every category, in menu order
pub fn all() -> &'static [Category] {
    CATALOG.as_slice()
}

pub fn find(id: &str) -> Option<&'static Category> {
    CATALOG.iter().find(|c| c.id == id)
}

fn oil_aging() -> Category {
    Category::new(
        OIL_AGING_ID,
        "ทดสอบการเสื่อมสภาพน้ำมันฉนวน",
        vec![
            Field::date("วันที่เก็บตัวอย่าง").required(),
            Field::text("แรงดันเบรกดาวน์ (kV)")
                .with_rules(ValidationRules::numeric(Some(0.0), Some(200.0)))
                .required(),
            Field::text("ความชื้น (ppm)")
                .with_rules(ValidationRules::numeric(Some(0.0), Some(1000.0))),
            Field::text("ค่าความเป็นกรด (mgKOH/g)")
                .with_rules(ValidationRules::numeric(Some(0.0), Some(5.0))),
            Field::text("แรงตึงผิว (mN/m)")
                .with_rules(ValidationRules::numeric(Some(0.0), Some(100.0))),
            Field::select(
                "สีของน้ำมัน",
                ["เหลืองอ่อน", "เหลือง", "ส้ม", "น้ำตาล", "ดำ"],
            ),
            Field::select(OIL_RESULT, [NORMAL_VALUE, ABNORMAL_VALUE, OTHER_OPTION]).required(),
            Field::text("ระบุผลการประเมินอื่น ๆ")
                .when_other(OIL_RESULT)
                .required(),
            Field::text(REMARK).with_rules(ValidationRules {
                max_length: Some(500),
                ..ValidationRules::none()
            }),
        ],
    )
}

/// Visual checklist: condition, damage cause with a free-text "other",
/// date found and remark
fn visual(id: &str, title: &str, causes: &[&str]) -> Category {
    let cause_options = causes.iter().copied().chain([OTHER_OPTION]);

    Category::new(
        id,
        title,
        vec![
            Field::select(VISUAL_CONDITION, [NORMAL_VALUE, ABNORMAL_VALUE]).required(),
            Field::select(DAMAGE_CAUSE, cause_options),
            Field::text("ระบุสาเหตุอื่น ๆ")
                .when_other(DAMAGE_CAUSE)
                .required(),
            Field::date("วันที่ตรวจพบ"),
            Field::text(REMARK).with_rules(ValidationRules {
                max_length: Some(500),
                ..ValidationRules::none()
            }),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_is_well_formed() {
        for category in all() {
            assert_eq!(category.check(), Ok(()), "category {}", category.id);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<&str> = all().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), all().len());
        assert_eq!(all().len(), 6);
    }

    #[test]
    fn test_find_and_kind() {
        assert_eq!(find("main_tank").map(|c| c.title.as_str()), Some("ตัวถังหลัก"));
        assert!(find("unknown").is_none());

        assert_eq!(CategoryKind::of(OIL_AGING_ID), Some(CategoryKind::OilTest));
        assert_eq!(CategoryKind::of("oltc"), Some(CategoryKind::VisualInspection));
        assert_eq!(CategoryKind::of("unknown"), None);
    }

    #[test]
    fn test_every_category_has_one_condition_field() {
        for category in all() {
            let count = CONDITION_FIELDS
                .iter()
                .filter(|name| category.field(name).is_some())
                .count();
            assert_eq!(count, 1, "category {}", category.id);
        }
    }
}
