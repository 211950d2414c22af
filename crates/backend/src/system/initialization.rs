use anyhow::Result;
use std::collections::BTreeMap;

use contracts::domain::a001_transformer::{Importance, Transformer, TransformerDto};
use contracts::domain::a002_inspection_item::{InspectionItemDto, InspectionQuery};
use contracts::domain::a003_inspection_category as catalog;
use contracts::shared::form_schema::OTHER_OPTION;
use contracts::system::permissions::PermissionSet;
use contracts::system::users::{CreateUserDto, User};

use crate::domain::{a001_transformer, a002_inspection_item};
use crate::shared::state::AppState;
use crate::system::users::repository as users;

/// Refuse to start with a malformed form schema
pub fn verify_form_schemas() -> Result<()> {
    for category in catalog::all() {
        category.check()?;
    }
    Transformer::form_category().check()?;
    tracing::info!("Verified {} inspection categories", catalog::all().len());
    Ok(())
}

/// Ensure the configured administrator exists, with every permission
pub async fn ensure_admin_user_exists(state: &AppState) -> Result<()> {
    let login = state.config.auth.seed_employee_no.trim().to_string();
    if users::get_by_login(&state.users, &login).await.is_some() {
        return Ok(());
    }

    let admin = User::new_for_insert(&CreateUserDto {
        login,
        firstname: "ผู้ดูแล".into(),
        lastname: "ระบบ".into(),
        permissions: PermissionSet::all(),
    });
    let admin = users::insert(&state.users, admin).await;

    tracing::info!(
        "Created administrator with employee number {} ({})",
        admin.login,
        admin.id
    );
    Ok(())
}

/// Fill empty stores with a few transformers and records
pub async fn seed_demo_data(state: &AppState) -> Result<()> {
    if !state.config.seed.demo_data {
        return Ok(());
    }
    let has_data = !a001_transformer::service::list_all(state).await.is_empty()
        || !a002_inspection_item::service::list(state, &InspectionQuery::default())
            .await
            .is_empty();
    if has_data {
        return Ok(());
    }

    let transformers = [
        ("KT1A", "EGAT-TR-0001", "บางกะปิ", "ABB", 50.0, "115/22", Importance::Critical),
        ("KT2A", "EGAT-TR-0002", "บางกะปิ", "Siemens", 50.0, "115/22", Importance::High),
        ("RB1A", "EGAT-TR-0107", "ราชบุรี", "Toshiba", 200.0, "230/115", Importance::Normal),
    ];
    for (name, egat_sn, substation, manufacturer, mva, kv, importance) in transformers {
        let dto = TransformerDto {
            id: None,
            name: name.into(),
            egat_sn: egat_sn.into(),
            substation: substation.into(),
            manufacturer: manufacturer.into(),
            rated_mva: Some(mva),
            voltage_kv: kv.into(),
            importance,
        };
        a001_transformer::service::create(state, dto)
            .await
            .map_err(|e| anyhow::anyhow!("demo transformer {}: {}", egat_sn, e))?;
    }

    let records = [
        (
            "KT1A",
            "EGAT-TR-0001",
            "oil_aging",
            "2024-03-12",
            vec![
                ("วันที่เก็บตัวอย่าง", "2024-03-10"),
                ("แรงดันเบรกดาวน์ (kV)", "68"),
                ("ความชื้น (ppm)", "12"),
                ("สีของน้ำมัน", "เหลือง"),
                ("ผลการประเมิน", "ปกติ"),
            ],
        ),
        (
            "KT1A",
            "EGAT-TR-0001",
            "bushing",
            "2024-04-02",
            vec![
                ("สภาพ", "ผิดปกติ"),
                ("สาเหตุความเสียหาย", OTHER_OPTION),
                ("ระบุสาเหตุอื่น ๆ", "นกทำรัง"),
                ("วันที่ตรวจพบ", "2024-04-02"),
            ],
        ),
        (
            "KT2A",
            "EGAT-TR-0002",
            "main_tank",
            "2024-04-05",
            vec![("สภาพ", "ปกติ")],
        ),
    ];
    for (name, egat_sn, test_type, date, answers) in records {
        let fields: BTreeMap<String, String> = answers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let dto = InspectionItemDto {
            id: None,
            transformer_name: name.into(),
            egat_sn: egat_sn.into(),
            test_type: test_type.into(),
            test_date: date.into(),
            test_time: "09:00".into(),
            inspector: "ผู้ดูแล ระบบ".into(),
            fields,
        };
        a002_inspection_item::service::create(state, dto)
            .await
            .map_err(|e| anyhow::anyhow!("demo record {} {}: {}", egat_sn, test_type, e))?;
    }

    tracing::info!("Seeded demo transformers and inspection records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::state::test_support;

    #[test]
    fn test_shipped_schemas_verify() {
        verify_form_schemas().unwrap();
    }

    #[tokio::test]
    async fn test_admin_seeded_once() {
        let state = test_support::state();
        ensure_admin_user_exists(&state).await.unwrap();
        ensure_admin_user_exists(&state).await.unwrap();

        let all = users::list_all(&state.users).await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].login, "12345678");
        assert_eq!(all[0].permissions, PermissionSet::all());
    }

    #[tokio::test]
    async fn test_demo_data_is_valid_and_optional() {
        let state = test_support::state();
        seed_demo_data(&state).await.unwrap();
        assert!(a001_transformer::service::list_all(&state).await.is_empty());

        let mut config = (*state.config).clone();
        config.seed.demo_data = true;
        let state = AppState {
            config: std::sync::Arc::new(config),
            ..state
        };
        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        assert_eq!(a001_transformer::service::list_all(&state).await.len(), 3);
        let records = a002_inspection_item::service::list(&state, &InspectionQuery::default()).await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].answer("ระบุสาเหตุอื่น ๆ"), Some("นกทำรัง"));
    }
}
