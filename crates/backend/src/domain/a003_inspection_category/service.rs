use contracts::domain::a003_inspection_category as catalog;
use contracts::shared::form_schema::Category;

use crate::shared::error::{AppError, AppResult};

/// Every category in menu order
pub fn list_all() -> Vec<Category> {
    catalog::all().to_vec()
}

pub fn get_by_id(id: &str) -> AppResult<Category> {
    catalog::find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("ไม่พบประเภทการตรวจสอบ {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(list_all().len(), 6);
        assert_eq!(get_by_id("oltc").unwrap().id, "oltc");
        assert!(matches!(get_by_id("dga"), Err(AppError::NotFound(_))));
    }
}
