use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permissions::PermissionSet;
use crate::domain::common::{AggregateRoot, EntityMetadata};
use crate::shared::form_schema::FieldErrors;

/// Dashboard user. `login` is the employee number used to sign in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    pub firstname: String,
    pub lastname: String,
    pub permissions: PermissionSet,
    pub last_login_at: Option<DateTime<Utc>>,
    pub metadata: EntityMetadata,
}

impl User {
    pub fn new_for_insert(dto: &CreateUserDto) -> Self {
        Self {
            id: String::new(),
            login: dto.login.trim().to_string(),
            firstname: dto.firstname.trim().to_string(),
            lastname: dto.lastname.trim().to_string(),
            permissions: dto.permissions.clone(),
            last_login_at: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Login is immutable; names and permissions are replaced
    pub fn update(&mut self, dto: &UpdateUserDto) {
        self.firstname = dto.firstname.trim().to_string();
        self.lastname = dto.lastname.trim().to_string();
        self.permissions = dto.permissions.clone();
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

impl AggregateRoot for User {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn assign_id(&mut self, id: Self::Id) {
        self.id = id;
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn collection_name() -> &'static str {
        "users"
    }

    fn element_name() -> &'static str {
        "ผู้ใช้งาน"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub login: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}

/// Employee numbers are eight digits
pub fn check_login(login: &str) -> Result<(), String> {
    let login = login.trim();
    if login.is_empty() {
        return Err("กรุณากรอกรหัสพนักงาน".to_string());
    }
    if login.chars().count() != 8 || !login.chars().all(|c| c.is_ascii_digit()) {
        return Err("รหัสพนักงานต้องเป็นตัวเลข 8 หลัก".to_string());
    }
    Ok(())
}

fn check_names(firstname: &str, lastname: &str, errors: &mut FieldErrors) {
    if firstname.trim().is_empty() {
        errors.insert("firstname", "กรุณากรอกชื่อ");
    }
    if lastname.trim().is_empty() {
        errors.insert("lastname", "กรุณากรอกนามสกุล");
    }
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Err(message) = check_login(&self.login) {
            errors.insert("login", message);
        }
        check_names(&self.firstname, &self.lastname, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateUserDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_names(&self.firstname, &self.lastname, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_login() {
        assert!(check_login("12345678").is_ok());
        assert_eq!(check_login(" "), Err("กรุณากรอกรหัสพนักงาน".to_string()));
        assert!(check_login("1234567").is_err());
        assert!(check_login("1234567a").is_err());
    }

    #[test]
    fn test_create_user_validation() {
        let dto = CreateUserDto {
            login: "abc".into(),
            firstname: "".into(),
            lastname: "ใจดี".into(),
            permissions: PermissionSet::empty(),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.get("login").is_some());
        assert!(errors.get("firstname").is_some());
        assert!(errors.get("lastname").is_none());
    }

    #[test]
    fn test_update_keeps_login() {
        let mut user = User::new_for_insert(&CreateUserDto {
            login: " 12345678 ".into(),
            firstname: "สมชาย".into(),
            lastname: "ใจดี".into(),
            permissions: PermissionSet::all(),
        });
        assert_eq!(user.login, "12345678");
        assert_eq!(user.display_name(), "สมชาย ใจดี");

        user.update(&UpdateUserDto {
            id: String::new(),
            firstname: "สมหญิง".into(),
            lastname: "".into(),
            permissions: PermissionSet::empty(),
        });
        assert_eq!(user.login, "12345678");
        assert_eq!(user.display_name(), "สมหญิง");
        assert!(user.permissions.is_empty());
    }
}
