//! Schema-driven forms
//!
//! A [`Category`] declares the ordered fields of an inspection subject.
//! [`FormState`] holds the draft typed into a rendered category, applies
//! the `"other"` gating of supplementary fields and turns the draft into a
//! validated [`FormRecord`] on submit.
//!
//! ```rust
//! use contracts::shared::form_schema::{Category, Field, FormMode, FormState, OTHER_OPTION};
//!
//! let category = Category::new(
//!     "bushing",
//!     "บุชชิ่ง",
//!     vec![
//!         Field::select("สาเหตุ", ["สนิม", OTHER_OPTION]).required(),
//!         Field::text("ระบุสาเหตุอื่น ๆ").when_other("สาเหตุ"),
//!     ],
//! );
//! let mut form = FormState::new(category, FormMode::Create);
//! form.set("สาเหตุ", "สนิม").unwrap();
//! assert_eq!(form.visible_fields().len(), 1);
//! assert!(form.submit().is_ok());
//! ```

mod draft;
mod field_kind;
mod types;
mod validation;

pub use draft::{FieldErrors, FormDraft, FormError, FormMode, FormRecord, FormState};
pub use field_kind::FieldKind;
pub use types::{Category, Field, FieldGate, SchemaError, OTHER_OPTION};
pub use validation::ValidationRules;
