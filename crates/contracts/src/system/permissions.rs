use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single privilege a user may hold.
///
/// Declaration order matches the legacy positional flag array, see
/// [`Permission::position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Kept to preserve the legacy flag positions; nothing checks it
    ViewDashboard,
    ManageTransformers,
    RecordOilTests,
    RecordVisualInspections,
    EditRecords,
    DeleteRecords,
    ViewCalculations,
    /// Kept to preserve the legacy flag positions; there is no export
    ExportReports,
    ManageUsers,
}

impl Permission {
    pub const COUNT: usize = 9;

    pub const ALL: [Permission; Self::COUNT] = [
        Self::ViewDashboard,
        Self::ManageTransformers,
        Self::RecordOilTests,
        Self::RecordVisualInspections,
        Self::EditRecords,
        Self::DeleteRecords,
        Self::ViewCalculations,
        Self::ExportReports,
        Self::ManageUsers,
    ];

    /// `false` for flags that only hold their legacy position and gate
    /// nothing in the backend or the dashboard
    pub fn is_enforced(&self) -> bool {
        !matches!(self, Self::ViewDashboard | Self::ExportReports)
    }

    /// Index in the legacy `[bool; 9]` flag array
    pub fn position(&self) -> usize {
        *self as usize
    }

    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ManageTransformers => "manage_transformers",
            Self::RecordOilTests => "record_oil_tests",
            Self::RecordVisualInspections => "record_visual_inspections",
            Self::EditRecords => "edit_records",
            Self::DeleteRecords => "delete_records",
            Self::ViewCalculations => "view_calculations",
            Self::ExportReports => "export_reports",
            Self::ManageUsers => "manage_users",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "ดูหน้าหลัก",
            Self::ManageTransformers => "จัดการข้อมูลหม้อแปลง",
            Self::RecordOilTests => "บันทึกผลทดสอบน้ำมัน",
            Self::RecordVisualInspections => "บันทึกผลตรวจสภาพภายนอก",
            Self::EditRecords => "แก้ไขข้อมูล",
            Self::DeleteRecords => "ลบข้อมูล",
            Self::ViewCalculations => "ดูผลการคำนวณ",
            Self::ExportReports => "ส่งออกรายงาน",
            Self::ManageUsers => "จัดการผู้ใช้งาน",
        }
    }
}

/// Set of permissions held by a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self(Permission::ALL.into_iter().collect())
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    pub fn remove(&mut self, permission: Permission) {
        self.0.remove(&permission);
    }

    pub fn set(&mut self, permission: Permission, granted: bool) {
        if granted {
            self.insert(permission);
        } else {
            self.remove(permission);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Build from the legacy positional flag array
    pub fn from_flags(flags: [bool; Permission::COUNT]) -> Self {
        Self(
            Permission::ALL
                .into_iter()
                .filter(|p| flags[p.position()])
                .collect(),
        )
    }

    /// Legacy positional flag array
    pub fn to_flags(&self) -> [bool; Permission::COUNT] {
        let mut flags = [false; Permission::COUNT];
        for p in self.iter() {
            flags[p.position()] = true;
        }
        flags
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
