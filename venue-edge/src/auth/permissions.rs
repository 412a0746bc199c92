//! Permission Definitions
//!
//! Reservation capabilities come in a global and an "own" flavour: the own
//! variant only applies to reservations the user created.

use shared::models::Reservation;

use super::CurrentUser;

pub const RESERVATIONS_CREATE: &str = "reservations:create";
pub const RESERVATIONS_EDIT: &str = "reservations:edit";
pub const RESERVATIONS_EDIT_OWN: &str = "reservations:edit_own";
pub const RESERVATIONS_DELETE: &str = "reservations:delete";
pub const RESERVATIONS_DELETE_OWN: &str = "reservations:delete_own";
pub const GUESTS_VIEW: &str = "guests:view";

/// 经理角色默认权限
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    RESERVATIONS_CREATE,
    RESERVATIONS_EDIT,
    RESERVATIONS_DELETE,
    GUESTS_VIEW,
];

/// 普通员工默认权限（只能改删自己创建的预订）
pub const DEFAULT_STAFF_PERMISSIONS: &[&str] = &[
    RESERVATIONS_CREATE,
    RESERVATIONS_EDIT_OWN,
    RESERVATIONS_DELETE_OWN,
];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    let set: &[&str] = match role_name {
        "admin" => &["all"],
        "manager" => DEFAULT_MANAGER_PERMISSIONS,
        "staff" => DEFAULT_STAFF_PERMISSIONS,
        _ => &[],
    };
    set.iter().map(|s| s.to_string()).collect()
}

fn is_own(user: &CurrentUser, reservation: &Reservation) -> bool {
    reservation.creator.id == user.id
}

/// 可以新建预订
pub fn can_reserve(user: &CurrentUser) -> bool {
    user.has_permission(RESERVATIONS_CREATE)
}

/// 可以编辑该预订 (全局或自己创建的)
pub fn can_edit(user: &CurrentUser, reservation: &Reservation) -> bool {
    user.has_permission(RESERVATIONS_EDIT)
        || (is_own(user, reservation) && user.has_permission(RESERVATIONS_EDIT_OWN))
}

/// 可以删除该预订 (全局或自己创建的)
pub fn can_delete(user: &CurrentUser, reservation: &Reservation) -> bool {
    user.has_permission(RESERVATIONS_DELETE)
        || (is_own(user, reservation) && user.has_permission(RESERVATIONS_DELETE_OWN))
}
