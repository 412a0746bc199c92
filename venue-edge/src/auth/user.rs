//! Current user context

use serde::{Deserialize, Serialize};
use shared::models::UserRef;

/// 当前用户上下文
///
/// Issued by the external auth layer; the core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: String,
    /// 用户名
    pub username: String,
    /// 角色名称
    pub role: String,
    /// 权限列表
    #[serde(default)]
    pub permissions: Vec<String>,
    /// 可访问的场地 (非管理员)
    #[serde(default)]
    pub related_property_ids: Vec<String>,
}

impl CurrentUser {
    /// 是否管理员
    ///
    /// 管理员角色 (`role == "admin"`) 拥有所有权限
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// 检查是否拥有指定权限
    ///
    /// 支持通配符匹配：
    /// - `"reservations:*"` 匹配 `"reservations:create"` 等
    /// - `"all"` 表示拥有所有权限
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        if self.permissions.iter().any(|p| p == "all") {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == permission {
                return true;
            }
            if let Some(prefix) = p.strip_suffix(":*") {
                permission.starts_with(&format!("{}:", prefix))
            } else {
                false
            }
        })
    }

    /// 管理员或关联场地包含该场地
    pub fn can_access_property(&self, property_id: &str) -> bool {
        self.is_admin() || self.related_property_ids.iter().any(|p| p == property_id)
    }

    /// Reference stored on documents this user creates
    pub fn as_user_ref(&self) -> UserRef {
        UserRef::new(self.id.clone(), self.username.clone())
    }
}
