//! User entity <-> model mapper

use sala_core::entities::User;
use sala_core::value_objects::UserId;

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::new(model.id),
            username: model.username,
            role: model.role,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
