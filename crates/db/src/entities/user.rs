//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address as entered at signup
    pub email: String,

    /// Normalized (lowercased) email; uniqueness is enforced here
    #[sea_orm(unique)]
    pub email_lower: String,

    /// Salted password digest (the password itself is never persisted)
    pub password_digest: String,

    /// Has this account been activated?
    #[sea_orm(default_value = false)]
    pub activated: bool,

    /// When the account was activated
    #[sea_orm(nullable)]
    pub activated_at: Option<DateTimeWithTimeZone>,

    /// Salted digest of the one-time activation token
    #[sea_orm(nullable)]
    pub activation_digest: Option<String>,

    /// Salted digest of the persistent-login token
    #[sea_orm(nullable)]
    pub remember_digest: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::micropost::Entity")]
    Microposts,
}

impl Related<super::micropost::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Microposts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
