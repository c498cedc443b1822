use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub menu_id: Uuid,
    pub quantity: i32,
    pub addon_ingredient_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::menu_templates::Entity",
        from = "Column::MenuId",
        to = "super::menu_templates::Column::Id"
    )]
    MenuTemplates,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::menu_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuTemplates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
