use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Ingredient {
    Table,
    Id,
    UserId,
    Kind,
    Category,
    DisplayedName,
    StandardName,
    IsChecked,
    CreatedAt,
}
