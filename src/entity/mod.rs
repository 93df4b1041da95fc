pub mod menu_categories;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod reservations;
pub mod settings;
pub mod users;

pub use menu_categories::Entity as MenuCategories;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use reservations::Entity as Reservations;
pub use settings::Entity as Settings;
pub use users::Entity as Users;
