pub mod login;
pub mod orders;
pub mod products;

pub use login::LoginPage;
pub use orders::OrdersPage;
pub use products::ProductsPage;
