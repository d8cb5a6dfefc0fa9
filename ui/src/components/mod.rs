pub mod error_banner;
pub mod nav_bar;
pub mod pagination_controls;
pub mod request_status;
pub mod require_auth;

pub use error_banner::ErrorBanner;
pub use nav_bar::NavBar;
pub use pagination_controls::PaginationControls;
pub use request_status::RequestStatus;
pub use require_auth::RequireAuth;
