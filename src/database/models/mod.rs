pub mod api_key;
pub mod selected_calendar;
pub mod user;

pub use api_key::ApiKey;
pub use selected_calendar::{NewSelectedCalendar, SelectedCalendar};
pub use user::{User, UserRole};
