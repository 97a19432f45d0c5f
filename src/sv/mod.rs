pub mod coupon;
pub mod offer;
pub mod settings;
pub mod uploads;

pub use coupon::Coupon;
pub use offer::Offer;
pub use settings::Settings;
pub use uploads::Uploads;
