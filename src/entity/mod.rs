pub mod coupon_code;
pub mod discount_offer;
pub mod settings;

pub use coupon_code::CouponStatus;
pub use discount_offer::Channel;
