pub mod coupon;
pub mod customer;
pub mod driver;
pub mod order;
pub mod product;

pub use coupon::*;
pub use customer::*;
pub use driver::*;
pub use order::*;
pub use product::*;
