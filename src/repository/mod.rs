//! Database repository layer

pub mod feedback_repo;
pub mod order_repo;
pub mod product_repo;
pub mod report_repo;
pub mod user_repo;

pub use feedback_repo::*;
pub use order_repo::*;
pub use product_repo::*;
pub use report_repo::*;
pub use user_repo::*;
