//! Business logic services layer

pub mod auth_service;
pub mod order_service;
pub mod report_service;

pub use auth_service::AuthService;
pub use order_service::OrderService;
pub use report_service::ReportService;
