//! 数据模型模块
//! 用户与认证、菜品目录、订单、反馈以及管理端报表

pub mod feedback;
pub mod order;
pub mod product;
pub mod report;
pub mod user;
