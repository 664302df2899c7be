//! 订单编排服务

pub mod order_service;

pub use order_service::OrderService;
