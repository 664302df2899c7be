//! 订单数据访问层

pub mod order_repo;
pub mod traits;

pub use order_repo::OrderRepository;
pub use traits::OrderStore;

#[cfg(test)]
pub use traits::MockOrderStore;
