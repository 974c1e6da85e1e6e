//! 同步原语 (Synchronization Primitives)
//!
//! - `Mutex`: 自旋互斥锁 (spin crate)，作用域结束自动释放
//! - `ConditionVariable`: 与 `Mutex` 配合的条件变量
//! - `Once`: 一次性初始化

pub mod condvar;

pub use condvar::ConditionVariable;
pub use spin::{Mutex, MutexGuard, Once};
