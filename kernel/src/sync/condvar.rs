//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! 条件变量 (Condition Variable) 机制
//!
//! 参考 POSIX 的 `pthread_cond_t`：
//! - 必须与互斥锁配合使用
//! - wait() 释放锁并等待，醒来后重新获取锁
//! - broadcast() 唤醒所有等待者
//!
//! 唤醒可能是"虚假"的：等待者醒来后必须重新检查条件。

use super::{Mutex, MutexGuard};
use crate::process::wait::WaitQueueHead;

/// 条件变量
///
/// # 使用示例
/// ```
/// use rux_pid::sync::{ConditionVariable, Mutex};
///
/// let mutex = Mutex::new(true);
/// let cond = ConditionVariable::new();
///
/// let mut ready = mutex.lock();
/// while !*ready {
///     ready = cond.wait(&mutex, ready);
/// }
/// *ready = false;
/// cond.broadcast();
/// drop(ready);
/// ```
#[derive(Debug)]
pub struct ConditionVariable {
    /// 等待队列
    wait: WaitQueueHead,
}

impl ConditionVariable {
    /// 创建新条件变量
    pub const fn new() -> Self {
        Self {
            wait: WaitQueueHead::new(),
        }
    }

    /// 等待条件满足（不可中断）
    ///
    /// # 参数
    /// * `mutex` - 关联的互斥锁
    /// * `guard` - `mutex` 的当前持有凭证
    ///
    /// # 行为
    /// 1. 持锁登记到等待队列
    /// 2. 释放互斥锁
    /// 3. 等待 broadcast
    /// 4. 重新获取互斥锁并返回新的凭证
    ///
    /// 对应 POSIX 的 `pthread_cond_wait()`
    pub fn wait<'a, T>(&self, mutex: &'a Mutex<T>, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        let entry = self.wait.add();
        drop(guard);

        self.wait.sleep(&entry);
        self.wait.remove(entry);

        mutex.lock()
    }

    /// 唤醒所有等待的进程
    ///
    /// 调用者应持有关联的互斥锁，保证条件的修改先于唤醒可见
    ///
    /// 对应 POSIX 的 `pthread_cond_broadcast()`
    pub fn broadcast(&self) -> usize {
        self.wait.wake_up_all()
    }

    /// 当前等待者数量
    pub fn waiters(&self) -> usize {
        self.wait.waiters()
    }
}

impl Default for ConditionVariable {
    fn default() -> Self {
        Self::new()
    }
}
