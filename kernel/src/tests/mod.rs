//! pid 子系统场景测试
//!
//! 每个文件覆盖一组生命周期场景，使用独立的 `PidTable`；
//! 只有 `bootstrap` 使用全局进程表。
//!
//! 运行测试：
//! ```bash
//! cargo test -p rux-pid
//! ```

mod pid_alloc;

use std::thread;

use crate::process::{Pid, PidTable};

/// 在 pid 的等待队列上睡眠的 join 数量
fn waiters_on(table: &PidTable, pid: Pid) -> usize {
    table
        .state
        .lock()
        .get(pid)
        .map_or(0, |info| info.cv.waiters())
}

/// 等到 pid 上有 n 个 join 在睡眠
fn wait_for_waiters(table: &PidTable, pid: Pid, n: usize) {
    while waiters_on(table, pid) < n {
        thread::yield_now();
    }
}
