//! 进程 ID 管理模块
//!
//! - `pid`: 进程表、pid 分配、记录生命周期
//! - `exit`: exit / detach / join 协议
//! - `wait`: 等待队列和 join 选项
//!
//! 内核使用一张全局进程表，启动时由 [`pid_bootstrap`] 建立；
//! 下面的 `pid_*` 函数都作用于这张表。

pub mod exit;
pub mod pid;
pub mod wait;

pub use pid::{Pid, PidInfoSnapshot, PidTable, BOOTUP_PID, INVALID_PID, PID_MAX, PID_MIN, PROCS_MAX};
pub use wait::WaitFlags;

use crate::errno::Errno;
use crate::sync::Once;

/// 全局进程表
static PID_TABLE: Once<PidTable> = Once::new();

fn table() -> &'static PidTable {
    match PID_TABLE.get() {
        Some(table) => table,
        None => panic!("pid: used before pid_bootstrap"),
    }
}

/// 初始化全局进程表，只能调用一次
///
/// 建立启动进程的记录（父进程为 INVALID_PID）。失败时内核无法继续启动。
pub fn pid_bootstrap() {
    let mut created = false;
    PID_TABLE.call_once(|| {
        created = true;
        PidTable::new()
    });
    assert!(created, "pid: pid_bootstrap called twice");

    log::info!(
        "pid: {} {} process table ready (pids {}..={}, {} slots)",
        crate::config::KERNEL_NAME,
        crate::config::KERNEL_VERSION,
        PID_MIN,
        PID_MAX,
        PROCS_MAX
    );
}

/// 为 caller 的新子进程分配 pid
pub fn pid_alloc(caller: Pid) -> Result<Pid, Errno> {
    table().alloc_pid(caller)
}

/// 撤销 caller 分配的、尚未运行的 pid
pub fn pid_release(caller: Pid, pid: Pid) {
    table().release_pid(caller, pid)
}

/// caller 放弃子进程 child
pub fn pid_detach(caller: Pid, child: Pid) -> Result<(), Errno> {
    table().detach(caller, child)
}

/// pid 退出，见 [`PidTable::exit`]
pub fn pid_exit(pid: Pid, status: i32, dodetach: bool) {
    table().exit(pid, status, dodetach)
}

/// caller 等待 target 退出，见 [`PidTable::join`]
pub fn pid_join(caller: Pid, target: Pid, flags: WaitFlags) -> Result<Option<(Pid, i32)>, Errno> {
    table().join(caller, target, flags)
}

/// target 的父进程是否为 parent
pub fn target_parent(target: Pid, parent: Pid) -> bool {
    table().is_parent(target, parent)
}

/// 全局进程表中的 pid 数量
pub fn nr_procs() -> usize {
    table().nr_procs()
}
