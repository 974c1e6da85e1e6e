//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! 进程退出与等待 (exit / detach / join)
//!
//! 一条记录在 "已退出" 和 "已脱离父进程" 两个条件都成立时回收，
//! 由后完成的那一方负责：
//! - `detach`: 子进程已退出时立即回收
//! - `exit`: 自己已被 detach 时立即回收
//!
//! `join` 只读取退出码，不回收记录；同一目标可以被 join 多次，
//! 每次得到相同的退出码。

use alloc::sync::Arc;

use super::pid::{Pid, PidTable, BOOTUP_PID, INVALID_PID, PID_MAX, PID_MIN};
use super::wait::WaitFlags;
use crate::errno::Errno;
use crate::sync::ConditionVariable;

/// join / detach 的目标 pid 是否合法
#[inline]
fn valid_target(pid: Pid) -> bool {
    pid != INVALID_PID && pid != BOOTUP_PID && (PID_MIN..=PID_MAX).contains(&pid)
}

impl PidTable {
    /// 父进程放弃对子进程退出码的关心，子进程退出后即可回收
    ///
    /// # 返回
    /// - Ok(()): 成功
    /// - Err(EINVAL): child 是无效 pid / 启动进程 / 超出范围，
    ///   或已经被 detach，或 caller 不是它的父进程
    /// - Err(ESRCH): 找不到 child
    pub fn detach(&self, caller: Pid, child: Pid) -> Result<(), Errno> {
        if !valid_target(child) {
            return Err(Errno::InvalidArgument);
        }

        let mut state = self.state.lock();

        let info = state.get_mut(child).ok_or(Errno::NoSuchProcess)?;
        if info.ppid == INVALID_PID {
            return Err(Errno::InvalidArgument);
        }
        if info.ppid != caller {
            return Err(Errno::InvalidArgument);
        }

        info.ppid = INVALID_PID;
        info.detached = true;
        let exited = info.exited;

        if exited {
            state.drop_pid(child);
        }

        log::debug!("pid: {} detached {} (exited={})", caller, child, exited);
        Ok(())
    }

    /// 当前进程退出
    ///
    /// - 记录退出码
    /// - `disown_children` 为真时放弃所有子进程（与 detach 等价）
    /// - 唤醒所有在 join 中等待本进程的线程
    /// - 本进程已被 detach 时立即回收，否则成为僵尸进程等待父进程
    ///
    /// 每个 pid 只能调用一次，并且必须是 alloc_pid 分配出来的。
    pub fn exit(&self, pid: Pid, status: i32, disown_children: bool) {
        let mut state = self.state.lock();

        let info = match state.get_mut(pid) {
            Some(info) => info,
            None => panic!("pid: exit of unallocated pid {}", pid),
        };
        assert!(!info.exited, "pid: pid {} exited twice", pid);

        info.exited = true;
        info.exit_status = status;
        let detached = info.detached;
        let cv = Arc::clone(&info.cv);

        let disowned = if disown_children {
            state.disown_children(pid)
        } else {
            0
        };

        // 退出码和 exited 都已在锁内写好，唤醒后等待者重新持锁读取
        let woken = cv.broadcast();

        if detached {
            state.drop_pid(pid);
        }

        log::debug!(
            "pid: {} exited with {} (disowned {}, woke {}, reclaimed={})",
            pid,
            status,
            disowned,
            woken,
            detached
        );
    }

    /// 获取目标进程的退出码
    ///
    /// # 参数
    /// * `caller` - 调用者 pid
    /// * `target` - 目标 pid
    /// * `flags` - `WaitFlags::WNOHANG` 时目标未退出则立即返回
    ///
    /// # 返回
    /// - Ok(Some((target, status))): 目标已退出
    /// - Ok(None): 设置了 WNOHANG 且目标尚未退出
    /// - Err(EINVAL): target 不合法或已被 detach
    /// - Err(ESRCH): 找不到 target（包括等待期间被回收）
    /// - Err(EDEADLK): target 就是 caller
    pub fn join(&self, caller: Pid, target: Pid, flags: WaitFlags) -> Result<Option<(Pid, i32)>, Errno> {
        if !valid_target(target) {
            return Err(Errno::InvalidArgument);
        }

        let mut state = self.state.lock();
        let mut waited_on: Option<Arc<ConditionVariable>> = None;

        loop {
            let info = state.get(target).ok_or(Errno::NoSuchProcess)?;

            // 睡眠期间记录被回收且 pid 被重新分配
            if let Some(cv) = &waited_on {
                if !Arc::ptr_eq(cv, &info.cv) {
                    return Err(Errno::NoSuchProcess);
                }
            }

            if info.ppid == INVALID_PID {
                return Err(Errno::InvalidArgument);
            }
            if target == caller {
                return Err(Errno::Deadlock);
            }

            if info.exited {
                log::debug!("pid: {} joined {} (status {})", caller, target, info.exit_status);
                return Ok(Some((target, info.exit_status)));
            }

            if flags.contains(WaitFlags::WNOHANG) {
                return Ok(None);
            }

            let cv = Arc::clone(&info.cv);
            log::trace!("pid: {} waiting for {}", caller, target);
            state = cv.wait(&self.state, state);
            waited_on = Some(cv);
        }
    }

    /// target 的父进程是否为 parent
    ///
    /// target 不存在时返回 false
    pub fn is_parent(&self, target: Pid, parent: Pid) -> bool {
        if target == INVALID_PID {
            return false;
        }
        self.state
            .lock()
            .get(target)
            .map_or(false, |info| info.ppid == parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_rejects_reserved_pids() {
        let table = PidTable::new();
        for pid in [INVALID_PID, BOOTUP_PID, PID_MAX + 1] {
            assert_eq!(
                table.join(BOOTUP_PID, pid, WaitFlags::WNOHANG),
                Err(Errno::InvalidArgument)
            );
            assert_eq!(table.detach(BOOTUP_PID, pid), Err(Errno::InvalidArgument));
        }
    }

    #[test]
    fn test_unknown_pid_is_esrch() {
        let table = PidTable::new();
        assert_eq!(
            table.join(BOOTUP_PID, PID_MIN + 7, WaitFlags::empty()),
            Err(Errno::NoSuchProcess)
        );
        assert_eq!(table.detach(BOOTUP_PID, PID_MIN + 7), Err(Errno::NoSuchProcess));
    }

    #[test]
    fn test_exit_then_detach_reclaims() {
        let table = PidTable::new();
        let child = table.alloc_pid(BOOTUP_PID).unwrap();

        table.exit(child, 7, false);
        assert!(table.exists(child));
        assert_eq!(table.detach(BOOTUP_PID, child), Ok(()));
        assert!(!table.exists(child));
        assert_eq!(table.nr_procs(), 1);
    }

    #[test]
    fn test_detach_then_exit_reclaims() {
        let table = PidTable::new();
        let child = table.alloc_pid(BOOTUP_PID).unwrap();

        assert_eq!(table.detach(BOOTUP_PID, child), Ok(()));
        assert!(table.exists(child));
        table.exit(child, 0, false);
        assert!(!table.exists(child));
    }

    #[test]
    fn test_is_parent() {
        let table = PidTable::new();
        let child = table.alloc_pid(BOOTUP_PID).unwrap();

        assert!(table.is_parent(child, BOOTUP_PID));
        assert!(!table.is_parent(child, child));
        assert!(!table.is_parent(PID_MIN + 50, BOOTUP_PID));
        assert!(!table.is_parent(INVALID_PID, BOOTUP_PID));

        table.detach(BOOTUP_PID, child).unwrap();
        assert!(table.is_parent(child, INVALID_PID));
        assert!(!table.is_parent(child, BOOTUP_PID));
    }

    #[test]
    #[should_panic(expected = "exited twice")]
    fn test_double_exit_panics() {
        let table = PidTable::new();
        let child = table.alloc_pid(BOOTUP_PID).unwrap();
        table.exit(child, 1, false);
        table.exit(child, 2, false);
    }

    #[test]
    #[should_panic(expected = "exit of unallocated pid")]
    fn test_exit_without_pid_panics() {
        let table = PidTable::new();
        table.exit(PID_MIN + 3, 0, false);
    }
}
