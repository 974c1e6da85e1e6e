//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!

//! PID 管理
//!
//! 进程表是一个简单的定长哈希表：以 `pid % PROCS_MAX` 为下标，每个槽位
//! 最多一个进程。新分配的 pid 如果会造成冲突，就直接跳过这个 pid。
//!
//! - PID 0: 无效 pid (`INVALID_PID`)
//! - PID 1: 启动进程 (`BOOTUP_PID`)，由 `PidTable::new` 直接建立
//! - PID [PID_MIN, PID_MAX]: 普通 pid，循环分配
//!
//! 整张表（游标、计数以及每条记录的每个字段）都由同一把锁保护，
//! 记录本身从不离开锁的保护范围，调用者只拿到 pid。

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::errno::Errno;
use crate::sync::{ConditionVariable, Mutex};

pub use crate::config::{BOOTUP_PID, INVALID_PID, PID_MAX, PID_MIN, PROCS_MAX};

/// 进程 ID 类型
pub type Pid = u32;

/// 未退出时 exit_status 的占位值，一眼就能认出是无效值
pub(crate) const STATUS_UNSET: i32 = 0xbaad;

/// release 回收的记录使用的退出码
pub(crate) const STATUS_RELEASED: i32 = 0xdead;

/// 单个进程的 pid 记录
///
/// `ppid == INVALID_PID` 表示父进程已不再关心本进程；此时如果
/// `exited` 也为真，这条记录就可以回收。
#[derive(Debug)]
pub(crate) struct PidInfo {
    pub(crate) pid: Pid,
    pub(crate) ppid: Pid,
    pub(crate) exited: bool,
    /// 仅在 `exited` 为真时有意义
    pub(crate) exit_status: i32,
    pub(crate) detached: bool,
    /// 等待本进程退出的 join 在这里睡眠
    pub(crate) cv: Arc<ConditionVariable>,
}

impl PidInfo {
    fn new(pid: Pid, ppid: Pid) -> Self {
        assert!(pid != INVALID_PID);

        Self {
            pid,
            ppid,
            exited: false,
            exit_status: STATUS_UNSET,
            detached: false,
            cv: Arc::new(ConditionVariable::new()),
        }
    }
}

/// 某条记录在某一时刻的只读副本，供诊断 / procfs 使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PidInfoSnapshot {
    pub pid: Pid,
    pub ppid: Pid,
    pub exited: bool,
    /// 未退出时为 None
    pub exit_status: Option<i32>,
    pub detached: bool,
}

impl From<&PidInfo> for PidInfoSnapshot {
    fn from(info: &PidInfo) -> Self {
        Self {
            pid: info.pid,
            ppid: info.ppid,
            exited: info.exited,
            exit_status: info.exited.then_some(info.exit_status),
            detached: info.detached,
        }
    }
}

/// 锁内状态：槽位数组、下一个候选 pid、已分配数量
#[derive(Debug)]
pub(crate) struct PidState {
    slots: Vec<Option<PidInfo>>,
    nextpid: Pid,
    nprocs: usize,
}

#[inline]
fn slot_of(pid: Pid) -> usize {
    pid as usize % PROCS_MAX
}

impl PidState {
    /// 建立空表并放入启动进程
    fn with_bootup() -> Result<Self, Errno> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(PROCS_MAX)
            .map_err(|_| Errno::OutOfMemory)?;
        slots.resize_with(PROCS_MAX, || None);

        let mut state = Self {
            slots,
            nextpid: PID_MIN,
            nprocs: 0,
        };
        state.put(PidInfo::new(BOOTUP_PID, INVALID_PID));
        Ok(state)
    }

    /// 查找 pid 对应的记录；槽位里是别的 pid 时视为不存在
    pub(crate) fn get(&self, pid: Pid) -> Option<&PidInfo> {
        assert!(pid != INVALID_PID);
        self.slots[slot_of(pid)]
            .as_ref()
            .filter(|info| info.pid == pid)
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut PidInfo> {
        assert!(pid != INVALID_PID);
        self.slots[slot_of(pid)]
            .as_mut()
            .filter(|info| info.pid == pid)
    }

    /// 插入新记录，对应槽位必须为空
    fn put(&mut self, info: PidInfo) {
        let slot = slot_of(info.pid);
        assert!(self.slots[slot].is_none(), "pid: slot {} already occupied", slot);
        self.slots[slot] = Some(info);
        self.nprocs += 1;
    }

    /// 从表中移除并释放记录
    ///
    /// 记录必须已经退出，并且父进程已不再关心它
    pub(crate) fn drop_pid(&mut self, pid: Pid) {
        let slot = slot_of(pid);
        let info = match self.slots[slot].take() {
            Some(info) => info,
            None => panic!("pid: drop of unallocated pid {}", pid),
        };
        assert_eq!(info.pid, pid, "pid: slot {} holds another pid", slot);
        assert!(info.exited, "pid: drop of running pid {}", pid);
        assert_eq!(info.ppid, INVALID_PID, "pid: drop of pid {} with live parent", pid);

        self.nprocs -= 1;
        log::trace!("pid: reclaimed {} (status {:#x})", pid, info.exit_status);
    }

    /// nextpid 到达 PID_MAX 后回到 PID_MIN
    fn inc_nextpid(&mut self) {
        if self.nextpid >= PID_MAX {
            self.nextpid = PID_MIN;
        } else {
            self.nextpid += 1;
        }
    }

    /// 从 nextpid 开始找第一个空槽位
    ///
    /// 调用者已保证 nprocs < PROCS_MAX，所以一定能找到；
    /// 循环次数超过上限说明计数出错。
    fn next_free_pid(&mut self) -> Pid {
        let mut count = 0;
        while self.slots[slot_of(self.nextpid)].is_some() {
            assert!(
                count < PROCS_MAX * 2 + 5,
                "pid: allocator scan did not terminate (nprocs={})",
                self.nprocs
            );
            count += 1;
            self.inc_nextpid();
        }
        self.nextpid
    }

    /// 放弃 parent 的所有子进程；已经退出的子进程立即回收
    ///
    /// # 返回
    /// 被放弃的子进程数量
    pub(crate) fn disown_children(&mut self, parent: Pid) -> usize {
        let mut reap: Vec<Pid> = Vec::new();
        let mut disowned = 0;

        for info in self.slots.iter_mut().flatten() {
            if info.ppid != parent || info.pid == parent {
                continue;
            }
            info.ppid = INVALID_PID;
            info.detached = true;
            disowned += 1;
            if info.exited {
                reap.push(info.pid);
            }
        }

        for pid in reap {
            self.drop_pid(pid);
        }
        disowned
    }

    pub(crate) fn nprocs(&self) -> usize {
        self.nprocs
    }
}

/// 进程表
///
/// 一把锁保护整张表的监视器 (monitor)，所有生命周期操作都在这里
#[derive(Debug)]
pub struct PidTable {
    pub(crate) state: Mutex<PidState>,
}

impl PidTable {
    /// 建立进程表，其中只有启动进程
    ///
    /// # Panics
    /// 内存不足时直接 panic，启动无法继续
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(table) => table,
            Err(e) => panic!("pid: out of memory creating pid table: {}", e),
        }
    }

    /// 建立进程表，内存不足时返回 ENOMEM
    pub fn try_new() -> Result<Self, Errno> {
        Ok(Self {
            state: Mutex::new(PidState::with_bootup()?),
        })
    }

    /// 分配一个新的 pid，父进程为 `caller`
    ///
    /// # 返回
    /// - Ok(pid): 新 pid
    /// - Err(EAGAIN): 进程表已满
    pub fn alloc_pid(&self, caller: Pid) -> Result<Pid, Errno> {
        assert!(caller != INVALID_PID, "pid: alloc from a thread without a pid");

        let mut state = self.state.lock();

        if state.nprocs == PROCS_MAX {
            log::warn!("pid: process table full ({} entries)", PROCS_MAX);
            return Err(Errno::TryAgain);
        }

        let pid = state.next_free_pid();
        state.put(PidInfo::new(pid, caller));
        state.inc_nextpid();

        log::debug!("pid: allocated {} (parent {})", pid, caller);
        Ok(pid)
    }

    /// 撤销一个尚未运行的 pid
    ///
    /// 子进程还没开始运行就失败时由父进程调用；不会有人再为它调用 exit，
    /// 所以直接回收，不走 exited + detached 的配对流程。
    pub fn release_pid(&self, caller: Pid, pid: Pid) {
        assert!((PID_MIN..=PID_MAX).contains(&pid), "pid: release of bad pid {}", pid);

        let mut state = self.state.lock();

        let info = match state.get_mut(pid) {
            Some(info) => info,
            None => panic!("pid: release of unallocated pid {}", pid),
        };
        assert!(!info.exited, "pid: release of exited pid {}", pid);
        assert_eq!(info.ppid, caller, "pid: release of pid {} by non-parent {}", pid, caller);

        info.exit_status = STATUS_RELEASED;
        info.exited = true;
        info.ppid = INVALID_PID;
        info.detached = true;
        let cv = Arc::clone(&info.cv);

        // 其他进程可能已在 join 它；唤醒后重新查找会得到 ESRCH
        let woken = cv.broadcast();
        state.drop_pid(pid);
        log::debug!("pid: released {} (parent {}, woke {})", pid, caller, woken);
    }

    /// 当前已分配的 pid 数量（含启动进程）
    pub fn nr_procs(&self) -> usize {
        self.state.lock().nprocs()
    }

    /// pid 是否有对应的记录
    pub fn exists(&self, pid: Pid) -> bool {
        pid != INVALID_PID && self.state.lock().get(pid).is_some()
    }

    /// 按 pid 排序的全部记录副本
    pub fn snapshot(&self) -> Vec<PidInfoSnapshot> {
        let state = self.state.lock();
        let mut out: Vec<PidInfoSnapshot> = state
            .slots
            .iter()
            .flatten()
            .map(PidInfoSnapshot::from)
            .collect();
        drop(state);

        out.sort_unstable_by_key(|s| s.pid);
        out
    }
}

impl Default for PidTable {
    fn default() -> Self {
        Self::new()
    }
}
