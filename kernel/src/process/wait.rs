//! 等待队列 (Wait Queue) 机制
//!
//! 参考 Linux 内核的等待队列设计：
//! - `include/linux/wait.h` - 等待队列数据结构
//! - `kernel/sched/wait.c` - 等待操作
//!
//! 核心概念：
//! - 等待者在持锁期间登记 (add)，记下当前的唤醒代数
//! - 唤醒者在持锁期间推进唤醒代数 (wake_up_all)
//! - 等待者释放锁后等待代数变化，醒来后必须重新检查条件
//!
//! 登记和唤醒都在同一把锁下完成，所以不会丢失唤醒。

use core::sync::atomic::{AtomicUsize, Ordering};

use bitflags::bitflags;

bitflags! {
    /// join 选项，对应 `<kern/wait.h>` 的 W* 标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WaitFlags: u32 {
        /// 目标未退出时立即返回，不阻塞
        const WNOHANG = 0x0000_0001;
    }
}

/// 等待队列项
///
/// 对应 Linux 的 struct wait_queue_entry，这里只记录登记时的唤醒代数
#[derive(Debug)]
pub struct WaitQueueEntry {
    generation: usize,
}

impl WaitQueueEntry {
    /// 登记时的唤醒代数
    pub fn generation(&self) -> usize {
        self.generation
    }
}

/// 等待队列头
///
/// 对应 Linux 的 struct wait_queue_head
#[derive(Debug)]
pub struct WaitQueueHead {
    /// 唤醒代数，每次 wake_up_all 加一
    generation: AtomicUsize,
    /// 当前登记的等待者数量
    waiters: AtomicUsize,
}

impl WaitQueueHead {
    /// 创建新的等待队列头
    ///
    /// 对应 Linux 的 DECLARE_WAIT_QUEUE_HEAD()
    pub const fn new() -> Self {
        Self {
            generation: AtomicUsize::new(0),
            waiters: AtomicUsize::new(0),
        }
    }

    /// 添加到等待队列
    ///
    /// 必须在持有保护条件的锁时调用
    ///
    /// 对应 Linux 的 add_wait_queue()
    pub fn add(&self) -> WaitQueueEntry {
        self.waiters.fetch_add(1, Ordering::AcqRel);
        WaitQueueEntry {
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    /// 从等待队列移除
    ///
    /// 对应 Linux 的 remove_wait_queue()
    pub fn remove(&self, entry: WaitQueueEntry) {
        let _ = entry;
        self.waiters.fetch_sub(1, Ordering::AcqRel);
    }

    /// 检查等待项是否已被唤醒
    pub fn is_woken(&self, entry: &WaitQueueEntry) -> bool {
        self.generation.load(Ordering::Acquire) != entry.generation
    }

    /// 等待直到 entry 被唤醒
    ///
    /// 调用前必须已经释放保护条件的锁。
    /// 这里只是忙等；接入调度器后由调度器的睡眠接口替换这个循环，
    /// 让出 CPU 直到 `wake_up_all` 把线程放回就绪队列。
    pub fn sleep(&self, entry: &WaitQueueEntry) {
        while !self.is_woken(entry) {
            core::hint::spin_loop();
        }
    }

    /// 唤醒所有等待的进程
    ///
    /// # 返回
    /// 被唤醒的等待者数量
    ///
    /// 对应 Linux 的 wake_up_all()
    pub fn wake_up_all(&self) -> usize {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.waiters.load(Ordering::Acquire)
    }

    /// 当前等待者数量
    pub fn waiters(&self) -> usize {
        self.waiters.load(Ordering::Acquire)
    }
}

impl Default for WaitQueueHead {
    fn default() -> Self {
        Self::new()
    }
}
