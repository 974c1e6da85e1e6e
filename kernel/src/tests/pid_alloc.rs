//! pid 分配测试
//!
//! 范围、唯一性、表满以及回收后的 pid 复用

use std::collections::HashSet;
use std::vec::Vec;

use crate::errno::Errno;
use crate::process::{PidTable, BOOTUP_PID, PID_MAX, PID_MIN, PROCS_MAX};

#[test]
fn test_pids_unique_and_in_range() {
    let table = PidTable::new();
    let mut seen = HashSet::new();

    for _ in 0..PROCS_MAX - 1 {
        let pid = table.alloc_pid(BOOTUP_PID).unwrap();
        assert!((PID_MIN..=PID_MAX).contains(&pid));
        assert!(seen.insert(pid), "pid {} handed out twice", pid);
    }
    assert_eq!(table.nr_procs(), PROCS_MAX);
}

#[test]
fn test_table_full_returns_eagain() {
    let table = PidTable::new();

    // 启动进程占一个槽位
    for _ in 0..PROCS_MAX - 1 {
        table.alloc_pid(BOOTUP_PID).unwrap();
    }
    assert_eq!(table.alloc_pid(BOOTUP_PID), Err(Errno::TryAgain));
    assert_eq!(table.alloc_pid(BOOTUP_PID), Err(Errno::TryAgain));
    assert_eq!(table.nr_procs(), PROCS_MAX);
}

#[test]
fn test_slot_freed_after_reclaim() {
    let table = PidTable::new();
    let pids: Vec<_> = (0..PROCS_MAX - 1)
        .map(|_| table.alloc_pid(BOOTUP_PID).unwrap())
        .collect();
    assert_eq!(table.alloc_pid(BOOTUP_PID), Err(Errno::TryAgain));

    let victim = pids[10];
    table.exit(victim, 0, false);
    table.detach(BOOTUP_PID, victim).unwrap();

    // 空出来的槽位可以被新的 pid 使用
    let fresh = table.alloc_pid(BOOTUP_PID).unwrap();
    assert_ne!(fresh, victim);
    assert_eq!(fresh as usize % PROCS_MAX, victim as usize % PROCS_MAX);
    assert_eq!(table.nr_procs(), PROCS_MAX);
}

#[test]
fn test_pid_reused_after_wrap() {
    let table = PidTable::new();
    let parent = table.alloc_pid(BOOTUP_PID).unwrap();
    let x = table.alloc_pid(parent).unwrap();

    // 先 detach 再 exit
    table.detach(parent, x).unwrap();
    table.exit(x, 9, false);
    assert!(!table.exists(x));

    // 游标绕一圈后回到 x
    let mut reused = None;
    for _ in 0..=(PID_MAX - PID_MIN + 1) {
        let pid = table.alloc_pid(BOOTUP_PID).unwrap();
        if pid == x {
            reused = Some(pid);
            break;
        }
        table.release_pid(BOOTUP_PID, pid);
    }
    assert_eq!(reused, Some(x));

    // 新记录与旧进程无关
    assert!(table.is_parent(x, BOOTUP_PID));
    let snap = table.snapshot().into_iter().find(|s| s.pid == x).unwrap();
    assert!(!snap.exited);
    assert!(!snap.detached);
    assert_eq!(snap.exit_status, None);
}

#[test]
fn test_release_does_not_disturb_siblings() {
    let table = PidTable::new();
    let a = table.alloc_pid(BOOTUP_PID).unwrap();
    let b = table.alloc_pid(BOOTUP_PID).unwrap();

    table.release_pid(BOOTUP_PID, a);
    assert!(!table.exists(a));
    assert!(table.exists(b));

    let pids: Vec<_> = table.snapshot().iter().map(|s| s.pid).collect();
    assert_eq!(pids, [BOOTUP_PID, b]);
}
