//! Rux 进程 ID 子系统
//!
//! 分配 pid、记录退出码，并实现父子进程之间的 join / detach 协议。
//! 线程抽象、调度和系统调用封装都在本 crate 之外。
//!
//! ```
//! use rux_pid::process::{PidTable, WaitFlags, BOOTUP_PID};
//!
//! let table = PidTable::new();
//! let child = table.alloc_pid(BOOTUP_PID).unwrap();
//! assert_eq!(table.join(BOOTUP_PID, child, WaitFlags::WNOHANG), Ok(None));
//!
//! table.exit(child, 42, false);
//! assert_eq!(table.join(BOOTUP_PID, child, WaitFlags::empty()), Ok(Some((child, 42))));
//! table.detach(BOOTUP_PID, child).unwrap();
//! ```

#![no_std]

extern crate alloc;
extern crate log;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod errno;
pub mod process;
pub mod sync;

#[cfg(test)]
mod tests;

/// Kernel.toml `[debug] log_level` 对应的日志级别
///
/// 本 crate 不安装 logger，内核的 logger 初始化时用它设置 `log::set_max_level`。
/// 无法识别的取值按 `Info` 处理。
pub fn max_log_level() -> log::LevelFilter {
    config::LOG_LEVEL.parse().unwrap_or(log::LevelFilter::Info)
}
