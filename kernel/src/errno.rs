//! MIT License
//!
//! Copyright (c) 2026 Fei Wang
//!
//! pid 子系统错误代码
//!
//! 取值和 include/uapi/asm-generic/errno.h 一致

use core::fmt;

/// 标准错误代码
///
/// 使用方法：
/// ```rust
/// use rux_pid::errno::Errno;
///
/// fn check(pid: u32) -> Result<(), Errno> {
///     if pid == 0 {
///         return Err(Errno::InvalidArgument);
///     }
///     Ok(())
/// }
///
/// // 系统调用层返回负数
/// assert_eq!(check(0).unwrap_err().as_neg_i32(), -22);
/// ```
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Errno {
    /// No such process (ESRCH, 3)
    NoSuchProcess = 3,

    /// Try again (EAGAIN, 11)
    ///
    /// 进程表已满
    TryAgain = 11,

    /// Out of memory (ENOMEM, 12)
    OutOfMemory = 12,

    /// Invalid argument (EINVAL, 22)
    InvalidArgument = 22,

    /// Resource deadlock would occur (EDEADLK, 35)
    Deadlock = 35,
}

impl Errno {
    /// 获取错误代码的正数值（用于比较）
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// 获取错误代码的负数值（用于系统调用返回）
    #[inline]
    pub const fn as_neg_i32(self) -> i32 {
        -(self as i32)
    }

    /// 获取错误代码的负数值（u64，用于系统调用返回）
    #[inline]
    pub const fn as_neg_u64(self) -> u64 {
        (-(self as i32)) as u64
    }

    /// 错误名称，日志用
    pub const fn name(self) -> &'static str {
        match self {
            Errno::NoSuchProcess => "ESRCH",
            Errno::TryAgain => "EAGAIN",
            Errno::OutOfMemory => "ENOMEM",
            Errno::InvalidArgument => "EINVAL",
            Errno::Deadlock => "EDEADLK",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_i32())
    }
}

/// 常用的错误代码常量
pub mod constants {
    pub const ESRCH: i32 = 3;
    pub const EAGAIN: i32 = 11;
    pub const ENOMEM: i32 = 12;
    pub const EINVAL: i32 = 22;
    pub const EDEADLK: i32 = 35;
}
