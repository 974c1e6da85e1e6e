//! Rux pid 子系统配置（自动生成）
//!
//! 此文件由 build.rs 根据 Kernel.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 内核名称
pub const KERNEL_NAME: &str = "Rux";

/// 内核版本
pub const KERNEL_VERSION: &str = "0.1.0";

/// 日志级别
pub const LOG_LEVEL: &str = "info";

// ============================================================
// 进程表配置
// ============================================================

/// "无 pid" 哨兵值
pub const INVALID_PID: u32 = 0;

/// 启动 (根) 进程的 pid
pub const BOOTUP_PID: u32 = 1;

/// 最小可分配 pid
pub const PID_MIN: u32 = 2;

/// 最大可分配 pid
pub const PID_MAX: u32 = 32767;

/// 进程表容量
pub const PROCS_MAX: usize = 128;
