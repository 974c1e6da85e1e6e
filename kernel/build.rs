//! Rux pid 子系统构建脚本
//!
//! 这个脚本在编译前运行，负责：
//! 1. 解析 Kernel.toml 配置文件
//! 2. 校验进程表参数
//! 3. 生成 src/config.rs

use std::env;
use std::fs;
use std::path::PathBuf;

/// 进程表参数
struct ProcessConfig {
    invalid_pid: i64,
    bootup_pid: i64,
    pid_min: i64,
    pid_max: i64,
    procs_max: i64,
}

impl ProcessConfig {
    fn from_config(config: &toml::Value) -> Self {
        let get = |key: &str, default: i64| {
            config
                .get("process")
                .and_then(|p| p.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(default)
        };

        Self {
            invalid_pid: get("invalid_pid", 0),
            bootup_pid: get("bootup_pid", 1),
            pid_min: get("pid_min", 2),
            pid_max: get("pid_max", 32767),
            procs_max: get("procs_max", 128),
        }
    }

    /// 参数不合法时直接终止构建
    fn validate(&self) {
        if self.invalid_pid < 0 || self.bootup_pid <= self.invalid_pid {
            panic!("Kernel.toml: 需要 0 <= invalid_pid < bootup_pid");
        }
        if self.pid_min <= self.bootup_pid {
            panic!("Kernel.toml: pid_min 必须大于 bootup_pid");
        }
        if self.pid_max < self.pid_min || self.pid_max > i64::from(u32::MAX) {
            panic!("Kernel.toml: pid_max 必须在 [pid_min, u32::MAX] 内");
        }
        if self.procs_max <= self.bootup_pid {
            panic!("Kernel.toml: procs_max 必须大于 bootup_pid");
        }
        if self.pid_max - self.pid_min + 1 < self.procs_max {
            panic!("Kernel.toml: pid 范围小于进程表容量");
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=../Kernel.toml");

    let config_content = fs::read_to_string("../Kernel.toml").expect("无法读取 Kernel.toml");
    let config: toml::Value = toml::from_str(&config_content).expect("Kernel.toml 解析失败");

    let process = ProcessConfig::from_config(&config);
    process.validate();

    generate_config_code(&config, &process);
}

fn generate_config_code(config: &toml::Value, process: &ProcessConfig) {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR 未设置"));

    let kernel_name = config
        .get("general")
        .and_then(|g| g.get("name"))
        .and_then(|v| v.as_str())
        .unwrap_or("Rux");

    let kernel_version = config
        .get("general")
        .and_then(|g| g.get("version"))
        .and_then(|v| v.as_str())
        .unwrap_or("0.1.0");

    let log_level = config
        .get("debug")
        .and_then(|d| d.get("log_level"))
        .and_then(|v| v.as_str())
        .unwrap_or("info");

    let config_header = format!(
        r#"//! Rux pid 子系统配置（自动生成）
//!
//! 此文件由 build.rs 根据 Kernel.toml 自动生成，请勿手动修改

// ============================================================
// 基本信息
// ============================================================

/// 内核名称
pub const KERNEL_NAME: &str = "{}";

/// 内核版本
pub const KERNEL_VERSION: &str = "{}";

/// 日志级别
pub const LOG_LEVEL: &str = "{}";

// ============================================================
// 进程表配置
// ============================================================

/// "无 pid" 哨兵值
pub const INVALID_PID: u32 = {};

/// 启动 (根) 进程的 pid
pub const BOOTUP_PID: u32 = {};

/// 最小可分配 pid
pub const PID_MIN: u32 = {};

/// 最大可分配 pid
pub const PID_MAX: u32 = {};

/// 进程表容量
pub const PROCS_MAX: usize = {};
"#,
        kernel_name,
        kernel_version,
        log_level,
        process.invalid_pid,
        process.bootup_pid,
        process.pid_min,
        process.pid_max,
        process.procs_max,
    );

    let config_file = manifest_dir.join("src").join("config.rs");

    // 只有内容变化时才写入，避免每次编译都更新文件时间戳
    let existing_content = fs::read_to_string(&config_file).unwrap_or_default();
    if existing_content != config_header {
        fs::write(&config_file, &config_header).expect("写入配置文件失败");
    }
}
