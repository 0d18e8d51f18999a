//! Toolfetch logging system
//!
//! Leveled console logging mirrored to a per-run log file under the build
//! tree, with a short host-info header.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::process::Command;
use std::sync::{Arc, Mutex, OnceLock};

static LOGGER: OnceLock<Arc<Mutex<ToolfetchLogger>>> = OnceLock::new();

// ============================================================================
// Host Information
// ============================================================================

/// The few host facts that matter when a downloaded toolchain misbehaves.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub tool_version: String,
    pub kernel: String,
    pub glibc_version: String,
}

impl HostInfo {
    pub fn detect() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            kernel: detect_kernel(),
            glibc_version: detect_glibc(),
        }
    }

    pub fn to_log_header(&self) -> String {
        format!(
            "toolfetch v{} - {} (kernel {}, glibc {})",
            self.tool_version,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.kernel,
            self.glibc_version
        )
    }
}

fn detect_kernel() -> String {
    if let Ok(output) = Command::new("uname").arg("-r").output() {
        if output.status.success() {
            return String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
    }
    "Unknown".to_string()
}

fn detect_glibc() -> String {
    if let Ok(output) = Command::new("ldd").arg("--version").output() {
        if output.status.success() {
            // First line usually: "ldd (GNU libc) 2.35"
            let out = String::from_utf8_lossy(&output.stdout);
            if let Some(line) = out.lines().next() {
                return line.split(')').next_back().unwrap_or("Unknown").trim().to_string();
            }
        }
    }
    "Unknown".to_string()
}

// ============================================================================
// Log Levels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Info,
    Download,
    Install,
    Warning,
    Error,
}

impl LogLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Info => "[INFO]",
            LogLevel::Download => "[DOWNLOAD]",
            LogLevel::Install => "[INSTALL]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

// ============================================================================
// Toolfetch Logger
// ============================================================================

pub struct ToolfetchLogger {
    log_file: Option<File>,
}

impl ToolfetchLogger {
    pub fn new() -> Self {
        let log_dir = crate::build_path!("logs");
        let _ = fs::create_dir_all(&log_dir);

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("toolfetch_{}.log", timestamp));

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok();

        let mut logger = Self { log_file };

        let header = HostInfo::detect().to_log_header();
        logger.write_raw(&header);

        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.log_file {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }

        // Also print to console
        println!("{}", msg);
    }

    pub fn log(&mut self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        let formatted = format!("[{}] {} {}", timestamp, level.prefix(), message);
        self.write_raw(&formatted);
    }
}

impl Default for ToolfetchLogger {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Global Logger Access
// ============================================================================

/// Initialize the global logger (call once at startup)
pub fn init_logger() {
    LOGGER.get_or_init(|| Arc::new(Mutex::new(ToolfetchLogger::new())));
}

/// Get the global logger instance
fn logger() -> Arc<Mutex<ToolfetchLogger>> {
    LOGGER
        .get_or_init(|| Arc::new(Mutex::new(ToolfetchLogger::new())))
        .clone()
}

// ============================================================================
// Convenience Logging Functions
// ============================================================================

pub fn log_info(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Info, message);
    }
}

pub fn log_download(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Download, message);
    }
}

pub fn log_install(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Install, message);
    }
}

pub fn log_warning(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Warning, message);
    }
}

pub fn log_error(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Error, message);
    }
}
