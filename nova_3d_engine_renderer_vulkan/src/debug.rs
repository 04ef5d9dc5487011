/// Vulkan validation messenger - routes validation layer messages to the engine logger
///
/// Compiled only with the `vulkan-validation` feature. Messages are logged
/// under `nova3d::vulkan::validation`, counted per severity, and identical
/// messages are grouped with a repeat counter.

use ash::vk;
use colored::*;
use nova_3d_engine::nova3d::Engine;
use nova_3d_engine::nova3d::log::LogSeverity;
use rustc_hash::FxHashMap;
use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

const SOURCE: &str = "nova3d::vulkan::validation";

/// Whether the callback forwards messages (off once the device is being torn down)
static ENABLED: AtomicBool = AtomicBool::new(false);

/// Message counts by bucket: error, warning, info, verbose
static COUNTS: [AtomicU32; 4] = [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];

/// Occurrences of each distinct message text
static MESSAGE_TRACKER: Mutex<Option<FxHashMap<String, u32>>> = Mutex::new(None);

/// Validation message counts since the device was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }
}

/// Counter bucket for an engine severity
fn bucket(severity: LogSeverity) -> usize {
    match severity {
        LogSeverity::Error => 0,
        LogSeverity::Warn => 1,
        LogSeverity::Info | LogSeverity::Debug => 2,
        LogSeverity::Trace => 3,
    }
}

/// Count one more occurrence of `message`, returning the running count
fn track_message(message: &str) -> u32 {
    let Ok(mut guard) = MESSAGE_TRACKER.lock() else {
        return 1;
    };
    let count = guard
        .get_or_insert_with(FxHashMap::default)
        .entry(message.to_string())
        .or_insert(0);
    *count += 1;
    *count
}

/// Engine severity for a Vulkan message severity
fn severity_from_vk(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> LogSeverity {
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        LogSeverity::Error
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        LogSeverity::Warn
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        LogSeverity::Debug
    } else {
        LogSeverity::Trace
    }
}

fn type_name(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    [
        (vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION, "Validation"),
        (vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE, "Performance"),
    ]
    .into_iter()
    .find(|(flag, _)| message_type.contains(*flag))
    .map_or("General", |(_, name)| name)
}

/// Reset statistics and start forwarding messages
pub fn init_debug_config() {
    for count in &COUNTS {
        count.store(0, Ordering::Relaxed);
    }
    if let Ok(mut guard) = MESSAGE_TRACKER.lock() {
        *guard = Some(FxHashMap::default());
    }
    ENABLED.store(true, Ordering::Release);
}

/// Stop forwarding messages (called before the messenger is destroyed)
pub fn cleanup_debug_config() {
    ENABLED.store(false, Ordering::Release);
}

/// Get current validation statistics
pub fn get_validation_stats() -> ValidationStats {
    let [errors, warnings, info, verbose] = [0, 1, 2, 3].map(|i| COUNTS[i].load(Ordering::Relaxed));
    ValidationStats { errors, warnings, info, verbose }
}

/// Print validation statistics report
pub fn print_validation_stats_report() {
    let stats = get_validation_stats();

    if stats.total() == 0 {
        println!("\n{}", "No validation messages".green().bold());
        return;
    }

    println!("\n{}", "=== Validation Statistics Report ===".bright_blue().bold());
    if stats.errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), stats.errors);
    }
    if stats.warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), stats.warnings);
    }
    if stats.info > 0 {
        println!("  {} {}", "Info:".cyan(), stats.info);
    }
    if stats.verbose > 0 {
        println!("  {} {}", "Verbose:".bright_black(), stats.verbose);
    }
    println!("  {} {}", "Total:".white().bold(), stats.total());

    if let Ok(guard) = MESSAGE_TRACKER.lock() {
        let repeated = guard
            .as_ref()
            .map(|messages| messages.values().filter(|&&count| count > 1).count())
            .unwrap_or(0);
        if repeated > 0 {
            println!("\n  {} message(s) appeared multiple times", repeated);
        }
    }
    println!("{}\n", "====================================".bright_blue().bold());
}

/// Vulkan debug messenger callback
///
/// Called by the validation layers; never aborts the Vulkan call.
pub unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    if !ENABLED.load(Ordering::Acquire) || p_callback_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = *p_callback_data;
    let message_id_name = if callback_data.p_message_id_name.is_null() {
        "Unknown"
    } else {
        CStr::from_ptr(callback_data.p_message_id_name)
            .to_str()
            .unwrap_or("Invalid UTF-8")
    };
    let message = if callback_data.p_message.is_null() {
        "No message"
    } else {
        CStr::from_ptr(callback_data.p_message)
            .to_str()
            .unwrap_or("Invalid UTF-8")
    };

    let severity = severity_from_vk(message_severity);
    COUNTS[bucket(severity)].fetch_add(1, Ordering::Relaxed);

    let occurrences = track_message(message);
    let repeat = if occurrences > 1 {
        format!(" [x{}]", occurrences)
    } else {
        String::new()
    };

    Engine::log(
        severity,
        SOURCE,
        format!("[{}]{} {}: {}", type_name(message_type), repeat, message_id_name, message),
    );

    vk::FALSE
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
