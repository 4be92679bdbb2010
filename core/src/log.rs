//! Logging utilities
//!
//! Thin helpers over the `log` facade so engine code logs with one call and a
//! consistent target. Without an installed logger every call is a no-op.

#![allow(unused)]

const TARGET: &str = "arena_core";

/// Log an info message
#[inline(always)]
pub fn info(msg: &str) {
    ::log::info!(target: TARGET, "{}", msg);
}

/// Log a warning message
#[inline(always)]
pub fn warn(msg: &str) {
    ::log::warn!(target: TARGET, "{}", msg);
}

/// Log an error message
#[inline(always)]
pub fn error(msg: &str) {
    ::log::error!(target: TARGET, "{}", msg);
}

/// Log a debug message with a label
#[inline(always)]
pub fn debug(label: &str, msg: &str) {
    ::log::debug!(target: TARGET, "[{}] {}", label, msg);
}

/// Log a per-tick trace message with a label
#[inline(always)]
pub fn trace(label: &str, msg: &str) {
    ::log::trace!(target: TARGET, "[{}] {}", label, msg);
}

/// Log session state summary
#[inline(always)]
pub fn state_summary(
    phase: &str,
    round: u32,
    gold: u32,
    level: u8,
    experience: u32,
    bench_count: usize,
    board_count: usize,
) {
    ::log::info!(
        target: TARGET,
        "phase={} round={} gold={} level={} exp={} bench={} board={}",
        phase,
        round,
        gold,
        level,
        experience,
        bench_count,
        board_count
    );
}

/// Log an action being performed
#[inline(always)]
pub fn action(name: &str, details: &str) {
    ::log::debug!(target: TARGET, ">> {} ({})", name, details);
}

/// Log action result
#[inline(always)]
pub fn result(success: bool, msg: &str) {
    if success {
        ::log::debug!(target: TARGET, "<< ok: {}", msg);
    } else {
        ::log::warn!(target: TARGET, "<< rejected: {}", msg);
    }
}
