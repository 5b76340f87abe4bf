use std::sync::atomic::{AtomicU64, Ordering};

pub static MOVES_GENERATED: AtomicU64 = AtomicU64::new(0);
pub static CHAINS_EXPANDED: AtomicU64 = AtomicU64::new(0);
pub static MOVES_APPLIED: AtomicU64 = AtomicU64::new(0);

#[cfg(any(feature = "metrics", debug_assertions))]
#[macro_export]
macro_rules! incr {
    ($metric:ident) => {
        $metric.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    };
    ($metric:ident, $amt:expr) => {
        $metric.fetch_add($amt as u64, std::sync::atomic::Ordering::Relaxed);
    };
}

#[cfg(not(any(feature = "metrics", debug_assertions)))]
#[macro_export]
macro_rules! incr {
    ($metric:ident) => {
        let _ = &$metric;
    };
    ($metric:ident, $amt:expr) => {
        let _ = (&$metric, $amt);
    };
}

/// Counter values at one point in time. All zero unless built with the `metrics` feature or
/// debug assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub moves_generated: u64,
    pub chains_expanded: u64,
    pub moves_applied: u64,
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        moves_generated: MOVES_GENERATED.load(Ordering::Relaxed),
        chains_expanded: CHAINS_EXPANDED.load(Ordering::Relaxed),
        moves_applied: MOVES_APPLIED.load(Ordering::Relaxed),
    }
}
