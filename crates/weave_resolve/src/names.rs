//! Generated names for realized ports, pins and declarations.

use crate::endpoint::ConnectionDir;

/// Upper-case suffixes are used when the base has letters and none is lower-case.
fn is_upper_case(base: &str) -> bool {
    base.chars().any(|c| c.is_alphabetic()) && !base.chars().any(|c| c.is_lowercase())
}

fn with_suffix(base: &str, suffix: &str) -> String {
    if is_upper_case(base) {
        format!("{base}{}", suffix.to_uppercase())
    } else {
        format!("{base}{suffix}")
    }
}

/// Name of a port or pin carrying `base` in direction `dir`.
///
/// A direction suffix already on `base` is replaced, not doubled.
pub fn pin_name(base: &str, dir: ConnectionDir) -> String {
    let suffix = match dir {
        ConnectionDir::Up => "_o",
        ConnectionDir::Bidir => "_b",
        ConnectionDir::Down | ConnectionDir::Default => "_i",
    };
    with_suffix(strip_direction_suffix(base), suffix)
}

/// Name of a module-internal signal carrying `base`.
pub fn signal_name(base: &str) -> String {
    with_suffix(base, "_s")
}

/// Strips a trailing `_i`, `_o` or `_b` (either case); other names are returned as is.
pub fn strip_direction_suffix(name: &str) -> &str {
    match name.len().checked_sub(2).and_then(|at| name.get(at..).map(|s| (at, s))) {
        Some((at, "_i" | "_o" | "_b" | "_I" | "_O" | "_B")) if at > 0 => &name[..at],
        _ => name,
    }
}
