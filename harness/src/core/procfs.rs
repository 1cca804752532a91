//! Parsers for the per-process introspection files (`stat`, `status`).
//!
//! Parsers return `None` on any malformed input; callers map that to zero.

/// 0-based index of `utime` in a whitespace-split `stat` line.
pub const USER_TICKS_FIELD: usize = 13;
/// 0-based index of `stime` in a whitespace-split `stat` line.
pub const SYSTEM_TICKS_FIELD: usize = 14;
/// Label of the peak resident set size line in `status`, in kB.
pub const PEAK_RSS_LABEL: &str = "VmHWM:";

/// Extract `(utime, stime)` ticks from the contents of a `stat` file.
///
/// The command name (field 2) is parenthesized and may contain spaces, so
/// fields are counted from the last `)` when one is present.
pub fn parse_cpu_ticks(stat: &str) -> Option<(i64, i64)> {
    let (rest, offset) = match stat.rfind(')') {
        // pid and comm precede the closing paren
        Some(pos) => (&stat[pos + 1..], 2),
        None => (stat, 0),
    };
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let user = parse_counter(fields.get(USER_TICKS_FIELD - offset)?)?;
    let system = parse_counter(fields.get(SYSTEM_TICKS_FIELD - offset)?)?;
    Some((user, system))
}

/// Extract the peak resident set size (kB) from the contents of a `status` file.
pub fn parse_peak_memory_kb(status: &str) -> Option<i64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix(PEAK_RSS_LABEL))?
        .split_whitespace()
        .next()
        .and_then(parse_counter)
}

/// Counters are unsigned in procfs; signed or out-of-range text is malformed.
fn parse_counter(token: &str) -> Option<i64> {
    let value: u64 = token.parse().ok()?;
    i64::try_from(value).ok()
}
