use std::fmt::Display;

use log::warn;

/// Resolves `name` against a table of variants and their accepted spellings.
///
/// Matching ignores ASCII case and surrounding whitespace. Unrecognized names
/// resolve to `fallback` and are reported at `warn` level.
pub(crate) fn resolve<K>(family: &str, name: &str, table: &[(K, &[&str])], fallback: K) -> K
where
    K: Copy + Display,
{
    let wanted = name.trim();
    table
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| a.eq_ignore_ascii_case(wanted)))
        .map_or_else(
            || {
                warn!("unknown {family} algorithm {name:?}, falling back to {fallback}");
                fallback
            },
            |(kind, _)| *kind,
        )
}
