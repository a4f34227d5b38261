//! Two-stage file selection.
//!
//! The pre-filter runs once over the full file list; every linter then
//! filters the surviving pool with its own rules. Output keeps the input
//! order so runs are reproducible.

use crate::filter::FilterRuleList;
use std::collections::BTreeMap;
use tracing::debug;

/// Apply `pre_filter` and then each linter's filter to `tracked_files`.
///
/// A linter whose filter matches nothing still gets an (empty) entry.
pub fn select<'a, I>(
    tracked_files: &[String],
    pre_filter: &FilterRuleList,
    per_linter_filters: I,
) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = (&'a str, &'a FilterRuleList)>,
{
    let pool: Vec<&String> = tracked_files
        .iter()
        .filter(|path| pre_filter.matches(path))
        .collect();
    debug!(
        "pre-filter {} kept {} of {} files",
        pre_filter,
        pool.len(),
        tracked_files.len()
    );

    per_linter_filters
        .into_iter()
        .map(|(linter, filter)| {
            let files: Vec<String> = pool
                .iter()
                .filter(|path| filter.matches(path))
                .map(|path| (*path).clone())
                .collect();
            debug!("{}: {} files selected", linter, files.len());
            (linter.to_string(), files)
        })
        .collect()
}
