//! Batch resolution of a whole vocabulary.

use crate::models::{Resolution, ResolveSummary};
use crate::resolve::Resolver;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// Resolve every word in parallel. The result is in the same order as
/// `words`, whatever the scheduling.
pub fn resolve_vocabulary<'d, S>(
    words: &[S],
    resolver: &Resolver<'d, '_>,
    show_progress: bool,
) -> Vec<Resolution<'d>>
where
    S: AsRef<str> + Sync,
{
    let progress = if show_progress {
        let pb = ProgressBar::new(words.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let resolutions: Vec<Resolution<'d>> = words
        .par_iter()
        .map(|word| {
            let resolution = resolver.resolve(word.as_ref());
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            resolution
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let summary = summarize(&resolutions);
    tracing::info!(
        total = summary.total,
        resolved = summary.resolved,
        unresolved = summary.unresolved,
        "resolved vocabulary"
    );

    resolutions
}

/// Count resolutions overall and per method.
pub fn summarize(resolutions: &[Resolution<'_>]) -> ResolveSummary {
    let mut summary = ResolveSummary {
        total: resolutions.len(),
        ..Default::default()
    };
    for resolution in resolutions {
        match resolution.method() {
            Some(method) => {
                summary.resolved += 1;
                *summary.by_method.entry(method).or_insert(0) += 1;
            }
            None => summary.unresolved += 1,
        }
    }
    summary
}

/// Surface forms left unresolved, in input order.
pub fn unresolved_words<'w, S: AsRef<str>>(
    words: &'w [S],
    resolutions: &[Resolution<'_>],
) -> Vec<&'w str> {
    words
        .iter()
        .zip(resolutions)
        .filter(|(_, resolution)| !resolution.is_matched())
        .map(|(word, _)| word.as_ref())
        .collect()
}
