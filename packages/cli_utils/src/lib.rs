#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the `crime_dashboard` binary.
//!
//! Dataset imports and bulk exports report through the database crate's
//! [`ProgressCallback`]; [`IndicatifProgress`] shows that progress on the
//! terminal. [`init_logger`] installs the process logger on the same
//! [`MultiProgress`], which keeps log output from overwriting the bars.

use std::sync::Arc;
use std::time::Duration;

use crime_dashboard_database::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Import or export progress drawn on the terminal.
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Applied when the length becomes known.
    sized_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Progress for a CSV import, counted in bytes read.
    ///
    /// A spinner is shown until the importer reports the file size, then
    /// the line switches to a bar with read rate and remaining time.
    #[must_use]
    pub fn bytes_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let sized_style = ProgressStyle::with_template(
            "  {msg} {wide_bar:.cyan/dim} {binary_bytes}/{binary_total_bytes} \
             {binary_bytes_per_sec} [{eta}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Arc::new(Self { bar, sized_style })
    }

    /// Progress over a fixed number of steps, such as one per exported
    /// report.
    #[must_use]
    pub fn steps_bar(
        multi: &MultiProgress,
        message: &str,
        total: u64,
    ) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );
        bar.set_message(message.to_string());

        let sized_style = bar.style();

        Arc::new(Self { bar, sized_style })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.sized_style.clone());
    }

    fn set_position(&self, pos: u64) {
        self.bar.set_position(pos);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind an
/// `indicatif-log-bridge` wrapper.
///
/// Progress bars created with the returned [`MultiProgress`] are cleared
/// while a log line is written and redrawn afterwards. Calling this again
/// keeps the first logger.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_drives_the_bar() {
        let bar = ProgressBar::hidden();
        let progress = IndicatifProgress {
            bar: bar.clone(),
            sized_style: ProgressStyle::default_bar(),
        };

        progress.set_total(10);
        progress.inc(3);
        assert_eq!(bar.length(), Some(10));
        assert_eq!(bar.position(), 3);

        progress.set_position(7);
        assert_eq!(bar.position(), 7);

        progress.finish("done".to_string());
        assert!(bar.is_finished());
    }

    #[test]
    fn init_logger_is_idempotent() {
        let _first = init_logger();
        let _second = init_logger();
        log::info!("logger ready");
    }
}
