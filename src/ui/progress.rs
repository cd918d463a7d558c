use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Run `fut` behind a spinner that disappears when it resolves.
///
/// The spinner draws to stderr and hides itself when stderr is not a
/// terminal, so piped output stays clean.
pub async fn with_spinner<F>(message: impl Into<String>, fut: F) -> F::Output
where
    F: Future,
{
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .expect("spinner template is a valid static string");

    let bar = ProgressBar::new_spinner();
    bar.set_style(style);
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    bar.finish_and_clear();
    output
}
