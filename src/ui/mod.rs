pub mod build_view;
pub mod icons;
pub mod progress;

pub use build_view::{MISSING_PRICE_NOTE, candidate_label, render_tabs, summary_lines};
pub use progress::with_spinner;
