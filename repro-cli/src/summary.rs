use std::time::Duration;

use markdown_tables::MarkdownTableRow;
use repro_harness::CommitReport;

#[derive(Debug, Clone)]
pub(crate) struct RoundRow {
    pub(crate) round: u32,
    pub(crate) report: CommitReport,
    pub(crate) elapsed: Duration,
    pub(crate) notifications: usize,
    pub(crate) visible: usize,
}

impl MarkdownTableRow for RoundRow {
    fn column_names() -> Vec<&'static str> {
        vec![
            "Round",
            "Strategy",
            "Items",
            "Events",
            "Commits",
            "Notifications",
            "Visible",
            "Elapsed (ms)",
        ]
    }

    fn column_values(&self) -> Vec<String> {
        vec![
            self.round.to_string(),
            self.report.strategy.to_string(),
            self.report.items.to_string(),
            self.report.events.to_string(),
            self.report.commits.to_string(),
            self.notifications.to_string(),
            self.visible.to_string(),
            format!("{:.2}", self.elapsed.as_secs_f64() * 1000.0),
        ]
    }
}
