pub mod console;

pub use console::ConsoleReporter;

/// One ranked row: a label (post title or user name) and its number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub value: i64,
}

impl RankedEntry {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Both ranked views after one poll cycle.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RankingSnapshot {
    pub topic: String,
    pub top_items: Vec<RankedEntry>, // (title, upvotes)
    pub top_contributors: Vec<RankedEntry>, // (author, distinct posts)
}

/// Sink for ranking snapshots. The poller never looks at what it does.
pub trait Reporter: Send {
    fn show(&mut self, snapshot: &RankingSnapshot);
}

/// Forward to several reporters in order.
pub struct ReporterMux {
    sinks: Vec<Box<dyn Reporter>>,
}

impl ReporterMux {
    pub fn new(sinks: Vec<Box<dyn Reporter>>) -> Self {
        Self { sinks }
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Reporter for ReporterMux {
    fn show(&mut self, snapshot: &RankingSnapshot) {
        for s in self.sinks.iter_mut() {
            s.show(snapshot);
        }
    }
}

/// Emits the snapshot as a structured `tracing` event (useful with `LOG_FORMAT=json`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn show(&mut self, snapshot: &RankingSnapshot) {
        let leader = snapshot.top_items.first();
        tracing::info!(
            target: "report",
            topic = %snapshot.topic,
            items = snapshot.top_items.len(),
            contributors = snapshot.top_contributors.len(),
            leader = leader.map(|e| e.label.as_str()).unwrap_or("-"),
            leader_score = leader.map(|e| e.value).unwrap_or(0),
            snapshot = %serde_json::to_string(snapshot).unwrap_or_default(),
            "rankings updated"
        );
    }
}
