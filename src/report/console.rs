// src/report/console.rs
use std::io::{self, Write};

use super::{RankedEntry, RankingSnapshot, Reporter};

/// Plain-text reporter. Writes to stdout by default, any `Write` in tests.
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_snapshot(&mut self, s: &RankingSnapshot) -> io::Result<()> {
        writeln!(self.out, "== r/{} ==", s.topic)?;
        section(&mut self.out, "Top posts by upvotes", "Upvotes", "Post", &s.top_items)?;
        section(
            &mut self.out,
            "Most active users by posts",
            "Posts",
            "Author",
            &s.top_contributors,
        )?;
        self.out.flush()
    }
}

fn section<W: Write>(
    out: &mut W,
    heading: &str,
    value_name: &str,
    label_name: &str,
    rows: &[RankedEntry],
) -> io::Result<()> {
    writeln!(out, "{heading}")?;
    if rows.is_empty() {
        writeln!(out, "  (nothing yet)")?;
    }
    for (i, r) in rows.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {value_name}: {}, {label_name}: {}",
            i + 1,
            r.value,
            r.label
        )?;
    }
    Ok(())
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn show(&mut self, snapshot: &RankingSnapshot) {
        if let Err(e) = self.write_snapshot(snapshot) {
            tracing::warn!(error = %e, "console report failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_sections_in_rank_order() {
        let mut r = ConsoleReporter::new(Vec::new());
        r.show(&RankingSnapshot {
            topic: "funny".into(),
            top_items: vec![RankedEntry::new("cat", 42), RankedEntry::new("dog", 7)],
            top_contributors: vec![],
        });
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.starts_with("== r/funny =="));
        let cat = text.find("Upvotes: 42, Post: cat").unwrap();
        let dog = text.find("Upvotes: 7, Post: dog").unwrap();
        assert!(cat < dog);
        assert!(text.contains("Most active users by posts\n  (nothing yet)"));
    }
}
