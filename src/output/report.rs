use crate::state::CrawlReport;
use std::fmt::Write;

/// Formats a crawl summary for the terminal
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Crawl Summary ===\n");
    let _ = writeln!(out, "Stopped: {}", report.stop_reason);
    let _ = writeln!(out, "Duration: {:.1}s", report.elapsed.as_secs_f64());
    let _ = writeln!(out);
    let _ = writeln!(out, "URLs processed: {}", report.urls_processed);
    let _ = writeln!(out, "  Indexed: {}", report.pages_indexed);
    let _ = writeln!(out, "  Fetch failures: {}", report.fetch_failures);
    let _ = writeln!(out, "  Without title: {}", report.untitled_pages);
    let _ = writeln!(out, "Keywords: {}", report.keywords);
    let _ = writeln!(out, "Relevance batches: {}", report.relevance_batches);
    let _ = writeln!(out, "Still pending: {}", report.pending_urls);
    let _ = writeln!(out, "Rate: {:.2} pages/sec", report.pages_per_sec());
    out
}

/// Prints a crawl summary to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
