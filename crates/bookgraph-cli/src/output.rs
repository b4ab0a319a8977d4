//! Terminal output helpers

use bookgraph_core::{BuildSummary, GraphIndex};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

pub fn info(message: &str) {
    println!("{} {}", "::".cyan().bold(), message);
}

pub fn success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "Warning:".yellow().bold(), message);
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn build_summary_table(summary: &BuildSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Build", "Count"]);
    let rows: [(&str, String); 9] = [
        ("Records", summary.records.to_string()),
        ("Records with triplets", summary.extracted_records.to_string()),
        ("Records without triplets", summary.empty_records.len().to_string()),
        ("Skipped records", summary.skipped_count().to_string()),
        ("Embedding failures", summary.embedding_failures.len().to_string()),
        ("Triplets", summary.triplets.to_string()),
        ("Entities", summary.nodes.to_string()),
        ("Vectors", summary.vectors.to_string()),
        ("Elapsed", format!("{:.1?}", summary.elapsed)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    if summary.malformed_lines > 0 || summary.truncated_triplets > 0 {
        table.add_row(vec![
            Cell::new("Unparsed lines"),
            Cell::new(summary.malformed_lines),
        ]);
        table.add_row(vec![
            Cell::new("Triplets over cap"),
            Cell::new(summary.truncated_triplets),
        ]);
    }
    table
}

pub fn stats_table(index: &GraphIndex) -> Table {
    let stats = index.stats();
    let mut table = new_table();
    table.set_header(vec!["Index", "Value"]);
    table.add_row(vec![Cell::new("Records"), Cell::new(stats.records)]);
    table.add_row(vec![Cell::new("Triplets"), Cell::new(stats.triplets)]);
    table.add_row(vec![Cell::new("Entities"), Cell::new(stats.nodes)]);
    table.add_row(vec![Cell::new("Vectors"), Cell::new(stats.vectors)]);
    table.add_row(vec![
        Cell::new("Dimensions"),
        Cell::new(stats.dimension.map_or_else(|| "-".to_string(), |d| d.to_string())),
    ]);
    if let Some(manifest) = index.manifest() {
        table.add_row(vec![Cell::new("Chat model"), Cell::new(&manifest.chat_model)]);
        table.add_row(vec![
            Cell::new("Embedding model"),
            Cell::new(&manifest.embedding_model),
        ]);
        table.add_row(vec![
            Cell::new("Built"),
            Cell::new(manifest.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ]);
    }
    table
}

pub fn entities_table(index: &GraphIndex, top: usize) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Entity", "Triplets"]);
    for (entity, degree) in index.graph().top_entities(top) {
        table.add_row(vec![Cell::new(entity), Cell::new(degree)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_summary_table_hides_parse_rows_when_clean() {
        let summary = BuildSummary {
            records: 3,
            extracted_records: 3,
            triplets: 4,
            nodes: 4,
            vectors: 3,
            elapsed: Duration::from_millis(1500),
            ..Default::default()
        };
        let rendered = build_summary_table(&summary).to_string();

        assert!(rendered.contains("Records with triplets"));
        assert!(rendered.contains("Vectors"));
        assert!(!rendered.contains("Unparsed lines"));
    }

    #[test]
    fn test_summary_table_reports_parse_problems() {
        let summary = BuildSummary {
            malformed_lines: 2,
            ..Default::default()
        };
        let rendered = build_summary_table(&summary).to_string();
        assert!(rendered.contains("Unparsed lines"));
        assert!(rendered.contains("Triplets over cap"));
    }
}
