use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pqip_model::{FunnelData, PipelineWarning};
use pqip_report::intervals::SeveritySplit;
use pqip_report::{
    AuditReport, EquityAnalysis, GroupCount, Headlines, IntervalSummary, PainImprovement,
    StatsResult, StatsStatus, ValueSummary,
};
use pqip_transform::compliance::A1_TARGET_MINS;

pub fn print_audit_summary(report: &AuditReport) {
    if let Some(source) = &report.source {
        println!("Export: {source}");
    }
    if !report.report_months.is_empty() {
        println!("Report month: {}", report.report_months.join(", "));
    }
    println!();
    println!("{}", headlines_table(&report.headlines));
    if !report.intervals.is_empty() {
        println!();
        println!("Intervals (minutes):");
        println!("{}", intervals_table(&report.intervals));
    }
    if let Some(improvement) = &report.improvement {
        println!();
        println!("Pain score improvement (second - first):");
        println!("{}", improvement_table(improvement));
    }
    if let Some(funnel) = &report.funnel {
        println!();
        println!("Best practice funnel:");
        println!("{}", funnel_table(funnel));
    }
    print_warnings(&report.warnings);
}

pub fn print_equity_summary(analysis: &EquityAnalysis) {
    println!(
        "{} by {}",
        analysis.outcome.label(),
        analysis.dimension.label()
    );
    println!();
    println!("Population:");
    println!("{}", distribution_table(&analysis.distribution));
    println!();
    println!("Analysed groups ({} patients):", analysis.analysed_rows());
    println!("{}", equity_groups_table(analysis));
    println!();
    println!("{}", stats_table(&analysis.stats));
}

fn print_warnings(warnings: &[PipelineWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("Warnings:");
    println!("{}", warnings_table(warnings));
}

pub fn headlines_table(headlines: &Headlines) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let best_practice = match (headlines.best_practice_yes, headlines.best_practice_no) {
        (Some(yes), Some(no)) => Cell::new(format!("{yes} / {no}")),
        _ => dim_cell("-"),
    };
    table.add_row(vec![
        Cell::new("Total patients"),
        Cell::new(headlines.total_patients).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Median time to triage (mins)"),
        minutes_cell(headlines.median_time_to_triage),
    ]);
    table.add_row(vec![
        Cell::new("Median time to analgesia (mins)"),
        minutes_cell(headlines.median_time_to_analgesia),
    ]);
    table.add_row(vec![
        Cell::new(format!("Analgesia within {A1_TARGET_MINS} mins")),
        percent_cell(headlines.analgesia_within_target_pct),
    ]);
    table.add_row(vec![Cell::new("Best practice (yes / no)"), best_practice]);
    table.add_row(vec![
        Cell::new("Compliance rate"),
        percent_cell(headlines.compliance_rate_pct),
    ]);
    table
}

pub fn intervals_table(intervals: &[IntervalSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Interval"),
        header_cell("Count"),
        header_cell("Median"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Negative"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for interval in intervals {
        table.add_row(value_row(Cell::new(&interval.label), &interval.values));
        if let Some(SeveritySplit { moderate, severe }) = &interval.by_severity {
            table.add_row(value_row(dim_cell("  moderate pain"), moderate));
            table.add_row(value_row(dim_cell("  severe pain"), severe));
        }
    }
    table
}

fn value_row(label: Cell, values: &ValueSummary) -> Vec<Cell> {
    let negative = if values.negative > 0 {
        Cell::new(values.negative)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(0)
    };
    vec![
        label,
        Cell::new(values.count),
        minutes_cell(values.median),
        minutes_cell(values.min),
        minutes_cell(values.max),
        negative,
    ]
}

/// Patients per pain score change, with the median change in the footer row.
pub fn improvement_table(improvement: &PainImprovement) -> Table {
    let total = improvement.values.count;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Change"),
        header_cell("Patients"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in &improvement.counts {
        let share = (total > 0).then(|| entry.count as f64 / total as f64 * 100.0);
        let count = if entry.count > 0 {
            Cell::new(entry.count)
        } else {
            dim_cell(0)
        };
        table.add_row(vec![
            Cell::new(format!("{:+}", entry.change)),
            count,
            percent_cell(share),
        ]);
    }
    table.add_row(vec![
        Cell::new("all").add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
        improvement
            .values
            .median
            .map_or_else(|| dim_cell("-"), |m| Cell::new(format!("median {m:+.1}"))),
    ]);
    table
}

/// One row per funnel node, indented by depth.
pub fn funnel_table(funnel: &FunnelData) -> Table {
    let mut depth = vec![0usize; funnel.node_count()];
    for edge in funnel.edges() {
        if let Some(parent) = depth.get(edge.source).copied()
            && let Some(child) = depth.get_mut(edge.target)
        {
            *child = parent + 1;
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Patients"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (index, (label, &count)) in funnel.labels.iter().zip(&funnel.node_counts).enumerate() {
        let name = label
            .strip_suffix(&format!(" ({count})"))
            .unwrap_or(label);
        let indent = "  ".repeat(depth.get(index).copied().unwrap_or(0));
        let share = (funnel.total_patients > 0)
            .then(|| count as f64 / funnel.total_patients as f64 * 100.0);
        let stage = Cell::new(format!("{indent}{name}"));
        let stage = if index == 0 {
            stage.add_attribute(Attribute::Bold)
        } else {
            stage
        };
        table.add_row(vec![stage, Cell::new(count), percent_cell(share)]);
    }
    table
}

pub fn warnings_table(warnings: &[PipelineWarning]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Detail")]);
    apply_summary_table_style(&mut table);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning.kind()).fg(Color::Yellow),
            Cell::new(warning),
        ]);
    }
    table
}

pub fn distribution_table(counts: &[GroupCount]) -> Table {
    let total: usize = counts.iter().map(|c| c.count).sum();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Patients"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for group in counts {
        let share = (total > 0).then(|| group.count as f64 / total as f64 * 100.0);
        table.add_row(vec![
            Cell::new(&group.label),
            Cell::new(group.count),
            percent_cell(share),
        ]);
    }
    table
}

fn equity_groups_table(analysis: &EquityAnalysis) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("n"),
        header_cell("Median (mins)"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for group in &analysis.groups {
        table.add_row(vec![
            Cell::new(&group.label),
            Cell::new(group.count),
            minutes_cell(group.median),
        ]);
    }
    table
}

pub fn stats_table(stats: &StatsResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Test"),
        header_cell("Groups"),
        header_cell("Statistic"),
        header_cell("p-value"),
        header_cell("Result"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let test = stats
        .test
        .map_or_else(|| dim_cell("-"), Cell::new);
    let statistic = stats
        .statistic
        .map_or_else(|| dim_cell("-"), |value| Cell::new(format!("{value:.3}")));
    let p_value = stats
        .p_value
        .map_or_else(|| dim_cell("-"), |value| Cell::new(format!("{value:.4}")));
    table.add_row(vec![
        test,
        Cell::new(stats.group_count),
        statistic,
        p_value,
        result_cell(stats),
    ]);
    table
}

fn result_cell(stats: &StatsResult) -> Cell {
    let cell = Cell::new(&stats.message);
    match stats.status {
        StatsStatus::Completed if stats.significant => {
            cell.fg(Color::Red).add_attribute(Attribute::Bold)
        }
        StatsStatus::Completed => cell.fg(Color::Green),
        StatsStatus::InsufficientGroups => cell.fg(Color::DarkGrey),
        StatsStatus::Error => cell.fg(Color::Yellow),
    }
}

fn minutes_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.1}")),
        None => dim_cell("-"),
    }
}

fn percent_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.1}%")),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
