//! Serializers for a computed ranking.

use unicode_width::UnicodeWidthStr;

use crate::rank::Ranking;

/// Output notation for a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `@hint.arrangement` block for the ERD DSL.
    #[default]
    Arrangement,
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "arrangement" => Some(Self::Arrangement),
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn serialize(ranking: &Ranking, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Arrangement => Ok(arrangement(ranking)),
        OutputFormat::Table => Ok(table(ranking)),
        OutputFormat::Json => json(ranking),
    }
}

/// One row per level, level 1 first, entities in order.
pub fn arrangement(ranking: &Ranking) -> String {
    let mut output = String::from("@hint.arrangement = {\n");
    let rows = ranking.rows();
    for (i, row) in rows.iter().enumerate() {
        output.push_str("    ");
        output.push_str(&row.join(" "));
        if i + 1 < rows.len() {
            output.push(';');
        }
        output.push('\n');
    }
    output.push_str("}\n");
    output
}

/// Aligned `level order entity` table sorted by level, then order, followed by
/// a summary line and one line per reversed association.
pub fn table(ranking: &Ranking) -> String {
    let mut placements: Vec<_> = ranking.placements.iter().collect();
    placements.sort_by_key(|p| (p.level, p.order));

    let headers = ["LEVEL", "ORDER", "ENTITY"];
    let rows: Vec<[String; 3]> = placements
        .iter()
        .map(|p| [p.level.to_string(), p.order.to_string(), p.entity.clone()])
        .collect();

    let mut widths = headers.map(|h| h.width());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut output = String::new();
    let mut push_line = |cells: [&str; 3]| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            if i + 1 < cells.len() {
                let pad = widths[i] - cell.width();
                line.push_str(&" ".repeat(pad));
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    };

    push_line(headers);
    for row in &rows {
        push_line([row[0].as_str(), row[1].as_str(), row[2].as_str()]);
    }

    output.push_str(&format!(
        "depth {}, sweeps {}{}, reversed {}\n",
        ranking.depth,
        ranking.sweeps_run,
        if ranking.cancelled { " (cancelled)" } else { "" },
        ranking.reversed_edges.len()
    ));
    for edge in ranking.reversed() {
        output.push_str(&format!(
            "reversed: {} -> {} ({})",
            edge.source,
            edge.target,
            edge.kind.as_str()
        ));
        if let Some(label) = &edge.label {
            output.push_str(&format!(" \"{}\"", label));
        }
        output.push('\n');
    }
    output
}

pub fn json(ranking: &Ranking) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(ranking)
}
