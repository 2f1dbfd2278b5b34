use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::Config;
use crate::report::assembler::Report;

/// Money formatting: integers without decimals, otherwise two decimals,
/// `-` when missing.
pub fn fmt_money(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if (v - v.round()).abs() < 1e-6 => format!("{}", v.round() as i64),
        Some(v) => format!("{v:.2}"),
    }
}

/// Signed whole-percent delta, e.g. `+10%`; empty when missing.
pub fn fmt_delta(delta: Option<f64>) -> String {
    match delta {
        None => String::new(),
        Some(d) => {
            let sign = if d >= 0.0 { "+" } else { "" };
            format!("{sign}{:.0}%", d * 100.0)
        }
    }
}

const CSS: &str = r#"
<style>
  body { font-family: -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif; margin: 20px; }
  table { border-collapse: collapse; width: 100%; }
  th, td { border: 1px solid #ddd; padding: 6px 8px; text-align: right; font-variant-numeric: tabular-nums; }
  th.sticky { position: sticky; top: 0; background: #fafafa; z-index: 1; }
  td.date, th.date { text-align: left; }
  td.sev-low { background-color: #ffef99; }
  td.sev-medium { background-color: #ffc78f; }
  td.sev-high { background-color: #ff9aa2; }
  .delta-pos { color: #b45309; font-size: 0.85em; }
  .delta-neg { color: #065f46; font-size: 0.85em; }
  .muted { color: #6b7280; font-size: 0.85em; }
  .legend { margin: 8px 0 16px; font-size: 0.9em; }
  .legend span { display: inline-block; margin-right: 12px; }
  .pill { border-radius: 999px; padding: 2px 8px; font-size: 0.75em; }
  .pill.low { background: #ffef99; }
  .pill.medium { background: #ffc78f; }
  .pill.high { background: #ff9aa2; }
</style>
"#;

fn opt_date(d: Option<chrono::NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Render the report as a standalone HTML page.
pub fn render_html(report: &Report, cfg: &Config) -> String {
    let runs_cfg = &cfg.runs;
    let levels = &cfg.spike.levels;
    let ts = report.generated_at.format("%Y-%m-%d %H:%M");

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("<html><head><meta charset='utf-8'>{CSS}</head><body>"));
    parts.push(format!("<h2>Hotel Prices Report — {ts}</h2>"));
    parts.push(format!(
        "<div class='legend'>\
         <span><strong>Window:</strong> {} → {}</span>\
         <span><strong>Compare runs (cells):</strong> last {}</span>\
         <span><strong>Avg spike vs trailing:</strong> {} prior days</span>\
         <span><strong>Δ Avg vs run:</strong> n-{}</span>\
         <span><strong>Spikes:</strong> \
         <span class='pill low'>low ≥ {:.0}%</span> \
         <span class='pill medium'>med ≥ {:.0}%</span> \
         <span class='pill high'>high ≥ {:.0}%</span></span>\
         </div>",
        opt_date(runs_cfg.start_date),
        opt_date(runs_cfg.end_date),
        runs_cfg.lookback_runs,
        runs_cfg.lookback_days_avg,
        runs_cfg.avg_prev_offset,
        levels.low * 100.0,
        levels.medium * 100.0,
        levels.high * 100.0,
    ));

    parts.push("<table>".to_string());
    parts.push("<tr>".to_string());
    parts.push("<th class='sticky date'>Date</th>".to_string());
    for column in &report.columns {
        parts.push(format!("<th class='sticky'>{}</th>", column.name));
    }
    parts.push("<th class='sticky'>Avg</th>".to_string());
    parts.push("<th class='sticky'>Δ Avg vs prev</th>".to_string());
    parts.push("</tr>".to_string());

    for row in &report.rows {
        parts.push("<tr>".to_string());
        parts.push(format!("<td class='date'>{}</td>", row.date));

        for cell in &row.cells {
            let delta_html = match cell.delta_vs_prev {
                Some(delta) => {
                    let class = if delta >= 0.0 { "delta-pos" } else { "delta-neg" };
                    format!(
                        " <span class='{class}'>({})</span>",
                        fmt_delta(Some(delta))
                    )
                }
                None => String::new(),
            };
            parts.push(format!("<td>{}{delta_html}</td>", fmt_money(cell.price)));
        }

        let avg_class = row
            .avg
            .severity
            .map(|s| format!(" class='sev-{}'", s.as_str()))
            .unwrap_or_default();
        parts.push(format!("<td{avg_class}>{}</td>", fmt_money(row.avg.value)));

        let delta_class = row
            .delta_avg
            .severity
            .map(|s| format!(" class='sev-{}'", s.as_str()))
            .unwrap_or_else(|| " class='muted'".to_string());
        parts.push(format!(
            "<td{delta_class}>{}</td>",
            fmt_delta(row.delta_avg.value)
        ));
        parts.push("</tr>".to_string());
    }

    parts.push("</table>".to_string());
    parts.push(format!(
        "<p class='muted'>Notes: Only the Avg cell (vs trailing {} prior days) and the \
         Δ Avg vs run n-{} cell are highlighted when a spike is detected based on configured \
         thresholds. Missing values are ignored in averages.</p>",
        runs_cfg.lookback_days_avg, runs_cfg.avg_prev_offset
    ));
    parts.push("</body></html>".to_string());

    parts.join("\n")
}

/// Write the rendered report into the report directory as
/// `report_YYYYMMDD_HHMM.html` and return the path.
pub fn write_report(report_dir: &Path, html: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(report_dir)?;
    let name = format!("report_{}.html", Utc::now().format("%Y%m%d_%H%M"));
    let path = report_dir.join(name);
    fs::write(&path, html)?;
    Ok(path)
}

/// Regenerate `index.html` linking every report in the directory, newest
/// first (file names sort chronologically).
pub fn write_reports_index(report_dir: &Path) -> std::io::Result<PathBuf> {
    let mut names: Vec<String> = fs::read_dir(report_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with("report_") && name.ends_with(".html"))
        .collect();
    names.sort();
    names.reverse();

    let mut parts = vec![format!(
        "<html><head><meta charset='utf-8'>{CSS}</head><body><h2>Hotel Prices Reports</h2><ul>"
    )];
    for name in &names {
        parts.push(format!("<li><a href='{name}'>{name}</a></li>"));
    }
    parts.push("</ul></body></html>".to_string());

    let path = report_dir.join("index.html");
    fs::write(&path, parts.join("\n"))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_renders_integers_without_decimals() {
        assert_eq!(fmt_money(Some(150.0)), "150");
        assert_eq!(fmt_money(Some(150.5)), "150.50");
        assert_eq!(fmt_money(None), "-");
    }

    #[test]
    fn delta_renders_signed_whole_percent() {
        assert_eq!(fmt_delta(Some(0.10)), "+10%");
        assert_eq!(fmt_delta(Some(-0.25)), "-25%");
        assert_eq!(fmt_delta(Some(0.0)), "+0%");
        assert_eq!(fmt_delta(None), "");
    }
}
