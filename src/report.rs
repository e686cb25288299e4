use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::{Result, TranstatError};
use crate::model::{ContributionRow, PullRequestRecord, ReportBucket, ReportWindow};
use crate::store::Store;
use anyhow::Context;
use chrono::{Local, Utc};
use console::style;
use plotters::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

pub const TOP_AUTHORS: usize = 25;
pub const OTHER_LABEL: &str = "other";

const CHART_SIZE: (u32, u32) = (1200, 800);

const PALETTE: [RGBColor; 12] = [
    RGBColor(84, 112, 198),
    RGBColor(145, 204, 117),
    RGBColor(250, 200, 88),
    RGBColor(238, 102, 102),
    RGBColor(115, 192, 222),
    RGBColor(59, 162, 114),
    RGBColor(252, 132, 82),
    RGBColor(154, 96, 180),
    RGBColor(234, 124, 204),
    RGBColor(39, 158, 204),
    RGBColor(255, 157, 0),
    RGBColor(88, 160, 253),
];

pub fn exec(common: &CommonArgs) -> anyhow::Result<()> {
    let config = Config::load(&common.config).context("Failed to load configuration")?;
    let store = Store::open(common.db_path()).context("Failed to open database")?;

    let window = resolve_window(&config)?;
    let excluded = config.excluded_numbers()?;
    let records = store
        .records()
        .context("Failed to load recorded pull requests")?;

    let bucket = aggregate(
        &records,
        &window,
        &config.repository.branch,
        &excluded,
        TOP_AUTHORS,
    )
    .context("Failed to aggregate contributions")?;

    let path = render(
        &bucket,
        &config.chart.title,
        &config.chart.series,
        &common.out_dir(),
    )
    .context("Failed to render chart")?;

    println!("Chart written to {}", style(path.display()).cyan());
    Ok(())
}

/// Turns unset window bounds into "now". That almost always selects an
/// empty window, so it is warned about rather than silently relied on.
pub fn resolve_window(config: &Config) -> Result<ReportWindow> {
    let (start, end) = config.window()?;
    if start.is_none() || end.is_none() {
        eprintln!(
            "{}",
            style(
                "warning: duration.start/duration.end not fully configured; \
                 unset bounds default to the current instant, which usually \
                 selects an empty window"
            )
            .yellow()
        );
    }
    let now = Utc::now();
    Ok(ReportWindow {
        start: start.unwrap_or(now),
        end: end.unwrap_or(now),
    })
}

/// Groups records that pass the window/branch/exclusion filters by author,
/// ranks the sums descending, keeps the top `top_n`, and folds everything
/// else into a trailing "other" entry. The bucket values always sum to the
/// filtered grand total.
pub fn aggregate(
    records: &[PullRequestRecord],
    window: &ReportWindow,
    base_branch: &str,
    excluded: &BTreeSet<u64>,
    top_n: usize,
) -> Result<ReportBucket> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    let mut grand_total: u64 = 0;

    for record in records {
        if record.base_branch != base_branch {
            continue;
        }
        if !window.contains(&record.merged_at) {
            continue;
        }
        if excluded.contains(&record.number) {
            continue;
        }
        *totals.entry(record.author.as_str()).or_insert(0) += record.zh_word_count;
        grand_total += record.zh_word_count;
    }

    let mut rows: Vec<ContributionRow> = totals
        .into_iter()
        .map(|(author, total)| ContributionRow {
            author: author.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.author.cmp(&b.author)));

    let mut entries: Vec<(String, u64)> = Vec::with_capacity(top_n + 1);
    let mut shown: u64 = 0;
    for row in rows.into_iter().take(top_n) {
        shown += row.total;
        entries.push((row.author, row.total));
    }

    let other = grand_total.checked_sub(shown).ok_or_else(|| {
        TranstatError::Integrity(format!(
            "residual bucket is negative: top authors sum to {shown} but the grand total is {grand_total}"
        ))
    })?;
    entries.push((OTHER_LABEL.to_string(), other));

    Ok(ReportBucket { entries })
}

/// Renders the bucket as an SVG pie chart. The file name carries the
/// current local date, so reruns on the same day overwrite and runs on
/// different days do not.
pub fn render(
    bucket: &ReportBucket,
    title: &str,
    series: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let stamp = Local::now().format("%Y%m%d");
    let path = out_dir.join(format!("{}_{}_pie.svg", stamp, file_stem(series)));
    draw_pie(bucket, title, &path)?;
    Ok(path)
}

fn draw_pie(bucket: &ReportBucket, title: &str, path: &Path) -> Result<()> {
    let sizes: Vec<f64> = bucket
        .entries
        .iter()
        .map(|(_, value)| *value as f64)
        .collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        return Err(TranstatError::Chart(
            "nothing to draw: every bucket value is zero".to_string(),
        ));
    }

    let labels: Vec<String> = bucket
        .entries
        .iter()
        .map(|(label, value)| format!("{label} ({value})"))
        .collect();
    let colors: Vec<RGBColor> = (0..bucket.entries.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| TranstatError::Chart(e.to_string()))?;
    let title_style = TextStyle::from(("sans-serif", 32).into_font()).color(&BLACK);
    let chart_area = root
        .titled(title, title_style)
        .map_err(|e| TranstatError::Chart(e.to_string()))?;

    let dims = chart_area.dim_in_pixel();
    let center = (dims.0 as i32 / 2, dims.1 as i32 / 2);
    let radius = (dims.0.min(dims.1) as f64) * 0.38;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
    chart_area
        .draw(&pie)
        .map_err(|e| TranstatError::Chart(e.to_string()))?;

    root.present()
        .map_err(|e| TranstatError::Chart(e.to_string()))?;
    Ok(())
}

fn file_stem(series: &str) -> String {
    let stem: String = series
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "contrib".to_string()
    } else {
        stem
    }
}
