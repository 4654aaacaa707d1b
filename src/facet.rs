//! Small multiples: row partitioning, grid geometry and per-cell replication.
//!
//! Geometry is plain arithmetic in percent of the chart area and knows
//! nothing about axes or series; the builder at the bottom binds one axis
//! pair and one series set to each cell.

use crate::axis::{apply_orientation, base_axes, AxisPair};
use crate::data::{cell_label, Row};
use crate::ir::{Axis, Graphic, GraphicStyle, Grid, Series};
use crate::parser::ast::{ChartType, Coord, Encoding, Facet};
use crate::series::{build_series, SeriesRequest, SeriesSet};
use std::collections::HashMap;
use tracing::debug;

/// Group label for rows that have no value in the facet field
pub const EMPTY_GROUP: &str = "(empty)";

const CELL_PADDING: f64 = 2.0;
const TITLE_SPACE: f64 = 4.0;

/// Stable group-by on `field`, groups in first-seen order
pub fn partition_rows_by_facet<'a>(rows: &[&'a Row], field: &str) -> Vec<(String, Vec<&'a Row>)> {
    let mut groups: Vec<(String, Vec<&'a Row>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for &row in rows {
        let key = cell_label(row, field).unwrap_or_else(|| EMPTY_GROUP.to_string());
        match index.get(&key) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups
}

/// One cell of the facet grid, in percent
#[derive(Debug, Clone, PartialEq)]
pub struct FacetCell {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetLayout {
    pub rows: usize,
    pub cols: usize,
    pub items: Vec<FacetCell>,
}

/// Split the chart area into `n` even cells, `ncol` per row when given,
/// else a near-square grid. A column count of zero is treated as absent.
pub fn compute_facet_layout(n: usize, ncol: Option<usize>) -> FacetLayout {
    if n == 0 {
        return FacetLayout::default();
    }
    let cols = match ncol.filter(|&c| c > 0) {
        Some(c) => c,
        None => (n as f64).sqrt().ceil() as usize,
    };
    let rows = n.div_ceil(cols);

    let width = 100.0 / cols as f64;
    let height = 100.0 / rows as f64;

    let items = (0..n)
        .map(|index| {
            let (row, col) = (index / cols, index % cols);
            FacetCell {
                index,
                row,
                col,
                left: col as f64 * width,
                top: row as f64 * height,
                width,
                height,
            }
        })
        .collect();

    FacetLayout { rows, cols, items }
}

pub fn percent(v: f64) -> String {
    let s = format!("{:.2}", v);
    format!("{}%", s.trim_end_matches('0').trim_end_matches('.'))
}

/// Grid box for a cell, inset by padding and leaving room for a title
pub fn cell_grid(cell: &FacetCell, show_title: bool) -> Grid {
    let title = if show_title { TITLE_SPACE } else { 0.0 };
    Grid {
        left: percent(cell.left + CELL_PADDING),
        top: percent(cell.top + CELL_PADDING + title),
        width: percent((cell.width - 2.0 * CELL_PADDING).max(0.0)),
        height: percent((cell.height - 2.0 * CELL_PADDING - title).max(0.0)),
        contain_label: true,
    }
}

fn cell_title(cell: &FacetCell, text: &str) -> Graphic {
    Graphic::Text {
        left: Coord::Expr(percent(cell.left + cell.width / 2.0)),
        top: Coord::Expr(percent(cell.top + CELL_PADDING / 2.0)),
        style: GraphicStyle {
            text: Some(text.to_string()),
            text_align: Some("center".to_string()),
            ..Default::default()
        },
    }
}

/// Everything the facet path contributes to the configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetChart {
    pub layout: FacetLayout,
    pub groups: Vec<String>,
    pub grids: Vec<Grid>,
    pub x_axes: Vec<Axis>,
    pub y_axes: Vec<Axis>,
    pub series: Vec<Series>,
    pub titles: Vec<Graphic>,
}

fn global_extent(sets: &[SeriesSet]) -> Option<(f64, f64)> {
    sets.iter().filter_map(|s| s.extent).fold(None, |acc, (lo, hi)| match acc {
        None => Some((lo, hi)),
        Some((a, b)) => Some((a.min(lo), b.max(hi))),
    })
}

pub fn build_facet_chart(
    chart_type: ChartType,
    encoding: &Encoding,
    facet: &Facet,
    rows: &[&Row],
    horizontal: bool,
    trendline: bool,
) -> FacetChart {
    let partitions = partition_rows_by_facet(rows, &facet.field);
    let layout = compute_facet_layout(partitions.len(), facet.ncol);

    let request = SeriesRequest {
        chart_type,
        x: &encoding.x,
        y: &encoding.y,
        group: None,
        trendline,
    };
    let sets: Vec<SeriesSet> = partitions
        .iter()
        .map(|(_, subset)| build_series(&request, subset))
        .collect();

    let shared = if facet.share_axis { global_extent(&sets) } else { None };

    let mut chart = FacetChart::default();
    for ((cell, (key, _)), mut set) in layout.items.iter().zip(&partitions).zip(sets) {
        let idx = cell.index;
        let mut axes: AxisPair = base_axes(chart_type, &set, encoding);

        if let Some((lo, hi)) = shared {
            // y carries the measured value until orientation is applied
            if chart_type.is_bar() {
                axes.y.min = Some(lo.min(0.0));
                axes.y.max = Some(hi.max(0.0));
            } else {
                axes.y.min = Some(lo);
                axes.y.max = Some(hi);
            }
        }

        if horizontal {
            apply_orientation(&mut axes, &mut set.series);
        }
        axes.bind_grid(idx);

        for mut s in set.series {
            s.x_axis_index = Some(idx);
            s.y_axis_index = Some(idx);
            chart.series.push(s);
        }

        chart.grids.push(cell_grid(cell, facet.show_title));
        if facet.show_title {
            chart.titles.push(cell_title(cell, key));
        }
        chart.x_axes.push(axes.x);
        chart.y_axes.push(axes.y);
        chart.groups.push(key.clone());
    }

    debug!(
        field = facet.field.as_str(),
        facets = chart.groups.len(),
        rows = layout.rows,
        cols = layout.cols,
        "facet layout"
    );
    chart.layout = layout;
    chart
}
