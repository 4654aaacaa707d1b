//! Primary axis construction and the horizontal orientation swap.

use crate::ir::{Axis, Series};
use crate::parser::ast::{ChartType, Encoding};
use crate::series::{SeriesSet, COUNT_DIMENSION};

/// The x/y axis pair of one plot area
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPair {
    pub x: Axis,
    pub y: Axis,
}

impl AxisPair {
    /// Whichever axis carries values (the non-category one)
    pub fn value_axis_mut(&mut self) -> &mut Axis {
        if self.x.is_category() {
            &mut self.y
        } else {
            &mut self.x
        }
    }

    pub fn bind_grid(&mut self, index: usize) {
        self.x.grid_index = Some(index);
        self.y.grid_index = Some(index);
    }
}

/// Vertical axes for a base series set: categories (or continuous x) along x, values along y.
pub fn base_axes(chart_type: ChartType, set: &SeriesSet, encoding: &Encoding) -> AxisPair {
    let x_name = encoding.x.display_name();
    let x = match &set.categories {
        Some(categories) => Axis::category(x_name, categories.clone()),
        None => {
            let mut axis = Axis::value(x_name);
            axis.scale = Some(true);
            axis
        }
    };

    let mut y = match chart_type {
        ChartType::Histogram => Axis::value(COUNT_DIMENSION),
        _ => Axis::value(encoding.y.display_name()),
    };
    if chart_type == ChartType::Scatter {
        y.scale = Some(true);
    }

    AxisPair { x, y }
}

/// Swap axis roles for horizontal charts. Each series' encode swaps with it,
/// so the category field keeps pointing at the category axis. Applying it
/// twice restores the input.
pub fn apply_orientation(axes: &mut AxisPair, series: &mut [Series]) {
    std::mem::swap(&mut axes.x, &mut axes.y);
    for s in series {
        s.encode.swap();
    }
}
