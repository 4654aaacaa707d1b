//! Named colour palettes and the colour resolution chain.
//!
//! Resolution order, first match wins:
//! 1. explicit `style.colors` (non-empty), verbatim
//! 2. `style.scheme` naming a known palette
//! 3. the preset's default colours (also used for unknown scheme names)

use crate::parser::ast::Preset;
use tracing::debug;

/// A named, ordered colour list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: &'static [&'static str],
}

impl Palette {
    pub fn to_vec(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_string()).collect()
    }
}

pub const PALETTES: &[Palette] = &[
    Palette {
        name: "Set1",
        colors: &[
            "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00",
            "#ffff33", "#a65628", "#f781bf", "#999999",
        ],
    },
    Palette {
        name: "Set2",
        colors: &[
            "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3",
            "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
        ],
    },
    Palette {
        name: "Set3",
        colors: &[
            "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462",
            "#b3de69", "#fccde5", "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
        ],
    },
    Palette {
        name: "Dark2",
        colors: &[
            "#1b9e77", "#d95f02", "#7570b3", "#e7298a",
            "#66a61e", "#e6ab02", "#a6761d", "#666666",
        ],
    },
    Palette {
        name: "Pastel1",
        colors: &[
            "#fbb4ae", "#b3cde3", "#ccebc5", "#decbe4", "#fed9a6",
            "#ffffcc", "#e5d8bd", "#fddaec", "#f2f2f2",
        ],
    },
    Palette {
        name: "Paired",
        colors: &[
            "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c",
            "#fdbf6f", "#ff7f00", "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
        ],
    },
    Palette {
        name: "Category10",
        colors: &[
            "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
            "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
        ],
    },
    Palette {
        name: "Tableau10",
        colors: &[
            "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
            "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
        ],
    },
    Palette {
        name: "Viridis",
        colors: &["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"],
    },
];

/// Find a palette by name, ignoring ASCII case
pub fn lookup(name: &str) -> Option<&'static Palette> {
    PALETTES.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// Resolve the final palette. Total: there is no error path.
pub fn resolve_colors(colors: Option<&[String]>, scheme: Option<&str>, preset: Preset) -> Vec<String> {
    if let Some(colors) = colors.filter(|c| !c.is_empty()) {
        return colors.to_vec();
    }

    if let Some(name) = scheme {
        match lookup(name) {
            Some(palette) => return palette.to_vec(),
            None => debug!(scheme = name, ?preset, "unknown colour scheme, using preset colours"),
        }
    }

    preset
        .defaults()
        .colors
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Colour for the `index`-th slot, cycling through the palette
pub fn pick(colors: &[String], index: usize) -> Option<&str> {
    if colors.is_empty() {
        None
    } else {
        Some(colors[index % colors.len()].as_str())
    }
}
