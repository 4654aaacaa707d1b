//! Style Resolution Engine
//!
//! Resolves a spec's `style` block into a concrete font and palette, then
//! pushes that font onto every text-bearing element of a compiled config.
//!
//! Resolution order for each setting:
//! 1. explicit value in `style` (`font.family`, `font.size`, `colors`/`scheme`)
//! 2. the preset's default
//!
//! Elements that already carry a setting keep it.

use crate::ir::{RenderConfig, TextStyle};
use crate::palette;
use crate::parser::ast::{Preset, Style};

/// Hardcoded defaults of a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetDefaults {
    pub font_family: &'static str,
    pub font_size: f64,
    pub text_color: &'static str,
    pub colors: &'static [&'static str],
}

impl Preset {
    pub fn defaults(self) -> PresetDefaults {
        match self {
            Preset::Default => PresetDefaults {
                font_family: "sans-serif",
                font_size: 12.0,
                text_color: "#333333",
                colors: &[
                    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de",
                    "#3ba272", "#fc8452", "#9a60b4", "#ea7ccc",
                ],
            },
            Preset::Nature => PresetDefaults {
                font_family: "Arial",
                font_size: 10.0,
                text_color: "#000000",
                colors: &[
                    "#e64b35", "#4dbbd5", "#00a087", "#3c5488",
                    "#f39b7f", "#8491b4", "#91d1c2", "#dc0000",
                ],
            },
            Preset::Science => PresetDefaults {
                font_family: "Helvetica",
                font_size: 10.0,
                text_color: "#000000",
                colors: &[
                    "#3b4992", "#ee0000", "#008b45", "#631879",
                    "#008280", "#bb0021", "#5f559b", "#a20056",
                ],
            },
            Preset::Apa => PresetDefaults {
                font_family: "Times New Roman",
                font_size: 12.0,
                text_color: "#000000",
                colors: &["#1f1f1f", "#4d4d4d", "#7f7f7f", "#b3b3b3"],
            },
            Preset::Grayscale => PresetDefaults {
                font_family: "sans-serif",
                font_size: 12.0,
                text_color: "#252525",
                colors: &["#252525", "#525252", "#737373", "#969696", "#bdbdbd", "#d9d9d9"],
            },
        }
    }
}

/// Fully resolved style (no Options)
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub font_family: String,
    pub font_size: f64,
    pub text_color: String,
    pub palette: Vec<String>,
    pub show_data_labels: bool,
}

impl ResolvedStyle {
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_family: Some(self.font_family.clone()),
            font_size: Some(self.font_size),
            color: Some(self.text_color.clone()),
        }
    }
}

impl Style {
    pub fn resolve(&self) -> ResolvedStyle {
        let defaults = self.preset.defaults();
        let font = self.font.as_ref();

        let font_family = font
            .and_then(|f| f.family.as_deref())
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(defaults.font_family)
            .to_string();

        let font_size = font
            .and_then(|f| f.size)
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(defaults.font_size);

        ResolvedStyle {
            font_family,
            font_size,
            text_color: defaults.text_color.to_string(),
            palette: palette::resolve_colors(self.colors.as_deref(), self.scheme.as_deref(), self.preset),
            show_data_labels: self.show_data_labels,
        }
    }
}

fn fill_text(target: &mut TextStyle, style: &ResolvedStyle) {
    if target.font_family.is_none() {
        target.font_family = Some(style.font_family.clone());
    }
    if target.font_size.is_none() {
        target.font_size = Some(style.font_size);
    }
}

/// Apply the resolved font to axes, labels, legend, tooltip and graphics
pub fn apply_text_style(config: &mut RenderConfig, style: &ResolvedStyle) {
    config.text_style = style.text_style();

    for axis in config.x_axis.as_mut_slice().iter_mut().chain(config.y_axis.as_mut_slice()) {
        fill_text(&mut axis.axis_label, style);
        fill_text(&mut axis.name_text_style, style);
    }

    fill_text(&mut config.legend.text_style, style);
    fill_text(&mut config.tooltip.text_style, style);

    for series in &mut config.series {
        if let Some(label) = series.label.as_mut() {
            label.font_family.get_or_insert_with(|| style.font_family.clone());
            label.font_size.get_or_insert(style.font_size);
        }
    }

    if let Some(graphics) = config.graphic.as_mut() {
        for g in graphics {
            let gs = g.style_mut();
            gs.font_family.get_or_insert_with(|| style.font_family.clone());
            gs.font_size.get_or_insert(style.font_size);
        }
    }
}
