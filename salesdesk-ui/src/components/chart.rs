//! Chart Components
//!
//! Report charts drawn on HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::{NamedQuantity, TrendPoint};

/// Palette shared by every report chart
pub const SERIES_COLORS: [&str; 6] = [
    "#10b981", // Emerald
    "#f59e0b", // Amber
    "#3b82f6", // Blue
    "#8b5cf6", // Violet
    "#ec4899", // Pink
    "#14b8a6", // Teal
];

const QUANTITY_COLOR: &str = "#3b82f6";
const DELIVERED_COLOR: &str = "#10b981";

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const LABEL: &str = "#9ca3af"; // gray-400

struct Margins {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

/// Monthly quantity vs delivered
#[component]
pub fn LineChart(trend: Vec<TrendPoint>) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_trend(&canvas, &trend);
        }
    });

    view! {
        <div class="relative">
            <canvas node_ref=canvas_ref width="800" height="300" class="w-full h-64 rounded-lg" />
            <div class="flex justify-center gap-4 mt-4">
                <LegendItem color=QUANTITY_COLOR label="Quantity" />
                <LegendItem color=DELIVERED_COLOR label="Delivered" />
            </div>
        </div>
    }
}

/// Quantities per name; horizontal bars suit long names
#[component]
pub fn BarChart(
    bars: Vec<NamedQuantity>,
    color: &'static str,
    #[prop(default = false)]
    horizontal: bool,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_bars(&canvas, &bars, color, horizontal);
        }
    });

    view! {
        <canvas node_ref=canvas_ref width="800" height="300" class="w-full h-64 rounded-lg" />
    }
}

#[component]
fn LegendItem(color: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <div class="flex items-center space-x-2">
            <div class="w-3 h-3 rounded-full" style=format!("background-color: {}", color) />
            <span class="text-sm text-gray-300">{label}</span>
        </div>
    }
}

/// Y axis bounds from zero with headroom
pub fn axis_max(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_value_grid(ctx: &CanvasRenderingContext2d, m: &Margins, width: f64, height: f64, max: f64) {
    let chart_height = height - m.top - m.bottom;

    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");

    for i in 0..=5 {
        let y = m.top + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(m.left, y);
        ctx.line_to(width - m.right, y);
        ctx.stroke();

        let value = max - (i as f64 / 5.0) * max;
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }
}

fn draw_trend(canvas: &HtmlCanvasElement, trend: &[TrendPoint]) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let m = Margins { left: 50.0, right: 20.0, top: 20.0, bottom: 40.0 };
    let chart_width = width - m.left - m.right;
    let chart_height = height - m.top - m.bottom;

    clear(&ctx, width, height);

    let max = axis_max(trend.iter().flat_map(|p| [p.quantity, p.delivered]));
    draw_value_grid(&ctx, &m, width, height, max);

    let step = if trend.len() > 1 {
        chart_width / (trend.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |i: usize| {
        if trend.len() > 1 {
            m.left + i as f64 * step
        } else {
            m.left + chart_width / 2.0
        }
    };
    let y_at = |value: f64| m.top + ((max - value) / max) * chart_height;

    let series: [(&str, fn(&TrendPoint) -> f64); 2] = [
        (QUANTITY_COLOR, |p| p.quantity),
        (DELIVERED_COLOR, |p| p.delivered),
    ];

    for (color, pick) in series {
        ctx.set_stroke_style(&color.into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        for (i, point) in trend.iter().enumerate() {
            let (x, y) = (x_at(i), y_at(pick(point)));
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();

        ctx.set_fill_style(&color.into());
        for (i, point) in trend.iter().enumerate() {
            ctx.begin_path();
            let _ = ctx.arc(x_at(i), y_at(pick(point)), 3.0, 0.0, std::f64::consts::PI * 2.0);
            ctx.fill();
        }
    }

    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");
    for (i, point) in trend.iter().enumerate() {
        let _ = ctx.fill_text(&point.month, x_at(i) - 15.0, height - 10.0);
    }
}

fn draw_bars(canvas: &HtmlCanvasElement, bars: &[NamedQuantity], color: &str, horizontal: bool) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    clear(&ctx, width, height);
    if bars.is_empty() {
        return;
    }

    let max = axis_max(bars.iter().map(|b| b.quantity));
    ctx.set_font("12px sans-serif");

    if horizontal {
        let m = Margins { left: 110.0, right: 40.0, top: 10.0, bottom: 10.0 };
        let slot = (height - m.top - m.bottom) / bars.len() as f64;
        let chart_width = width - m.left - m.right;

        for (i, bar) in bars.iter().enumerate() {
            let y = m.top + i as f64 * slot;
            let length = (bar.quantity / max) * chart_width;

            ctx.set_fill_style(&color.into());
            ctx.fill_rect(m.left, y + slot * 0.15, length, slot * 0.7);

            ctx.set_fill_style(&LABEL.into());
            let _ = ctx.fill_text(&truncate(&bar.name, 14), 5.0, y + slot / 2.0 + 4.0);
            let _ = ctx.fill_text(&format!("{}", bar.quantity), m.left + length + 5.0, y + slot / 2.0 + 4.0);
        }
    } else {
        let m = Margins { left: 50.0, right: 20.0, top: 20.0, bottom: 60.0 };
        draw_value_grid(&ctx, &m, width, height, max);

        let slot = (width - m.left - m.right) / bars.len() as f64;
        let chart_height = height - m.top - m.bottom;

        for (i, bar) in bars.iter().enumerate() {
            let x = m.left + i as f64 * slot;
            let bar_height = (bar.quantity / max) * chart_height;

            ctx.set_fill_style(&color.into());
            ctx.fill_rect(x + slot * 0.15, m.top + chart_height - bar_height, slot * 0.7, bar_height);

            ctx.save();
            let _ = ctx.translate(x + slot / 2.0, height - m.bottom + 12.0);
            let _ = ctx.rotate(-std::f64::consts::FRAC_PI_4);
            ctx.set_fill_style(&LABEL.into());
            let _ = ctx.fill_text(&truncate(&bar.name, 12), -60.0, 0.0);
            ctx.restore();
        }
    }
}

fn truncate(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars - 1).collect();
        format!("{}…", head)
    }
}
