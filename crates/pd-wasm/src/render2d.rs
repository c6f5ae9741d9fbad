//! Canvas2D frame backend.
//!
//! Replays a `Frame` onto an HTML `<canvas>` via `CanvasRenderingContext2d`.
//! The frame is already in canvas pixels; this module only maps commands to
//! context calls and adds the dotted backdrop grid.

use pd_core::Color;
use pd_render::{DrawCmd, Frame, TextAlign};
use web_sys::CanvasRenderingContext2d;

/// Theme-dependent colors for the canvas backdrop.
pub struct CanvasTheme {
    pub grid: &'static str,
    pub font_family: &'static str,
}

impl CanvasTheme {
    /// Faint dark dots.
    pub fn light() -> Self {
        Self {
            grid: "rgba(0, 0, 0, 0.06)",
            font_family: "Inter, system-ui, sans-serif",
        }
    }

    /// Faint light dots.
    pub fn dark() -> Self {
        Self {
            grid: "rgba(255, 255, 255, 0.05)",
            font_family: "Inter, system-ui, sans-serif",
        }
    }
}

const GRID_SPACING: f64 = 20.0;

/// Draw a complete frame.
pub fn render_frame(ctx: &CanvasRenderingContext2d, frame: &Frame, theme: &CanvasTheme) {
    for cmd in &frame.commands {
        match cmd {
            DrawCmd::Clear { color } => {
                ctx.set_fill_style_str(&css_color(*color));
                ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
                draw_grid(ctx, frame.width, frame.height, theme);
            }
            DrawCmd::FillRect {
                rect,
                color,
                radius,
            } => {
                ctx.set_fill_style_str(&css_color(*color));
                rounded_rect_path(ctx, rect.x0, rect.y0, rect.width(), rect.height(), *radius);
                ctx.fill();
            }
            DrawCmd::StrokeRect {
                rect,
                color,
                width,
                radius,
            } => {
                ctx.set_stroke_style_str(&css_color(*color));
                ctx.set_line_width(*width);
                rounded_rect_path(ctx, rect.x0, rect.y0, rect.width(), rect.height(), *radius);
                ctx.stroke();
            }
            DrawCmd::Text {
                text,
                origin,
                size,
                color,
                align,
            } => {
                if text.is_empty() {
                    continue;
                }
                ctx.set_font(&format!("{size}px {}", theme.font_family));
                ctx.set_fill_style_str(&css_color(*color));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                ctx.set_text_baseline("alphabetic");
                let _ = ctx.fill_text(text, origin.x, origin.y);
            }
        }
    }
}

// ─── Drawing primitives ─────────────────────────────────────────────────

fn draw_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &CanvasTheme) {
    ctx.set_fill_style_str(theme.grid);
    let mut y = GRID_SPACING;
    while y < height {
        let mut x = GRID_SPACING;
        while x < width {
            ctx.fill_rect(x - 0.5, y - 0.5, 1.0, 1.0);
            x += GRID_SPACING;
        }
        y += GRID_SPACING;
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}

/// Hex for opaque colors, `rgba(...)` otherwise.
pub(crate) fn css_color(c: Color) -> String {
    let [r, g, b, a] = c.to_rgba8();
    if a == 255 {
        c.to_hex()
    } else {
        format!("rgba({r}, {g}, {b}, {:.3})", f32::from(a) / 255.0)
    }
}
