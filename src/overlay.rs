use crate::renderer::{self, FONT_HEIGHT};
use crate::state::SimParams;

/// Number of adjustable parameters.
const PARAM_COUNT: usize = 6;

/// Index of the angle row, used by the main loop for panel-closed rotation.
pub const ANGLE_PARAM: usize = 5;

/// Panel layout constants.
const GAUGE_WIDTH: usize = 8;

/// Overlay panel state.
pub struct OverlayState {
    pub visible: bool,
    pub selected: usize,
}

impl OverlayState {
    pub fn new() -> Self {
        Self {
            visible: false,
            selected: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn navigate(&mut self, delta: isize) {
        let count = PARAM_COUNT as isize;
        self.selected = ((self.selected as isize + delta).rem_euclid(count)) as usize;
    }
}

/// Definition of an adjustable parameter.
pub struct ParamDef {
    pub name: &'static str,
    pub short: &'static str,
    pub desc: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub fine_step: f64,
    pub default: f64,
    pub get: fn(&SimParams) -> f64,
    pub set: fn(&mut SimParams, f64),
}

/// All 6 adjustable parameters.
pub const PARAM_DEFS: [ParamDef; PARAM_COUNT] = [
    ParamDef {
        name: "sigma",
        short: "prandtl",
        desc: "prandtl number coupling x to y",
        min: 0.0,
        max: 50.0,
        step: 0.5,
        fine_step: 0.1,
        default: 10.0,
        get: |p| p.sigma,
        set: |p, v| p.sigma = v,
    },
    ParamDef {
        name: "rho",
        short: "rayleigh",
        desc: "rayleigh number driving convection",
        min: 0.0,
        max: 50.0,
        step: 0.5,
        fine_step: 0.1,
        default: 28.0,
        get: |p| p.rho,
        set: |p, v| p.rho = v,
    },
    ParamDef {
        name: "beta",
        short: "geometry",
        desc: "geometric damping of z",
        min: 0.0,
        max: 10.0,
        step: 0.1,
        fine_step: 0.01,
        default: 8.0 / 3.0,
        get: |p| p.beta,
        set: |p, v| p.beta = v,
    },
    ParamDef {
        name: "n",
        short: "trajectories",
        desc: "number of random initial conditions",
        min: 0.0,
        max: 50.0,
        step: 1.0,
        fine_step: 1.0,
        default: 10.0,
        get: |p| p.trajectories as f64,
        set: |p, v| p.trajectories = v.round() as usize,
    },
    ParamDef {
        name: "horizon",
        short: "time span",
        desc: "integration time span",
        min: 0.0,
        max: 10.0,
        step: 0.1,
        fine_step: 0.01,
        default: 4.0,
        get: |p| p.horizon,
        set: |p, v| p.horizon = v,
    },
    ParamDef {
        name: "angle",
        short: "azimuth",
        desc: "camera azimuth in degrees",
        min: 0.0,
        max: 360.0,
        step: 5.0,
        fine_step: 1.0,
        default: 0.0,
        get: |p| p.angle,
        set: |p, v| p.angle = v,
    },
];

/// Adjust a parameter by delta steps (positive = increase, negative = decrease).
/// If `fine` is true, use fine_step instead of step.
/// Returns true if the value actually changed.
pub fn adjust_param(params: &mut SimParams, selected: usize, delta: i32, fine: bool) -> bool {
    let def = &PARAM_DEFS[selected];
    let old = (def.get)(params);
    let step = if fine { def.fine_step } else { def.step };
    let new_val = (old + delta as f64 * step).clamp(def.min, def.max);
    (def.set)(params, new_val);
    ((def.get)(params) - old).abs() > f64::EPSILON
}

/// Reset a parameter to its default value.
pub fn reset_param(params: &mut SimParams, selected: usize) {
    let def = &PARAM_DEFS[selected];
    (def.set)(params, def.default);
}

/// Colors used in the overlay panel.
mod colors {
    pub const BORDER: [u8; 3] = [0x44, 0x44, 0x44];
    pub const HEADER: [u8; 3] = [0x00, 0xBB, 0xBB];
    pub const LABEL_NORMAL: [u8; 3] = [0x88, 0x88, 0x88];
    pub const LABEL_SELECTED: [u8; 3] = [0xFF, 0xFF, 0xFF];
    pub const VALUE: [u8; 3] = [0xCC, 0xCC, 0xCC];
    pub const DESC_NORMAL: [u8; 3] = [0x66, 0x66, 0x66];
    pub const DESC_SELECTED: [u8; 3] = [0xAA, 0xAA, 0xAA];
    pub const HINT: [u8; 3] = [0x44, 0x88, 0x88];
    pub const CURSOR: [u8; 3] = [0x00, 0xFF, 0xFF];
}

/// Darken a rectangular region of the buffer by multiplying RGB by `factor`.
fn darken_rect(buf: &mut [u8], frame_width: usize, x0: usize, y0: usize, w: usize, h: usize, factor: f64) {
    for dy in 0..h {
        let y = y0 + dy;
        for dx in 0..w {
            let x = x0 + dx;
            let off = (y * frame_width + x) * 4;
            if off + 3 < buf.len() {
                buf[off] = (buf[off] as f64 * factor) as u8;
                buf[off + 1] = (buf[off + 1] as f64 * factor) as u8;
                buf[off + 2] = (buf[off + 2] as f64 * factor) as u8;
            }
        }
    }
}

/// Draw a 1px border rectangle.
fn draw_rect_border(buf: &mut [u8], frame_width: usize, x0: usize, y0: usize, w: usize, h: usize, color: [u8; 3]) {
    // Top and bottom edges
    for dx in 0..w {
        for &y in &[y0, y0 + h - 1] {
            let off = (y * frame_width + x0 + dx) * 4;
            if off + 3 < buf.len() {
                buf[off] = color[0];
                buf[off + 1] = color[1];
                buf[off + 2] = color[2];
                buf[off + 3] = 255;
            }
        }
    }
    // Left and right edges
    for dy in 0..h {
        for &x in &[x0, x0 + w - 1] {
            let off = ((y0 + dy) * frame_width + x) * 4;
            if off + 3 < buf.len() {
                buf[off] = color[0];
                buf[off + 1] = color[1];
                buf[off + 2] = color[2];
                buf[off + 3] = 255;
            }
        }
    }
}

/// Draw a gauge bar with teal gradient fill at custom pixel dimensions.
fn draw_gauge_scaled(buf: &mut [u8], frame_width: usize, x: usize, y: usize, ratio: f64, width_chars: usize, char_step: usize, height: usize) {
    let total_px = width_chars * char_step;
    let filled_px = ((ratio * total_px as f64).round() as usize).min(total_px);

    for dy in 0..height {
        for dx in 0..total_px {
            let off = ((y + dy) * frame_width + x + dx) * 4;
            if off + 3 < buf.len() {
                if dx < filled_px {
                    let t = dx as f64 / total_px as f64;
                    buf[off] = 0;
                    buf[off + 1] = (0x55 as f64 + t * (0xCC - 0x55) as f64) as u8;
                    buf[off + 2] = (0x55 as f64 + t * (0xCC - 0x55) as f64) as u8;
                } else {
                    buf[off] = 0x22;
                    buf[off + 1] = 0x22;
                    buf[off + 2] = 0x22;
                }
                buf[off + 3] = 255;
            }
        }
    }
}

/// Render the overlay panel onto the frame buffer.
/// Does nothing if `state.visible` is false.
pub fn render_overlay(
    buf: &mut [u8],
    frame_width: usize,
    display_width: usize,
    display_height: usize,
    state: &OverlayState,
    params: &SimParams,
) {
    if !state.visible {
        return;
    }

    // Font: 2/3 of 2x -> 7x9 pixels (nearest-neighbor resize from 5x7)
    let cw: usize = 7;
    let ch: usize = 9;
    let sc = cw + cw / 5 + 1;          // char step = 9px (proportional spacing)
    let row_h = ch + 4;                // row height = 13px
    let pad = 10;                       // inner padding

    // Compute panel width from content
    // "> horizon   ########  4.00  time span"
    // 2 + 8(name pad to 10) + 8(gauge) + 1 + 6(val) + 1 + 12(short) = 38 chars
    let content_chars = 40;
    let panel_w = content_chars * sc + pad * 2;

    // Panel height
    let panel_h = pad
        + row_h                         // header
        + 4                             // gap after header
        + PARAM_COUNT * row_h           // 6 param rows
        + 6                             // gap
        + row_h                         // description
        + 4                             // gap
        + (FONT_HEIGHT + 2)             // hints at 1x
        + pad;

    // Center the panel (clamp to display area)
    let panel_w = panel_w.min(display_width.saturating_sub(4));
    let panel_h = panel_h.min(display_height.saturating_sub(4));
    let px = display_width.saturating_sub(panel_w) / 2;
    let py = display_height.saturating_sub(panel_h) / 2;

    // Darken background
    darken_rect(buf, frame_width, px, py, panel_w, panel_h, 0.25);

    // Border
    draw_rect_border(buf, frame_width, px, py, panel_w, panel_h, colors::BORDER);

    let left = px + pad;
    let mut cy = py + pad;

    // Header
    renderer::draw_text_sized(buf, frame_width, left, cy, "lorenz parameters", colors::HEADER, cw, ch);
    cy += row_h + 4;

    // Parameter rows
    for (i, def) in PARAM_DEFS.iter().enumerate() {
        let is_sel = i == state.selected;
        let label_color = if is_sel { colors::LABEL_SELECTED } else { colors::LABEL_NORMAL };
        let desc_color = if is_sel { colors::DESC_SELECTED } else { colors::DESC_NORMAL };

        // Cursor ">"
        let mut cx = left;
        if is_sel {
            renderer::draw_text_sized(buf, frame_width, cx, cy, ">", colors::CURSOR, cw, ch);
        }
        cx += 2 * sc;

        // Name (up to 7 chars, padded to column 10)
        renderer::draw_text_sized(buf, frame_width, cx, cy, def.name, label_color, cw, ch);
        cx = left + 10 * sc;

        // Gauge bar
        let val = (def.get)(params);
        let ratio = if (def.max - def.min).abs() > f64::EPSILON {
            ((val - def.min) / (def.max - def.min)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        draw_gauge_scaled(buf, frame_width, cx, cy, ratio, GAUGE_WIDTH, sc, ch);
        cx += GAUGE_WIDTH * sc + sc;

        // Value
        let val_str = if def.step >= 1.0 {
            format!("{:.0}", val)
        } else if def.step >= 0.1 {
            format!("{:.2}", val)
        } else {
            format!("{:.3}", val)
        };
        cx = renderer::draw_text_sized(buf, frame_width, cx, cy, &val_str, colors::VALUE, cw, ch);
        cx += sc;

        // Short description
        renderer::draw_text_sized(buf, frame_width, cx, cy, def.short, desc_color, cw, ch);

        cy += row_h;
    }

    cy += 6;

    // Selected parameter description
    let sel_def = &PARAM_DEFS[state.selected];
    renderer::draw_text_sized(buf, frame_width, left, cy, sel_def.desc, colors::DESC_SELECTED, cw, ch);
    cy += row_h + 4;

    // Key hints at 1x, smaller for visual hierarchy
    renderer::draw_text(
        buf,
        frame_width,
        left,
        cy,
        "space=close  ud=nav  lr=adj  ,.=fine  r=reset",
        colors::HINT,
    );
}
