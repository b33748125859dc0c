use crate::camera::{box_edges, Camera};
use crate::state::Trajectory;

/// Selects which color palette trajectory indices are spread across.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorMap {
    /// Perceptually uniform purple -> teal -> yellow.
    Viridis,
    /// Dark blue -> magenta -> yellow.
    Plasma,
    /// Black -> purple -> orange -> pale yellow.
    Inferno,
}

impl ColorMap {
    pub fn next(self) -> Self {
        match self {
            ColorMap::Viridis => ColorMap::Plasma,
            ColorMap::Plasma => ColorMap::Inferno,
            ColorMap::Inferno => ColorMap::Viridis,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorMap::Viridis => "viridis",
            ColorMap::Plasma => "plasma",
            ColorMap::Inferno => "inferno",
        }
    }
}

/// Viridis anchor colors.
const VIRIDIS_STOPS: [(f64, f64, f64); 5] = [
    (68.0, 1.0, 84.0),    // deep purple      (0.00)
    (59.0, 82.0, 139.0),  // blue             (0.25)
    (33.0, 145.0, 140.0), // teal             (0.50)
    (94.0, 201.0, 98.0),  // green            (0.75)
    (253.0, 231.0, 37.0), // yellow           (1.00)
];

/// Plasma anchor colors.
const PLASMA_STOPS: [(f64, f64, f64); 5] = [
    (13.0, 8.0, 135.0),   // deep blue        (0.00)
    (126.0, 3.0, 168.0),  // purple           (0.25)
    (204.0, 71.0, 120.0), // magenta          (0.50)
    (248.0, 149.0, 64.0), // orange           (0.75)
    (240.0, 249.0, 33.0), // yellow           (1.00)
];

/// Inferno anchor colors.
const INFERNO_STOPS: [(f64, f64, f64); 5] = [
    (0.0, 0.0, 4.0),       // near black      (0.00)
    (87.0, 16.0, 110.0),   // purple          (0.25)
    (188.0, 55.0, 84.0),   // crimson         (0.50)
    (249.0, 142.0, 9.0),   // orange          (0.75)
    (252.0, 255.0, 164.0), // pale yellow     (1.00)
];

/// Convert a [0.0, 1.0] value to RGBA using the specified color map.
pub fn map_to_rgba(t: f64, colormap: ColorMap) -> [u8; 4] {
    let stops = match colormap {
        ColorMap::Viridis => &VIRIDIS_STOPS,
        ColorMap::Plasma => &PLASMA_STOPS,
        ColorMap::Inferno => &INFERNO_STOPS,
    };

    let t = t.clamp(0.0, 1.0);
    let seg = t * 4.0;
    let i = (seg as usize).min(3);
    let s = seg - i as f64;

    let (r0, g0, b0) = stops[i];
    let (r1, g1, b1) = stops[i + 1];

    [
        (r0 + s * (r1 - r0)) as u8,
        (g0 + s * (g1 - g0)) as u8,
        (b0 + s * (b1 - b0)) as u8,
        255,
    ]
}

/// Position of trajectory `index` out of `total` on the color map:
/// evenly spaced over [0, 1], a single trajectory sits at 0.
pub fn color_position(index: usize, total: usize) -> f64 {
    if total <= 1 {
        0.0
    } else {
        index as f64 / (total - 1) as f64
    }
}

pub fn trajectory_color(index: usize, total: usize, colormap: ColorMap) -> [u8; 4] {
    map_to_rgba(color_position(index, total), colormap)
}

/// Scene colors.
const BACKGROUND: [u8; 3] = [0x05, 0x05, 0x0c];
const BOX_COLOR: [u8; 3] = [0x2e, 0x2e, 0x3a];

/// Status bar layout constants.
pub(crate) const FONT_WIDTH: usize = 5;
pub(crate) const FONT_HEIGHT: usize = 7;
const STATUS_PAD_TOP: usize = 3;
const STATUS_PAD_BOTTOM: usize = 2;
pub(crate) const STATUS_BAR_HEIGHT: usize = STATUS_PAD_TOP + FONT_HEIGHT + STATUS_PAD_BOTTOM;

/// Smallest usable display dimension when fitting to a tiny window.
const MIN_DISPLAY: usize = 64;

/// 5x7 bitmap font glyph lookup. Each row is a u8 with lower 5 bits = pixels (bit4=left).
const fn glyph(ch: u8) -> [u8; FONT_HEIGHT] {
    match ch {
        b' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        b'.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00],
        b',' => [0x00, 0x00, 0x00, 0x00, 0x04, 0x04, 0x08],
        b'-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        b'>' => [0x10, 0x08, 0x04, 0x02, 0x04, 0x08, 0x10],
        b'=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        b'|' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        b'[' => [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E],
        b']' => [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E],
        b'0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        b'1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        b'2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        b'3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        b'4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        b'5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        b'6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        b'7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        b'8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        b'9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        b'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        b'b' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E],
        b'c' => [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
        b'd' => [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
        b'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        b'f' => [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
        b'g' => [0x00, 0x00, 0x0F, 0x11, 0x0F, 0x01, 0x0E],
        b'h' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
        b'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        b'j' => [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C],
        b'k' => [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
        b'l' => [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        b'm' => [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
        b'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        b'o' => [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
        b'p' => [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
        b'q' => [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01],
        b'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        b's' => [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E],
        b't' => [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
        b'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
        b'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04],
        b'w' => [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A],
        b'x' => [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
        b'y' => [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        b'z' => [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F],
        _ => [0x00; FONT_HEIGHT],
    }
}

fn draw_char(buf: &mut [u8], frame_width: usize, x: usize, y: usize, ch: u8, color: [u8; 3]) {
    let g = glyph(ch);
    for row in 0..FONT_HEIGHT {
        let bits = g[row];
        for col in 0..FONT_WIDTH {
            if bits & (1 << (FONT_WIDTH - 1 - col)) != 0 {
                let offset = ((y + row) * frame_width + x + col) * 4;
                if offset + 3 < buf.len() {
                    buf[offset] = color[0];
                    buf[offset + 1] = color[1];
                    buf[offset + 2] = color[2];
                    buf[offset + 3] = 255;
                }
            }
        }
    }
}

/// Draw a string of text at (x, y) in the given color. Returns the x position after the last character.
pub(crate) fn draw_text(buf: &mut [u8], frame_width: usize, x: usize, y: usize, text: &str, color: [u8; 3]) -> usize {
    let char_step = FONT_WIDTH + 1;
    let mut cx = x;
    for &ch in text.as_bytes() {
        draw_char(buf, frame_width, cx, y, ch, color);
        cx += char_step;
    }
    cx
}

/// Draw a character at (x, y) resized to target (cw x ch) pixels via nearest-neighbor.
fn draw_char_sized(buf: &mut [u8], frame_width: usize, x: usize, y: usize, ch_code: u8, color: [u8; 3], cw: usize, ch: usize) {
    let g = glyph(ch_code);
    for py in 0..ch {
        let src_row = py * FONT_HEIGHT / ch;
        let bits = g[src_row];
        for px in 0..cw {
            let src_col = px * FONT_WIDTH / cw;
            if bits & (1 << (FONT_WIDTH - 1 - src_col)) != 0 {
                let offset = ((y + py) * frame_width + x + px) * 4;
                if offset + 3 < buf.len() {
                    buf[offset] = color[0];
                    buf[offset + 1] = color[1];
                    buf[offset + 2] = color[2];
                    buf[offset + 3] = 255;
                }
            }
        }
    }
}

/// Draw a string of text at (x, y) with each character sized to (cw x ch) pixels.
/// Returns the x position after the last character.
pub(crate) fn draw_text_sized(buf: &mut [u8], frame_width: usize, x: usize, y: usize, text: &str, color: [u8; 3], cw: usize, ch: usize) -> usize {
    let char_step = cw + cw / 5 + 1; // proportional spacing (~20% of char width)
    let mut cx = x;
    for &byte in text.as_bytes() {
        draw_char_sized(buf, frame_width, cx, y, byte, color, cw, ch);
        cx += char_step;
    }
    cx
}

/// Render layout computed from the window size: the 3D viewport on top of a
/// one-line status bar.
pub struct RenderConfig {
    pub display_width: usize,
    pub display_height: usize,
    pub frame_width: usize,
    pub frame_height: usize,
}

impl RenderConfig {
    /// Compute layout to fit the given pixel dimensions.
    pub fn fit(pixel_width: usize, pixel_height: usize) -> Self {
        let display_width = pixel_width.max(MIN_DISPLAY);
        let display_height = pixel_height
            .saturating_sub(STATUS_BAR_HEIGHT)
            .max(MIN_DISPLAY);
        Self {
            display_width,
            display_height,
            frame_width: display_width,
            frame_height: display_height + STATUS_BAR_HEIGHT,
        }
    }

    /// Pixels per unit of projected view-plane distance. 0.29 of the short
    /// display edge keeps the whole bounding box on screen at any azimuth
    /// with the fixed 30 degree elevation.
    pub fn view_scale(&self) -> f64 {
        self.display_width.min(self.display_height) as f64 * 0.29
    }

    /// Map view-plane (u, v) to pixel coordinates, v up.
    fn to_screen(&self, u: f64, v: f64) -> (f64, f64) {
        let cx = self.display_width as f64 / 2.0;
        let cy = self.display_height as f64 / 2.0;
        let s = self.view_scale();
        (cx + u * s, cy - v * s)
    }
}

/// Plot a line between two pixel positions into the display area.
fn draw_line(
    buf: &mut [u8],
    cfg: &RenderConfig,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    color: [u8; 3],
) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = (dx.abs().max(dy.abs()).ceil() as usize).max(1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = x0 + dx * t;
        let y = y0 + dy * t;
        if x >= 0.0 && y >= 0.0 {
            let (px, py) = (x as usize, y as usize);
            if px < cfg.display_width && py < cfg.display_height {
                let offset = (py * cfg.frame_width + px) * 4;
                buf[offset] = color[0];
                buf[offset + 1] = color[1];
                buf[offset + 2] = color[2];
                buf[offset + 3] = 255;
            }
        }
    }
}

/// Mark a degenerate single-sample trajectory as a small diamond.
fn draw_dot(buf: &mut [u8], cfg: &RenderConfig, (x, y): (f64, f64), color: [u8; 3]) {
    const DIAMOND: [(isize, isize); 5] = [(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)];
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (cx, cy) = (x as isize, y as isize);
    for (dx, dy) in DIAMOND {
        let (px, py) = (cx + dx, cy + dy);
        if px >= 0 && py >= 0 && (px as usize) < cfg.display_width && (py as usize) < cfg.display_height {
            let offset = (py as usize * cfg.frame_width + px as usize) * 4;
            buf[offset] = color[0];
            buf[offset + 1] = color[1];
            buf[offset + 2] = color[2];
            buf[offset + 3] = 255;
        }
    }
}

/// Render the bounding-box wireframe and all trajectories into the RGBA
/// frame buffer, resizing it to the layout if needed.
pub fn render_into(
    buf: &mut Vec<u8>,
    trajectories: &[Trajectory],
    cfg: &RenderConfig,
    camera: &Camera,
    colormap: ColorMap,
) {
    buf.resize(cfg.frame_width * cfg.frame_height * 4, 0);

    // Background fill over the display area.
    for y in 0..cfg.display_height {
        for x in 0..cfg.display_width {
            let offset = (y * cfg.frame_width + x) * 4;
            buf[offset] = BACKGROUND[0];
            buf[offset + 1] = BACKGROUND[1];
            buf[offset + 2] = BACKGROUND[2];
            buf[offset + 3] = 255;
        }
    }

    // Bounding-box wireframe.
    for (a, b) in box_edges() {
        let (ua, va) = camera.project(a);
        let (ub, vb) = camera.project(b);
        draw_line(buf, cfg, cfg.to_screen(ua, va), cfg.to_screen(ub, vb), BOX_COLOR);
    }

    // One polyline per trajectory, colors spread across the map.
    let total = trajectories.len();
    for (i, traj) in trajectories.iter().enumerate() {
        let rgba = trajectory_color(i, total, colormap);
        let color = [rgba[0], rgba[1], rgba[2]];
        if traj.len() == 1 {
            let (u, v) = camera.project(traj.points[0]);
            draw_dot(buf, cfg, cfg.to_screen(u, v), color);
            continue;
        }
        let mut prev: Option<(f64, f64)> = None;
        for &p in &traj.points {
            let (u, v) = camera.project(p);
            let screen = cfg.to_screen(u, v);
            if let Some(last) = prev {
                draw_line(buf, cfg, last, screen, color);
            }
            prev = Some(screen);
        }
    }
}

/// Allocating render convenience (used in tests).
#[cfg(test)]
pub fn render(
    trajectories: &[Trajectory],
    cfg: &RenderConfig,
    camera: &Camera,
    colormap: ColorMap,
) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, trajectories, cfg, camera, colormap);
    buf
}

/// Draw status text at the bottom of the frame buffer.
pub fn render_status(buf: &mut [u8], cfg: &RenderConfig, text: &str) {
    let fw = cfg.frame_width;
    let y_start = cfg.display_height;

    // Fill status bar background (#0D0D0D)
    for y in y_start..cfg.frame_height {
        for x in 0..fw {
            let offset = (y * fw + x) * 4;
            if offset + 3 < buf.len() {
                buf[offset] = 0x0D;
                buf[offset + 1] = 0x0D;
                buf[offset + 2] = 0x0D;
                buf[offset + 3] = 255;
            }
        }
    }

    // Separator line (#333333)
    for x in 0..fw {
        let offset = (y_start * fw + x) * 4;
        if offset + 3 < buf.len() {
            buf[offset] = 0x33;
            buf[offset + 1] = 0x33;
            buf[offset + 2] = 0x33;
            buf[offset + 3] = 255;
        }
    }

    // Draw text
    let text_y = y_start + STATUS_PAD_TOP;
    let text_color: [u8; 3] = [0x88, 0x88, 0x88];
    let char_step = FONT_WIDTH + 1;
    let mut cx = 4; // left padding
    for &ch in text.as_bytes() {
        if cx + FONT_WIDTH > fw {
            break;
        }
        draw_char(buf, fw, cx, text_y, ch, text_color);
        cx += char_step;
    }
}
