use egui::{Color32, Visuals};

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Parse a `#RRGGBB` colour. Returns `None` for anything else.
pub fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color32::from_rgb(r, g, b))
}

#[derive(Clone, Copy, Debug)]
pub struct GridPalette {
    pub background: Color32,
    pub header_bg: Color32,
    pub header_text: Color32,
    pub today_header_bg: Color32,
    pub label_text: Color32,
    pub regular_bg: Color32,
    pub weekend_bg: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub block_default: Color32,
    pub block_text: Color32,
    /// Original position of the block being dragged
    pub ghost: Color32,
    pub preview_legal: Color32,
    pub preview_illegal: Color32,
    pub drop_target: Color32,
    pub hover_overlay: Color32,
}

impl GridPalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let base = visuals.panel_fill;
        let text = visuals.text_color();
        let accent = visuals.selection.bg_fill;

        if visuals.dark_mode {
            Self {
                background: base,
                header_bg: blend(base, Color32::WHITE, 0.08),
                header_text: text,
                today_header_bg: blend(base, accent, 0.5),
                label_text: with_alpha(text, 180),
                regular_bg: blend(base, Color32::WHITE, 0.03),
                weekend_bg: blend(base, Color32::BLACK, 0.15),
                hour_line: Color32::from_gray(80),
                slot_line: Color32::from_gray(55),
                block_default: Color32::from_rgb(59, 130, 246),
                block_text: Color32::from_rgb(245, 245, 245),
                ghost: with_alpha(Color32::from_gray(160), 50),
                preview_legal: with_alpha(Color32::from_rgb(34, 197, 94), 110),
                preview_illegal: with_alpha(Color32::from_rgb(239, 68, 68), 120),
                drop_target: with_alpha(accent, 90),
                hover_overlay: with_alpha(accent, 50),
            }
        } else {
            Self {
                background: base,
                header_bg: blend(base, Color32::BLACK, 0.05),
                header_text: text,
                today_header_bg: blend(base, accent, 0.4),
                label_text: with_alpha(text, 200),
                regular_bg: Color32::WHITE,
                weekend_bg: blend(Color32::WHITE, base, 0.6),
                hour_line: Color32::from_gray(190),
                slot_line: Color32::from_gray(225),
                block_default: Color32::from_rgb(59, 130, 246),
                block_text: Color32::WHITE,
                ghost: with_alpha(Color32::from_gray(120), 40),
                preview_legal: with_alpha(Color32::from_rgb(34, 197, 94), 90),
                preview_illegal: with_alpha(Color32::from_rgb(239, 68, 68), 100),
                drop_target: with_alpha(accent, 70),
                hover_overlay: with_alpha(accent, 30),
            }
        }
    }

    /// Fill for an appointment block, falling back to the default colour.
    pub fn block_fill(&self, color: Option<&str>) -> Color32 {
        color.and_then(parse_color).unwrap_or(self.block_default)
    }
}
