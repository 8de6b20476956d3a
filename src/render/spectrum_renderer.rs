use crate::audio::SpectrumSnapshot;
use crate::ui::tui::Tui;
use anyhow::Result;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

/// Draws spectrum snapshots. Called at whatever rate the host loop runs.
pub trait Renderer {
    fn render(&mut self, snapshot: &SpectrumSnapshot, label: &str) -> Result<()>;
}

const LOW: Color = Color::Rgb(0x40, 0xc0, 0x70);
const HIGH: Color = Color::Rgb(0xf0, 0x50, 0x40);

/// One horizontal column per band, label on top.
pub struct TerminalRenderer {
    tui: Tui,
    max_value: f32,
}

impl TerminalRenderer {
    pub fn new(max_value: f32) -> Result<Self> {
        Ok(Self { tui: Tui::new()?, max_value })
    }

    pub fn enter(&mut self) -> Result<()> {
        self.tui.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.tui.exit()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, snapshot: &SpectrumSnapshot, label: &str) -> Result<()> {
        let max_value = self.max_value;
        self.tui.draw(|f| {
            let area = f.size();
            let w = area.width as usize;
            let h = area.height as usize;
            if w == 0 || h == 0 {
                return;
            }

            let mut lines: Vec<Line> = Vec::with_capacity(h);
            lines.push(Line::from(fit_label(label, w)));

            let rows = snapshot.values.len().min(h.saturating_sub(1));
            for (i, &v) in snapshot.values.iter().take(rows).enumerate() {
                let t = (v / max_value).clamp(0.0, 1.0);
                let fg = mix(LOW, HIGH, t);
                lines.push(Line::from(Span::styled(row_text(i, v, max_value, w), Style::default().fg(fg))));
            }

            f.render_widget(Paragraph::new(lines), area);
        })
    }
}

/// `"NN VV ███▌"`: band index, integer value, then a bar scaled to the
/// space left on the row. Rows below 1 are blank.
pub fn row_text(index: usize, value: f32, max_value: f32, width: usize) -> String {
    let value = value.clamp(0.0, max_value);
    let whole = value as u32;
    if whole == 0 {
        return String::new();
    }

    let prefix = format!("{index:02} {whole:02} ");
    let avail = width.saturating_sub(prefix.len());
    let fill = value / max_value * avail as f32;
    let full = (fill.floor() as usize).min(avail);
    let frac = fill - full as f32;

    let mut s = prefix;
    s.push_str(&"█".repeat(full));
    if full < avail {
        if let Some(ch) = partial_char(frac) {
            s.push(ch);
        }
    }
    s
}

fn partial_char(frac: f32) -> Option<char> {
    // eighths, left aligned
    const EIGHTHS: [char; 7] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];
    let idx = (frac * 8.0).floor() as usize;
    if idx == 0 {
        None
    } else {
        EIGHTHS.get(idx - 1).copied()
    }
}

/// Truncates to `width` terminal cells, marking the cut with `…`.
pub fn fit_label(label: &str, width: usize) -> String {
    let total: usize = label.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return label.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw + 1 > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

fn mix(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (a, b) {
        (Color::Rgb(ar, ag, ab), Color::Rgb(br, bg, bb)) => {
            let r = (ar as f32 + (br as f32 - ar as f32) * t) as u8;
            let g = (ag as f32 + (bg as f32 - ag as f32) * t) as u8;
            let b = (ab as f32 + (bb as f32 - ab as f32) * t) as u8;
            Color::Rgb(r, g, b)
        }
        _ => a,
    }
}
