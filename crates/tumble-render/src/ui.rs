use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tumble_core::palette::Palette;
use tumble_core::raster::CharGrid;

use crate::canvas;
use crate::fps::FpsCounter;

/// Height of the status bar, in rows.
pub const STATUS_HEIGHT: u16 = 1;

/// Application state mirrored for rendering decisions.
///
/// # Example
/// ```
/// use tumble_render::ui::RenderState;
/// let state = RenderState::Running;
/// assert_ne!(state, RenderState::Paused);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Ticks scheduled normally.
    Running,
    /// Ticks suspended, last frame kept on screen.
    Paused,
    /// Help overlay visible.
    Help,
    /// Palette editor visible.
    PaletteEdit,
}

/// Live text of the palette editor.
pub struct PaletteEditor<'a> {
    pub text: &'a str,
    /// Cursor position in chars.
    pub cursor: usize,
}

/// Everything one draw call needs.
pub struct View<'a> {
    pub grid: &'a CharGrid,
    pub state: RenderState,
    pub palette: &'a Palette,
    pub cube_count: usize,
    pub fps: &'a FpsCounter,
    /// Glyph color; None = terminal default.
    pub fg: Option<Color>,
    pub show_status: bool,
    pub editor: Option<PaletteEditor<'a>>,
}

/// Canvas rectangle inside `area`: everything but the status bar.
///
/// The app sizes the engine grid from this before drawing.
///
/// # Example
/// ```
/// use ratatui::layout::Rect;
/// use tumble_render::ui::canvas_area;
/// let area = Rect::new(0, 0, 100, 30);
/// assert_eq!(canvas_area(area, true).height, 29);
/// assert_eq!(canvas_area(area, false), area);
/// ```
#[must_use]
pub fn canvas_area(area: Rect, show_status: bool) -> Rect {
    if show_status {
        split(area)[0]
    } else {
        area
    }
}

fn split(area: Rect) -> [Rect; 2] {
    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(STATUS_HEIGHT)]).split(area);
    [chunks[0], chunks[1]]
}

/// Draw the full UI: canvas, status bar and overlays.
pub fn draw(frame: &mut Frame, view: &View<'_>) {
    let area = frame.area();

    if view.show_status {
        let [canvas_rect, status_rect] = split(area);
        canvas::render_grid(frame.buffer_mut(), canvas_rect, view.grid, view.fg);
        draw_status(frame, status_rect, view);
    } else {
        canvas::render_grid(frame.buffer_mut(), area, view.grid, view.fg);
    }

    match view.state {
        RenderState::Help => draw_help_overlay(frame, area),
        RenderState::PaletteEdit => {
            if let Some(editor) = &view.editor {
                draw_palette_editor(frame, area, editor);
            }
        }
        RenderState::Running | RenderState::Paused => {}
    }
}

/// One line: state, fps, grid size, cubes, palette.
fn draw_status(frame: &mut Frame, area: Rect, view: &View<'_>) {
    let state_str = match view.state {
        RenderState::Running => "▶ RUN",
        RenderState::Paused => "⏸ PAUSE",
        RenderState::Help => "? HELP",
        RenderState::PaletteEdit => "✎ EDIT",
    };
    let palette: String = view.palette.chars().iter().collect();

    let line = Line::from(vec![
        Span::styled(format!(" {state_str} "), Style::default().fg(Color::Green)),
        Span::raw(format!(
            "│ {:.0} FPS {:.1}ms │ {}×{} │ {} cube(s) │ pas {:.2} │ ",
            view.fps.fps(),
            view.fps.frame_time_ms(),
            view.grid.width,
            view.grid.height,
            view.cube_count,
            view.palette.step(),
        )),
        Span::styled(palette, Style::default().fg(Color::Yellow)),
        Span::styled("  ? = help", Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Centered overlay with a single-line text field.
fn draw_palette_editor(frame: &mut Frame, area: Rect, editor: &PaletteEditor<'_>) {
    let chars: Vec<char> = editor.text.chars().collect();
    let cursor = editor.cursor.min(chars.len());
    let before: String = chars[..cursor].iter().collect();
    let after: String = chars[cursor..].iter().collect();

    let lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::raw(before),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
            Span::raw(after),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Enter = render · Esc = annuler · vide = défaut ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let width = area.width.min(60);
    let height = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect::new(x, y, width, height);

    let editor_widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Palette (sombre → clair) ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(Clear, rect);
    frame.render_widget(editor_widget, rect);
}

/// Draw the help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " tumble — Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" q/Esc    Quit"),
        Line::from(" Space    Play/Pause"),
        Line::from(" r        Reset scene"),
        Line::from(" +/-      Cubes ±"),
        Line::from(" p        Edit palette"),
        Line::from(" s        Toggle status bar"),
        Line::from(" ?        Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 32u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn draws_grid_and_status() {
        let mut grid = CharGrid::new(40, 9);
        grid.set(20, 4, '@');
        let palette = Palette::default();
        let fps = FpsCounter::new(10);
        let view = View {
            grid: &grid,
            state: RenderState::Running,
            palette: &palette,
            cube_count: 2,
            fps: &fps,
            fg: None,
            show_status: true,
            editor: None,
        };

        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal.draw(|f| draw(f, &view)).unwrap();

        let buf = terminal.backend().buffer();
        assert_eq!(buf.cell((20, 4)).map(|c| c.symbol()), Some("@"));
        let text = screen_text(&terminal);
        assert!(text.contains("RUN"));
        assert!(text.contains("2 cube(s)"));
    }

    #[test]
    fn palette_editor_overlay_shows_text() {
        let grid = CharGrid::new(60, 12);
        let palette = Palette::default();
        let fps = FpsCounter::new(10);
        let view = View {
            grid: &grid,
            state: RenderState::PaletteEdit,
            palette: &palette,
            cube_count: 1,
            fps: &fps,
            fg: None,
            show_status: false,
            editor: Some(PaletteEditor {
                text: "abc",
                cursor: 1,
            }),
        };

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| draw(f, &view)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("a▏bc"), "{text}");
        assert!(text.contains("Palette"));
    }

    #[test]
    fn canvas_area_leaves_room_for_status() {
        let area = Rect::new(0, 0, 50, 20);
        let canvas = canvas_area(area, true);
        assert_eq!(canvas.height, 20 - STATUS_HEIGHT);
        assert_eq!(canvas.width, 50);
    }
}
