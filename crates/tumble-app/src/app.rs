use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use ratatui::style::Color;
use tumble_core::config::TumbleConfig;
use tumble_core::engine::TumbleEngine;
use tumble_core::raster::CharGrid;
use tumble_core::traits::FrameSink;
use tumble_render::fps::FpsCounter;
use tumble_render::ui::{self, PaletteEditor, RenderState, View};

/// Application state.
///
/// # Example
/// ```
/// use tumble_app::app::AppState;
/// let state = AppState::Running;
/// assert!(matches!(state, AppState::Running));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// L'application est en cours d'exécution normale.
    Running,
    /// Pause : plus de ticks, la dernière frame reste affichée.
    Paused,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Éditeur de palette affiché (touche p). L'animation continue.
    PaletteEdit,
    /// Fermeture de l'application. Doit se terminer au prochain tour de boucle.
    Quitting,
}

/// Keeps the most recent frame for drawing.
#[derive(Default)]
pub struct LatestFrame(pub CharGrid);

impl FrameSink for LatestFrame {
    fn deliver(&mut self, frame: CharGrid) {
        self.0 = frame;
    }
}

/// Main application struct holding all state.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Config courante (lecture via arc-swap, écrite par le hot-reload).
    pub config: Arc<ArcSwap<TumbleConfig>>,
    /// Config appliquée au moteur lors du dernier tour.
    applied: Arc<TumbleConfig>,
    /// Moteur de rendu.
    pub engine: TumbleEngine,
    /// Dernière frame produite.
    pub frame: LatestFrame,
    /// Compteur FPS.
    pub fps_counter: FpsCounter,
    /// Dernier terminal size connu (pour détecter les resize).
    pub terminal_size: (u16, u16),
    /// Buffer local pour l'édition de palette.
    pub palette_edit_buf: String,
    /// Position du curseur dans l'éditeur (en caractères).
    pub palette_edit_cursor: usize,
    /// État restauré à la fermeture de l'éditeur (pause conservée).
    palette_edit_return: AppState,
    /// Stop after this many ticks.
    pub frame_limit: Option<u64>,
}

impl App {
    /// Build the app for a terminal of `terminal_size` cells.
    #[must_use]
    pub fn new(config: Arc<ArcSwap<TumbleConfig>>, terminal_size: (u16, u16)) -> Self {
        let applied = config.load_full();
        let engine = TumbleEngine::from_config(&applied, canvas_size(&applied, terminal_size));
        Self {
            state: AppState::Running,
            config,
            applied,
            engine,
            frame: LatestFrame::default(),
            fps_counter: FpsCounter::new(60),
            terminal_size,
            palette_edit_buf: String::new(),
            palette_edit_cursor: 0,
            palette_edit_return: AppState::Running,
            frame_limit: None,
        }
    }

    /// Main loop: events, config sync, tick, draw.
    ///
    /// # Errors
    /// Returns an error on terminal I/O failure.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            // === Sortie si quitting ===
            if self.state == AppState::Quitting {
                break;
            }

            // === Calcul du frame timing ===
            let fps = self.config.load().target_fps.max(1);
            let frame_duration = Duration::from_secs_f64(1.0 / f64::from(fps));

            let now = Instant::now();
            let elapsed = now - last_frame;
            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                let remaining = frame_duration.saturating_sub(elapsed);
                if event::poll(remaining)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            // === Polling événements non-bloquant ===
            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            // === Config et taille, appliquées entre deux ticks ===
            self.check_resize()?;
            self.sync_config();

            // === Tick ===
            if self.is_animating() {
                self.engine.tick_into(&mut self.frame);
                if let Some(limit) = self.frame_limit
                    && self.engine.frame_count() >= limit
                {
                    self.state = AppState::Quitting;
                }
            }

            // === Dessin ===
            let config = self.config.load();
            let editor = (self.state == AppState::PaletteEdit).then(|| PaletteEditor {
                text: &self.palette_edit_buf,
                cursor: self.palette_edit_cursor,
            });
            let view = View {
                grid: &self.frame.0,
                state: self.render_state(),
                palette: self.engine.palette(),
                cube_count: self.engine.cube_count(),
                fps: &self.fps_counter,
                fg: glyph_color(&config),
                show_status: config.show_status,
                editor,
            };
            terminal.draw(|f| ui::draw(f, &view))?;

            self.fps_counter.tick();
        }

        Ok(())
    }

    fn is_animating(&self) -> bool {
        matches!(
            self.state,
            AppState::Running | AppState::Help | AppState::PaletteEdit
        )
    }

    fn render_state(&self) -> RenderState {
        match self.state {
            AppState::Paused => RenderState::Paused,
            AppState::Help => RenderState::Help,
            AppState::PaletteEdit => RenderState::PaletteEdit,
            AppState::Running | AppState::Quitting => RenderState::Running,
        }
    }

    /// Push a changed config (hot-reload or key press) into the engine.
    pub fn sync_config(&mut self) {
        let current = self.config.load_full();
        if Arc::ptr_eq(&current, &self.applied) {
            return;
        }
        self.engine
            .apply_config(&current, canvas_size(&current, self.terminal_size));
        self.applied = current;
    }

    fn check_resize(&mut self) -> Result<()> {
        let new_size = crossterm::terminal::size()?;
        self.resize(new_size);
        Ok(())
    }

    /// Record a new terminal size; the engine is reconfigured (and its scene
    /// reset) when the canvas size actually changes.
    pub fn resize(&mut self, new_size: (u16, u16)) {
        if new_size == self.terminal_size {
            return;
        }
        self.terminal_size = new_size;
        let config = self.config.load();
        let (w, h) = config.grid_size(canvas_size(&config, new_size));
        log::debug!("Resize terminal {}×{} → grille {w}×{h}", new_size.0, new_size.1);
        self.engine.configure(w, h, config.cube_count);
    }

    fn toggle_config(&mut self, mutate: impl FnOnce(&mut TumbleConfig)) {
        let config = self.config.load();
        let mut new = (**config).clone();
        mutate(&mut new);
        new.clamp_all();
        self.config.store(Arc::new(new));
    }

    /// Dispatch one terminal event.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if modifiers.contains(KeyModifiers::CONTROL) {
                    if code == KeyCode::Char('c') {
                        self.state = AppState::Quitting;
                    }
                    return;
                }
                if self.state == AppState::PaletteEdit {
                    self.handle_palette_edit_key(code);
                    return;
                }
                self.handle_key(code);
            }
            Event::Resize(w, h) => self.resize((w, h)),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.state = AppState::Quitting,
            KeyCode::Esc => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Quitting
                };
            }
            KeyCode::Char('?') => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Help
                };
            }
            KeyCode::Char(' ') => {
                self.state = if self.state == AppState::Paused {
                    AppState::Running
                } else {
                    AppState::Paused
                };
            }
            KeyCode::Char('r') => self.engine.reset(),
            KeyCode::Char('+' | '=') => self.toggle_config(|c| c.cube_count += 1),
            KeyCode::Char('-') => {
                self.toggle_config(|c| c.cube_count = c.cube_count.saturating_sub(1));
            }
            KeyCode::Char('s') => self.toggle_config(|c| c.show_status = !c.show_status),
            KeyCode::Char('p') => {
                self.palette_edit_buf = self.config.load().palette.clone();
                self.palette_edit_cursor = self.palette_edit_buf.chars().count();
                self.palette_edit_return = if self.state == AppState::Paused {
                    AppState::Paused
                } else {
                    AppState::Running
                };
                self.state = AppState::PaletteEdit;
            }
            _ => {}
        }
    }

    fn handle_palette_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.state = self.palette_edit_return;
            }
            KeyCode::Enter => {
                let new_palette = std::mem::take(&mut self.palette_edit_buf);
                log::info!("Palette : {new_palette:?}");
                self.toggle_config(|c| c.palette = new_palette);
                self.palette_edit_cursor = 0;
                self.state = self.palette_edit_return;
            }
            KeyCode::Backspace => {
                if self.palette_edit_cursor > 0 {
                    let mut chars: Vec<char> = self.palette_edit_buf.chars().collect();
                    chars.remove(self.palette_edit_cursor - 1);
                    self.palette_edit_buf = chars.into_iter().collect();
                    self.palette_edit_cursor -= 1;
                }
            }
            KeyCode::Delete => {
                let mut chars: Vec<char> = self.palette_edit_buf.chars().collect();
                if self.palette_edit_cursor < chars.len() {
                    chars.remove(self.palette_edit_cursor);
                    self.palette_edit_buf = chars.into_iter().collect();
                }
            }
            KeyCode::Left => {
                self.palette_edit_cursor = self.palette_edit_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.palette_edit_cursor < self.palette_edit_buf.chars().count() {
                    self.palette_edit_cursor += 1;
                }
            }
            KeyCode::Home => {
                self.palette_edit_cursor = 0;
            }
            KeyCode::End => {
                self.palette_edit_cursor = self.palette_edit_buf.chars().count();
            }
            KeyCode::Char(ch) => {
                let mut chars: Vec<char> = self.palette_edit_buf.chars().collect();
                chars.insert(self.palette_edit_cursor, ch);
                self.palette_edit_buf = chars.into_iter().collect();
                self.palette_edit_cursor += 1;
            }
            _ => {}
        }
    }
}

/// Canvas cells available in a terminal of `terminal_size`.
#[must_use]
pub fn canvas_size(config: &TumbleConfig, terminal_size: (u16, u16)) -> (u16, u16) {
    let area = Rect::new(0, 0, terminal_size.0, terminal_size.1);
    let canvas = ui::canvas_area(area, config.show_status);
    (canvas.width, canvas.height)
}

fn glyph_color(config: &TumbleConfig) -> Option<Color> {
    config.color_enabled.then(|| {
        let [r, g, b] = config.color;
        Color::Rgb(r, g, b)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let config = TumbleConfig {
            seed: Some(1),
            ..TumbleConfig::default()
        };
        App::new(Arc::new(ArcSwap::from_pointee(config)), (80, 25))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn engine_fills_canvas_above_status_bar() {
        let app = app();
        assert_eq!(app.engine.size(), (80, 24));
    }

    #[test]
    fn quit_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Char('q'));
        assert_eq!(a.state, AppState::Quitting);

        let mut a = app();
        a.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(a.state, AppState::Quitting);
    }

    #[test]
    fn help_and_pause_toggle() {
        let mut a = app();
        press(&mut a, KeyCode::Char('?'));
        assert_eq!(a.state, AppState::Help);
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.state, AppState::Running);
        press(&mut a, KeyCode::Char(' '));
        assert_eq!(a.state, AppState::Paused);
        assert!(!a.is_animating());
        press(&mut a, KeyCode::Char(' '));
        assert_eq!(a.state, AppState::Running);
    }

    #[test]
    fn palette_editor_applies_on_enter() {
        let mut a = app();
        press(&mut a, KeyCode::Char('p'));
        assert_eq!(a.state, AppState::PaletteEdit);
        // Vider puis taper « ab ».
        for _ in 0..a.palette_edit_buf.chars().count() {
            press(&mut a, KeyCode::Backspace);
        }
        press(&mut a, KeyCode::Char('a'));
        press(&mut a, KeyCode::Char('b'));
        // 'q' est du texte dans l'éditeur, pas une sortie.
        press(&mut a, KeyCode::Char('q'));
        press(&mut a, KeyCode::Backspace);
        press(&mut a, KeyCode::Enter);

        assert_eq!(a.state, AppState::Running);
        assert_eq!(a.config.load().palette, "ab");
        a.sync_config();
        assert_eq!(a.engine.palette().chars(), &['a', 'b']);
    }

    #[test]
    fn palette_editor_escape_discards() {
        let mut a = app();
        press(&mut a, KeyCode::Char('p'));
        press(&mut a, KeyCode::Home);
        press(&mut a, KeyCode::Char('Z'));
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.state, AppState::Running);
        assert_eq!(a.config.load().palette, TumbleConfig::default().palette);
    }

    #[test]
    fn palette_editor_keeps_pause() {
        let mut a = app();
        press(&mut a, KeyCode::Char(' '));
        press(&mut a, KeyCode::Char('p'));
        assert_eq!(a.state, AppState::PaletteEdit);
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.state, AppState::Paused);

        press(&mut a, KeyCode::Char('p'));
        press(&mut a, KeyCode::Char('x'));
        press(&mut a, KeyCode::Enter);
        assert_eq!(a.state, AppState::Paused);
        assert!(!a.is_animating());
    }

    #[test]
    fn cube_keys_change_count_with_floor_of_one() {
        let mut a = app();
        press(&mut a, KeyCode::Char('+'));
        a.sync_config();
        assert_eq!(a.engine.scene().cubes().len(), 2);
        press(&mut a, KeyCode::Char('-'));
        press(&mut a, KeyCode::Char('-'));
        a.sync_config();
        assert_eq!(a.engine.scene().cubes().len(), 1);
    }

    #[test]
    fn resize_reconfigures_engine() {
        let mut a = app();
        a.handle_event(&Event::Resize(120, 41));
        assert_eq!(a.engine.size(), (120, 40));
    }

    #[test]
    fn hidden_status_gives_canvas_the_full_height() {
        let mut a = app();
        press(&mut a, KeyCode::Char('s'));
        a.sync_config();
        assert_eq!(a.engine.size(), (80, 25));
    }

    #[test]
    fn latest_frame_keeps_last_delivery() {
        let mut a = app();
        a.engine.tick_into(&mut a.frame);
        assert_eq!(a.frame.0.cells.len(), 80 * 24);
    }
}
