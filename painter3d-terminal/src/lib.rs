/// Terminal front end for the painter3d renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::info;
use painter3d_core::Framebuffer;
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod config;
pub mod output;
pub mod renderer;
pub mod scene;

pub use config::RenderConfig;
pub use renderer::HalfBlockRenderer;

/// Interactive viewer for frames rendered at several resolutions
pub struct TerminalViewer {
    frames: Vec<Framebuffer>,
    current: usize,
    renderer: HalfBlockRenderer,
    running: bool,
    dirty: bool,
}

impl TerminalViewer {
    pub fn new(frames: Vec<Framebuffer>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(frames, width, height))
    }

    fn with_size(frames: Vec<Framebuffer>, width: u16, height: u16) -> Self {
        Self {
            frames,
            current: 0,
            // First row holds the status line
            renderer: HalfBlockRenderer::new(width as usize, height.saturating_sub(1) as usize),
            running: true,
            dirty: true,
        }
    }

    pub fn current(&self) -> Option<&Framebuffer> {
        self.frames.get(self.current)
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            if self.dirty {
                self.render()?;
                self.dirty = false;
            }

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(KeyEvent {
                        code,
                        kind: KeyEventKind::Press,
                        ..
                    }) => self.handle_key(code),
                    Event::Resize(width, height) => {
                        self.renderer
                            .resize(width as usize, height.saturating_sub(1) as usize);
                        self.dirty = true;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        let count = self.frames.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Right | KeyCode::Char('l') if count > 0 => {
                self.current = (self.current + 1) % count;
                self.dirty = true;
            }
            KeyCode::Left | KeyCode::Char('h') if count > 0 => {
                self.current = (self.current + count - 1) % count;
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn status(&self) -> String {
        match self.current() {
            Some(frame) => format!(
                "painter3d | {0}x{0} ({1}/{2}) | Left/Right=Resolution Q=Quit",
                frame.resolution(),
                self.current + 1,
                self.frames.len()
            ),
            None => "painter3d | nothing rendered | Q=Quit".to_string(),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;

        if let Some(frame) = self.current() {
            info!("Showing {}x{}", frame.resolution(), frame.resolution());
            self.renderer.draw(frame, 1, &mut stdout)?;
        }

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(resolutions: &[usize]) -> TerminalViewer {
        let frames = resolutions.iter().map(|&r| Framebuffer::new(r)).collect();
        TerminalViewer::with_size(frames, 80, 25)
    }

    #[test]
    fn test_arrows_cycle_resolutions() {
        let mut viewer = viewer(&[100, 250, 800]);
        assert_eq!(viewer.current().map(Framebuffer::resolution), Some(100));

        viewer.handle_key(KeyCode::Left);
        assert_eq!(viewer.current().map(Framebuffer::resolution), Some(800));
        viewer.handle_key(KeyCode::Right);
        viewer.handle_key(KeyCode::Right);
        assert_eq!(viewer.current().map(Framebuffer::resolution), Some(250));
        assert!(viewer.status().contains("250x250 (2/3)"));
    }

    #[test]
    fn test_quit_keys() {
        let mut viewer = viewer(&[10]);
        viewer.handle_key(KeyCode::Char('x'));
        assert!(viewer.running);
        viewer.handle_key(KeyCode::Esc);
        assert!(!viewer.running);
    }

    #[test]
    fn test_no_frames() {
        let mut viewer = viewer(&[]);
        viewer.handle_key(KeyCode::Right);
        assert!(viewer.current().is_none());
        assert!(viewer.status().contains("nothing rendered"));
    }
}
