//! Terminal chunk explorer using ratatui
//!
//! Walks a player through the infinite dungeon one cell at a time. Chunks
//! are pulled from the cache as the viewport touches them, so crossing a
//! seam is the live demonstration that neighboring chunks agree on their
//! boundary openings: the corridor you leave through is the corridor you
//! arrive in.

use std::error::Error;
use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::cache::ChunkCache;
use crate::chunk::ChunkCoord;
use crate::field::SpatialField;
use crate::grid::CHUNK_SIZE;

/// Explorer state: a player position in global cell coordinates plus the
/// chunk cache backing the viewport.
struct Explorer<'a> {
    field: &'a SpatialField,
    cache: ChunkCache,
    player_x: i64,
    player_y: i64,
    show_help: bool,
}

impl<'a> Explorer<'a> {
    fn new(field: &'a SpatialField, start: ChunkCoord) -> Self {
        let mut cache = ChunkCache::new();

        // Spawn on the floor cell nearest the start chunk's center.
        let size = CHUNK_SIZE as i64;
        let center = size as i32 / 2;
        let grid = cache.get_or_generate(field, start);
        let (sx, sy) = grid
            .iter()
            .filter(|(_, _, c)| c.is_floor())
            .min_by_key(|(x, y, _)| (x - center).abs() + (y - center).abs())
            .map(|(x, y, _)| (x, y))
            .unwrap_or((center, center));

        Self {
            field,
            cache,
            player_x: start.x * size + sx as i64,
            player_y: start.y * size + sy as i64,
            show_help: false,
        }
    }

    fn chunk_coord(&self) -> ChunkCoord {
        let size = CHUNK_SIZE as i64;
        ChunkCoord::new(self.player_x.div_euclid(size), self.player_y.div_euclid(size))
    }

    fn local_pos(&self) -> (i64, i64) {
        let size = CHUNK_SIZE as i64;
        (self.player_x.rem_euclid(size), self.player_y.rem_euclid(size))
    }

    /// Step the player if the target cell is floor. Walls block.
    fn try_move(&mut self, dx: i64, dy: i64) {
        let (nx, ny) = (self.player_x + dx, self.player_y + dy);
        if self.cache.cell_at(self.field, nx, ny).is_floor() {
            self.player_x = nx;
            self.player_y = ny;
        }
    }

    fn render_map(&mut self, area: Rect, buf: &mut Buffer) {
        let view_width = area.width as i64;
        let view_height = area.height as i64;
        let origin_x = self.player_x - view_width / 2;
        let origin_y = self.player_y - view_height / 2;

        for dy in 0..view_height {
            for dx in 0..view_width {
                let gx = origin_x + dx;
                let gy = origin_y + dy;
                let screen_x = area.x + dx as u16;
                let screen_y = area.y + dy as u16;

                let (ch, style) = if gx == self.player_x && gy == self.player_y {
                    ('@', Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                } else if self.cache.cell_at(self.field, gx, gy).is_floor() {
                    ('·', Style::default().fg(Color::Rgb(196, 188, 164)))
                } else {
                    ('#', Style::default().fg(Color::Rgb(90, 82, 110)))
                };

                buf[(screen_x, screen_y)].set_char(ch).set_style(style);
            }
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let lines = [
            "Chunk Explorer",
            "",
            "Arrows / WASD / HJKL  move",
            "?                     toggle this help",
            "Q / Esc               quit",
            "",
            "Walk across a chunk edge and the next chunk",
            "is generated on the fly; its boundary openings",
            "always line up with the one you left.",
        ];
        let width = 50.min(area.width);
        let height = (lines.len() as u16 + 2).min(area.height);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        Clear.render(popup, buf);
        Paragraph::new(lines.join("\n"))
            .block(Block::default().borders(Borders::ALL).title(" Help "))
            .render(popup, buf);
    }

    fn status_line(&self) -> String {
        let chunk = self.chunk_coord();
        let (lx, ly) = self.local_pos();
        let (alpha, beta) = self.field.spatial_parameters(chunk.x, chunk.y);
        let variation = self.field.sample(chunk.x, chunk.y);
        format!(
            " chunk {} | local ({}, {}) | alpha {:.3} beta {:.3} var {:+.3} | cached {} | ?:Help Q:Quit",
            chunk,
            lx,
            ly,
            alpha,
            beta,
            variation,
            self.cache.len(),
        )
    }
}

/// Run the explorer until the user quits.
pub fn run_explorer(field: &SpatialField, start: ChunkCoord) -> Result<(), Box<dyn Error>> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut explorer = Explorer::new(field, start);

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(f.area());

            explorer.render_map(chunks[0], f.buffer_mut());

            let status = Paragraph::new(explorer.status_line())
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status, chunks[1]);

            if explorer.show_help {
                explorer.render_help(chunks[0], f.buffer_mut());
            }
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if explorer.show_help {
                    explorer.show_help = false;
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('?') => explorer.show_help = true,
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => {
                        explorer.try_move(0, -1)
                    }
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => {
                        explorer.try_move(0, 1)
                    }
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => {
                        explorer.try_move(-1, 0)
                    }
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => {
                        explorer.try_move(1, 0)
                    }
                    _ => {}
                }
            }
        }
    }

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
