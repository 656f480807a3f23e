use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::config::GridSize;
use crate::game::Snapshot;
use crate::grid::Tile;
use crate::snake::Position;
use crate::sprites::{Sprite, classify};
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Terminal columns per grid cell; keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;

/// Full food pulse cycle.
pub const FOOD_PULSE_PERIOD: Duration = Duration::from_millis(600);

const GLYPH_WALL: &str = "██";
const GLYPH_FOOD_BRIGHT: &str = "●";
const GLYPH_FOOD_DIM: &str = "•";
const GLYPH_JOIN: &str = "━";

const STYLE_HEAD: Style = Style::new().fg(Color::LightGreen).add_modifier(Modifier::BOLD);
const STYLE_BODY: Style = Style::new().fg(Color::Green);
const STYLE_TAIL: Style = Style::new().fg(Color::DarkGray);
const STYLE_WALL: Style = Style::new().fg(Color::Gray);
const STYLE_BORDER: Style = Style::new().fg(Color::DarkGray);

/// Per-frame values that are not part of the game snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RenderInfo {
    /// Time since the program started; drives animations.
    pub elapsed: Duration,
}

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, info: RenderInfo) {
    let [hud_area, field_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());

    render_hud(frame, hud_area, snapshot);

    let board = board_area(field_area, snapshot.size());
    let block = Block::bordered().border_style(STYLE_BORDER);
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_tiles(frame, inner, snapshot, info.elapsed);
    render_snake(frame, inner, snapshot);

    if snapshot.is_game_over() {
        let canvas = frame.area();
        frame
            .buffer_mut()
            .set_style(canvas, Style::new().add_modifier(Modifier::DIM));
        render_game_over_menu(
            frame,
            field_area,
            snapshot.score,
            snapshot.death_reason,
            snapshot.fault.as_ref(),
        );
    } else if !snapshot.has_started() {
        render_start_menu(frame, field_area);
    }
}

/// True during the bright half of the food pulse.
#[must_use]
pub fn food_is_bright(elapsed: Duration) -> bool {
    let period = FOOD_PULSE_PERIOD.as_millis();
    elapsed.as_millis() % period < period / 2
}

fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let muted = Style::new().fg(Color::DarkGray);
    let value = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled("Score: ", muted),
        Span::styled(snapshot.score.to_string(), value),
        Span::styled(" │ Length: ", muted),
        Span::styled(snapshot.segments.len().to_string(), value),
        Span::styled(" │ Tick: ", muted),
        Span::styled(format!("{}ms", snapshot.tick_interval.as_millis()), value),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn board_area(area: Rect, size: GridSize) -> Rect {
    let width = size.width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = size.height.saturating_add(2);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    board
}

fn render_tiles(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, elapsed: Duration) {
    let size = snapshot.size();
    let food_style = if food_is_bright(elapsed) {
        (GLYPH_FOOD_BRIGHT, Style::new().fg(Color::LightRed).add_modifier(Modifier::BOLD))
    } else {
        (GLYPH_FOOD_DIM, Style::new().fg(Color::Red))
    };

    let buffer = frame.buffer_mut();
    for (position, tile) in snapshot.grid.cells() {
        let Some((x, y)) = logical_to_terminal(inner, size, position) else {
            continue;
        };

        match tile {
            Tile::Empty => {}
            Tile::Wall => {
                buffer.set_stringn(x, y, GLYPH_WALL, cell_span(inner, x), STYLE_WALL);
            }
            Tile::Food => {
                let (glyph, style) = food_style;
                buffer.set_string(x, y, glyph, style);
            }
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let size = snapshot.size();
    let sprites = classify(&snapshot.segments, snapshot.direction);

    let buffer = frame.buffer_mut();
    for (segment, sprite) in snapshot.segments.iter().zip(sprites) {
        let Some((x, y)) = logical_to_terminal(inner, size, *segment) else {
            continue;
        };

        let style = sprite_style(sprite);
        buffer.set_string(x, y, sprite.glyph(), style);
        if sprite.joins_right() && cell_span(inner, x) > 1 {
            buffer.set_string(x + 1, y, GLYPH_JOIN, style);
        }
    }
}

fn sprite_style(sprite: Sprite) -> Style {
    if sprite.is_head() {
        STYLE_HEAD
    } else if sprite.is_tail() {
        STYLE_TAIL
    } else {
        STYLE_BODY
    }
}

/// Columns available for the cell starting at `x`.
fn cell_span(inner: Rect, x: u16) -> usize {
    usize::from(inner.right().saturating_sub(x).min(CELL_WIDTH))
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
