use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lineage_core::layout::{
    Bar, Focus, LayoutConfig, ScaleError, TimelineLayout, TimelineScale, year_domain,
};
use lineage_core::views::legend::{LegendKey, legend_entries};
use lineage_core::views::timeline::render_timeline;
use lineage_protocol::{
    Emphasis, InstrumentData, Paint, Point, RenderCommand, TextAlign, ThemeToken,
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Logical pixels per terminal column at zoom 1.
const COL_PX: f64 = 8.0;
const FOOTER_ROWS: u16 = 4;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::EraLabel => Color::Gray,
        ThemeToken::RoleComposer => Color::Rgb(74, 144, 217),
        ThemeToken::RolePlayer => Color::Rgb(230, 126, 34),
        ThemeToken::RoleBoth => Color::Rgb(142, 68, 173),
        ThemeToken::BarLabel => Color::White,
        ThemeToken::BarOutline => Color::White,
        ThemeToken::ConnectionRelative => Color::Red,
        ThemeToken::ConnectionStudentTeacher => Color::Blue,
        ThemeToken::AxisLine => Color::DarkGray,
        ThemeToken::AxisLabel => Color::Gray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextMuted => Color::DarkGray,
    }
}

fn paint_to_color(paint: Paint) -> Color {
    match paint {
        Paint::Theme(token) => theme_to_color(token),
        // Terminals have no alpha: blend era colors toward the black background.
        Paint::Custom(c) => {
            let channel = |v: f32| (v * c.a * 255.0).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(channel(c.r), channel(c.g), channel(c.b))
        }
    }
}

/// Maps logical timeline pixels onto terminal cells.
struct CellMap {
    area: Rect,
    scroll_x: f64,
    scroll_rows: u16,
    row_px: f64,
}

impl CellMap {
    fn col(&self, x: f64) -> i64 {
        ((x - self.scroll_x) / COL_PX).floor() as i64
    }

    fn row(&self, y: f64) -> i64 {
        (y / self.row_px).floor() as i64 - i64::from(self.scroll_rows)
    }

    /// Center of a content cell, in timeline pixels.
    fn cell_center(&self, col: u16, row: u16) -> Point {
        Point::new(
            self.scroll_x + (f64::from(col) + 0.5) * COL_PX,
            (f64::from(row + self.scroll_rows) + 0.5) * self.row_px,
        )
    }

    fn cell<'b>(&self, buf: &'b mut Buffer, col: i64, row: i64) -> Option<&'b mut ratatui::buffer::Cell> {
        let col = u16::try_from(col).ok().filter(|&c| c < self.area.width)?;
        let row = u16::try_from(row).ok().filter(|&r| r < self.area.height)?;
        buf.cell_mut((self.area.x + col, self.area.y + row))
    }
}

fn paint_commands(buf: &mut Buffer, map: &CellMap, commands: &[RenderCommand]) {
    // Axis labels go one row under the axis line instead of on top of it.
    let mut in_axis = false;
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                emphasis,
                ..
            } => {
                let bg = match emphasis {
                    Emphasis::Dimmed => Color::Rgb(40, 40, 40),
                    _ => paint_to_color(*color),
                };
                let (c0, c1) = (map.col(rect.x), map.col(rect.x + rect.w.max(0.0)).max(map.col(rect.x) + 1));
                let (r0, r1) = (map.row(rect.y), map.row(rect.y + rect.h - 0.01) + 1);
                for row in r0..r1 {
                    for col in c0..c1 {
                        if let Some(cell) = map.cell(buf, col, row) {
                            cell.set_char(' ').set_bg(bg);
                            if *emphasis == Emphasis::Highlighted {
                                cell.set_style(Style::default().add_modifier(Modifier::BOLD));
                            }
                        }
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let len = text.chars().count() as i64;
                let start = match align {
                    TextAlign::Left => map.col(position.x),
                    TextAlign::Center => map.col(position.x) - len / 2,
                    TextAlign::Right => map.col(position.x) - len,
                };
                // Text baselines sit near the bottom of their row band.
                let row = map.row(position.y - 1.0) + i64::from(in_axis);
                for (i, ch) in text.chars().enumerate() {
                    if let Some(cell) = map.cell(buf, start + i as i64, row) {
                        cell.set_char(ch).set_fg(theme_to_color(*color));
                    }
                }
            }
            RenderCommand::DrawLine { from, to, color, .. } => {
                let fg = theme_to_color(*color);
                let row = map.row(from.y);
                if (from.y - to.y).abs() < f64::EPSILON {
                    for col in map.col(from.x)..=map.col(to.x) {
                        if let Some(cell) = map.cell(buf, col, row) {
                            cell.set_char('─').set_fg(fg);
                        }
                    }
                } else if let Some(cell) = map.cell(buf, map.col(from.x), row) {
                    cell.set_char('┬').set_fg(fg);
                }
            }
            RenderCommand::BeginGroup { id, .. } => in_axis = id == "time-axis",
            RenderCommand::EndGroup => in_axis = false,
            // Connectors need sub-cell resolution; the SVG export draws them.
            RenderCommand::DrawPath { .. } => {}
        }
    }
}

fn details(data: &InstrumentData, focus: &Focus) -> String {
    let Some(person) = focus.active().and_then(|id| data.person(id)) else {
        return "Tab/click select · Esc clear · ←→ pan · ↑↓ scroll · +/- or Ctrl+wheel zoom · [ ] instrument · q quit"
            .to_string();
    };
    let links = data.connections.iter().filter(|c| c.touches(&person.id)).count();
    let mut text = format!(
        "{} ({}) · {} · {links} connection(s)",
        person.name,
        person.lifespan_label(),
        person.role
    );
    if let Some(url) = person.wiki_url.as_deref().or(person.website_url.as_deref()) {
        text.push_str(&format!(" · {url}"));
    }
    if !person.bio.is_empty() {
        text.push('\n');
        text.push_str(&person.bio);
    }
    text
}

fn legend_line() -> Line<'static> {
    let mut spans = Vec::new();
    for entry in legend_entries() {
        let (glyph, token) = match entry.key {
            LegendKey::Line { color, dash: None } => ("──", color),
            LegendKey::Line { color, dash: Some(_) } => ("╌╌", color),
            LegendKey::Swatch(color) => ("■", color),
        };
        spans.push(Span::styled(glyph, Style::default().fg(theme_to_color(token))));
        spans.push(Span::raw(format!(" {}   ", entry.label)));
    }
    Line::from(spans)
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
    }
}

/// What the user is looking at: which dataset, how far zoomed and scrolled,
/// and who is selected.
struct Browser<'a> {
    datasets: &'a [InstrumentData],
    config: &'a LayoutConfig,
    reference_year: i32,
    current: usize,
    zoom: f64,
    /// `None` when the current dataset spans no years.
    scale: Option<TimelineScale>,
    fitted_width: Option<f64>,
    scroll_x: f64,
    scroll_rows: u16,
    focus: Focus,
    selected_index: Option<usize>,
}

impl<'a> Browser<'a> {
    /// `datasets` must not be empty.
    fn new(
        datasets: &'a [InstrumentData],
        config: &'a LayoutConfig,
        reference_year: i32,
        zoom: f64,
    ) -> Self {
        Self {
            datasets,
            config,
            reference_year,
            current: 0,
            zoom: config.zoom.clamp(zoom),
            scale: None,
            fitted_width: None,
            scroll_x: 0.0,
            scroll_rows: 0,
            focus: Focus::default(),
            selected_index: None,
        }
    }

    fn data(&self) -> &'a InstrumentData {
        &self.datasets[self.current]
    }

    /// Rebuild the scale for a new container width, carrying the zoom over.
    fn fit(&mut self, container_width: f64) {
        if self.fitted_width == Some(container_width) {
            return;
        }
        self.fitted_width = Some(container_width);

        let data = self.data();
        let (start, end) = year_domain(data, self.reference_year);
        let zoom = self.zoom;
        let built = TimelineScale::new(f64::from(start), f64::from(end), container_width)
            .and_then(|mut scale| scale.set_zoom(zoom).map(|()| scale));
        self.scale = match built {
            Ok(scale) => Some(scale),
            Err(e) => {
                log::debug!("{}: nothing to draw: {e}", data.instrument);
                None
            }
        };
    }

    fn layout(&self) -> Option<TimelineLayout> {
        self.scale.as_ref().map(|scale| {
            TimelineLayout::compute(self.data(), scale, self.reference_year, self.config)
        })
    }

    /// Move `step` datasets forward (or back), wrapping around.
    fn switch(&mut self, step: isize) {
        let count = self.datasets.len() as isize;
        self.current = (self.current as isize + step).rem_euclid(count) as usize;
        self.fitted_width = None;
        self.scale = None;
        self.scroll_x = 0.0;
        self.scroll_rows = 0;
        self.focus = Focus::default();
        self.selected_index = None;
    }

    /// One zoom notch in the direction of `delta_y`, keeping the year at the
    /// left edge of the screen in place.
    fn zoom_by(&mut self, delta_y: f64) -> Result<(), ScaleError> {
        let policy = self.config.zoom;
        match self.scale.as_mut() {
            Some(scale) => {
                let left_year = scale.pixel_to_year(self.scroll_x);
                scale.update_zoom(|z| policy.wheel_step(z, delta_y))?;
                self.scroll_x = scale.year_to_pixel(left_year);
                self.zoom = scale.zoom();
            }
            None => self.zoom = policy.wheel_step(self.zoom, delta_y),
        }
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.focus.selected = None;
        self.selected_index = None;
    }

    /// Select the clicked bar. Clicking the selected bar again deselects it.
    fn click(&mut self, layout: &TimelineLayout, hit: Option<&Bar>) {
        let id = hit.map(|bar| bar.id.clone());
        if id.is_some() && id == self.focus.selected {
            self.clear_selection();
            return;
        }
        self.selected_index = hit.and_then(|bar| layout.bars.iter().position(|b| b.id == bar.id));
        self.focus.selected = id;
    }

    fn cycle_selection(&mut self, layout: &TimelineLayout, backwards: bool, container_width: f64) {
        let count = layout.bars.len();
        if count == 0 {
            return;
        }
        let next = match (self.selected_index, backwards) {
            (None, true) => count - 1,
            (None, false) => 0,
            (Some(i), true) => (i + count - 1) % count,
            (Some(i), false) => (i + 1) % count,
        };
        self.selected_index = Some(next);
        let bar = &layout.bars[next];
        self.focus.selected = Some(bar.id.clone());
        // Bring the selection into view.
        if bar.rect.x < self.scroll_x || bar.rect.x > self.scroll_x + container_width * 0.9 {
            self.scroll_x = (bar.rect.x - container_width * 0.1).max(0.0);
        }
    }
}

pub fn render_tui(
    datasets: &[InstrumentData],
    config: &LayoutConfig,
    reference_year: i32,
    initial_zoom: f64,
) -> Result<()> {
    if datasets.is_empty() {
        anyhow::bail!("no datasets to browse");
    }
    let mut browser = Browser::new(datasets, config, reference_year, initial_zoom);

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    loop {
        let term_size = terminal.size()?;
        let container_width = f64::from(term_size.width.max(1)) * COL_PX;
        browser.fit(container_width);

        let data = browser.data();
        let layout = browser.layout();
        let commands = match (&layout, &browser.scale) {
            (Some(layout), Some(scale)) => render_timeline(data, layout, scale, &browser.focus),
            _ => Vec::new(),
        };
        let visible_years = browser.scale.as_ref().map(|scale| {
            let max_scroll = (scale.total_width() - container_width).max(0.0);
            let scroll_x = browser.scroll_x.clamp(0.0, max_scroll);
            let first = scale.pixel_to_year(scroll_x).round();
            let last = scale
                .pixel_to_year(scroll_x + container_width)
                .min(scale.end_year())
                .round();
            (scroll_x, first, last)
        });
        if let Some((scroll_x, _, _)) = visible_years {
            browser.scroll_x = scroll_x;
        }

        let title = format!(
            " lineage: {} ({}/{}) · {} people · {} lanes · zoom {:.2}×{} ",
            data.instrument,
            browser.current + 1,
            datasets.len(),
            data.people.len(),
            layout.as_ref().map_or(0, |l| l.lane_count),
            browser.zoom,
            visible_years.map_or_else(String::new, |(_, first, last)| format!(" · {first}–{last}")),
        );

        let content = Rect::new(
            0,
            1,
            term_size.width,
            term_size.height.saturating_sub(1 + FOOTER_ROWS),
        );
        let map = CellMap {
            area: content,
            scroll_x: browser.scroll_x,
            scroll_rows: browser.scroll_rows,
            row_px: config.lane_pitch(),
        };
        let mut footer_lines = vec![legend_line()];
        footer_lines.extend(
            details(data, &browser.focus)
                .lines()
                .map(|line| Line::from(line.to_string())),
        );

        terminal.draw(|frame| {
            let area = frame.area();

            let header = Block::default()
                .title(title)
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, Rect::new(0, 0, area.width, 1));

            let background = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(Color::Black));
            frame.render_widget(background, content);
            if commands.is_empty() {
                let empty = Paragraph::new(format!("{} has nothing to draw", data.instrument))
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(empty, content);
            } else {
                paint_commands(frame.buffer_mut(), &map, &commands);
            }

            let footer_area = Rect::new(
                0,
                area.height.saturating_sub(FOOTER_ROWS),
                area.width,
                FOOTER_ROWS,
            );
            let footer = Paragraph::new(Text::from(footer_lines))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::TOP))
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(footer, footer_area);
        })?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let pan_step = container_width * 0.1;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Esc => browser.clear_selection(),
                KeyCode::Left => browser.scroll_x = (browser.scroll_x - pan_step).max(0.0),
                KeyCode::Right => browser.scroll_x += pan_step,
                KeyCode::Up => browser.scroll_rows = browser.scroll_rows.saturating_sub(1),
                KeyCode::Down => browser.scroll_rows = browser.scroll_rows.saturating_add(1),
                KeyCode::Char('+') | KeyCode::Char('=') => browser.zoom_by(-1.0)?,
                KeyCode::Char('-') => browser.zoom_by(1.0)?,
                KeyCode::Char(']') => browser.switch(1),
                KeyCode::Char('[') => browser.switch(-1),
                KeyCode::Tab | KeyCode::BackTab => {
                    if let Some(layout) = &layout {
                        browser.cycle_selection(
                            layout,
                            key.code == KeyCode::BackTab,
                            container_width,
                        );
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let over = mouse
                    .row
                    .checked_sub(content.y)
                    .filter(|&row| row < content.height)
                    .zip(layout.as_ref())
                    .and_then(|(row, layout)| layout.hit_test(map.cell_center(mouse.column, row)));
                match mouse.kind {
                    MouseEventKind::ScrollDown if mouse.modifiers.contains(KeyModifiers::CONTROL) => {
                        browser.zoom_by(1.0)?;
                    }
                    MouseEventKind::ScrollUp if mouse.modifiers.contains(KeyModifiers::CONTROL) => {
                        browser.zoom_by(-1.0)?;
                    }
                    MouseEventKind::ScrollDown => {
                        browser.scroll_rows = browser.scroll_rows.saturating_add(1);
                    }
                    MouseEventKind::ScrollUp => {
                        browser.scroll_rows = browser.scroll_rows.saturating_sub(1);
                    }
                    MouseEventKind::ScrollLeft => {
                        browser.scroll_x = (browser.scroll_x - COL_PX * 4.0).max(0.0);
                    }
                    MouseEventKind::ScrollRight => browser.scroll_x += COL_PX * 4.0,
                    MouseEventKind::Moved => browser.focus.hovered = over.map(|bar| bar.id.clone()),
                    MouseEventKind::Down(MouseButton::Left) => {
                        if let Some(layout) = &layout {
                            browser.click(layout, over);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    Ok(())
}
