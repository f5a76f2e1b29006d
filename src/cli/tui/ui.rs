//! TUI rendering

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::cli::tui::app::{App, FocusedPane};
use crate::services::FlashOutcome;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(chunks[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main[0]);

    render_port_list(f, app, left[0]);
    render_firmware_list(f, app, left[1]);
    render_log(f, app, main[1]);
    render_help_bar(f, app, chunks[1]);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL);
    if focused {
        block
            .title(format!("{title} [FOCUSED]"))
            .border_style(Style::default().fg(Color::Cyan))
    } else {
        block.title(title)
    }
}

fn render_port_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = if app.ports.is_empty() {
        vec![ListItem::new("(no serial ports)").style(Style::default().fg(Color::DarkGray))]
    } else {
        app.ports.iter().map(|p| ListItem::new(p.clone())).collect()
    };

    let list = List::new(items)
        .block(pane_block(
            format!("🔌 Serial Ports ({})", app.ports.len()),
            app.focused_pane == FocusedPane::PortList,
        ))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, area, &mut app.port_list_state);
}

fn render_firmware_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = if app.firmwares.is_empty() {
        vec![ListItem::new("(no firmware files)").style(Style::default().fg(Color::DarkGray))]
    } else {
        app.firmwares
            .iter()
            .map(|fw| {
                if fw.is_abbreviated() {
                    ListItem::new(Line::from(vec![
                        Span::raw(fw.display_name.clone()),
                        Span::styled(
                            format!("  ({})", fw.file_name),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                } else {
                    ListItem::new(fw.file_name.clone())
                }
            })
            .collect()
    };

    let list = List::new(items)
        .block(pane_block(
            format!("📦 Firmware ({})", app.firmwares.len()),
            app.focused_pane == FocusedPane::FirmwareList,
        ))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, area, &mut app.firmware_list_state);
}

fn render_log(f: &mut Frame, app: &mut App, area: Rect) {
    let status = if !app.controls_enabled {
        " — ⏳ flashing".to_string()
    } else {
        match &app.last_outcome {
            Some(FlashOutcome::Success) => " — ✅ success".to_string(),
            Some(FlashOutcome::Failure(code)) => format!(" — ❌ exit {code}"),
            Some(FlashOutcome::LaunchError(_)) => " — ❌ aborted".to_string(),
            None => String::new(),
        }
    };

    let viewport = area.height.saturating_sub(2) as usize;
    let max_offset = app.log_lines.len().saturating_sub(viewport);
    if app.log_auto_scroll {
        app.log_scroll_offset = max_offset;
    } else {
        app.log_scroll_offset = app.log_scroll_offset.min(max_offset);
    }

    let text: Vec<Line> = app
        .log_lines
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();

    let log = Paragraph::new(text)
        .block(pane_block(
            format!("📜 Output{status}"),
            app.focused_pane == FocusedPane::LogPane,
        ))
        .scroll((
            // saturate rather than wrap for logs past u16::MAX lines
            u16::try_from(app.log_scroll_offset).unwrap_or(u16::MAX),
            0,
        ));

    f.render_widget(log, area);
}

fn render_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.controls_enabled {
        "Tab: switch pane | ↑/↓: select/scroll | Enter/w: flash | r: refresh | c: clear log | PgUp/PgDn Home/End: log | q: quit"
    } else {
        "Flashing in progress, controls disabled | q: quit"
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    f.render_widget(help, area);
}
