use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Paragraph, Wrap},
};

use givd_core::{StockItem, StockStatus};

use super::app::{DashboardApp, Tab};

pub fn render(frame: &mut Frame, app: &DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(1)])
        .split(chunks[1]);

    render_sidebar(frame, app, body[0]);
    match app.tab {
        Tab::Stock => render_stock(frame, app, body[1]),
        Tab::Stats => render_stats(frame, app, body[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let mut spans = vec![Span::styled(
        "givd.app/dashboard/home",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if app.live {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("● Live", Style::default().fg(Color::Green)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_sidebar(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let active = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let inactive = Style::default();

    let lines = vec![
        Line::from(Span::styled(
            "John Doe",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Connecté",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[1] Mes Stocks",
            if app.tab == Tab::Stock { active } else { inactive },
        )),
        Line::from(Span::styled(
            "[2] Consommation",
            if app.tab == Tab::Stats { active } else { inactive },
        )),
        Line::from(Span::styled(
            "    Liste Auto (bientôt)",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let sidebar = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("givd"));

    frame.render_widget(sidebar, area);
}

fn render_stock(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let title = format!("État des Stocks ({} Alertes)", app.alert_count());
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut lines: Vec<Line> = Vec::new();

    if app.is_loading() {
        lines.push(Line::from(Span::styled(
            "Chargement...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    for item in &app.items {
        lines.push(stock_line(item));
    }

    if app.items.is_empty() && !app.is_loading() {
        lines.push(Line::from(Span::styled(
            "Aucun stock trouvé.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    if app.is_submitting() {
        lines.push(Line::from(Span::styled(
            "Ajout en cours...",
            Style::default().fg(Color::Yellow),
        )));
    }

    if let Some(alert) = &app.alert {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Error: {}", alert),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    frame.render_widget(paragraph, area);
}

fn stock_line(item: &StockItem) -> Line<'static> {
    let dot = match item.status {
        StockStatus::Ok => Span::styled("● ", Style::default().fg(Color::Green)),
        StockStatus::Low => Span::styled("● ", Style::default().fg(Color::Yellow)),
        StockStatus::Critical => Span::styled(
            "● ",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::RAPID_BLINK),
        ),
    };

    Line::from(vec![
        dot,
        Span::styled(
            item.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} {} (seuil: {})", item.quantity, item.unit, item.threshold),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_stats(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let data: Vec<(&str, u64)> = app.consumption.iter().map(|s| (s.day, s.value)).collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Analyse Hebdo"))
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .data(data.as_slice());

    frame.render_widget(chart, chunks[0]);

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    frame.render_widget(
        Paragraph::new("Budget Restant: 124.50 €")
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL)),
        tiles[0],
    );
    frame.render_widget(
        Paragraph::new("Total Dépensé: 342.10 €")
            .block(Block::default().borders(Borders::ALL)),
        tiles[1],
    );
}

fn render_status_bar(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let status = if app.alert.is_some() {
        "Esc: Dismiss alert  q: Quit"
    } else {
        "r: Refresh  a: Test insert  Tab/1/2: Tabs  ↑/↓: Scroll  q/Esc: Quit"
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status_bar, area);
}
