//! Dashboard screen - the unlocked account overview

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};

use crate::app::App;
use crate::dashboard::{
    format_amount, format_balance, NAV_ITEMS, QUICK_ACTIONS, RECENT_TRANSACTIONS,
};
use crate::ui::components::header;
use crate::ui::layout::{render_footer, section_block};

/// Render the dashboard
pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let theme = &app.theme;
    let dashboard = &app.state.dashboard;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Navigation
            Constraint::Length(5), // Balance
            Constraint::Length(5), // Quick actions
            Constraint::Min(5),    // Transactions
            Constraint::Length(2), // Footer
        ])
        .split(area);

    header::render(frame, chunks[0], dashboard.active_nav(), theme);

    // Navigation
    let tabs = Tabs::new(NAV_ITEMS.to_vec())
        .block(Block::default().borders(Borders::ALL).border_style(theme.border()))
        .style(theme.text_secondary())
        .highlight_style(theme.menu_item(true))
        .select(dashboard.nav_index)
        .divider("│");
    frame.render_widget(tabs, chunks[1]);

    // Balance
    let balance = dashboard.balance.value_at(now);
    let balance_lines = vec![
        Line::from(Span::styled("Total Balance", theme.text_muted())),
        Line::from(Span::styled(format_balance(balance), theme.title())),
    ];
    let balance_widget = Paragraph::new(balance_lines)
        .alignment(Alignment::Center)
        .block(section_block("Account Overview", theme));
    frame.render_widget(balance_widget, chunks[2]);

    // Quick actions
    let action_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, QUICK_ACTIONS.len() as u32);
            QUICK_ACTIONS.len()
        ])
        .split(chunks[3]);

    for (i, (name, rect)) in QUICK_ACTIONS.iter().zip(action_areas.iter()).enumerate() {
        let focused = i == dashboard.action_index;
        let style = if dashboard.is_pressed(i, now) {
            theme.pressed()
        } else {
            theme.menu_item(focused)
        };
        let border = if focused {
            theme.border_focused()
        } else {
            theme.border()
        };
        let card = Paragraph::new(format!("\n{}", name))
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(card, *rect);
    }

    // Recent transactions
    let items: Vec<ListItem> = RECENT_TRANSACTIONS
        .iter()
        .enumerate()
        .map(|(i, tx)| {
            let selected = i == dashboard.transaction_index;
            let line = Line::from(vec![
                Span::styled(format!("  {:<24}", tx.name), theme.menu_item(selected)),
                Span::styled(format!("{:<12}", tx.date), theme.text_muted()),
                Span::styled(format!("{:>16}", format_amount(tx.amount)), theme.amount(tx.amount)),
            ]);
            ListItem::new(line)
        })
        .collect();
    let list = List::new(items).block(section_block("Recent Transactions", theme));
    frame.render_widget(list, chunks[4]);

    render_footer(
        frame,
        chunks[5],
        &[
            ("←/→", "Navigate"),
            ("↑/↓", "Transactions"),
            ("Tab", "Next action"),
            ("Space", "Run action"),
            ("L", "Logout"),
            ("Q", "Quit"),
        ],
        theme,
    );
}
