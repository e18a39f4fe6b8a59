//! Rendering for the terminal form.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph, Tabs},
};

use crate::app::{App, InputMode, Tab};

/// Draw the full interface.
pub fn draw_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    match app.tab {
        Tab::Form => draw_form(frame, app, chunks[1]),
        Tab::Evaluation => draw_evaluation(frame, app, chunks[1]),
    }
    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec![Line::from(" Form [1] "), Line::from(" Evaluation [2] ")];
    let selected = match app.tab {
        Tab::Form => 0,
        Tab::Evaluation => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Housing Price Prediction "),
        )
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let items: Vec<ListItem> = app
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let is_selected = idx == app.selected;
            let editing = is_selected && app.input_mode == InputMode::Editing;

            let marker = if is_selected { "> " } else { "  " };
            let value = if editing {
                format!("{}_", field.display())
            } else {
                field.display().to_string()
            };

            let style = if is_selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{:<20}", field.label), style),
                Span::styled(value, style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" House Details "),
    );
    frame.render_widget(list, columns[0]);

    draw_result(frame, app, columns[1]);
}

fn draw_result(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if !app.artifacts.is_ready() {
        lines.push(Line::from(Span::styled(
            "Artifacts not loaded",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from("Run the training pipeline first:"));
        lines.push(Line::from(Span::styled(
            "  house-trainer --input data/housing.csv",
            Style::default().fg(Color::Gray),
        )));
    } else if let Some(price) = app.prediction {
        lines.push(Line::from("Estimated price:"));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  ${}", format_price(price)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from("Fill in the details and"));
        lines.push(Line::from("press 'p' to predict."));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Prediction "),
    );
    frame.render_widget(paragraph, area);
}

fn draw_evaluation(frame: &mut Frame, app: &App, area: Rect) {
    let Some(report) = &app.evaluation else {
        let paragraph = Paragraph::new(
            "No evaluation found. Run the training pipeline to generate outputs/evaluation.json.",
        )
        .block(Block::default().borders(Borders::ALL).title(" Evaluation "));
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(area);

    let metrics = Paragraph::new(format!(
        "RMSE: {:.2}   MAE: {:.2}   R²: {:.4}",
        report.metrics.rmse, report.metrics.mae, report.metrics.r2
    ))
    .block(Block::default().borders(Borders::ALL).title(" Held-out Metrics "));
    frame.render_widget(metrics, chunks[0]);

    let datasets = vec![
        Dataset::default()
            .name("Perfect")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&app.diagonal),
        Dataset::default()
            .name("Predicted")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&app.scatter),
    ];

    let (min, max) = (app.diagonal[0].0, app.diagonal[1].0);
    let mid = (min + max) / 2.0;
    let labels = vec![
        Span::raw(format_price(min)),
        Span::raw(format_price(mid)),
        Span::raw(format_price(max)),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Actual vs Predicted "),
        )
        .x_axis(
            Axis::default()
                .title("Actual")
                .style(Style::default().fg(Color::Gray))
                .bounds([min, max])
                .labels(labels.clone()),
        )
        .y_axis(
            Axis::default()
                .title("Predicted")
                .style(Style::default().fg(Color::Gray))
                .bounds([min, max])
                .labels(labels),
        );

    frame.render_widget(chart, chunks[1]);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.input_mode {
        InputMode::Normal => "↑/↓ select  ←/→ toggle  Enter edit  p predict  Tab switch  q quit",
        InputMode::Editing => "type digits  Backspace delete  Enter/Esc done",
    };

    let line = if let Some((message, _)) = &app.status {
        Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(hint, Style::default().fg(Color::Gray)))
    };

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Format a price with thousands separators and two decimals.
pub fn format_price(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}
