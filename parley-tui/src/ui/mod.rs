pub mod composer;
pub mod messages;
pub mod status;

use parley_core::ChatController;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::theme::ThemedStyles;

pub fn render(f: &mut Frame, app: &App, controller: &ChatController) {
    let styles = ThemedStyles::new(app.theme());

    f.render_widget(Block::default().style(styles.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(composer::composer_height(controller.input())),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, controller, &styles, chunks[0]);
    messages::render(
        f,
        chunks[1],
        controller.messages(),
        controller.roster(),
        &styles,
        app.scroll_offset,
    );
    composer::render(
        f,
        chunks[2],
        controller.input(),
        controller.is_sending(),
        &styles,
    );
    render_footer(f, app, &styles, chunks[3]);
}

fn render_header(
    f: &mut Frame,
    app: &App,
    controller: &ChatController,
    styles: &ThemedStyles,
    area: Rect,
) {
    let pills = status::status_pills(controller.roster(), controller.statuses());
    let spans: Vec<Span> = pills
        .iter()
        .flat_map(|pill| status::pill_spans(pill, styles, app.animation_tick))
        .collect();

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles.border())
            .title(Line::from(vec![
                Span::styled(" Parley ", styles.title()),
                Span::styled(format!("· {} ", app.backend_label), styles.dimmed()),
            ]))
            .title_top(
                Line::from(Span::styled(" Ctrl+T theme ", styles.dimmed()))
                    .alignment(Alignment::Right),
            ),
    );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, app: &App, styles: &ThemedStyles, area: Rect) {
    let hints = [
        ("Enter", "send"),
        ("Shift+Enter", "newline"),
        ("PgUp/PgDn", "scroll"),
        ("Ctrl+U", "clear"),
        ("Esc", "quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key}"), styles.keybind()));
        spans.push(Span::styled(format!(":{label}"), styles.dimmed()));
    }
    spans.push(Span::styled(
        format!(" │ {}", app.theme().name()),
        styles.dimmed(),
    ));

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(styles.surface()),
        area,
    );
}
