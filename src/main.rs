//! Quiz Admin - actor-based quiz authoring client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - question store, form controller and view selector
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use quiz_admin::app::{AppActor, AppState, View};
use quiz_admin::config::{Overrides, Settings};
use quiz_admin::constants::{ANSWER_COUNT, APP_NAME};
use quiz_admin::messages::ui_events::{key_to_ui_event, FormField, InputMode};
use quiz_admin::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use quiz_admin::network::{NetworkActor, QuestionClient};
use quiz_admin::ui::{
    answer_options, cursor_column, error_style, padded_width, render_input, render_tabs,
};

/// Terminal quiz-authoring client
#[derive(Parser, Debug)]
#[command(name = "quiz-admin", version, about)]
struct Cli {
    /// Backend root URL (the questions live under /questions)
    #[arg(long, env = "QUIZ_ADMIN_URL")]
    base_url: Option<String>,

    /// Config file (defaults to ~/.quiz-admin/config.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(
        cli.config.as_deref(),
        Overrides {
            base_url: cli.base_url,
            request_timeout_secs: cli.timeout,
            log_file: cli.log_file,
        },
    )?;
    let client = QuestionClient::new(&settings)?;

    // Initialize logging to file
    let log_dir = settings
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let log_name = settings
        .log_file
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(quiz_admin::constants::DEFAULT_LOG_FILE));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!(backend = %client.collection_url(), "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(settings.base_url.clone()), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.view,
                    current_state.form.active_field,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Nav bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_nav_bar(f, state, main_chunks[0]);

    match state.view {
        View::List => draw_question_list(f, state, main_chunks[1]),
        View::Form => draw_question_form(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_nav_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let titles = [View::List.title(), View::Form.title()];
    let selected = match state.view {
        View::List => 0,
        View::Form => 1,
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(padded_width(&state.backend))])
        .split(area);

    f.render_widget(render_tabs(&titles, selected), chunks[0]);
    f.render_widget(
        Paragraph::new(state.backend.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_question_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let loading = if state.is_loading { " [...]" } else { "" };
    let synced = state
        .loaded_at
        .map(|t| format!(" | synced {}", t.format("%H:%M:%S")))
        .unwrap_or_default();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Quiz Questions ({}){}{} ", state.questions.len(), loading, synced));

    if let Some(err) = state.list_error.as_deref().or(state.load_error.as_deref()) {
        block = block.title_bottom(Line::from(Span::styled(format!(" {} ", err), error_style())));
    }

    if state.questions.is_empty() {
        let text = if state.is_loading {
            "Loading questions..."
        } else {
            "No questions yet. Press 'n' to write one."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .questions
        .iter()
        .map(|q| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("Question {}", q.id),
                    Style::default().fg(Color::Cyan).bold(),
                )),
                Line::from(format!("Prompt: {}", q.prompt)),
                Line::from(Span::styled("Correct Answer:", Style::default().fg(Color::Gray))),
                answer_options(&q.answers, q.safe_correct_index()),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_question));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_question_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let form = &state.form;
    let editing = state.input_mode == InputMode::Editing;

    let mut constraints = vec![Constraint::Length(3)]; // Prompt
    constraints.extend(std::iter::repeat(Constraint::Length(3)).take(ANSWER_COUNT));
    constraints.push(Constraint::Length(3)); // Correct answer
    constraints.push(Constraint::Length(3)); // Submit
    constraints.push(Constraint::Min(0)); // Error

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(if form.submitting { " New Question [...] " } else { " New Question " });
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut fields = vec![(FormField::Prompt, form.prompt.as_str())];
    for (i, answer) in form.answers.iter().enumerate() {
        fields.push((FormField::Answer(i), answer.as_str()));
    }

    for (row, (field, text)) in fields.into_iter().enumerate() {
        let focused = form.active_field == field;
        f.render_widget(
            render_input(text, format!(" {} ", field.label()), focused, editing),
            rows[row],
        );
        if focused && editing {
            let area = rows[row];
            let max_x = area.x + area.width.saturating_sub(2);
            let cursor_x = area
                .x
                .saturating_add(cursor_column(text, state.cursor_position))
                .saturating_add(1)
                .min(max_x);
            f.set_cursor_position(Position::new(cursor_x, area.y + 1));
        }
    }

    let selector_row = rows[ANSWER_COUNT + 1];
    let selector_focused = form.active_field == FormField::CorrectAnswer;
    let selector = Paragraph::new(answer_options(&form.answers, form.correct_index.unwrap_or(0)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if selector_focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                })
                .title(format!(" {} (←/→) ", FormField::CorrectAnswer.label())),
        );
    f.render_widget(selector, selector_row);

    let submit_focused = form.active_field == FormField::Submit;
    let submit = Paragraph::new(FormField::Submit.label())
        .alignment(Alignment::Center)
        .style(if submit_focused {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default()
        })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(submit, rows[ANSWER_COUNT + 2]);

    if let Some(err) = &form.error {
        f.render_widget(
            Paragraph::new(err.as_str()).style(error_style()),
            rows[ANSWER_COUNT + 3],
        );
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.input_mode == InputMode::Editing {
        " ESC/Enter:stop editing | arrows:move | Tab:next field "
    } else {
        match state.view {
            View::List => " ↑/↓:select | ←/→:correct answer | d:delete | r:reload | n:new | ?:help | q:quit ",
            View::Form => " Tab:field | e:edit | ←/→:correct answer | s:submit | Esc:back | ?:help ",
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 QUIZ ADMIN - Keyboard Shortcuts

 NAVIGATION
   1                  View Questions
   2 / n              New Question

 QUESTION LIST
   ↑ / ↓              Select question
   ← / →              Change correct answer
   d                  Delete question
   r                  Reload from server

 NEW QUESTION
   Tab / Shift+Tab    Next / previous field
   e / Enter          Edit field
   ← / →              Change correct answer
   s                  Add question
   Esc                Back to list

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
