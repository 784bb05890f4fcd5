use ratatui::{prelude::*, widgets::*};

/// Renders a text input field
pub fn render_input<'a>(
    content: &'a str,
    title: String,
    is_focused: bool,
    is_editing: bool,
) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// One selector option per answer, the chosen one highlighted
pub fn answer_options(answers: &[String], selected: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(answers.len() * 2);
    for (i, answer) in answers.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let text = if answer.is_empty() {
            format!("({}) Answer {}", i + 1, i + 1)
        } else {
            format!("({}) {}", i + 1, answer)
        };
        let style = if i == selected {
            Style::default().fg(Color::Black).bg(Color::Green).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

/// Column offset of a byte cursor inside `text`, counted in chars
pub fn cursor_column(text: &str, byte_pos: usize) -> u16 {
    let before = text.get(..byte_pos).unwrap_or(text);
    u16::try_from(before.chars().count()).unwrap_or(u16::MAX)
}

/// Width for a one-line label plus its padding
pub fn padded_width(text: &str) -> u16 {
    u16::try_from(text.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

/// Error text color
pub fn error_style() -> Style {
    Style::default().fg(Color::Red).bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_options_labels_blank_answers() {
        let line = answer_options(&["Paris".into(), String::new()], 1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "(1) Paris  (2) Answer 2");
        assert_eq!(line.spans[2].style.bg, Some(Color::Green));
    }

    #[test]
    fn test_cursor_column_counts_chars_not_bytes() {
        let text = "héllo";
        assert_eq!(cursor_column(text, 0), 0);
        assert_eq!(cursor_column(text, 3), 2);
        assert_eq!(cursor_column(text, text.len()), 5);
    }

    #[test]
    fn test_padded_width_saturates() {
        assert_eq!(padded_width("http://localhost:4000"), 23);
        let long = "x".repeat(usize::from(u16::MAX) + 10);
        assert_eq!(padded_width(&long), u16::MAX);
    }
}
