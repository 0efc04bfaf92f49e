use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use inline_preview_config::Config;
use inline_preview_engine::{Cmd, DecorationSource, Editor, TextAccess, Theme};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

mod render;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Interactive,
    List,
    Html,
}

struct App {
    path: PathBuf,
    editor: Editor,
    /// First display row shown
    scroll: usize,
    status: String,
}

impl App {
    fn new(path: PathBuf, theme: Theme) -> Result<Self> {
        let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let editor = Editor::from_bytes(&bytes, theme)?;
        log::info!(
            "opened {} with {} decorations",
            path.display(),
            editor.decorations().len()
        );

        Ok(Self {
            path,
            editor,
            scroll: 0,
            status: String::new(),
        })
    }

    fn caret(&self) -> usize {
        self.editor.document().selection().end
    }

    fn set_caret(&mut self, at: usize) {
        self.editor.dispatch(Cmd::SetSelection { range: at..at });
    }

    fn insert(&mut self, text: &str) {
        let at = self.caret();
        self.editor.dispatch(Cmd::InsertText {
            at,
            text: text.to_string(),
        });
    }

    fn backspace(&mut self) {
        let text = self.editor.document().text();
        let caret = self.caret();
        if let Some((start, _)) = text[..caret].char_indices().next_back() {
            self.editor.dispatch(Cmd::DeleteRange {
                range: start..caret,
            });
        }
    }

    fn delete_forward(&mut self) {
        let text = self.editor.document().text();
        let caret = self.caret();
        if let Some(ch) = text[caret..].chars().next() {
            self.editor.dispatch(Cmd::DeleteRange {
                range: caret..caret + ch.len_utf8(),
            });
        }
    }

    fn move_horizontal(&mut self, forward: bool) {
        let text = self.editor.document().text();
        let caret = self.caret();
        let target = if forward {
            text[caret..].chars().next().map(|ch| caret + ch.len_utf8())
        } else {
            text[..caret].char_indices().next_back().map(|(i, _)| i)
        };
        if let Some(target) = target {
            self.set_caret(target);
        }
    }

    fn move_vertical(&mut self, down: bool) {
        let doc = self.editor.document();
        let text = doc.text();
        let line = doc.line_at(self.caret());
        let column = self.caret() - line.from;

        let target_line = if down {
            // Step over the whole line break, `\r\n` included
            let rest = &text[line.to..];
            let break_len = if rest.starts_with("\r\n") {
                2
            } else if rest.starts_with('\n') {
                1
            } else {
                return;
            };
            doc.line_at(line.to + break_len)
        } else {
            if line.from == 0 {
                return;
            }
            doc.line_at(line.from - 1)
        };

        let mut target = (target_line.from + column).min(target_line.to);
        while !text.is_char_boundary(target) {
            target -= 1;
        }
        self.set_caret(target);
    }

    fn save(&mut self) {
        self.status = match std::fs::write(&self.path, self.editor.document().to_bytes()) {
            Ok(()) => format!("Saved {}", self.path.display()),
            Err(e) => format!("Save failed: {e}"),
        };
    }

    /// Tooltip of the mark under the caret, if any
    fn hovered_tooltip(&self) -> Option<&str> {
        let caret = self.caret();
        self.editor
            .decorations()
            .marks()
            .find(|(span, _)| span.start <= caret && caret <= span.end)
            .map(|(_, mark)| mark.tooltip())
    }

    /// Returns false when the app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('q') if ctrl => return false,
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char(ch) if !ctrl => self.insert(ch.encode_utf8(&mut [0; 4])),
            KeyCode::Enter => self.insert("\n"),
            KeyCode::Tab => self.insert("\t"),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_horizontal(false),
            KeyCode::Right => self.move_horizontal(true),
            KeyCode::Up => self.move_vertical(false),
            KeyCode::Down => self.move_vertical(true),
            KeyCode::Home => {
                let from = self.editor.document().line_at(self.caret()).from;
                self.set_caret(from);
            }
            KeyCode::End => {
                let to = self.editor.document().line_at(self.caret()).to;
                self.set_caret(to);
            }
            _ => {}
        }
        true
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [--list | --html] [markdown-file]");
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("inline-preview-cli");

    let mut mode = Mode::Interactive;
    let mut file_arg = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--list" => mode = Mode::List,
            "--html" => mode = Mode::Html,
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            other if other.starts_with("--") => {
                eprintln!("Error: unknown option {other}");
                print_usage(program);
                process::exit(1);
            }
            other if file_arg.is_none() => file_arg = Some(PathBuf::from(other)),
            _ => {
                print_usage(program);
                process::exit(1);
            }
        }
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let Some(path) = file_arg.or_else(|| config.open_path.clone()) else {
        eprintln!("Error: No markdown file provided and no open_path in config");
        eprintln!(
            "Pass a file or set open_path in {}",
            Config::config_path().display()
        );
        print_usage(program);
        process::exit(1);
    };

    let mut app = match App::new(path, config.theme()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    match mode {
        Mode::List => {
            print!("{}", render::decoration_listing(&app.editor));
            return Ok(());
        }
        Mode::Html => {
            print!("{}", render::html_preview(&app.editor));
            return Ok(());
        }
        Mode::Interactive => {}
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            app.status.clear();
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let rows = render::display_rows(&app.editor);
    let caret = app.caret();
    let caret_row = rows
        .iter()
        .position(|row| {
            row.source
                .is_some_and(|line| line.from <= caret && caret <= line.to)
        })
        .unwrap_or(0);

    // Keep the caret row inside the viewport
    let height = chunks[0].height.saturating_sub(2) as usize;
    if caret_row < app.scroll {
        app.scroll = caret_row;
    } else if height > 0 && caret_row >= app.scroll + height {
        app.scroll = caret_row + 1 - height;
    }

    let lines: Vec<Line> = rows
        .iter()
        .skip(app.scroll)
        .take(height)
        .map(|row| match &row.kind {
            render::RowKind::Source { marked: true } => Line::from(Span::styled(
                row.text.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            )),
            render::RowKind::Source { marked: false } => Line::from(Span::raw(row.text.clone())),
            render::RowKind::Preview => Line::from(Span::styled(
                row.text.clone(),
                Style::default().fg(Color::Black).bg(Color::Gray),
            )),
        })
        .collect();

    let title = format!(
        "{} - {} previews",
        app.path.display(),
        app.editor.decorations().widgets().count()
    );
    let content = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(content, chunks[0]);

    if let Some(line) = rows.get(caret_row).and_then(|row| row.source) {
        let text = app.editor.document().text();
        let column = text[line.from..caret].chars().count();
        let y = caret_row.saturating_sub(app.scroll) as u16;
        f.set_cursor_position(Position::new(
            chunks[0].x + 1 + column as u16,
            chunks[0].y + 1 + y,
        ));
    }

    let status = if !app.status.is_empty() {
        app.status.clone()
    } else if let Some(tooltip) = app.hovered_tooltip() {
        format!("image: {tooltip}")
    } else {
        "Esc/Ctrl-Q: Quit | Ctrl-S: Save | arrows: Move".to_string()
    };
    f.render_widget(Paragraph::new(Line::from(status)), chunks[1]);
}
