use crate::tui::{
    popup::KeymapPopup,
    state::{App, Axis, HelpState, RenderState, ViewerSession},
};

use crossterm::{
    event::{self, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::{CrosstermBackend, Frame, Rect, Style, Stylize, Terminal},
    text::Text,
    widgets::Paragraph,
};
use std::io::{stdout, Result};

/// Key bindings shown in the help popup
const KEY_BINDINGS: &[(&str, &str)] = &[
    ("q", "Quit the viewer."),
    ("<Esc>", "Close this popup."),
    ("", ""),
    ("h / <Left>", "Rotate left about y."),
    ("l / <Right>", "Rotate right about y."),
    ("k / <Up>", "Rotate up about x."),
    ("j / <Down>", "Rotate down about x."),
    ("[", "Roll counter-clockwise."),
    ("]", "Roll clockwise."),
    ("", ""),
    ("+", "Zoom in."),
    ("-", "Zoom out."),
    ("0", "Reset rotation and zoom."),
];

/// Enum holding the possible things that will happen after an action
pub enum NextAction {
    Quit,
    Rotate { axis: Axis, degrees: f32 },
    Zoom { percent: f32 },
    Reset,
    Nothing,
    Help,
    Back,
}

/// Return the next action depending on the latest `KeyEvent`
fn next_action_from_key(key: KeyEvent) -> NextAction {
    let step_degrees = 15.0f32;
    let step_percent = 10.0f32;
    if key.kind == KeyEventKind::Press {
        match key.code {
            KeyCode::Char('q') => NextAction::Quit,
            KeyCode::Char('l') | KeyCode::Right => NextAction::Rotate {
                axis: Axis::Y,
                degrees: step_degrees,
            },
            KeyCode::Char('h') | KeyCode::Left => NextAction::Rotate {
                axis: Axis::Y,
                degrees: -step_degrees,
            },
            KeyCode::Char('k') | KeyCode::Up => NextAction::Rotate {
                axis: Axis::X,
                degrees: -step_degrees,
            },
            KeyCode::Char('j') | KeyCode::Down => NextAction::Rotate {
                axis: Axis::X,
                degrees: step_degrees,
            },
            KeyCode::Char(']') => NextAction::Rotate {
                axis: Axis::Z,
                degrees: step_degrees,
            },
            KeyCode::Char('[') => NextAction::Rotate {
                axis: Axis::Z,
                degrees: -step_degrees,
            },
            KeyCode::Char('+') | KeyCode::Char('=') => NextAction::Zoom {
                percent: step_percent,
            },
            KeyCode::Char('-') => NextAction::Zoom {
                percent: -step_percent,
            },
            KeyCode::Char('0') => NextAction::Reset,
            KeyCode::Char('?') => NextAction::Help,
            KeyCode::Esc => NextAction::Back,
            _ => NextAction::Nothing,
        }
    } else {
        NextAction::Nothing
    }
}

pub enum StateWrapper {
    Rendering(App<RenderState>),
    Helping(App<HelpState>),
}

impl StateWrapper {
    pub fn update(mut self, session: &mut ViewerSession, next_action: NextAction) -> Self {
        match self {
            Self::Rendering(ref mut app) => match next_action {
                NextAction::Rotate { axis, degrees } => {
                    session.rotate(axis, degrees);
                    self
                }
                NextAction::Zoom { percent } => {
                    session.zoom_by(percent);
                    self
                }
                NextAction::Reset => {
                    session.reset_view();
                    self
                }
                NextAction::Quit => {
                    app.should_quit = true;
                    self
                }
                NextAction::Help => StateWrapper::Helping(App::<HelpState>::from(*app)),
                _ => self,
            },
            Self::Helping(ref mut app) => match next_action {
                NextAction::Quit => {
                    app.should_quit = true;
                    self
                }
                NextAction::Back => StateWrapper::Rendering(App::<RenderState>::from(*app)),
                _ => self,
            },
        }
    }

    pub fn should_quit(&self) -> bool {
        match self {
            Self::Rendering(app) => app.should_quit,
            Self::Helping(app) => app.should_quit,
        }
    }

    pub fn ui(&self, session: &mut ViewerSession, frame: &mut Frame) {
        // Bottom line is reserved for the status bar
        let area = frame.size();
        let render_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.saturating_sub(1),
        };
        let render_size = (render_area.width as usize, render_area.height as usize);
        if render_size != session.render_size() {
            session.resize(render_size.0, render_size.1);
        }
        let widget = Paragraph::new(Text::raw(session.frame()));
        frame.render_widget(widget, render_area);

        match self {
            Self::Helping(_) => {
                let popup_area = Rect {
                    x: area.width / 3,
                    y: area.height / 4,
                    width: area.width / 3,
                    height: area.height / 2,
                };
                let popup = KeymapPopup::default()
                    .bindings(KEY_BINDINGS.to_vec())
                    .style(Style::new().black())
                    .title("Help")
                    .title_style(Style::new().bold())
                    .border_style(Style::new().red());
                frame.render_widget(popup, popup_area);
            }
            Self::Rendering(_) => {
                let bottom = Rect {
                    x: 0,
                    y: area.height.saturating_sub(1),
                    width: area.width,
                    height: 1,
                }
                .clamp(area);
                let status = Paragraph::new(Text::raw(session.status_line()));
                frame.render_widget(status, bottom);
            }
        }
    }
}

/// Start the terminal
pub fn startup() -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    Ok(())
}

/// Perform shutdown of terminal
pub fn shutdown() -> Result<()> {
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

pub fn run(mut session: ViewerSession) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = StateWrapper::Rendering(App::<RenderState>::default());

    loop {
        terminal.draw(|frame| app.ui(&mut session, frame))?;

        if event::poll(std::time::Duration::from_millis(3))? {
            if let event::Event::Key(key) = event::read()? {
                let next_action = next_action_from_key(key);
                app = app.update(&mut session, next_action);
                if app.should_quit() {
                    break;
                }
            }
        }
    }
    Ok(())
}
