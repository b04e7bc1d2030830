use std::mem;
use std::path::Path;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::catalog::{SortKey, Statistics};
use crate::error::LibraryError;
use crate::session::Session;
use crate::storage::FileFormat;

use super::forms::{BookField, BookForm, ConfirmBookDelete, SearchForm, TextPrompt};
use super::helpers::{book_line, centered_rect, count_books, surface_error};
use super::screens::{BookListScreen, ListSource, MenuOption};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown in the book list.
const PAGE_STEP: isize = 5;

/// Top-level views. Forms and prompts are modes layered on top of these.
enum Screen {
    Menu,
    Books(BookListScreen),
    Statistics(Statistics),
}

/// Modal state scoped to the current screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    RemovingBook(TextPrompt),
    Searching(SearchForm),
    ChoosingSort,
    Importing(TextPrompt),
    Exporting(TextPrompt),
    ConfirmBookDelete(ConfirmBookDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    session: Session,
    menu_selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            menu_selected: 0,
            screen: Screen::Menu,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Show why the library file could not be loaded. The session is already
    /// running on an empty library at this point.
    pub fn report_load_error(&mut self, err: &LibraryError) {
        self.set_status(
            format!("Error loading library: {err}. Starting with an empty library."),
            StatusKind::Error,
        );
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.session.is_modified()
    }

    /// Dispatch one key press. Returns `true` once the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::RemovingBook(prompt) => self.handle_remove_title(code, prompt),
            Mode::Searching(form) => self.handle_search(code, form),
            Mode::ChoosingSort => self.handle_sort_choice(code),
            Mode::Importing(prompt) => self.handle_import(code, prompt),
            Mode::Exporting(prompt) => self.handle_export(code, prompt),
            Mode::ConfirmBookDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        exit
    }

    /// Save without leaving the app.
    pub(crate) fn handle_ctrl_s(&mut self) {
        match self.session.save() {
            Ok(()) => self.set_status(
                format!("Library saved to {}.", self.session.store().path().display()),
                StatusKind::Info,
            ),
            Err(err) => self.set_status(format!("Error saving library: {err}"), StatusKind::Error),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Menu => match code {
                KeyCode::Char('q') => {
                    self.save_and_exit(exit);
                    Mode::Normal
                }
                // Already at the top level; a stray Esc after closing a form
                // must not end the session.
                KeyCode::Esc => Mode::Normal,
                KeyCode::Up => {
                    self.move_menu(-1);
                    Mode::Normal
                }
                KeyCode::Down => {
                    self.move_menu(1);
                    Mode::Normal
                }
                KeyCode::Enter => {
                    let option = MenuOption::ALL[self.menu_selected];
                    self.activate(option, exit)
                }
                KeyCode::Char(ch) => match MenuOption::from_digit(ch) {
                    Some(option) => {
                        self.menu_selected = MenuOption::ALL
                            .iter()
                            .position(|o| *o == option)
                            .unwrap_or(0);
                        self.activate(option, exit)
                    }
                    None => {
                        self.set_status(
                            format!(
                                "Invalid choice. Please enter a number between 1-{}.",
                                MenuOption::ALL.len()
                            ),
                            StatusKind::Error,
                        );
                        Mode::Normal
                    }
                },
                _ => Mode::Normal,
            },
            Screen::Books(ref mut list) => {
                let mut quit = false;
                let mut back_to_menu = false;
                let mut toggle = None;
                let mut mode = Mode::Normal;
                match code {
                    KeyCode::Char('q') => quit = true,
                    KeyCode::Esc | KeyCode::Backspace => back_to_menu = true,
                    KeyCode::Up => list.move_selection(-1),
                    KeyCode::Down => list.move_selection(1),
                    KeyCode::PageUp => list.move_selection(-PAGE_STEP),
                    KeyCode::PageDown => list.move_selection(PAGE_STEP),
                    KeyCode::Home => list.select_first(),
                    KeyCode::End => list.select_last(),
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        toggle = list.current_book().map(|book| book.id);
                    }
                    KeyCode::Char('-') | KeyCode::Delete => {
                        if let Some(book) = list.current_book() {
                            mode = Mode::ConfirmBookDelete(ConfirmBookDelete {
                                id: book.id,
                                title: book.title.clone(),
                            });
                        }
                    }
                    _ => {}
                }

                if quit {
                    self.save_and_exit(exit);
                } else if back_to_menu {
                    self.screen = Screen::Menu;
                    self.clear_status();
                } else if let Some(id) = toggle {
                    self.toggle_read(id);
                }
                mode
            }
            Screen::Statistics(_) => {
                match code {
                    KeyCode::Char('q') => self.save_and_exit(exit),
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
                        self.screen = Screen::Menu;
                        self.clear_status();
                    }
                    _ => {}
                }
                Mode::Normal
            }
        }
    }

    fn activate(&mut self, option: MenuOption, exit: &mut bool) -> Mode {
        self.clear_status();
        match option {
            MenuOption::AddBook => Mode::AddingBook(BookForm::default()),
            MenuOption::RemoveBook => Mode::RemovingBook(TextPrompt::new("Title")),
            MenuOption::Search => Mode::Searching(SearchForm::default()),
            MenuOption::DisplayAll => {
                self.open_book_list();
                Mode::Normal
            }
            MenuOption::Sort => Mode::ChoosingSort,
            MenuOption::Statistics => {
                self.screen = Screen::Statistics(self.session.library().statistics());
                Mode::Normal
            }
            MenuOption::Import => Mode::Importing(TextPrompt::new("File")),
            MenuOption::Export => Mode::Exporting(TextPrompt::new("File")),
            MenuOption::SaveAndExit => {
                self.save_and_exit(exit);
                Mode::Normal
            }
        }
    }

    /// Save, then signal exit. A failed save keeps the app open so nothing
    /// is lost; Ctrl-C remains as the escape hatch.
    fn save_and_exit(&mut self, exit: &mut bool) {
        match self.session.save() {
            Ok(()) => *exit = true,
            Err(err) => self.set_status(
                format!("Error saving library: {err}. Press Ctrl-C to quit without saving."),
                StatusKind::Error,
            ),
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok(fields) => {
                    let title = self.session.add(fields).title.clone();
                    self.refresh_book_list();
                    self.set_status(format!("Added \"{title}\"."), StatusKind::Info);
                    return Mode::Normal;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingBook(form)
    }

    fn handle_remove_title(&mut self, code: KeyCode, mut prompt: TextPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Remove cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => match prompt.required() {
                Ok(title) => {
                    let title = title.to_string();
                    let removed = self.session.remove_by_title(&title);
                    if removed == 0 {
                        self.set_status("Book not found in the library.", StatusKind::Error);
                    } else {
                        self.refresh_book_list();
                        self.set_status(
                            format!("Removed {} titled \"{title}\".", count_books(removed)),
                            StatusKind::Info,
                        );
                    }
                    return Mode::Normal;
                }
                Err(err) => prompt.error = Some(surface_error(&err)),
            },
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
            }
            _ => {}
        }
        Mode::RemovingBook(prompt)
    }

    fn handle_search(&mut self, code: KeyCode, mut form: SearchForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => form.cycle_mode(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.query() {
                Ok(query) => {
                    let heading = format!("Search results for {}", query.describe());
                    let list = BookListScreen::new(
                        heading,
                        ListSource::Search(query),
                        self.session.library(),
                    );
                    if list.books.is_empty() {
                        self.set_status("No matching books found.", StatusKind::Error);
                        return Mode::Searching(form);
                    }
                    self.set_status(
                        format!("Found {}.", count_books(list.books.len())),
                        StatusKind::Info,
                    );
                    self.screen = Screen::Books(list);
                    return Mode::Normal;
                }
                Err(err) => form.error = Some(surface_error(&err)),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Searching(form)
    }

    fn handle_sort_choice(&mut self, code: KeyCode) -> Mode {
        let key = match code {
            KeyCode::Esc => {
                self.set_status("Sort cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Char('1') => SortKey::Title,
            KeyCode::Char('2') => SortKey::Author,
            KeyCode::Char('3') => SortKey::YearDescending,
            KeyCode::Char(_) | KeyCode::Enter => {
                self.set_status("Invalid choice. Press 1, 2 or 3.", StatusKind::Error);
                return Mode::ChoosingSort;
            }
            _ => return Mode::ChoosingSort,
        };

        self.session.sort(key);
        self.open_book_list();
        self.set_status(format!("Sorted by {}.", key.label()), StatusKind::Info);
        Mode::Normal
    }

    fn handle_import(&mut self, code: KeyCode, mut prompt: TextPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Import cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => {
                match self.import_from(&prompt) {
                    Ok((count, path, format)) => {
                        self.refresh_book_list();
                        self.set_status(
                            format!(
                                "Imported {} from {path} ({}).",
                                count_books(count),
                                format.label()
                            ),
                            StatusKind::Info,
                        );
                        return Mode::Normal;
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        prompt.error = Some(message.clone());
                        self.set_status(format!("Import failed: {message}"), StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
            }
            _ => {}
        }
        Mode::Importing(prompt)
    }

    fn handle_export(&mut self, code: KeyCode, mut prompt: TextPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Export cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => {
                match self.export_from(&prompt) {
                    Ok((count, path, format)) => {
                        self.set_status(
                            format!(
                                "Exported {} to {path} ({}).",
                                count_books(count),
                                format.label()
                            ),
                            StatusKind::Info,
                        );
                        return Mode::Normal;
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        prompt.error = Some(message.clone());
                        self.set_status(format!("Export failed: {message}"), StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
            }
            _ => {}
        }
        Mode::Exporting(prompt)
    }

    fn import_from(&mut self, prompt: &TextPrompt) -> Result<(usize, String, FileFormat)> {
        let path = prompt.required()?.to_string();
        let format = FileFormat::from_path(Path::new(&path))?;
        let count = self.session.import(Path::new(&path))?;
        Ok((count, path, format))
    }

    fn export_from(&self, prompt: &TextPrompt) -> Result<(usize, String, FileFormat)> {
        let path = prompt.required()?.to_string();
        let format = FileFormat::from_path(Path::new(&path))?;
        let count = self.session.export(Path::new(&path))?;
        Ok((count, path, format))
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.session.remove(confirm.id) {
                    Some(book) => {
                        self.refresh_book_list();
                        self.set_status(format!("Removed \"{}\".", book.title), StatusKind::Info);
                    }
                    None => self.set_status("Book not found in the library.", StatusKind::Error),
                }
                Mode::Normal
            }
            _ => Mode::ConfirmBookDelete(confirm),
        }
    }

    fn toggle_read(&mut self, id: uuid::Uuid) {
        if self.session.toggle_read(id).is_none() {
            self.set_status("Book not found in the library.", StatusKind::Error);
            return;
        }
        self.refresh_book_list();
        let message = self.session.library().get(id).map(|book| {
            let label = if book.read_status { "read" } else { "unread" };
            format!("Marked \"{}\" as {label}.", book.title)
        });
        if let Some(message) = message {
            self.set_status(message, StatusKind::Info);
        }
    }

    fn open_book_list(&mut self) {
        let heading = format!("Your Library ({})", count_books(self.session.library().len()));
        self.screen = Screen::Books(BookListScreen::new(
            heading,
            ListSource::All,
            self.session.library(),
        ));
    }

    /// Rebuild the visible list after the library changed.
    fn refresh_book_list(&mut self) {
        if let Screen::Books(list) = &mut self.screen {
            list.refresh(self.session.library());
            if matches!(list.source, ListSource::All) {
                list.heading = format!("Your Library ({})", count_books(list.books.len()));
            }
        }
    }

    fn move_menu(&mut self, offset: isize) {
        let len = MenuOption::ALL.len() as isize;
        let next = (self.menu_selected as isize + offset).rem_euclid(len);
        self.menu_selected = next as usize;
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Menu => self.draw_menu(frame, content_area),
            Screen::Books(list) => self.draw_book_list(frame, content_area, list),
            Screen::Statistics(stats) => self.draw_statistics(frame, content_area, stats),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::RemovingBook(prompt) => self.draw_prompt(
                frame,
                area,
                "Remove a Book",
                prompt,
                "All books with this title are removed.",
            ),
            Mode::Searching(form) => self.draw_search_form(frame, area, form),
            Mode::ChoosingSort => self.draw_sort_choice(frame, area),
            Mode::Importing(prompt) => self.draw_prompt(
                frame,
                area,
                "Import Books",
                prompt,
                "Path to a .csv or .json file. Books are appended.",
            ),
            Mode::Exporting(prompt) => self.draw_prompt(
                frame,
                area,
                "Export Books",
                prompt,
                "Path to a .csv or .json file. Existing files are replaced.",
            ),
            Mode::ConfirmBookDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let library = self.session.library();
        let mut title = format!(
            " Personal Library Manager - {} ",
            count_books(library.len())
        );
        if self.session.is_modified() {
            title.push_str("(unsaved) ");
        }
        let block = Block::default().title(title).borders(Borders::ALL);

        let items: Vec<ListItem> = MenuOption::ALL
            .iter()
            .enumerate()
            .map(|(idx, option)| ListItem::new(format!("{}. {}", idx + 1, option.label())))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.menu_selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect, list: &BookListScreen) {
        let block = Block::default()
            .title(format!(" {} ", list.heading))
            .borders(Borders::ALL);

        if list.books.is_empty() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                list.empty_message(),
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = list
            .books
            .iter()
            .enumerate()
            .map(|(idx, book)| ListItem::new(book_line(idx + 1, book)))
            .collect();
        let widget = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect, stats: &Statistics) {
        let block = Block::default()
            .title(" Library Statistics ")
            .borders(Borders::ALL);
        let label = Style::default().fg(Color::Cyan);

        let average = stats
            .average_rating
            .map(|avg| format!("{avg:.1} (from {})", count_books(stats.rated)))
            .unwrap_or_else(|| "n/a".to_string());
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Total books:     ", label),
                Span::raw(stats.total.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Read:            ", label),
                Span::raw(format!("{} ({:.1}%)", stats.read, stats.read_percentage())),
            ]),
            Line::from(vec![
                Span::styled("Unread:          ", label),
                Span::raw(stats.unread().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Average rating:  ", label),
                Span::raw(average),
            ]),
        ];

        if !stats.genres.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Genres:", label)));
            for (genre, count) in &stats.genres {
                lines.push(Line::from(format!("  {genre}: {count}")));
            }
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::AddingBook(_)) => &[
                ("[Tab/↑↓]", "Switch field"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ],
            (_, Mode::Searching(_)) => &[
                ("[Tab]", "Change mode"),
                ("[Enter]", "Search"),
                ("[Esc]", "Cancel"),
            ],
            (_, Mode::ChoosingSort) => &[("[1-3]", "Choose"), ("[Esc]", "Cancel")],
            (_, Mode::ConfirmBookDelete(_)) => &[("[y]", "Remove"), ("[n/Esc]", "Keep")],
            (_, Mode::RemovingBook(_)) | (_, Mode::Importing(_)) | (_, Mode::Exporting(_)) => {
                &[("[Enter]", "Confirm"), ("[Esc]", "Cancel")]
            }
            (Screen::Menu, Mode::Normal) => &[
                ("[1-9]", "Choose"),
                ("[↑↓ Enter]", "Select"),
                ("[Ctrl-S]", "Save"),
                ("[q]", "Save & quit"),
                ("[Ctrl-C]", "Quit without saving"),
            ],
            (Screen::Books(_), Mode::Normal) => &[
                ("[↑↓]", "Navigate"),
                ("[r]", "Toggle read"),
                ("[-]", "Remove"),
                ("[Esc]", "Menu"),
                ("[q]", "Save & quit"),
            ],
            (Screen::Statistics(_), Mode::Normal) => &[("[Esc]", "Menu"), ("[q]", "Save & quit")],
        };

        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (idx, (key, action)) in hints.iter().enumerate() {
            let separator = if idx + 1 < hints.len() { "   " } else { "" };
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(format!(" {action}{separator}")));
        }
        Line::from(spans)
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add a Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(error_or_hint(
            form.error.as_deref(),
            "Enter to save • Tab to switch • Esc to cancel",
        ));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = BookField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let prefix = format!("{}: ", form.active.label()).chars().count() as u16;
        frame.set_cursor_position((
            inner.x + prefix + form.value_len(form.active) as u16,
            inner.y + row,
        ));
    }

    fn draw_prompt(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        prompt: &TextPrompt,
        hint: &str,
    ) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            prompt.build_line(),
            Line::from(""),
            error_or_hint(prompt.error.as_deref(), hint),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = format!("{}: ", prompt.label).chars().count() as u16;
        frame.set_cursor_position((inner.x + prefix + prompt.value_len() as u16, inner.y));
    }

    fn draw_search_form(&self, frame: &mut Frame, area: Rect, form: &SearchForm) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Search").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(vec![
                Span::raw("Search by: "),
                Span::styled(form.mode.label(), Style::default().fg(Color::Cyan)),
            ]),
            form.term_line(),
            Line::from(""),
            error_or_hint(form.error.as_deref(), "Tab changes what is searched"),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Term: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.term_len() as u16, inner.y + 1));
    }

    fn draw_sort_choice(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Sort Books").borders(Borders::ALL);
        let lines = vec![
            Line::from("1. By title (A-Z)"),
            Line::from("2. By author (A-Z)"),
            Line::from("3. By publication year (newest first)"),
        ];
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Remove Book").borders(Borders::ALL);
        let lines = vec![
            Line::from(format!("Remove \"{}\" from the library?", confirm.title)),
            Line::from(""),
            Line::from(Span::styled(
                "y to remove • n or Esc to keep",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Red error text when present, otherwise a gray hint.
fn error_or_hint(error: Option<&str>, hint: &str) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::Gray),
        )),
    }
}
