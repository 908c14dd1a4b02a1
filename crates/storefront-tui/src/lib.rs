// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use storefront_app::{
    CatalogLoad, CatalogSource, CatalogTab, Category, EmptyState, FetchStatus, NoticeKind,
    Notifier, RenderRow, ScreenController, ScreenSnapshot, load_catalog,
};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    CatalogLoaded(CatalogLoad),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    cursor: usize,
    search_input: Option<String>,
    help_visible: bool,
    status_line: Option<String>,
    status_token: u64,
}

pub fn run_app<S>(controller: &ScreenController, source: S) -> Result<()>
where
    S: CatalogSource + Send + 'static,
{
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (internal_tx, internal_rx) = mpsc::channel();
    let fetch_tx = spawn_catalog_worker(source, internal_tx.clone());
    request_fetch(&fetch_tx);

    let latest = Rc::new(RefCell::new(controller.snapshot()));
    let _subscription = {
        let latest = Rc::clone(&latest);
        controller.subscribe(move |snapshot| *latest.borrow_mut() = snapshot.clone())
    };

    let mut view_data = ViewData::default();
    let mut result = Ok(());
    loop {
        process_internal_events(controller, &mut view_data, &internal_rx);

        let snapshot = latest.borrow().clone();
        clamp_cursor(&mut view_data, snapshot.rows.len());
        if let Err(error) = terminal.draw(|frame| render(frame, &snapshot, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key_event(controller, &mut view_data, &internal_tx, key) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Refresh => request_fetch(&fetch_tx),
                        KeyOutcome::Continue => {}
                    }
                }
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn spawn_catalog_worker<S>(mut source: S, internal_tx: Sender<InternalEvent>) -> Sender<()>
where
    S: CatalogSource + Send + 'static,
{
    let (request_tx, request_rx) = mpsc::channel::<()>();
    thread::spawn(move || {
        while request_rx.recv().is_ok() {
            let load = load_catalog(&mut source);
            if internal_tx.send(InternalEvent::CatalogLoaded(load)).is_err() {
                break;
            }
        }
    });
    request_tx
}

fn request_fetch(fetch_tx: &Sender<()>) {
    if fetch_tx.send(()).is_err() {
        tracing::warn!("catalog worker is gone; refresh ignored");
    }
}

fn process_internal_events(
    controller: &ScreenController,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::CatalogLoaded(load) => {
                controller.apply_catalog(load);
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

struct ToastNotifier<'a> {
    view_data: &'a mut ViewData,
    internal_tx: &'a Sender<InternalEvent>,
}

impl Notifier for ToastNotifier<'_> {
    fn notify(&mut self, kind: NoticeKind, title: &str, message: &str) {
        let text = match kind {
            NoticeKind::Success => format!("{title}: {message}"),
            NoticeKind::Error => format!("{} {title}: {message}", kind.as_str()),
        };
        emit_status(self.view_data, self.internal_tx, text);
    }
}

fn handle_key_event(
    controller: &ScreenController,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    if let Some(buffer) = view_data.search_input.as_mut() {
        match key.code {
            KeyCode::Esc => {
                view_data.search_input = None;
                controller.set_search("");
            }
            KeyCode::Enter => view_data.search_input = None,
            KeyCode::Backspace => {
                buffer.pop();
                controller.set_search(buffer.clone());
            }
            KeyCode::Char(ch) => {
                buffer.push(ch);
                controller.set_search(buffer.clone());
            }
            _ => {}
        }
        view_data.cursor = 0;
        return KeyOutcome::Continue;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return KeyOutcome::Continue;
    }

    let snapshot = controller.snapshot();
    let selected = snapshot
        .rows
        .get(view_data.cursor.min(snapshot.rows.len().saturating_sub(1)));

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            controller.toggle_tab();
            view_data.cursor = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.cursor = view_data.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_data.cursor = (view_data.cursor + 1).min(snapshot.rows.len().saturating_sub(1));
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Enter => {
            if let Some(row) = selected {
                row.on_add.run();
            }
        }
        KeyCode::Char('-') => {
            if let Some(row) = selected {
                row.on_remove.run();
            }
        }
        KeyCode::Char('a') => {
            if let Some(row) = selected {
                let mut notifier = ToastNotifier {
                    view_data,
                    internal_tx,
                };
                controller.quick_add(&row.item, &mut notifier);
            }
        }
        KeyCode::Char('c') if snapshot.categories_status != FetchStatus::Ready => {
            emit_status(view_data, internal_tx, "categories are not loaded yet");
        }
        KeyCode::Char('c') => {
            let next = next_category(&snapshot.categories, &snapshot.state.category);
            let label = category_label(&next).to_owned();
            controller.select_category(next);
            view_data.cursor = 0;
            emit_status(view_data, internal_tx, format!("category: {label}"));
        }
        KeyCode::Char('C') => {
            controller.clear_category();
            view_data.cursor = 0;
            emit_status(view_data, internal_tx, "category: all");
        }
        KeyCode::Char('/') => {
            view_data.search_input = Some(snapshot.state.search.clone());
        }
        KeyCode::Char('r') => {
            controller.begin_refresh();
            emit_status(view_data, internal_tx, "refreshing catalog");
            return KeyOutcome::Refresh;
        }
        KeyCode::Char('X') => {
            controller.cart().reset();
            emit_status(view_data, internal_tx, "cart cleared");
        }
        KeyCode::Char('?') => view_data.help_visible = true,
        _ => {}
    }
    KeyOutcome::Continue
}

fn next_category(categories: &[Category], current: &str) -> String {
    let next = match categories.iter().position(|category| category.name == current) {
        Some(index) => categories.get(index + 1),
        None if current.is_empty() => categories.first(),
        None => None,
    };
    next.map(|category| category.name.clone())
        .unwrap_or_default()
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "all" } else { category }
}

fn clamp_cursor(view_data: &mut ViewData, row_count: usize) {
    view_data.cursor = view_data.cursor.min(row_count.saturating_sub(1));
}

fn header_title(snapshot: &ScreenSnapshot) -> String {
    let units = snapshot.cart_units();
    let noun = if units == 1 { "item" } else { "items" };
    format!("storefront | cart: {units} {noun}")
}

fn tab_title(tab: CatalogTab, snapshot: &ScreenSnapshot) -> String {
    if snapshot.state.tab != tab {
        return format!(" {} ", tab.label());
    }
    match snapshot.feed_status {
        Some(FetchStatus::Loading) => format!(" {} ... ", tab.label()),
        Some(FetchStatus::Error) => format!(" {} ! ", tab.label()),
        _ => format!(" {} ", tab.label()),
    }
}

fn filter_text(snapshot: &ScreenSnapshot) -> String {
    let mut parts = vec![format!(
        "category: {}",
        category_label(&snapshot.state.category)
    )];
    if !snapshot.state.search.is_empty() {
        parts.push(format!("search: {}", snapshot.state.search));
    }
    if let Some(clock) = snapshot
        .refreshed_at
        .and_then(|at| at.format(CLOCK_FORMAT).ok())
    {
        parts.push(format!("refreshed {clock}"));
    }
    parts.join(" | ")
}

fn row_text(row: &RenderRow) -> String {
    let mut text = row.item.name.clone();
    let category = row.item.category.display();
    if !category.is_empty() {
        text.push_str(&format!("  [{category}]"));
    }
    if row.quantity > 0 {
        text.push_str(&format!("  x{}", row.quantity));
    }
    text
}

fn row_item(row: &RenderRow) -> ListItem<'static> {
    if !row.last {
        return ListItem::new(row_text(row));
    }
    ListItem::new(vec![
        Line::from(row_text(row)),
        Line::styled("end of list", Style::default().fg(Color::DarkGray)),
    ])
}

fn status_text(view_data: &ViewData, snapshot: &ScreenSnapshot) -> String {
    if view_data.help_visible {
        return String::new();
    }
    if let Some(buffer) = &view_data.search_input {
        return format!("SEARCH | /{buffer} | enter keep | esc clear");
    }

    let hints = format!(
        "tab switch | j/k move | +/- qty ({} in cart) | a quick add | c/C category | / search | r refresh | X reset | ? help | q quit",
        snapshot.cart_units()
    );
    match &view_data.status_line {
        Some(status) => format!("NAV | {status} | {hints}"),
        None => format!("NAV | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "tabs: tab/left/right switch products and services\n\
rows: j/k or up/down move | +/enter add one | - remove one | a quick add with confirmation\n\
filter: c next category | C all categories | / search by name (esc clears)\n\
cart: X empty the cart\n\
catalog: r refresh from the catalog service\n\
global: ? help | q/esc quit | ctrl+c quit"
}

fn empty_state_style(empty_state: &EmptyState) -> Style {
    match empty_state {
        EmptyState::Failed(_) => Style::default().fg(Color::Red),
        EmptyState::Loading => Style::default().fg(Color::DarkGray),
        EmptyState::Unavailable(_) | EmptyState::NoMatches => Style::default(),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, snapshot: &ScreenSnapshot, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected_tab = CatalogTab::ALL
        .iter()
        .position(|tab| *tab == snapshot.state.tab)
        .unwrap_or(0);
    let tab_titles = CatalogTab::ALL
        .iter()
        .map(|tab| tab_title(*tab, snapshot))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .title(header_title(snapshot))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected_tab);
    frame.render_widget(tabs, layout[0]);

    let filters = Paragraph::new(filter_text(snapshot)).style(Style::default().fg(Color::Gray));
    frame.render_widget(filters, layout[1]);

    let body_block = Block::default()
        .borders(Borders::ALL)
        .title(snapshot.state.tab.as_str());
    match &snapshot.empty_state {
        Some(empty_state) => {
            let body = Paragraph::new(empty_state.message())
                .style(empty_state_style(empty_state))
                .block(body_block);
            frame.render_widget(body, layout[2]);
        }
        None => {
            let items = snapshot
                .rows
                .iter()
                .map(row_item)
                .collect::<Vec<_>>();
            let list = List::new(items)
                .block(body_block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut list_state = ListState::default().with_selected(Some(view_data.cursor));
            frame.render_stateful_widget(list, layout[2], &mut list_state);
        }
    }

    let status = Paragraph::new(status_text(view_data, snapshot))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);

    if view_data.help_visible {
        let area = centered_rect(72, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        InternalEvent, KeyOutcome, ViewData, filter_text, handle_key_event, header_title,
        help_overlay_text, next_category, process_internal_events, render, row_item, row_text,
        spawn_catalog_worker, status_text, tab_title,
    };
    use anyhow::Result;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use std::time::Duration;
    use storefront_app::{
        CartStore, Catalog, CatalogLoad, CatalogTab, Category, CategoryId, Fetched, Item, ItemId,
        ScreenController, ScreenState,
    };
    use storefront_testkit::DemoCatalogSource;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
        }
    }

    fn produce_load() -> CatalogLoad {
        CatalogLoad {
            products: Fetched::Ready(vec![
                Item::new("a", "Kale", "veg"),
                Item::new("b", "Pear", "fruit"),
                Item::new("c", "Leek", "veg"),
            ]),
            services: None,
            categories: Fetched::Ready(vec![category("1", "veg"), category("2", "fruit")]),
        }
    }

    fn products_screen() -> ScreenController {
        let controller = ScreenController::new(
            CartStore::new(),
            Catalog::with_feeds(&[CatalogTab::Products]),
            ScreenState::default(),
        );
        controller.apply_catalog(produce_load());
        controller.select_tab(CatalogTab::Products);
        controller
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn tab_key_toggles_between_services_and_products() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData {
            cursor: 2,
            ..ViewData::default()
        };

        let outcome = handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Tab));
        assert_eq!(outcome, KeyOutcome::Continue);
        assert_eq!(controller.state().tab, CatalogTab::Services);
        assert_eq!(view_data.cursor, 0);

        let snapshot = controller.snapshot();
        assert!(snapshot.shows_unavailable_message());
        assert!(snapshot.rows.is_empty());
    }

    #[test]
    fn plus_and_minus_adjust_the_selected_row() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Down));
        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('+')));
        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Enter));
        assert_eq!(controller.quantity_of(&ItemId::new("b")), 2);

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('-')));
        assert_eq!(controller.quantity_of(&ItemId::new("b")), 1);
        assert_eq!(controller.quantity_of(&ItemId::new("a")), 0);
        assert_eq!(header_title(&controller.snapshot()), "storefront | cart: 1 item");
    }

    #[test]
    fn cursor_stops_at_the_last_row() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();
        for _ in 0..10 {
            handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('j')));
        }
        assert_eq!(view_data.cursor, 2);
        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Up));
        assert_eq!(view_data.cursor, 1);
    }

    #[test]
    fn quick_add_confirms_with_a_toast() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('a')));
        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('a')));

        assert_eq!(controller.quantity_of(&ItemId::new("a")), 2);
        assert_eq!(
            view_data.status_line.as_deref(),
            Some("Success: Kale added to cart")
        );
        assert_eq!(view_data.status_token, 2);
    }

    #[test]
    fn stale_clear_tokens_leave_the_status_alone() {
        let controller = products_screen();
        let (tx, rx) = mpsc::channel();
        let mut view_data = ViewData {
            status_line: Some("cart cleared".to_owned()),
            status_token: 2,
            ..ViewData::default()
        };

        tx.send(InternalEvent::ClearStatus { token: 1 })
            .expect("send clear");
        process_internal_events(&controller, &mut view_data, &rx);
        assert!(view_data.status_line.is_some());

        tx.send(InternalEvent::ClearStatus { token: 2 })
            .expect("send clear");
        process_internal_events(&controller, &mut view_data, &rx);
        assert_eq!(view_data.status_line, None);
    }

    #[test]
    fn catalog_loads_are_applied_to_the_controller() {
        let controller = ScreenController::new(
            CartStore::new(),
            Catalog::with_feeds(&[CatalogTab::Products]),
            ScreenState::default(),
        );
        controller.select_tab(CatalogTab::Products);
        assert!(controller.snapshot().rows.is_empty());

        let (tx, rx) = mpsc::channel();
        tx.send(InternalEvent::CatalogLoaded(produce_load()))
            .expect("send load");
        process_internal_events(&controller, &mut ViewData::default(), &rx);
        assert_eq!(controller.snapshot().rows.len(), 3);
    }

    #[test]
    fn search_prompt_narrows_rows_as_you_type() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('/')));
        for ch in "le".chars() {
            handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char(ch)));
        }
        let names: Vec<String> = controller
            .snapshot()
            .rows
            .iter()
            .map(|row| row.item.name.clone())
            .collect();
        assert_eq!(names, vec!["Kale".to_owned(), "Leek".to_owned()]);
        assert!(status_text(&view_data, &controller.snapshot()).starts_with("SEARCH | /le"));

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Esc));
        assert_eq!(view_data.search_input, None);
        assert_eq!(controller.snapshot().rows.len(), 3);
    }

    #[test]
    fn category_keys_cycle_and_clear() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('c')));
        assert_eq!(controller.state().category, "veg");
        assert_eq!(controller.snapshot().rows.len(), 2);

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('c')));
        assert_eq!(controller.state().category, "fruit");
        assert_eq!(view_data.status_line.as_deref(), Some("category: fruit"));

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('C')));
        assert_eq!(controller.state().category, "");
        assert_eq!(controller.snapshot().rows.len(), 3);
    }

    #[test]
    fn category_key_keeps_selection_while_categories_reload() {
        let controller = products_screen();
        controller.select_category("veg");
        controller.begin_refresh();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('c')));
        assert_eq!(controller.state().category, "veg");
        assert_eq!(
            view_data.status_line.as_deref(),
            Some("categories are not loaded yet")
        );

        controller.apply_catalog(produce_load());
        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('c')));
        assert_eq!(controller.state().category, "fruit");
    }

    #[test]
    fn next_category_wraps_to_unfiltered() {
        let categories = [category("1", "veg"), category("2", "fruit")];
        assert_eq!(next_category(&categories, ""), "veg");
        assert_eq!(next_category(&categories, "veg"), "fruit");
        assert_eq!(next_category(&categories, "fruit"), "");
        assert_eq!(next_category(&categories, "dairy"), "");
        assert_eq!(next_category(&[], ""), "");
    }

    #[test]
    fn refresh_key_requests_a_fetch_and_shows_loading() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        let outcome = handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('r')));
        assert_eq!(outcome, KeyOutcome::Refresh);

        let snapshot = controller.snapshot();
        assert!(snapshot.rows.is_empty());
        assert_eq!(tab_title(CatalogTab::Products, &snapshot), " Products ... ");
    }

    #[test]
    fn reset_key_empties_the_cart() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();
        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('+')));
        assert_eq!(controller.snapshot().cart_units(), 1);

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('X')));
        assert_eq!(controller.snapshot().cart_units(), 0);
    }

    #[test]
    fn quit_keys_end_the_loop_but_not_inside_search() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('/')));
        let typed = handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('q')));
        assert_eq!(typed, KeyOutcome::Continue);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            handle_key_event(&controller, &mut view_data, &tx, ctrl_c),
            KeyOutcome::Quit
        );
        view_data.search_input = None;
        assert_eq!(
            handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('q'))),
            KeyOutcome::Quit
        );
    }

    #[test]
    fn help_overlay_swallows_keys_until_closed() {
        let controller = products_screen();
        let (tx, _rx) = mpsc::channel();
        let mut view_data = ViewData::default();

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('?')));
        assert!(view_data.help_visible);
        assert_eq!(status_text(&view_data, &controller.snapshot()), "");

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Char('+')));
        assert_eq!(controller.snapshot().cart_units(), 0);

        handle_key_event(&controller, &mut view_data, &tx, key(KeyCode::Esc));
        assert!(!view_data.help_visible);
        assert!(help_overlay_text().contains("quick add"));
    }

    #[test]
    fn row_and_filter_text_show_quantity_and_selection() {
        let controller = products_screen();
        controller.add_item(&ItemId::new("a"));
        controller.add_item(&ItemId::new("a"));
        controller.select_category("veg");
        controller.set_search("ka");

        let snapshot = controller.snapshot();
        assert_eq!(row_text(&snapshot.rows[0]), "Kale  [veg]  x2");

        let filters = filter_text(&snapshot);
        assert!(filters.starts_with("category: veg | search: ka | refreshed "));
    }

    #[test]
    fn only_the_last_row_carries_the_end_marker() {
        let controller = products_screen();
        let snapshot = controller.snapshot();
        let heights: Vec<usize> = snapshot
            .rows
            .iter()
            .map(|row| row_item(row).height())
            .collect();
        assert_eq!(heights, vec![1, 1, 2]);
    }

    #[test]
    fn status_text_prefixes_the_toast() {
        let controller = products_screen();
        let view_data = ViewData {
            status_line: Some("cart cleared".to_owned()),
            ..ViewData::default()
        };
        let status = status_text(&view_data, &controller.snapshot());
        assert!(status.starts_with("NAV | cart cleared | tab switch"));
        assert!(status.contains("(0 in cart)"));
    }

    #[test]
    fn catalog_worker_serves_each_request() -> Result<()> {
        let (tx, rx) = mpsc::channel();
        let fetch_tx = spawn_catalog_worker(DemoCatalogSource::demo(), tx);

        fetch_tx.send(())?;
        fetch_tx.send(())?;
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5))? {
                InternalEvent::CatalogLoaded(load) => {
                    assert!(load.products.ready().is_some());
                    assert!(load.services.is_some());
                }
                other => panic!("expected a catalog load, got {other:?}"),
            }
        }
        Ok(())
    }

    #[test]
    fn render_shows_unavailable_copy_for_services() -> Result<()> {
        let controller = ScreenController::new(
            CartStore::new(),
            Catalog::with_feeds(&[CatalogTab::Products]),
            ScreenState::default(),
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 12))?;
        let snapshot = controller.snapshot();
        terminal.draw(|frame| render(frame, &snapshot, &ViewData::default()))?;

        let text = screen_text(&terminal);
        assert!(text.contains("No services are available at your location"));
        assert!(text.contains("storefront | cart: 0 items"));
        Ok(())
    }

    #[test]
    fn render_lists_rows_with_quantities() -> Result<()> {
        let controller = products_screen();
        controller.add_item(&ItemId::new("c"));
        let mut terminal = Terminal::new(TestBackend::new(80, 12))?;
        let snapshot = controller.snapshot();
        terminal.draw(|frame| render(frame, &snapshot, &ViewData::default()))?;

        let text = screen_text(&terminal);
        assert!(text.contains("> Kale  [veg]"));
        assert!(text.contains("Leek  [veg]  x1"));
        Ok(())
    }
}
