use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use demo_trio::{
    BossEstimate, BossOdds, Category, EmailForm, FightQuery, ListEditor, ListField, ScoringPolicy,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Email,
    LinkedList,
    BossFight,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Email, Page::LinkedList, Page::BossFight];

    pub fn next(&self) -> Self {
        match self {
            Page::Email => Page::LinkedList,
            Page::LinkedList => Page::BossFight,
            Page::BossFight => Page::Email,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Email => Page::BossFight,
            Page::LinkedList => Page::Email,
            Page::BossFight => Page::LinkedList,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Email => "Email",
            Page::LinkedList => "Linked List",
            Page::BossFight => "Boss Fight",
        }
    }
}

// ============================================================================
// BOSS PAGE STATE
// ============================================================================

pub struct BossPage {
    pub odds: BossOdds,
    pub query: FightQuery,
    pub policy: ScoringPolicy,
    pub focus: Category,
    pub source: String,
    pub table_state: TableState,
}

impl BossPage {
    pub fn new(odds: BossOdds, query: FightQuery, policy: ScoringPolicy, source: String) -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            odds,
            query,
            policy,
            focus: Category::Suit,
            source,
            table_state,
        }
    }

    fn focus_index(&self) -> usize {
        Category::ALL
            .iter()
            .position(|c| *c == self.focus)
            .unwrap_or(0)
    }

    pub fn next_category(&mut self) {
        let i = (self.focus_index() + 1) % Category::ALL.len();
        self.focus = Category::ALL[i];
        self.table_state.select(Some(i));
    }

    pub fn previous_category(&mut self) {
        let len = Category::ALL.len();
        let i = (self.focus_index() + len - 1) % len;
        self.focus = Category::ALL[i];
        self.table_state.select(Some(i));
    }

    /// Step the focused selector through its domain, wrapping around
    pub fn cycle_value(&mut self, forward: bool) {
        let domain = self.focus.domain();
        let current = domain
            .iter()
            .position(|v| *v == self.query.value(self.focus))
            .unwrap_or(0);
        let i = if forward {
            (current + 1) % domain.len()
        } else {
            (current + domain.len() - 1) % domain.len()
        };
        self.query.set(self.focus, domain[i]);
    }

    pub fn toggle_policy(&mut self) {
        self.policy = self.policy.toggle();
    }

    pub fn estimate(&self) -> Option<BossEstimate> {
        self.odds.estimate(&self.query, self.policy)
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub current_page: Page,
    pub email: EmailForm,
    pub list: ListEditor,
    pub list_focus: ListField,
    pub boss: BossPage,
}

impl App {
    pub fn new(boss: BossPage) -> Self {
        Self {
            current_page: Page::Email,
            email: EmailForm::new(),
            list: ListEditor::new(),
            list_focus: ListField::Add,
            boss,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// Apply one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::BackTab => {
                self.previous_page();
                return false;
            }
            KeyCode::Tab => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_page();
                } else {
                    self.next_page();
                }
                return false;
            }
            _ => {}
        }

        match self.current_page {
            Page::Email => self.handle_email_key(code),
            Page::LinkedList => self.handle_list_key(code),
            Page::BossFight => return self.handle_boss_key(code),
        }

        false
    }

    fn handle_email_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.email.push(c),
            KeyCode::Backspace => self.email.pop(),
            KeyCode::Enter => {
                if let Some(email) = self.email.submit() {
                    info!(email, "email accepted");
                }
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Down => self.list_focus = self.list_focus.toggle(),
            KeyCode::Char(c) => self.list.input_mut(self.list_focus).push(c),
            KeyCode::Backspace => {
                self.list.input_mut(self.list_focus).pop();
            }
            KeyCode::Enter => {
                self.list.submit(self.list_focus);
            }
            _ => {}
        }
    }

    fn handle_boss_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.boss.next_category(),
            KeyCode::Up | KeyCode::Char('k') => self.boss.previous_category(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => self.boss.cycle_value(true),
            KeyCode::Left | KeyCode::Char('h') => self.boss.cycle_value(false),
            KeyCode::Char('p') => self.boss.toggle_policy(),
            _ => {}
        }
        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Email => render_email(f, chunks[1], app),
        Page::LinkedList => render_list(f, chunks[1], app),
        Page::BossFight => render_boss(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Fights: {}", app.boss.odds.model().total),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("✓ {}", app.boss.odds.model().wins),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("✗ {}", app.boss.odds.model().losses),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn input_box<'a>(title: &'a str, value: &'a str, border: Color) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![Span::raw(value), Span::styled("▏", Style::default().fg(border))])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    )
}

fn render_email(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Messages
        ])
        .split(area);

    let border = if app.email.error.is_some() {
        Color::Red
    } else {
        Color::White
    };
    f.render_widget(input_box(" Email Address ", &app.email.value, border), chunks[0]);

    let mut lines = vec![Line::from("")];
    if let Some(error) = &app.email.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(submitted) = &app.email.submitted {
        lines.push(Line::from(Span::styled(
            format!("  Form submitted with email: {}", submitted),
            Style::default().fg(Color::Green),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press Enter to submit",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Validation ")),
        chunks[1],
    );
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Add input
            Constraint::Length(3), // Threshold input
            Constraint::Min(0),    // Current list
        ])
        .split(area);

    let focus_color = |field: ListField| {
        if app.list_focus == field {
            Color::Yellow
        } else {
            Color::White
        }
    };

    f.render_widget(
        input_box(" Enter number to add ", &app.list.add_input, focus_color(ListField::Add)),
        chunks[0],
    );
    f.render_widget(
        input_box(
            " Remove greater than... ",
            &app.list.threshold_input,
            focus_color(ListField::Threshold),
        ),
        chunks[1],
    );

    let content = if app.list.list.is_empty() {
        vec![Line::from(Span::styled(
            "  List is empty.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        let mut spans = vec![Span::raw("  ")];
        for (i, value) in app.list.list.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" → ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!(" {} ", value),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
        }
        vec![Line::from(spans)]
    };

    f.render_widget(
        Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Current Linked List ({}) ", app.list.list.len())),
        ),
        chunks[2],
    );
}

fn render_boss(f: &mut Frame, area: Rect, app: &mut App) {
    let estimate = match app.boss.estimate() {
        Some(estimate) => estimate,
        None => {
            let empty = Paragraph::new(format!("No data found in {}", app.boss.source))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Boss Win Probability "));
            f.render_widget(empty, area);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Selectors
            Constraint::Min(0),    // Probability
        ])
        .split(area);

    let header_cells = ["Category", "Pick", "Wins", "Fights", "Win Rate"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = Category::ALL.iter().map(|category| {
        let stats = estimate.stats(*category);
        Row::new(vec![
            Cell::from(category.name()),
            Cell::from(format!("◀ {} ▶", estimate.query.value(*category))),
            Cell::from(stats.wins.to_string()),
            Cell::from(stats.total.to_string()),
            Cell::from(format!("{:.1}%", stats.prob * 100.0)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Picks "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[0], &mut app.boss.table_state);

    let label = match estimate.policy {
        ScoringPolicy::Multiplicative => "Overall probability (multiplicative score)",
        ScoringPolicy::FieldAverage => "Overall probability (average of the three percentages)",
    };

    let color = if estimate.probability >= 0.5 {
        Color::Green
    } else {
        Color::Red
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled(
            estimate.percent(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ];

    f.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Boss Win Probability ")),
        chunks[1],
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.current_page.title()),
        Style::default().fg(Color::Cyan),
    )];
    status_spans.push(Span::raw(" | "));

    match app.current_page {
        Page::Email => {
            status_spans.push(key("Enter"));
            status_spans.push(Span::raw(" Submit | "));
        }
        Page::LinkedList => {
            status_spans.push(key("↑/↓"));
            status_spans.push(Span::raw(" Field | "));
            status_spans.push(key("Enter"));
            status_spans.push(Span::raw(" Apply | "));
        }
        Page::BossFight => {
            status_spans.push(key("↑/↓"));
            status_spans.push(Span::raw(" Category | "));
            status_spans.push(key("←/→"));
            status_spans.push(Span::raw(" Pick | "));
            status_spans.push(key("p"));
            status_spans.push(Span::raw(format!(" Policy ({}) | ", app.boss.policy.name())));
        }
    }

    status_spans.push(key("Tab"));
    status_spans.push(Span::raw(" Page | "));
    // Text inputs on the other pages consume 'q'
    if app.current_page == Page::BossFight {
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw("/"));
    }
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo_trio::FightRecord;

    fn test_app(records: Vec<FightRecord>) -> App {
        let boss = BossPage::new(
            BossOdds::new(records),
            FightQuery::default(),
            ScoringPolicy::Multiplicative,
            "game_history.csv".to_string(),
        );
        App::new(boss)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_page_cycle() {
        let mut app = test_app(Vec::new());
        assert_eq!(app.current_page, Page::Email);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::LinkedList);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::BossFight);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::Email);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_page, Page::BossFight);
    }

    #[test]
    fn test_typing_q_in_email_does_not_quit() {
        let mut app = test_app(Vec::new());
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.email.value, "q");
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_email_submit_flow() {
        let mut app = test_app(Vec::new());
        for c in "abc".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.email.error.is_some());

        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "ab@cd.com".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(app.email.error.is_none());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.email.submitted.as_deref(), Some("ab@cd.com"));
    }

    #[test]
    fn test_list_page_flow() {
        let mut app = test_app(Vec::new());
        app.current_page = Page::LinkedList;

        for value in ["5", "1", "9", "3"] {
            for c in value.chars() {
                press(&mut app, KeyCode::Char(c));
            }
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.list.list.to_vec(), vec![5, 1, 9, 3]);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_focus, ListField::Threshold);
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.list.list.to_vec(), vec![1, 3]);
    }

    #[test]
    fn test_boss_selectors() {
        let mut app = test_app(vec![FightRecord::new("Hearts", "Lion", "Mango", true)]);
        app.current_page = Page::BossFight;

        let estimate = app.boss.estimate().unwrap();
        assert_eq!(estimate.probability, 1.0);

        // Hearts -> Spades
        press(&mut app, KeyCode::Right);
        assert_eq!(app.boss.query.suit, "Spades");
        // Spades -> Hearts -> Diamonds wraps backwards
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.boss.query.suit, "Diamonds");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.boss.query.suit, "Joker");

        press(&mut app, KeyCode::Down);
        assert_eq!(app.boss.focus, Category::Animal);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.boss.focus, Category::Fruit);

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.boss.policy, ScoringPolicy::FieldAverage);

        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_status_bar_lists_q_only_on_boss_page() {
        use ratatui::backend::TestBackend;

        let mut app = test_app(Vec::new());
        let mut terminal = Terminal::new(TestBackend::new(120, 3)).unwrap();

        let render = |terminal: &mut Terminal<TestBackend>, app: &App| {
            terminal
                .draw(|f| render_status_bar(f, f.size(), app))
                .unwrap();
            let buffer = terminal.backend().buffer().clone();
            (0..buffer.area.width)
                .map(|x| buffer.get(x, 1).symbol().to_string())
                .collect::<String>()
        };

        let line = render(&mut terminal, &app);
        assert!(line.contains("Esc Quit"));
        assert!(!line.contains("q/Esc"));

        app.current_page = Page::BossFight;
        let line = render(&mut terminal, &app);
        assert!(line.contains("q/Esc Quit"));
    }

    #[test]
    fn test_boss_without_data() {
        let app = test_app(Vec::new());
        assert!(app.boss.estimate().is_none());
    }
}
