// src/main.rs
use chrono::NaiveDate;
use iced::alignment::Horizontal;
use iced::theme;
use iced::widget::{
    button, container, pick_list, scrollable, text, text_input, Column, Row, Space,
};
use iced::{
    executor, Alignment, Application, Background, Color, Command, Element, Length, Subscription,
    Theme,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use outreach_report::loader::{load_sheet, open_workbook};
use outreach_report::report::{full_report, no_reminders_report};
use outreach_report::{
    by_exact_date, by_reminder_presence, process_sheet_with, DateField, FilterResult,
    OutreachTable, RawSheet, Settings, SheetRequest, Summary, TableData, Workbook,
};

mod ui;

use ui::{Styles, DARK_THEME, LIGHT_THEME};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const FILE_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("outreach_report=info")),
        )
        .init();

    let config = match Settings::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "could not load settings, using defaults");
            Settings::default()
        }
    };

    let mut settings = iced::Settings::with_flags(config.clone());
    settings.window.size = (config.window_width, config.window_height);
    OutreachReport::run(settings)
}

struct OutreachReport {
    settings: Settings,
    is_dark_mode: bool,
    pending_file: Option<PathBuf>,
    workbook: Option<Workbook>,
    selected_sheet: Option<String>,
    raw_sheet: Option<RawSheet>,
    load_error: Option<String>,
    date_input: String,
    // Set on submit, so half-typed input is never flagged
    date_filter: Option<Result<NaiveDate, String>>,
    selected_field: DateField,
    last_check: Instant,
    last_modified: Option<SystemTime>,
}

#[derive(Debug, Clone)]
enum Message {
    ToggleTheme,
    OpenFile,
    FileSelected(Option<PathBuf>),
    WorkbookOpened(PathBuf, Result<Workbook, String>),
    SheetSelected(String),
    SheetLoaded(SheetRequest, Result<RawSheet, String>),
    DateInput(String),
    DateSubmitted,
    FieldSelected(DateField),
    CheckForUpdates,
}

impl Application for OutreachReport {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Settings;

    fn new(settings: Settings) -> (Self, Command<Message>) {
        (
            OutreachReport {
                is_dark_mode: settings.dark_mode,
                settings,
                pending_file: None,
                workbook: None,
                selected_sheet: None,
                raw_sheet: None,
                load_error: None,
                date_input: String::new(),
                date_filter: None,
                selected_field: DateField::FirstEmailDate,
                last_check: Instant::now(),
                last_modified: None,
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        match &self.selected_sheet {
            Some(sheet) => format!("Outreach Report v{} - {}", VERSION, sheet),
            None => format!("Outreach Report v{}", VERSION),
        }
    }

    fn theme(&self) -> Theme {
        if self.is_dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                Command::none()
            }

            Message::OpenFile => Command::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .add_filter("Spreadsheets", &FILE_EXTENSIONS)
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::FileSelected,
            ),

            Message::FileSelected(Some(path)) => {
                self.pending_file = Some(path.clone());
                Command::perform(
                    async move {
                        let result = open_workbook(path.clone()).await.map_err(|e| e.to_string());
                        (path, result)
                    },
                    |(path, result)| Message::WorkbookOpened(path, result),
                )
            }
            Message::FileSelected(None) => Command::none(),

            Message::WorkbookOpened(path, _) if self.pending_file.as_ref() != Some(&path) => {
                info!(path = %path.display(), "ignoring superseded file");
                Command::none()
            }
            Message::WorkbookOpened(_, Ok(workbook)) => {
                self.pending_file = None;
                self.last_modified = file_modified(&workbook.path);
                info!(path = %workbook.path.display(), sheets = workbook.sheet_names.len(), "opened file");
                self.selected_sheet = workbook.sheet_names.first().cloned();
                self.workbook = Some(workbook);
                self.raw_sheet = None;
                self.load_error = None;
                self.load_current_sheet()
            }
            Message::WorkbookOpened(_, Err(e)) => {
                self.pending_file = None;
                error!(error = %e, "could not open file");
                self.load_error = Some(e);
                Command::none()
            }

            Message::SheetSelected(sheet) => {
                self.selected_sheet = Some(sheet);
                self.raw_sheet = None;
                self.load_current_sheet()
            }

            Message::SheetLoaded(request, _)
                if !request.is_current(self.workbook.as_ref(), self.selected_sheet.as_deref()) =>
            {
                info!(sheet = %request.sheet, "ignoring stale sheet load");
                Command::none()
            }
            Message::SheetLoaded(_, Ok(raw)) => {
                self.raw_sheet = Some(raw);
                self.load_error = None;
                Command::none()
            }
            Message::SheetLoaded(_, Err(e)) => {
                error!(error = %e, "could not read sheet");
                self.load_error = Some(e);
                Command::none()
            }

            Message::DateInput(value) => {
                self.date_input = value;
                Command::none()
            }

            Message::DateSubmitted => {
                let input = self.date_input.trim();
                self.date_filter = if input.is_empty() {
                    None
                } else {
                    Some(
                        self.settings
                            .date_parser()
                            .parse_date(input)
                            .ok_or_else(|| input.to_string()),
                    )
                };
                Command::none()
            }

            Message::FieldSelected(field) => {
                self.selected_field = field;
                Command::none()
            }

            Message::CheckForUpdates => {
                if self.last_check.elapsed() < self.settings.refresh_interval() {
                    return Command::none();
                }
                self.last_check = Instant::now();

                let modified = self.workbook.as_ref().and_then(|wb| file_modified(&wb.path));
                match (modified, self.last_modified) {
                    (Some(now), Some(before)) if now > before => {
                        self.last_modified = Some(now);
                        info!("file changed on disk, reloading");
                        return self.load_current_sheet();
                    }
                    (Some(now), None) => self.last_modified = Some(now),
                    _ => {}
                }
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(Duration::from_secs(1)).map(|_| Message::CheckForUpdates)
    }

    fn view(&self) -> Element<Message> {
        let styles = self.styles();

        let mut content = Column::new().spacing(16).padding(20).push(self.toolbar(styles));

        if let Some(e) = &self.load_error {
            content = content.push(message_text(e, styles.error_fg));
        }

        // Rebuilt from the raw sheet on every render
        let parser = self.settings.date_parser();
        content = match self.raw_sheet.as_ref().map(|raw| process_sheet_with(raw, &parser)) {
            Some(Ok(table)) => content.push(self.report_view(&table, styles)),
            Some(Err(e)) => content.push(message_text(e, styles.error_fg)),
            None if self.workbook.is_none() => content.push(message_text(
                "Please upload your Excel file to get started.",
                styles.muted_fg,
            )),
            None => content.push(message_text("Loading sheet...", styles.muted_fg)),
        };

        let footer = Row::new()
            .push(
                text(format!("Outreach Report v{}", VERSION))
                    .size(14)
                    .style(styles.footer_fg),
            )
            .push(Space::with_width(Length::Fill))
            .push(footer_button("Open File", Message::OpenFile, styles))
            .push(footer_button("Theme", Message::ToggleTheme, styles))
            .spacing(10)
            .padding(10)
            .align_items(Alignment::Center);

        let main_content = Column::new()
            .push(scrollable(content).height(Length::Fill))
            .push(
                container(footer)
                    .width(Length::Fill)
                    .style(theme::Container::Custom(Box::new(ContainerStyle {
                        bg: styles.footer_bg,
                        fg: styles.footer_fg,
                    }))),
            );

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::Container::Custom(Box::new(ContainerStyle {
                bg: styles.bg,
                fg: styles.fg,
            })))
            .into()
    }
}

impl OutreachReport {
    fn styles(&self) -> &'static Styles {
        if self.is_dark_mode {
            &DARK_THEME
        } else {
            &LIGHT_THEME
        }
    }

    fn load_current_sheet(&self) -> Command<Message> {
        let (Some(workbook), Some(sheet)) = (self.workbook.clone(), self.selected_sheet.clone())
        else {
            return Command::none();
        };
        let request = SheetRequest::new(&workbook, sheet.as_str());

        Command::perform(
            async move {
                let result = load_sheet(&workbook, &sheet).await.map_err(|e| e.to_string());
                (request, result)
            },
            |(request, result)| Message::SheetLoaded(request, result),
        )
    }

    fn toolbar(&self, styles: &Styles) -> Element<Message> {
        let mut toolbar = Row::new().spacing(12).align_items(Alignment::Center);

        if let Some(workbook) = &self.workbook {
            toolbar = toolbar
                .push(text("Sheet").style(styles.fg))
                .push(pick_list(
                    workbook.sheet_names.as_slice(),
                    self.selected_sheet.clone(),
                    Message::SheetSelected,
                ));
        }

        toolbar
            .push(text("Date").style(styles.fg))
            .push(
                text_input("YYYY-MM-DD", &self.date_input)
                    .on_input(Message::DateInput)
                    .on_submit(Message::DateSubmitted)
                    .padding(8)
                    .width(Length::Fixed(180.0)),
            )
            .push(text("Reminder Type").style(styles.fg))
            .push(pick_list(
                DateField::ALL.to_vec(),
                Some(self.selected_field),
                Message::FieldSelected,
            ))
            .into()
    }

    fn report_view(&self, table: &OutreachTable, styles: &Styles) -> Element<Message> {
        let summary = Summary::of(table);
        let sheet = self.selected_sheet.clone().unwrap_or_default();

        let mut view = Column::new().spacing(12);

        view = view.push(section_title("Filter by Specific Date", styles));
        view = match &self.date_filter {
            Some(Ok(date)) => {
                let date = *date;
                view.push(text(format!("Contacts Interacted on {}", date)).style(styles.fg))
                    .push(filter_view(
                        by_exact_date(table, date),
                        "No contacts found with activity on this date.",
                        styles,
                    ))
            }
            None => view.push(message_text(
                "Enter a date and press Enter to filter outreach activity.",
                styles.muted_fg,
            )),
            Some(Err(input)) => view.push(message_text(
                format!("'{}' is not a date.", input),
                styles.error_fg,
            )),
        };

        let field = self.selected_field;
        view = view
            .push(section_title("Filter by Specific Reminder Sent", styles))
            .push(text(format!("Contacts with {} Sent", field)).style(styles.fg))
            .push(filter_view(
                by_reminder_presence(table, field),
                &format!("No records found with {} sent.", field),
                styles,
            ));

        view = view
            .push(section_title("Outreach Summary", styles))
            .push(text(format!("Sheet: {}", sheet)).style(styles.fg))
            .push(text(format!("Total Contacts: {}", summary.total_contacts)).style(styles.fg))
            .push(
                text(format!("Latest Outreach Date: {}", summary.latest_activity_label()))
                    .style(styles.fg),
            )
            .push(
                text(format!("Contacts With No Reminders: {}", summary.without_reminders))
                    .style(styles.fg),
            );

        view.push(section_title("Full Outreach Report", styles))
            .push(render_table(&full_report(table), styles))
            .push(section_title("Contacts Without Reminders", styles))
            .push(render_table(&no_reminders_report(table), styles))
            .into()
    }
}

fn file_modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn section_title<'a>(title: &str, styles: &Styles) -> Element<'a, Message> {
    text(title).size(22).style(styles.fg).into()
}

fn message_text<'a>(message: impl ToString, color: Color) -> Element<'a, Message> {
    text(message).size(16).style(color).into()
}

fn filter_view<'a>(result: FilterResult, empty_message: &str, styles: &Styles) -> Element<'a, Message> {
    match result {
        FilterResult::Matches(table) => render_table(&full_report(&table), styles),
        FilterResult::NoMatches => message_text(empty_message, styles.muted_fg),
    }
}

fn render_table<'a>(data: &TableData, styles: &Styles) -> Element<'a, Message> {
    let header = Row::with_children(
        data.headers
            .iter()
            .map(|header| table_cell(header, styles.header_fg, styles.header_bg))
            .collect(),
    )
    .spacing(1);

    let rows: Vec<Element<'a, Message>> = data
        .rows
        .iter()
        .map(|row| {
            Row::with_children(
                row.iter()
                    .map(|cell| table_cell(cell, styles.fg, styles.row_bg))
                    .collect(),
            )
            .spacing(1)
            .into()
        })
        .collect();

    Column::new()
        .push(header)
        .push(Column::with_children(rows).spacing(1))
        .spacing(1)
        .into()
}

fn table_cell<'a>(content: &str, fg: Color, bg: Color) -> Element<'a, Message> {
    container(text(content).size(15).style(fg))
        .width(Length::Fill)
        .padding(5)
        .style(theme::Container::Custom(Box::new(ContainerStyle { bg, fg })))
        .into()
}

fn footer_button<'a>(label: &str, message: Message, styles: &Styles) -> Element<'a, Message> {
    button(
        text(label)
            .horizontal_alignment(Horizontal::Center)
            .size(16),
    )
    .on_press(message)
    .padding(8)
    .style(theme::Button::Custom(Box::new(ButtonStyle {
        bg: styles.footer_bg,
        fg: styles.footer_fg,
        hover_bg: Color::from_rgb(0.0, 0.26, 0.5),
    })))
    .into()
}

// Custom styles for containers and buttons
struct ContainerStyle {
    bg: Color,
    fg: Color,
}

impl container::StyleSheet for ContainerStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(self.bg)),
            text_color: Some(self.fg),
            ..Default::default()
        }
    }
}

struct ButtonStyle {
    bg: Color,
    fg: Color,
    hover_bg: Color,
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.bg)),
            border_radius: 4.0.into(),
            text_color: self.fg,
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover_bg)),
            ..self.active(style)
        }
    }
}
