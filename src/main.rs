#![windows_subsystem = "windows"]

mod chart;
mod logger;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use iced::{Element, Task};

fn main() -> ExitCode {
    if let Err(err) = logger::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to initialize logger: {err}");
        return ExitCode::FAILURE;
    }

    let mut args = std::env::args_os().skip(1);

    let Some(bars_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: candleview <bars.csv> [config.json]");
        return ExitCode::FAILURE;
    };
    let config_path = args
        .next()
        .map_or_else(|| PathBuf::from(data::config::CONFIG_FILE), PathBuf::from);

    let config = data::config::load(&config_path).unwrap_or_else(|err| {
        log::error!("Failed to load config {}: {err}", config_path.display());
        data::ChartConfig::default()
    });

    let series = match data::loader::load(&bars_path) {
        Ok(series) => series,
        Err(err) => {
            log::error!("Failed to load bars {}: {err}", bars_path.display());
            eprintln!("Failed to load {}: {err}", bars_path.display());
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Loaded {} bars from {}",
        series.len(),
        bars_path.display()
    );

    let title = match bars_path.file_name() {
        Some(name) => format!("Candleview - {}", name.to_string_lossy()),
        None => "Candleview".to_string(),
    };
    let chart = data::Chart::new(series, config);

    let result = iced::application(
        move || App::new(title.clone(), chart.clone()),
        App::update,
        App::view,
    )
    .title(App::title)
    .window_size((1200.0, 800.0))
    .antialiasing(true)
    .run();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Application error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone)]
enum Message {
    Chart(chart::Message),
}

struct App {
    title: String,
    chart: chart::KlineChart,
}

impl App {
    fn new(title: String, chart: data::Chart) -> Self {
        Self {
            title,
            chart: chart::KlineChart::new(chart),
        }
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Chart(message) => self.chart.update(message),
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        self.chart.view().map(Message::Chart)
    }
}
