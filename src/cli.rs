//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_dashboard::HtmlDashboardWriter;
use crate::adapters::svg_chart::SvgChartRenderer;
use crate::domain::config_validation::{
    parse_as_of, validate_chart_config, validate_dashboard_config, validate_data_config,
    DEFAULT_CHART_WIDTH,
};
use crate::domain::controller::DashboardController;
use crate::domain::dashboard::compute_dashboard;
use crate::domain::error::DashboardError;
use crate::domain::parameters::{DashboardParameters, ParameterChange};
use crate::domain::ticker::{Ticker, TickerCatalog};
use crate::ports::chart_port::ChartRenderer;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSeriesProvider;

const DEFAULT_TICKER: &str = "ASELS.IS";

#[derive(Parser, Debug)]
#[command(name = "tickerdash", about = "Stock price dashboard with RSI and MACD")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the dashboard once to an HTML file
    Render {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        compare: Option<String>,
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        theme: Option<String>,
    },
    /// Read `key=value` parameter changes from stdin and re-render after each
    Session {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
    },
    /// List configured tickers and whether price data exists for them
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Render {
            config,
            output,
            ticker,
            compare,
            period,
            theme,
        } => {
            let mut overrides = Vec::new();
            overrides.extend(ticker.map(ParameterChange::Primary));
            overrides.extend(compare.map(|c| {
                ParameterChange::Secondary(Some(c).filter(|c| !c.trim().is_empty()))
            }));
            overrides.extend(period.map(ParameterChange::Lookback));
            overrides.extend(theme.map(ParameterChange::Theme));
            run_render(&config, &output, &overrides)
        }
        Command::Session { config, output } => run_session(&config, &output),
        Command::ListTickers { config } => run_list_tickers(&config),
    }
}

/// Everything the dashboard needs from the config file, validated.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub data_path: PathBuf,
    pub as_of: Option<NaiveDate>,
    pub catalog: TickerCatalog,
    pub parameters: DashboardParameters,
    pub chart_width: u32,
}

impl DashboardSettings {
    pub fn provider(&self) -> CsvAdapter {
        let adapter = CsvAdapter::new(self.data_path.clone());
        match self.as_of {
            Some(as_of) => adapter.with_as_of(as_of),
            None => adapter,
        }
    }

    pub fn writer(&self) -> HtmlDashboardWriter<SvgChartRenderer> {
        HtmlDashboardWriter::new(SvgChartRenderer::new(self.chart_width))
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DashboardError> {
    FileConfigAdapter::from_file(path).map_err(|e| DashboardError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<DashboardSettings, DashboardError> {
    validate_data_config(config)?;
    let catalog = TickerCatalog::from_config(config)?;
    validate_dashboard_config(config, &catalog)?;
    validate_chart_config(config)?;

    let data_path = config
        .get_string("data", "path")
        .map(|p| PathBuf::from(p.trim()))
        .ok_or_else(|| DashboardError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    let as_of = parse_as_of(config)?;

    let primary = match config.get_string("dashboard", "ticker") {
        Some(s) if !s.trim().is_empty() => catalog.resolve(&s)?,
        _ => default_ticker(&catalog)?,
    };
    let secondary = match config.get_string("dashboard", "compare") {
        Some(s) if !s.trim().is_empty() => Some(catalog.resolve(&s)?),
        _ => None,
    };

    let mut parameters = DashboardParameters::new(primary);
    parameters.secondary = secondary;
    if let Some(period) = config.get_string("dashboard", "period") {
        parameters.lookback = period.parse()?;
    }
    if let Some(theme) = config.get_string("dashboard", "theme") {
        parameters.theme = theme.parse()?;
    }

    // range already checked by validate_chart_config
    let chart_width = u32::try_from(config.get_int("chart", "width", DEFAULT_CHART_WIDTH))
        .unwrap_or(DEFAULT_CHART_WIDTH as u32);

    Ok(DashboardSettings {
        data_path,
        as_of,
        catalog,
        parameters,
        chart_width,
    })
}

fn default_ticker(catalog: &TickerCatalog) -> Result<Ticker, DashboardError> {
    catalog
        .resolve(DEFAULT_TICKER)
        .or_else(|_| {
            catalog
                .iter()
                .next()
                .map(|(t, _)| t.clone())
                .ok_or_else(|| DashboardError::ConfigMissing {
                    section: "dashboard".into(),
                    key: "ticker".into(),
                })
        })
}

fn settings_from_file(config_path: &Path) -> Result<DashboardSettings, DashboardError> {
    log::info!("loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    build_settings(&adapter)
}

fn report(err: DashboardError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

fn run_render(config_path: &Path, output_path: &Path, overrides: &[ParameterChange]) -> ExitCode {
    match render_once(config_path, output_path, overrides) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

pub fn render_once(
    config_path: &Path,
    output_path: &Path,
    overrides: &[ParameterChange],
) -> Result<String, DashboardError> {
    let settings = settings_from_file(config_path)?;
    let mut parameters = settings.parameters.clone();
    for change in overrides {
        parameters = parameters.with_change(change, &settings.catalog)?;
    }

    let provider = settings.provider();
    let output = compute_dashboard(&parameters, &provider, &settings.catalog)?;
    settings.writer().write(&output, output_path)?;
    Ok(format!("{} | {}", output.title_text, output.summary_text))
}

fn run_session(config_path: &Path, output_path: &Path) -> ExitCode {
    let settings = match settings_from_file(config_path) {
        Ok(s) => s,
        Err(e) => return report(e),
    };
    let mut controller = match DashboardController::new(
        settings.provider(),
        settings.catalog.clone(),
        settings.parameters.clone(),
    ) {
        Ok(c) => c,
        Err(e) => return report(e),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let writer = settings.writer();
    match session_loop(&mut controller, &writer, stdin.lock(), &mut stdout, output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}

/// Applies one parameter change per input line until EOF or `quit`.
///
/// Rejected changes are reported on `out` and leave the last page in place.
pub fn session_loop<P, C, R, W>(
    controller: &mut DashboardController<P>,
    writer: &HtmlDashboardWriter<C>,
    input: R,
    out: &mut W,
    output_path: &Path,
) -> Result<(), DashboardError>
where
    P: PriceSeriesProvider,
    C: ChartRenderer,
    R: BufRead,
    W: Write,
{
    writer.write(controller.output(), output_path)?;
    writeln!(out, "{}", status_line(controller))?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let applied = ParameterChange::parse(line).and_then(|change| {
            controller.apply(&change)?;
            Ok(())
        });
        match applied {
            Ok(()) => {
                writer.write(controller.output(), output_path)?;
                writeln!(out, "{}", status_line(controller))?;
            }
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
    Ok(())
}

fn status_line<P: PriceSeriesProvider>(controller: &DashboardController<P>) -> String {
    let output = controller.output();
    let params = &output.parameters;
    let compare = params
        .secondary
        .as_ref()
        .map(|t| format!(" vs {}", t))
        .unwrap_or_default();
    format!(
        "#{} {}{} [{}, {}] {} | {}",
        controller.sequence(),
        params.primary,
        compare,
        params.lookback,
        params.theme,
        output.title_text,
        output.summary_text
    )
}

fn run_list_tickers(config_path: &Path) -> ExitCode {
    let settings = match settings_from_file(config_path) {
        Ok(s) => s,
        Err(e) => return report(e),
    };
    let available = settings.provider().list_tickers().unwrap_or_else(|e| {
        log::warn!("{e}");
        Vec::new()
    });

    for (ticker, name) in settings.catalog.iter() {
        let marker = if available.iter().any(|a| a.eq_ignore_ascii_case(ticker.as_str())) {
            "data"
        } else {
            "no data"
        };
        println!("{:<12} {:<8} {}", ticker, marker, name);
    }
    ExitCode::SUCCESS
}
