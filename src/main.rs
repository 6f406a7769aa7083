//! CLI entry point for the fleet dashboard console.
//!
//! Drives the same list controllers the dashboard pages use, headlessly:
//! list a page with filters and summary, inspect dependent options, load a
//! single record, delete one behind an explicit `--yes`, or save a route.

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fleet_dashboard::config::Config;
use fleet_dashboard::controller::ListController;
use fleet_dashboard::detail::DetailView;
use fleet_dashboard::fetch::auth::ApiKey;
use fleet_dashboard::fetch::{Api, BasicClient, HttpClient};
use fleet_dashboard::filter::{
    self, CORPORATION_ID, FilterValue, PrimaryId, SCHOOL_ID,
};
use fleet_dashboard::list::ListStatus;
use fleet_dashboard::mutation::{DeleteOutcome, EditDialog, SaveOutcome};
use fleet_dashboard::notify::{Level, Notifications};
use fleet_dashboard::options::DependentOptions;
use fleet_dashboard::output::{append_rows, print_json, print_pretty};
use fleet_dashboard::paging::SortDirection;
use fleet_dashboard::resource::Resource;
use fleet_dashboard::resources::routes::RouteDraft;
use fleet_dashboard::resources::{BusEmergencies, FuelRecords, RouteTimeLogs, Routes};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_dashboard")]
#[command(about = "Console for the school-bus fleet dashboard API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Page {
    Emergencies,
    Fuel,
    TimeLogs,
    Routes,
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long)]
    school_id: Option<i64>,
    #[arg(long)]
    corporation_id: Option<i64>,
    #[arg(long)]
    plate: Option<String>,
    #[arg(long)]
    route_number: Option<String>,
    #[arg(long)]
    schedule: Option<String>,
    #[arg(long)]
    day: Option<String>,
    /// Fueling reason code
    #[arg(long)]
    reason: Option<String>,
    /// First day included, YYYY-MM-DD
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Last day included, YYYY-MM-DD
    #[arg(long)]
    end_date: Option<NaiveDate>,
}

impl FilterArgs {
    fn pairs(&self) -> Vec<(&'static str, FilterValue)> {
        let text = |v: &Option<String>| v.clone().map(FilterValue::Text);
        [
            (SCHOOL_ID, self.school_id.map(FilterValue::Number)),
            (CORPORATION_ID, self.corporation_id.map(FilterValue::Number)),
            (filter::PLATE, text(&self.plate)),
            (filter::ROUTE_NUMBER, text(&self.route_number)),
            (filter::SCHEDULE, text(&self.schedule)),
            (filter::DAY, text(&self.day)),
            (filter::REASON, text(&self.reason)),
            (filter::START_DATE, self.start_date.map(FilterValue::Date)),
            (filter::END_DATE, self.end_date.map(FilterValue::Date)),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page of a list with its summary
    List {
        #[arg(value_enum)]
        page: Page,

        #[command(flatten)]
        filters: FilterArgs,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page_number: u32,

        /// Rows per page (10, 25, 50 or 100)
        #[arg(long)]
        page_size: Option<u32>,

        /// Column to sort by, where the page supports sorting
        #[arg(long)]
        order_by: Option<String>,

        /// Sort descending
        #[arg(long, default_value_t = false)]
        desc: bool,

        /// CSV file to append the fetched rows to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the buses and route numbers of a school or corporation
    Options {
        #[arg(long, conflicts_with = "corporation_id")]
        school_id: Option<i64>,

        #[arg(long)]
        corporation_id: Option<i64>,
    },
    /// Load a single record
    Detail {
        #[arg(value_enum)]
        page: Page,
        id: i64,
    },
    /// Delete a record
    Delete {
        #[arg(value_enum)]
        page: Page,
        id: i64,

        /// Confirm the deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Create a route, or update it when --id is given
    SaveRoute {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        route_number: String,
        #[arg(long)]
        school_id: Option<i64>,
        #[arg(long)]
        corporation_id: Option<i64>,
        #[arg(long)]
        bus_id: Option<i64>,
        #[arg(long)]
        schedule: Option<String>,
        /// Day code, repeatable
        #[arg(long = "day")]
        days: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/fleet_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = ApiKey::bearer(BasicClient::with_timeout(config.timeout)?, &config.token)?;
    let api = Api::new(client, &config.base_url)?;
    info!(base_url = %api.base_url(), "API configured");

    match cli.command {
        Commands::List {
            page,
            filters,
            page_number,
            page_size,
            order_by,
            desc,
            output,
        } => {
            let request = ListRequest {
                filters,
                page_index: page_number.saturating_sub(1),
                page_size: page_size.unwrap_or(config.page_size),
                order_by,
                desc,
                output,
            };
            match page {
                Page::Emergencies => list::<BusEmergencies, _>(&api, request).await?,
                Page::Fuel => list::<FuelRecords, _>(&api, request).await?,
                Page::TimeLogs => list::<RouteTimeLogs, _>(&api, request).await?,
                Page::Routes => list::<Routes, _>(&api, request).await?,
            }
        }
        Commands::Options {
            school_id,
            corporation_id,
        } => {
            let primary = school_id
                .map(PrimaryId::School)
                .or(corporation_id.map(PrimaryId::Corporation));
            let mut options = DependentOptions::default();
            options.load(&api, primary).await;

            info!(
                primary = ?primary,
                buses = options.buses().len(),
                route_numbers = options.route_numbers().len(),
                "Dependent options"
            );
            for bus in options.buses() {
                info!(bus_id = bus.id, plate = %bus.plate, "Bus");
            }
            info!(route_numbers = ?options.route_numbers(), "Route numbers");
        }
        Commands::Detail { page, id } => match page {
            Page::Emergencies => detail::<BusEmergencies, _>(&api, id).await?,
            Page::Fuel => detail::<FuelRecords, _>(&api, id).await?,
            Page::TimeLogs => detail::<RouteTimeLogs, _>(&api, id).await?,
            Page::Routes => detail::<Routes, _>(&api, id).await?,
        },
        Commands::Delete { page, id, yes } => {
            if !yes {
                warn!(id, "Deletion not confirmed, pass --yes to delete");
                return Ok(());
            }
            match page {
                Page::Emergencies => delete::<BusEmergencies, _>(&api, id).await?,
                Page::Fuel => delete::<FuelRecords, _>(&api, id).await?,
                Page::TimeLogs => delete::<RouteTimeLogs, _>(&api, id).await?,
                Page::Routes => delete::<Routes, _>(&api, id).await?,
            }
        }
        Commands::SaveRoute {
            id,
            route_number,
            school_id,
            corporation_id,
            bus_id,
            schedule,
            days,
        } => {
            let mut controller: ListController<Routes> = ListController::new(config.page_size);
            let mut dialog = EditDialog::default();
            dialog.open(RouteDraft {
                id,
                route_number,
                school_id,
                corporation_id,
                bus_id,
                schedule,
                days,
            });

            let outcome = controller.save(&api, &mut dialog).await;
            report(controller.notifications());
            match outcome {
                SaveOutcome::Created(body) | SaveOutcome::Updated(body) => print_json(&body)?,
                SaveOutcome::Failed => bail!("route could not be saved"),
                SaveOutcome::NotOpen => {}
            }
        }
    }

    Ok(())
}

struct ListRequest {
    filters: FilterArgs,
    page_index: u32,
    page_size: u32,
    order_by: Option<String>,
    desc: bool,
    output: Option<String>,
}

#[tracing::instrument(skip_all, fields(resource = R::NAME))]
async fn list<R: Resource, C: HttpClient>(api: &Api<C>, request: ListRequest) -> Result<()> {
    let mut controller: ListController<R> = ListController::default();
    if !controller.set_page_size(request.page_size)
        && controller.page().page_size != request.page_size
    {
        warn!(page_size = request.page_size, "Unsupported page size, using default");
    }

    for (key, value) in request.filters.pairs() {
        if let Err(e) = controller.set_filter(key, Some(value)) {
            warn!(error = %e, "Filter not offered by this page, ignoring");
        }
    }

    if let Some(column) = &request.order_by {
        controller.sort_by(column);
        let wanted = if request.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        if controller.sort().map(|s| s.direction) != Some(wanted) {
            controller.sort_by(column);
        }
        if controller.sort().map(|s| s.column.as_str()) != Some(column.as_str()) {
            warn!(column = %column, "This page has a fixed sort order");
        }
    }

    // Learn the total first so the requested page can be clamped.
    controller.sync(api).await;
    if request.page_index > 0 && controller.status() != ListStatus::Error {
        controller.set_page(request.page_index);
        controller.sync(api).await;
    }

    report(controller.notifications());
    match controller.status() {
        ListStatus::Error => bail!("could not load {}", R::NAME),
        ListStatus::Empty => info!("No records"),
        _ => {}
    }

    info!(range = %controller.range_label(), rows = controller.rows().len(), "Page loaded");
    print_pretty(&controller.rows());
    print_json(controller.summary())?;
    if let Some(e) = controller.summary_error() {
        warn!(error = e, "Statistics unavailable, summary covers this page only");
    }

    if let Some(path) = &request.output {
        let written = append_rows(path, controller.rows())?;
        info!(path = %path, written, "Rows exported");
    }
    Ok(())
}

async fn detail<R: Resource, C: HttpClient>(api: &Api<C>, id: i64) -> Result<()> {
    let mut controller: ListController<R> = ListController::default();
    controller.load_detail(api, id).await;
    report(controller.notifications());

    match controller.detail().view() {
        DetailView::Loaded(record) => print_json(record),
        _ => Err(anyhow!("could not load record {id}")),
    }
}

async fn delete<R: Resource, C: HttpClient>(api: &Api<C>, id: i64) -> Result<()> {
    let mut controller: ListController<R> = ListController::default();
    controller.request_delete(id);
    let outcome = controller.confirm_delete(api).await;
    report(controller.notifications());

    match outcome {
        DeleteOutcome::Deleted(_) => {
            info!(id, remaining = controller.total_count(), "Deleted");
            Ok(())
        }
        _ => Err(anyhow!("could not delete record {id}")),
    }
}

fn report(notifications: &mut Notifications) {
    for note in notifications.drain() {
        match note.level {
            Level::Success => info!(message = %note.message, "Notification"),
            Level::Error => error!(message = %note.message, "Notification"),
        }
    }
}
