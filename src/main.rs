use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use humantime::parse_rfc3339;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use dedication_board::calendar::{HebrewCalendarAdapter, Luach};
use dedication_board::clock::{Clock, OffsetClock, SystemClock};
use dedication_board::config::Configuration;
use dedication_board::events::{BoardSettings, DedicationItem, DisplayFrame, Slide};
use dedication_board::hebrew_date::HebrewDateFormatter;
use dedication_board::holiday::HolidayDetector;
use dedication_board::selector::TodaySlideSelector;
use dedication_board::tasks::{board, display};

#[derive(Debug, Parser)]
#[command(
    name = "dedication-board",
    version,
    about = "Hebrew-calendar dedication board scheduler"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Start the clock at this RFC 3339 instant instead of the system time
    #[arg(long = "now", value_name = "RFC3339")]
    now: Option<String>,
    /// Print today's date, holiday and slides without starting the session
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Print the Hebrew date picker choices and exit
    #[arg(long = "picker")]
    picker: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // init tracing (RUST_LOG controls level, default = info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let Args {
        config,
        now,
        dry_run,
        picker,
    } = Args::parse();

    let now_override = match now {
        Some(ts) => Some(DateTime::<Utc>::from(
            parse_rfc3339(&ts).context("failed to parse --now")?,
        )),
        None => None,
    };

    let cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid configuration values")?;
    tracing::info!(
        "Loaded configuration from {}:\n{:#?}",
        config.display(),
        cfg
    );

    let calendar: Arc<dyn HebrewCalendarAdapter> = Arc::new(Luach);
    let clock: Arc<dyn Clock> = match now_override {
        Some(origin) => Arc::new(OffsetClock::starting_at(origin)),
        None => Arc::new(SystemClock),
    };

    if picker {
        print_picker(&cfg, calendar);
        return Ok(());
    }
    if dry_run {
        return run_dry_run(&cfg, calendar, clock.as_ref());
    }

    let (items_tx, items_rx) = watch::channel(Vec::<DedicationItem>::new());
    let (settings_tx, settings_rx) = watch::channel(BoardSettings::default());
    let (frames_tx, frames_rx) = watch::channel(None::<DisplayFrame>);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let mut tasks = JoinSet::new();

    // Board source
    tasks.spawn({
        let path = cfg.board_path.clone();
        let cancel = cancel.clone();
        async move {
            board::run(path, items_tx, settings_tx, cancel)
                .await
                .context("board task failed")
        }
    });

    // Display session
    tasks.spawn({
        let session_cfg = display::SessionConfig::from(&cfg);
        let cancel = cancel.clone();
        async move {
            display::run(
                session_cfg,
                calendar,
                clock,
                items_rx,
                settings_rx,
                frames_tx,
                cancel,
            )
            .await
            .context("display task failed")
        }
    });

    // Renderer stand-in: log each frame
    tasks.spawn({
        let cancel = cancel.clone();
        async move {
            log_frames(frames_rx, cancel).await;
            Ok(())
        }
    });

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("task error: {e:?}");
                cancel.cancel();
            }
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}

async fn log_frames(mut frames: watch::Receiver<Option<DisplayFrame>>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(frame) = frames.borrow_and_update().clone() else {
                    continue;
                };
                tracing::info!(
                    index = frame.index,
                    total = frame.total,
                    id = %frame.slide.id(),
                    kind = frame.slide.kind(),
                    visible = frame.visible,
                    hebrew_date = %frame.hebrew_date,
                    holiday = frame.holiday.as_deref(),
                    "{}",
                    frame.slide.main_name()
                );
            }
        }
    }
}

fn print_picker(cfg: &Configuration, calendar: Arc<dyn HebrewCalendarAdapter>) {
    let formatter = HebrewDateFormatter::new(calendar, cfg.picker_years.range());
    println!("# days\n{}", formatter.enumerate_days().join(" "));
    println!("# months\n{}", formatter.enumerate_months().join(" | "));
    println!(
        "# years ({}..={})\n{}",
        cfg.picker_years.start,
        cfg.picker_years.end,
        formatter.picker_years().join(" ")
    );
}

fn run_dry_run(
    cfg: &Configuration,
    calendar: Arc<dyn HebrewCalendarAdapter>,
    clock: &dyn Clock,
) -> Result<()> {
    let document = board::load_board(&cfg.board_path)?;
    let now = clock.now().with_timezone(&cfg.timezone);
    let civil = now.date_naive();

    let today = match calendar.from_civil(civil) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(%civil, error = %err, "hebrew date unavailable");
            None
        }
    };
    let selector = TodaySlideSelector::new(
        HolidayDetector::new(calendar, cfg.calendar_locale),
        cfg.holiday_greeting.clone(),
    );
    let holiday = selector.holiday(civil);
    let slides = selector.assemble(&document.items, now, today.as_ref(), holiday.clone());

    println!(
        "# dry run\n# now: {}\n# hebrew date: {}\n# holiday: {}\n# items: {}\n",
        now.to_rfc3339(),
        today
            .as_ref()
            .map(dedication_board::hebrew_date::format)
            .unwrap_or_default(),
        holiday.as_deref().unwrap_or("(none)"),
        document.items.len()
    );

    if slides.is_empty() {
        let fallback = document.settings.default_slide.unwrap_or_default();
        println!("(nothing scheduled today; default slide)");
        let slide = Slide::Default(fallback);
        println!(
            "  {:>3}: [{}] {} {}",
            1,
            slide.kind(),
            slide.id(),
            slide.main_name()
        );
        return Ok(());
    }
    for (idx, slide) in slides.iter().enumerate() {
        println!(
            "  {:>3}: [{}] {} {}",
            idx + 1,
            slide.kind(),
            slide.id(),
            slide.main_name()
        );
    }
    Ok(())
}
