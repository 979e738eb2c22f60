use crate::{Cli, Command, LogArgs};
use turnip_core::config::Settings;
use turnip_core::domain::week::{WeekRecord, SLOT_NAMES};
use turnip_core::forecast::PatternForecaster;
use turnip_core::storage::{CsvWeekStorage, WeekStorage};
use turnip_core::time::week_slots::{resolve_now, LogContext};
use turnip_core::workflow;

pub fn run(cli: Cli, settings: &Settings) -> anyhow::Result<()> {
    let now = resolve_now(cli.at.as_deref(), chrono::Local::now().naive_local())?;
    let ctx = LogContext::at(now);

    let data_dir = cli.data_dir.unwrap_or_else(|| settings.data_dir.clone());
    let storage = CsvWeekStorage::new(data_dir);

    tracing::debug!(
        now = %ctx.now,
        week_key = %ctx.week_key,
        data_dir = %storage.dir().display(),
        "resolved invocation context"
    );

    match cli.command {
        Command::Log(args) => log(&storage, &ctx, args, settings),
        Command::Show => show(&storage, &ctx),
    }
}

fn log(
    storage: &CsvWeekStorage,
    ctx: &LogContext,
    args: LogArgs,
    settings: &Settings,
) -> anyhow::Result<()> {
    let observation = workflow::record_observation(storage, ctx, &args.price)?;

    if !args.predict {
        return Ok(());
    }

    let top_k = resolve_top_k(args.top_k, settings)?;
    let possibilities = workflow::forecast(&PatternForecaster, &observation.record, args.first_buy);
    let report = workflow::rank_possibilities(&ctx.week_key, &possibilities, top_k);

    if args.json {
        println!("{}", report.render_json()?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

// The flag wins; the environment is only consulted without it.
fn resolve_top_k(flag: Option<usize>, settings: &Settings) -> anyhow::Result<usize> {
    match flag {
        Some(n) => Ok(n),
        None => settings.top_k(),
    }
}

fn show(storage: &CsvWeekStorage, ctx: &LogContext) -> anyhow::Result<()> {
    let record = storage.load_or_init(&ctx.week_key)?;
    print!("{}", render_week(&record, ctx));
    Ok(())
}

fn render_week(record: &WeekRecord, ctx: &LogContext) -> String {
    let title = format!(
        "Week {} (starting Sunday {})\n",
        record.week_key, ctx.week_start
    );
    SLOT_NAMES
        .iter()
        .enumerate()
        .fold(title, |mut out, (slot, name)| {
            let value = match record.known(slot) {
                Some(v) => v.to_string(),
                None => "-".to_string(),
            };
            out.push_str(&format!("{name:<7}{value:>5}\n"));
            out
        })
}
