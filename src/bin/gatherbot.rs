use gatherbot::channels::telegram::api::TelegramApiClient;
use gatherbot::config::{database_path, default_state_root, Config};
use gatherbot::gather::service::run_pass;
use gatherbot::runtime::run_polling_loop;
use gatherbot::store::GatherStore;

fn run() -> Result<(), String> {
    let token = std::env::var("TELEGRAM_TOKEN")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| "missing required env var `TELEGRAM_TOKEN`".to_string())?;

    let state_root = default_state_root().map_err(|e| e.to_string())?;
    let config = Config::load(&state_root).map_err(|e| e.to_string())?;
    let store = GatherStore::open(&database_path(&state_root)).map_err(|e| e.to_string())?;
    let api = TelegramApiClient::new(token);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("once") => {
            let report = run_pass(&api, &store, &state_root).map_err(|e| e.to_string())?;
            println!(
                "{} updates, {} actions executed ({} failed), {} gatherings saved",
                report.updates_processed,
                report.actions_executed,
                report.actions_failed,
                report.gatherings_saved
            );
        }
        Some(other) => return Err(format!("unknown argument `{other}`; expected `once`")),
        None => run_polling_loop(&api, &store, &state_root, &config),
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
