use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use datesync::{
    resolve_log_path, DateSyncPlugin, FileSessionLog, Message, NullSessionLog, SessionLog,
    MSG_POST_CITY_INIT, MSG_POST_CITY_SAVE, MSG_POST_REGION_INIT, MSG_PRE_CITY_SHUTDOWN,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod host;
mod script;

use host::ScriptedHost;
use script::{load_script, SessionEvent, SessionScript};

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() || args[0] == "-h" || args[0] == "--help" {
        print_usage();
        return if args.is_empty() {
            Err("missing session script path".to_string())
        } else {
            Ok(())
        };
    }

    let mut log_path_override: Option<PathBuf> = None;
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--log" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --log".to_string())?;
                log_path_override = Some(PathBuf::from(value));
                index += 2;
            }
            _ => break,
        }
    }

    let script_path = args
        .get(index)
        .ok_or_else(|| "missing session script path".to_string())?;
    if args.len() > index + 1 {
        return Err(format!("unexpected argument '{}'", args[index + 1]));
    }

    let script = load_script(Path::new(script_path)).map_err(|error| error.to_string())?;
    let log = open_session_log(log_path_override);

    let mut host = ScriptedHost::new();
    let mut plugin = DateSyncPlugin::new(log);
    if !plugin.post_app_init(&host) {
        return Err("startup handshake with the scripted host failed".to_string());
    }
    info!(
        subscriptions = host.subscriptions().len(),
        debug_enabled = host.debug_enabled(),
        "session_started"
    );

    replay(&mut plugin, &mut host, &script);

    for command in host.executed_commands() {
        info!(command = %command, "cheat_executed");
    }
    match host.current_city_date() {
        Some(date) => info!(city_date = %date, "session_finished"),
        None => info!("session_finished"),
    }
    if let Some(remembered) = plugin.controller().remembered_date() {
        info!(remembered = %remembered, "date_still_remembered");
    }
    Ok(())
}

/// Feed every scripted event through the plugin exactly the way the host
/// dispatcher would.
fn replay(plugin: &mut DateSyncPlugin, host: &mut ScriptedHost, script: &SessionScript) {
    for event in &script.events {
        match *event {
            SessionEvent::EnterCity { date, established } => {
                host.open_city(date, established);
                let message = Message {
                    message_type: MSG_POST_CITY_INIT,
                    city: host.city_access(),
                };
                plugin.do_message(host, &message);
            }
            SessionEvent::Advance { days } => host.advance_days(days),
            SessionEvent::SaveCity => {
                host.mark_established();
                plugin.do_message(
                    host,
                    &Message {
                        message_type: MSG_POST_CITY_SAVE,
                        city: None,
                    },
                );
            }
            SessionEvent::ExitCity => {
                plugin.do_message(
                    host,
                    &Message {
                        message_type: MSG_PRE_CITY_SHUTDOWN,
                        city: None,
                    },
                );
                host.close_city();
            }
            SessionEvent::EnterRegion => plugin.do_message(
                host,
                &Message {
                    message_type: MSG_POST_REGION_INIT,
                    city: None,
                },
            ),
        }
    }
}

fn open_session_log(path_override: Option<PathBuf>) -> Rc<dyn SessionLog> {
    let path = match path_override {
        Some(path) => path,
        None => match resolve_log_path() {
            Ok(path) => path,
            Err(error) => {
                warn!(error = %error, "session_log_path_unresolved");
                return Rc::new(NullSessionLog);
            }
        },
    };
    match FileSessionLog::create(&path) {
        Ok(log) => {
            info!(path = %path.display(), "session_log_opened");
            Rc::new(log)
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "session_log_unavailable");
            Rc::new(NullSessionLog)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_usage() {
    eprintln!("usage: datesync_cli [--log <path>] <session.json>");
    eprintln!();
    eprintln!("Replays a JSON session script against the date-sync plugin.");
    eprintln!("Events: enter_city, advance, save_city, exit_city, enter_region.");
}
