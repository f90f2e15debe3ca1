use anyhow::Result;
use clap::{App as Cli, Arg, ArgMatches, SubCommand};
use log::*;
use todoist_tui::{
    app::App,
    commands::{list, login},
    config::Config,
    logger::Logger,
    todoist::Todoist,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
        log::logger().flush();
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn cli() -> Cli<'static, 'static> {
    Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Use a custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log at debug level"),
        )
        .subcommand(SubCommand::with_name("login").about("Authorize todoist-tui with your Todoist account"))
        .subcommand(
            SubCommand::with_name("list")
                .about("Print your tasks and exit")
                .arg(
                    Arg::with_name("json")
                        .long("json")
                        .help("Print tasks as JSON"),
                ),
        )
}

async fn run() -> Result<()> {
    let matches = cli().get_matches();

    let dotenv = dotenvy::dotenv();
    let mut config = Config::load(matches.value_of("config"))?;
    config.apply_env(|name| std::env::var(name).ok());

    init_logger(&matches, &config)?;
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    match matches.subcommand() {
        ("login", Some(_)) => {
            let auth = config.auth_config()?;
            let credential =
                login::login(&auth, &config.credentials(), login::print_authorize_url).await?;
            debug!("Stored {} token", credential.token_type);
            println!(
                "Login successful. Credentials saved to {}",
                config.credentials().path().display()
            );
        }
        ("list", Some(args)) => {
            let credential = config.credentials().load()?;
            let tasks = list::fetch(&Todoist::new(&credential.access_token)).await?;
            println!("{}", list::format_tasks(&tasks, args.is_present("json"))?);
        }
        _ => {
            let credential = config.credentials().load()?;
            App::start(&config, &credential).await?;
        }
    }
    Ok(())
}

/// The interactive session owns the terminal, so it logs to a file.
///
fn init_logger(matches: &ArgMatches, config: &Config) -> Result<()> {
    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level()
    };
    let logger = match matches.subcommand_name() {
        Some(_) => Logger::stderr(level),
        None => Logger::file(&config.log_path(), level)?,
    };
    logger.init()?;
    Ok(())
}
