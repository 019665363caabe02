use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::level_filters::LevelFilter;

use charla::cli::commands::{ask, chat, configure, personas, providers, serve};
use charla::cli::{Args, Command, PersonasCommand};
use charla::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let serving = matches!(args.command, Some(Command::Serve { .. }));
    let base_level = if serving {
        LevelFilter::INFO
    } else {
        LevelFilter::ERROR
    };
    logging::init(base_level, args.verbose, args.log_file.as_deref(), serving)?;

    match args.command {
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        Some(Command::Personas { command }) => match command {
            Some(PersonasCommand::Show { name }) => personas::show_persona(&name)?,
            Some(PersonasCommand::List) | None => personas::list_personas()?,
        },
        Some(Command::Configure) => {
            configure::run_configure()?;
        }
        Some(Command::Serve {
            host,
            port,
            provider,
            model,
            cors_origins,
        }) => {
            serve::run_serve(serve::ServeOptions {
                host,
                port,
                provider,
                model,
                cors_origins,
            })
            .await?;
        }
        Some(Command::Ask { file, session }) => {
            let replied = ask::run_ask(ask::AskOptions { file, session }).await?;
            if !replied {
                std::process::exit(exitcode::UNAVAILABLE);
            }
        }
        Some(Command::Chat {
            session,
            transcript,
        }) => {
            chat::run_chat(chat::ChatOptions {
                session,
                transcript,
            })
            .await?;
        }
        None => {
            chat::run_chat(chat::ChatOptions {
                session: args.session,
                transcript: None,
            })
            .await?;
        }
    }

    Ok(())
}
