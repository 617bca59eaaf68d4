use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::process;
use subenum::logger::Console;
use subenum::output::{OutputManager, OutputLayout};
use subenum::{config, logger, tools, Args, SubEnumEngine, SubEnumError};

const BANNER: &str = r#"
   _____       __    ______
  / ___/__  __/ /_  / ____/___  __  ______ ___
  \__ \/ / / / __ \/ __/ / __ \/ / / / __ `__ \
 ___/ / /_/ / /_/ / /___/ / / / /_/ / / / / / /
/____/\__,_/_.___/_____/_/ /_/\__,_/_/ /_/ /_/

   subfinder + amass + assetfinder -> httpx
"#;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    if !args.silent && !args.json {
        println!("{}", BANNER);
    }

    let config = match config::build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if args.list_tools {
        list_tools(&config);
        return Ok(());
    }

    logger::init(&config.log_file, args.verbose, Console::for_output(args.json))?;

    let engine = SubEnumEngine::new(config);
    match engine.run().await {
        Ok(summary) => {
            info!(
                "Enumeration completed: {} combined, {} alive in {:.2}s",
                summary.combined,
                summary.alive,
                summary.duration.as_secs_f64()
            );
            if args.json || !args.silent {
                if let Err(e) = OutputManager::new(args.json).write_summary(&summary) {
                    error!("{}", e);
                }
            }
        }
        Err(SubEnumError::MissingInput(message)) => error!("{}", message),
        Err(e) => error!("Unhandled error: {}\n{:?}", e, e),
    }

    Ok(())
}

fn list_tools(config: &subenum::Config) {
    let layout = OutputLayout::new(&config.output_dir);

    println!("Configured tools:\n");
    for info in tools::describe_tools(config, &layout) {
        let marker = if info.installed { "" } else { " (not found in PATH)" };
        println!("  {:<8} {}{}", info.stage.as_str(), info.program, marker);
        println!("           {}", info.command);
    }
    println!("\nBinaries can be overridden in the config file or with SUBENUM_<STAGE>_BIN.");
}
