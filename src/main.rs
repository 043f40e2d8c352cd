mod app;
mod board;
mod classifier;
mod cli;
mod completions;
mod config;
mod db;
mod domain;
mod intents;
mod kv;
mod logging;
mod metrics;
mod pipeline;
mod repository;
mod state_store;
mod ui;

fn main() {
    logging::init_logging();
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), app::AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;
    use cli::Commands;

    let cli = cli::Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        let shell = args
            .shell
            .or_else(completions::detect_current_shell)
            .ok_or_else(|| {
                app::AppError::InvalidArgument(
                    "could not detect shell; pass one explicitly".to_string(),
                )
            })?;
        completions::generate_completions(shell, &mut std::io::stdout());
        return Ok(());
    }

    let config = config::BoardConfig::load(cli.config.as_deref())?;
    let app = app::App::open(&cli.db, config, cli.csv.as_deref())?;
    let now = domain::dates::now_local();

    match cli.command {
        Commands::Board(args) => {
            let range = args.range.resolve(now);
            let snapshot = app.snapshot(&range);
            if args.json {
                print_json(&snapshot)?;
            } else {
                ui::print_missing_columns(app.repository().missing_columns());
                ui::print_grid(&snapshot.grid, &range);
                println!();
                ui::print_list(&snapshot.list, &range);
                println!();
                ui::print_metrics(&snapshot.metrics);
            }
        }
        Commands::Grid(args) => {
            let range = args.range.resolve(now);
            let grid = app.grid(&range, range.start);
            if args.json {
                print_json(&grid)?;
            } else {
                ui::print_grid(&grid, &range);
            }
        }
        Commands::List(args) => {
            let range = args.range.resolve(now);
            let list = app.list(&range);
            if args.json {
                print_json(&list)?;
            } else {
                ui::print_list(&list, &range);
            }
        }
        Commands::Metrics(args) => {
            let range = args.range.resolve(now);
            let panel = app.metrics(&range);
            if args.json {
                print_json(&panel)?;
            } else {
                ui::print_metrics(&panel);
            }
        }
        Commands::Show(args) => {
            let card = app.show_trip(&args.id)?;
            if args.json {
                print_json(&card)?;
            } else {
                ui::print_trip_card(&card);
            }
        }
        Commands::State(args) => {
            let state = app.trip_state(&args.id);
            if args.json {
                print_json(&state)?;
            } else {
                ui::print_override(&args.id, &state);
            }
        }
        Commands::Move(args) => {
            let state = app.relocate(&args.id, &args.status, args.force)?;
            println!(
                "moved {} -> {}",
                args.id,
                state.status().unwrap_or(args.status.trim())
            );
        }
        Commands::Assign(args) => {
            let state = app.assign(&args.id, &args.name)?;
            println!("assigned {} -> {}", args.id, assignee_label(&state));
        }
        Commands::Completions(_) => unreachable!("completions are handled before app init"),
    }

    Ok(())
}

fn assignee_label(state: &state_store::TripOverride) -> &str {
    match state.assigned_name() {
        "" => "(nobody)",
        name => name,
    }
}
