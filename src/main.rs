use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use wordtiles::app::App;
use wordtiles::config::Config;
use wordtiles::event::EventHandler;
use wordtiles::pool::loader;
use wordtiles::store::json_store::JsonStore;

#[derive(Parser)]
#[command(name = "wordtiles", version, about = "Build words from tiles with adaptive practice")]
struct Cli {
    #[arg(short, long, help = "Built-in pool name or path to a pool JSON file")]
    pool: Option<String>,

    #[arg(short, long, help = "Number of units per word")]
    length: Option<usize>,

    #[arg(short, long, help = "Direction (adaptive, forward, reverse)")]
    direction: Option<String>,

    #[arg(long, help = "Seed for reproducible trials")]
    seed: Option<u64>,

    #[arg(long, help = "Do not record statistics")]
    no_stats: bool,

    #[arg(long, help = "List built-in pools and exit")]
    list_pools: bool,

    #[arg(long, help = "Write the effective settings to the config file")]
    save_config: bool,

    #[arg(long, value_name = "PATH", help = "Export statistics to a file and exit")]
    export_stats: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Import statistics from a file and exit")]
    import_stats: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if cli.list_pools {
        for name in loader::builtin_names() {
            println!("{name}");
        }
        return Ok(());
    }

    if let Some(path) = &cli.export_stats {
        JsonStore::new()?.export_to(path)?;
        println!("Exported statistics to {}", path.display());
        return Ok(());
    }
    if let Some(path) = &cli.import_stats {
        let stats = JsonStore::new()?.import_from(path)?;
        println!("Imported {} trials from {}", stats.trials, path.display());
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_default();
    if let Some(pool) = cli.pool {
        config.pool = pool;
    }
    if let Some(length) = cli.length {
        config.word_length = length;
    }
    if let Some(direction) = &cli.direction {
        config.set_direction(direction)?;
    }
    if cli.no_stats {
        config.stats_enabled = false;
    }
    if config.word_length == 0 {
        bail!("word length must be at least 1");
    }
    if cli.save_config {
        config.save().context("could not save config")?;
    }

    let pool = loader::load(&config.pool)
        .with_context(|| format!("could not load pool {:?}", config.pool))?;
    let mut app = App::new(config, pool, cli.seed);
    if !app.has_trial() {
        print!("{}", app.render());
        return Ok(());
    }

    let events = EventHandler::new();
    while !app.should_quit {
        println!("{}", app.render());
        let event = events.next()?;
        app.handle_event(event);
    }

    Ok(())
}
