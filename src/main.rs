use clap::Parser;

use listing_check::config::{Cli, Command, MatchTypeFilter};
use listing_check::export::ExportFilter;
use listing_check::initialization::init_logger_with;
use listing_check::matching::MatchType;
use listing_check::{clear_cache, export_matches, init_db_pool_with_path, run_check, run_migrations};

/// Loads .env from the working directory, falling back to the directory
/// of the executable so the tool works when launched from elsewhere.
fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let _ = dotenvy::from_path(dir.join(".env"));
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Check(args) => {
            let report = run_check(&cli.db_path, args).await?;
            println!(
                "Checked {} domains in {:.1}s: {} matched ({} website, {} name), {} without a listing, {} failed, {} served from cache.",
                report.total_domains,
                report.elapsed_seconds,
                report.found,
                report.website_matches,
                report.name_matches,
                report.not_found,
                report.failed,
                report.cache_hits,
            );
            println!("Results stored in {}", report.db_path.display());
        }
        Command::Export(args) => {
            let pool = init_db_pool_with_path(&cli.db_path).await?;
            run_migrations(&pool).await?;
            let filter = ExportFilter {
                match_type: args.match_type.map(|f| match f {
                    MatchTypeFilter::Website => MatchType::Website,
                    MatchTypeFilter::Name => MatchType::Name,
                }),
                since: args.since,
            };
            let written = export_matches(&pool, filter, args.output.as_deref()).await?;
            if let Some(output) = &args.output {
                println!("Wrote {} matched listings to {}", written, output.display());
            }
        }
        Command::ClearCache(args) => {
            let pool = init_db_pool_with_path(&cli.db_path).await?;
            run_migrations(&pool).await?;
            let removed = clear_cache(&pool, args.domain.as_deref()).await?;
            match &args.domain {
                Some(domain) => println!("Cleared {removed} cached row(s) for {domain}"),
                None => println!("Cleared {removed} cached row(s)"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    load_env();

    let cli = Cli::parse();

    if let Err(e) = init_logger_with(cli.log_level.clone().into(), cli.log_format.clone()) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
