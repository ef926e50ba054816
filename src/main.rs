use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dakar_core::{
    create_brand_table, create_record_table, create_summary_table, no_data_notice, Category, DakarError,
    Database, PriceDistribution, Result, ResultTable,
};
use dakar_scrapers::{RunReport, ScrapeConfig, ScrapeQuery, ScraperFactory, ScraperType as CoreScraperType};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape vehicle listings
    #[command(about = "Scrape vehicle listings")]
    #[command(long_about = "Scrape vehicle listings page by page and show, export or store the resulting table. Currently supports dakar-auto.com.")]
    Scrape(ScrapeCommand),

    /// List stored listings from the database
    #[command(about = "List stored listings from the database")]
    List(ListCommand),

    /// Export stored listings to a file
    #[command(about = "Export stored listings to CSV or JSON")]
    Export(ExportCommand),

    /// Summarize a table of listings
    #[command(about = "Show listing counts, average price, top brands and the price distribution")]
    #[command(long_about = "Show listing counts, average price, top brands and the price distribution, read either from a CSV export or from the database.")]
    Stats(StatsCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliScraperType {
    DakarAuto,
}

impl From<CliScraperType> for CoreScraperType {
    fn from(value: CliScraperType) -> Self {
        match value {
            CliScraperType::DakarAuto => CoreScraperType::DakarAuto,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
struct ScrapeCommand {
    /// The scraper to use (-x, --scraper)
    #[arg(short = 'x', long, value_enum, default_value_t = CliScraperType::DakarAuto)]
    scraper: CliScraperType,

    /// Vehicle categories to scrape (-k, --category). Can be specified multiple times.
    #[arg(short = 'k', long, value_enum, num_args = 1.., value_delimiter = ',', default_value = "cars")]
    category: Vec<Category>,

    /// Number of pages to scrape per category (-c, --max-pages)
    #[arg(short = 'c', long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=30))]
    max_pages: u32,

    /// Feed address overriding the category default; needs exactly one category
    #[arg(long)]
    feed_url: Option<Url>,

    /// Per-page request timeout in seconds (-t, --timeout)
    #[arg(short = 't', long, default_value_t = 15)]
    timeout: u64,

    /// Pages fetched at once (-j, --concurrency)
    #[arg(short = 'j', long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=16))]
    concurrency: u16,

    /// Drop exact duplicate rows before export and storage
    #[arg(long)]
    dedup: bool,

    /// Write the table to this file (-o, --output)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Format of the output file (-f, --format)
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Append the rows to this database (-d, --database)
    #[arg(short = 'd', long)]
    database: Option<PathBuf>,

    /// Maximum number of rows to display (-l, --limit)
    #[arg(short = 'l', long, default_value_t = 20)]
    limit: usize,
}

#[derive(Parser)]
struct ListCommand {
    /// Database file path (-d, --database)
    #[arg(short = 'd', long, default_value = "dakar_auto.db")]
    database: PathBuf,

    /// Category to list (-k, --category)
    #[arg(short = 'k', long, value_enum, default_value_t = Category::Cars)]
    category: Category,

    /// Only show this brand (-b, --brand)
    #[arg(short = 'b', long)]
    brand: Option<String>,

    /// Maximum number of rows to display (-l, --limit)
    #[arg(short = 'l', long, default_value_t = 10)]
    limit: i64,

    /// Number of rows to skip (-o, --offset)
    #[arg(short = 'o', long, default_value_t = 0)]
    offset: i64,
}

#[derive(Parser)]
struct ExportCommand {
    /// Output file path (-o, --output)
    #[arg(short = 'o', long, default_value = "listings.csv")]
    output: PathBuf,

    /// Format of the output file (-f, --format)
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Category to export (-k, --category)
    #[arg(short = 'k', long, value_enum, default_value_t = Category::Cars)]
    category: Category,

    /// Database file path (-d, --database)
    #[arg(short = 'd', long, default_value = "dakar_auto.db")]
    database: PathBuf,
}

#[derive(Parser)]
struct StatsCommand {
    /// Read the table from a CSV export instead of the database (-i, --input)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Database file path (-d, --database)
    #[arg(short = 'd', long, default_value = "dakar_auto.db")]
    database: PathBuf,

    /// Category of the table (-k, --category)
    #[arg(short = 'k', long, value_enum, default_value_t = Category::Cars)]
    category: Category,

    /// Number of brands in the ranking (-n, --top)
    #[arg(short = 'n', long, default_value_t = 10)]
    top: usize,

    /// Number of price histogram bins (-b, --bins)
    #[arg(short = 'b', long, default_value_t = 30)]
    bins: usize,

    /// Height of the price distribution graph in lines (-g, --graph-height)
    #[arg(short = 'g', long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(1..=20))]
    graph_height: u8,
}

fn write_table(table: &ResultTable, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => table.to_csv_path(path)?,
        OutputFormat::Json => table.write_json(std::fs::File::create(path)?)?,
    }
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Writes a non-empty table; an empty one gets the "No data found" notice
/// and no file. Returns whether a file was written.
fn export_table(table: &ResultTable, path: &Path, format: OutputFormat) -> Result<bool> {
    if table.is_empty() {
        println!("{}", no_data_notice(table.category));
        return Ok(false);
    }

    write_table(table, path, format)?;
    Ok(true)
}

fn show_table(table: &ResultTable, limit: usize) {
    if table.is_empty() {
        println!("{}", no_data_notice(table.category));
        return;
    }

    let shown = &table.records()[..table.len().min(limit)];
    println!("{}", create_record_table(shown));
    if shown.len() < table.len() {
        println!("... {} more rows", table.len() - shown.len());
    }
    println!("{}", create_summary_table(table.category, &table.summary()));
}

fn show_report(report: &RunReport, limit: usize) {
    show_table(&report.table, limit);
    if !report.failures.is_empty() {
        let message = format!(
            "{} of {} pages could not be fetched:",
            report.failures.len(),
            report.pages_requested
        );
        println!("{}", message.red());
        for failure in &report.failures {
            println!("  {}", failure);
        }
    }
}

fn show_stats(table: &ResultTable, top: usize, bins: usize, graph_height: u8) {
    if table.is_empty() {
        println!("{}", no_data_notice(table.category));
        return;
    }

    println!("{}", create_summary_table(table.category, &table.summary()));
    println!("Top {} brands", top);
    println!("{}", create_brand_table(&table.top_brands(top)));
    println!("Price distribution");
    println!(
        "{}",
        PriceDistribution::from_table(table, bins).to_ascii_graph(60, graph_height as usize)
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape(cmd) => {
            if cmd.feed_url.is_some() && cmd.category.len() != 1 {
                return Err(DakarError::InvalidCategory(
                    "--feed-url needs exactly one --category".to_string(),
                ));
            }

            let config = ScrapeConfig {
                timeout: Duration::from_secs(cmd.timeout),
                concurrency: cmd.concurrency as usize,
            };
            let scraper = ScraperFactory::create_scraper(cmd.scraper.into(), &config)?;
            let db = match &cmd.database {
                Some(path) => Some(Database::new(path).await?),
                None => None,
            };

            for category in cmd.category.iter().copied() {
                let query = match &cmd.feed_url {
                    Some(url) => ScrapeQuery::with_feed_url(category, url.clone()),
                    None => ScrapeQuery::new(category)?,
                };

                let mut report = scraper.scrape_listing(query, cmd.max_pages).await;
                if cmd.dedup {
                    let removed = report.table.dedup();
                    info!("Removed {} duplicate {} rows", removed, category);
                }

                show_report(&report, cmd.limit);
                if report.is_empty() {
                    continue;
                }

                if let Some(output) = &cmd.output {
                    let path = if cmd.category.len() > 1 {
                        output.with_file_name(format!(
                            "{}_{}",
                            category.table_name(),
                            output.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
                        ))
                    } else {
                        output.clone()
                    };
                    write_table(&report.table, &path, cmd.format)?;
                }

                if let Some(db) = &db {
                    db.save_table(&report.table).await?;
                }
            }
        }
        Commands::List(cmd) => {
            let db = Database::open(&cmd.database).await?;
            let stored = db
                .list_records(cmd.category, cmd.brand.as_deref(), Some(cmd.limit), Some(cmd.offset))
                .await?;

            if stored.is_empty() {
                println!("{}", no_data_notice(cmd.category));
            } else {
                let records: Vec<_> = stored.into_iter().map(|row| row.record).collect();
                println!("{}", create_record_table(&records));
                println!(
                    "{} of {} stored {} listings",
                    records.len(),
                    db.count_records(cmd.category).await?,
                    cmd.category
                );
            }
        }
        Commands::Export(cmd) => {
            let db = Database::open(&cmd.database).await?;
            let table = db.load_table(cmd.category).await?;
            export_table(&table, &cmd.output, cmd.format)?;
        }
        Commands::Stats(cmd) => {
            let table = match &cmd.input {
                Some(path) => ResultTable::from_csv_path(cmd.category, path)?,
                None => Database::open(&cmd.database).await?.load_table(cmd.category).await?,
            };
            show_stats(&table, cmd.top, cmd.bins, cmd.graph_height);
        }
    }

    Ok(())
}
