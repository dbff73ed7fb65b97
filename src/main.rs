// src/main.rs
// =============================================================================
// Entry point of the github-crawler binary.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Dispatch to the subcommand handler, which calls into the library
// 4. Save or print what was fetched
// 5. Exit with proper code (0 = success, 1 = some batch items failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::{Component, Path, PathBuf};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use github_crawler::{parse_github_url, BatchItem, BatchResult, CrawlRequest, GitHubCrawler};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only ever carries fetched content or JSON
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "github_crawler=debug"
    } else {
        "github_crawler=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let mut crawler = GitHubCrawler::new(cli.fetch_options())?;

    match cli.command {
        Commands::File { url, path, output } => {
            let content = crawler.fetch_file(&url, path.as_deref()).await?;
            emit(&content, output.as_deref()).await?;
            Ok(0)
        }
        Commands::Readme { url, output } => {
            let content = crawler.fetch_readme(&url).await?;
            emit(&content, output.as_deref()).await?;
            Ok(0)
        }
        Commands::Batch { manifest, out_dir, json } => {
            handle_batch(&mut crawler, &manifest, &out_dir, json).await
        }
        Commands::Request { request } => {
            let request: CrawlRequest =
                serde_json::from_str(&request).context("Request must be a JSON object")?;
            let content = crawler.dispatch(&request).await?;
            emit(&content, None).await?;
            Ok(0)
        }
    }
}

// Prints content to stdout, or saves it when an output path was given
async fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            save(path, content).await?;
            println!("✅ Saved {} ({} characters)", path.display(), content.chars().count());
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn save(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

async fn handle_batch(
    crawler: &mut GitHubCrawler,
    manifest: &Path,
    out_dir: &Path,
    json: bool,
) -> Result<i32> {
    let raw = tokio::fs::read_to_string(manifest)
        .await
        .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
    let items: Vec<BatchItem> = serde_json::from_str(&raw).with_context(|| {
        format!(
            "Manifest {} is not a JSON array of {{url, path}}",
            manifest.display()
        )
    })?;

    if items.is_empty() {
        println!("⚠️  Manifest is empty, nothing to fetch");
        return Ok(0);
    }

    println!("📄 Fetching {} file(s) into {}", items.len(), out_dir.display());

    let mut results = crawler.fetch_multiple_files(&items).await;

    // Save successes; a file that cannot be written counts as a failure
    for (item, result) in items.iter().zip(results.iter_mut()) {
        let Some(content) = result.content.as_deref() else {
            continue;
        };
        let saved = match output_path(item, out_dir) {
            Ok(target) => save(&target, content).await,
            Err(e) => Err(e),
        };
        if let Err(e) = saved {
            *result = BatchResult::failed(result.path.clone(), format!("{:#}", e));
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_table(&results);
    }

    if results.iter().any(|r| !r.success) {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Where a batch item is saved: out_dir plus its repository-relative path
fn output_path(item: &BatchItem, out_dir: &Path) -> Result<PathBuf> {
    let relative = parse_github_url(&item.url)
        .ok()
        .and_then(|repo| repo.path)
        .or_else(|| item.path.clone())
        .ok_or_else(|| anyhow!("No file path for {}", item.url))?;

    let relative = Path::new(&relative);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(anyhow!(
            "Refusing to write outside {}: {}",
            out_dir.display(),
            relative.display()
        ));
    }

    Ok(out_dir.join(relative))
}

fn print_table(results: &[BatchResult]) {
    println!("{:<60} {:<12} {:<30}", "PATH", "STATUS", "DETAIL");
    println!("{}", "=".repeat(102));

    for result in results {
        let path_display = if result.path.chars().count() > 57 {
            let head: String = result.path.chars().take(57).collect();
            format!("{}...", head)
        } else {
            result.path.clone()
        };

        let (status, detail) = if result.success {
            let size = result.content.as_deref().map(|c| c.chars().count()).unwrap_or(0);
            ("✅ OK", format!("{} characters", size))
        } else {
            ("❌ FAILED", result.error.clone().unwrap_or_default())
        };

        println!("{:<60} {:<12} {:<30}", path_display, status, detail);
    }

    println!();

    let ok_count = results.iter().filter(|r| r.success).count();
    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", ok_count);
    println!("   ❌ Failed: {}", results.len() - ok_count);
    println!("   📋 Total: {}", results.len());
}
