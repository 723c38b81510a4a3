use clap::{Parser, Subcommand};
use log::info;
use polyblog::load::ContentManifest;
use polyblog::pages::PageManifest;
use polyblog::{config, load, logging, output, pages, render};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "polyblog")]
#[command(about = "Static site generator for localized, paginated blogs")]
#[command(long_about = "\
Static site generator for localized, paginated blogs

Articles come from a headless CMS export (the JSON result of an articles
query). Every configured locale gets a paginated listing and one page per
article; one locale is served from the site root, the others from /<path>/.

Site structure:

  site/
  ├── config.toml      # Site config (optional, overrides stock defaults)
  ├── content.json     # CMS export: { data: { articles: { edges: [...] } } }
  └── static/          # Copied verbatim to the output root (optional)

Pipeline:

  load    config.toml + content.json → <temp-dir>/articles.json
  plan    articles.json              → <temp-dir>/pages.json
  render  pages.json                 → <output>/

Run 'polyblog gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate manifests
    #[arg(long, default_value = ".polyblog-temp", global = true)]
    temp_dir: PathBuf,

    /// Log pipeline progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load config and content into the articles manifest
    Load,
    /// Plan listing and article pages from the articles manifest
    Plan,
    /// Render the planned pages to HTML
    Render,
    /// Run the full pipeline: load → plan → render
    Build,
    /// Validate config and content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

const ARTICLES_MANIFEST: &str = "articles.json";
const PAGES_MANIFEST: &str = "pages.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Load => {
            let manifest = load::load(&cli.site)?;
            write_manifest(&cli.temp_dir.join(ARTICLES_MANIFEST), &manifest)?;
            print_load(&manifest, &cli.site);
        }
        Command::Plan => {
            let content: ContentManifest = read_manifest(&cli.temp_dir.join(ARTICLES_MANIFEST))?;
            let manifest = pages::plan(&content);
            write_manifest(&cli.temp_dir.join(PAGES_MANIFEST), &manifest)?;
            output::print_plan_output(&manifest);
        }
        Command::Render => {
            let manifest: PageManifest = read_manifest(&cli.temp_dir.join(PAGES_MANIFEST))?;
            init_thread_pool(&manifest.config.processing);
            let summary = render::render(&manifest, &cli.site, &cli.output)?;
            output::print_render_output(&manifest, &summary);
        }
        Command::Build => {
            println!("==> Stage 1: Loading {}", cli.site.display());
            let content = load::load(&cli.site)?;
            write_manifest(&cli.temp_dir.join(ARTICLES_MANIFEST), &content)?;
            print_load(&content, &cli.site);

            println!("==> Stage 2: Planning pages");
            let manifest = pages::plan(&content);
            write_manifest(&cli.temp_dir.join(PAGES_MANIFEST), &manifest)?;
            output::print_plan_output(&manifest);

            println!("==> Stage 3: Rendering HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let summary = render::render(&manifest, &cli.site, &cli.output)?;
            output::print_render_output(&manifest, &summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.site.display());
            let content = load::load(&cli.site)?;
            print_load(&content, &cli.site);
            let manifest = pages::plan(&content);
            output::print_plan_output(&manifest);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn print_load(manifest: &ContentManifest, site: &Path) {
    output::print_load_output(
        manifest,
        site.join("config.toml").exists(),
        site.join("static").is_dir(),
    );
}

fn write_manifest<T: Serialize>(path: &Path, manifest: &T) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    info!("wrote {}", path.display());
    Ok(())
}

fn read_manifest<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {} (run the previous stage first): {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can constrain
/// down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
