use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use voltbill_dom::Document;
use voltbill_offline::CacheManifest;
use voltbill_page::{ApplyReport, LanguageSwitcher, ScanReport};
use voltbill_settings::{
    FileStorage, KeyValueStorage, LanguageCode, LanguagePreference, Lookup, MemoryStorage,
    PageConfig, PreferenceOutcome, TextCatalog,
};

const DEFAULT_STATE_PATH: &str = ".voltbill/storage.json";

#[derive(Parser)]
#[command(
    name = "voltbill",
    about = "Bilingual tooling for the electricity bill pages",
    author,
    version
)]
struct Cli {
    /// 語言偏好儲存檔。 / JSON file holding the persisted language preference.
    #[arg(long, global = true, value_name = "PATH")]
    state: Option<PathBuf>,
    /// 頁面設定檔。 / Page config JSON; defaults apply when omitted or missing.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// 增加日誌詳細程度（可重複）。 / Increase log verbosity (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 讀取或設定語言偏好。 / Read or change the language preference.
    #[command(subcommand)]
    Language(LanguageCommand),
    /// 將語言套用到頁面標記。 / Apply a language to page markup.
    Render(RenderArgs),
    /// 查詢字串表。 / Query the text catalog.
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// 離線快取資訊。 / Offline cache information.
    #[command(subcommand)]
    Offline(OfflineCommand),
}

#[derive(Subcommand)]
enum LanguageCommand {
    /// 顯示目前語言。 / Print the active language code.
    Get,
    /// 設定語言；不支援的代碼會被忽略。 / Store a language code; unsupported codes are ignored.
    Set(LanguageSetArgs),
}

#[derive(Args)]
struct LanguageSetArgs {
    #[arg(value_name = "CODE")]
    code: String,
}

#[derive(Args)]
struct RenderArgs {
    /// 頁面標記檔。 / Page markup file.
    #[arg(value_name = "PAGE")]
    page: PathBuf,
    /// 使用指定語言而不改變偏好。 / Render in this language without touching the preference.
    #[arg(long, value_name = "CODE")]
    lang: Option<LanguageCode>,
    /// 輸出檔案；預設為標準輸出。 / Output file; defaults to stdout.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
    /// 額外的字串表覆蓋檔。 / Extra catalog overlay files.
    #[arg(long = "overlay", value_name = "FILE")]
    overlays: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// 查詢單一鍵。 / Look up one key.
    Lookup(CatalogLookupArgs),
    /// 回報各語言缺少的鍵。 / Report keys missing per language.
    Check(CatalogCheckArgs),
}

#[derive(Args)]
struct CatalogLookupArgs {
    #[arg(value_name = "KEY")]
    key: String,
    /// 語言；預設為目前偏好。 / Language; defaults to the active preference.
    #[arg(long, value_name = "CODE")]
    lang: Option<LanguageCode>,
}

#[derive(Args)]
struct CatalogCheckArgs {
    /// 有缺少的鍵時以非零狀態結束。 / Exit non-zero when any key is missing.
    #[arg(long)]
    fail_on_missing: bool,
    #[arg(long = "overlay", value_name = "FILE")]
    overlays: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum OfflineCommand {
    /// 列出預先快取的資源。 / Print the pre-cache manifest.
    Manifest(OfflineManifestArgs),
}

#[derive(Args)]
struct OfflineManifestArgs {
    /// 自訂清單檔。 / Custom manifest JSON instead of the built-in one.
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
    /// 以 JSON 輸出。 / Print as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct CliState {
    state: PathBuf,
    config: PageConfig,
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        state,
        config,
        command,
        ..
    } = cli;
    let context = CliState {
        state: state.unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
        config: load_config(config.as_deref())?,
    };
    match command {
        Commands::Language(subcommand) => execute_language_command(subcommand, &context),
        Commands::Render(args) => execute_render(args, &context),
        Commands::Catalog(subcommand) => execute_catalog_command(subcommand, &context),
        Commands::Offline(subcommand) => execute_offline_command(subcommand),
    }
}

fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    match path {
        Some(path) => PageConfig::load(path)
            .with_context(|| format!("failed to load page config '{}'", path.display())),
        None => Ok(PageConfig::default()),
    }
}

fn load_preference(context: &CliState) -> Result<LanguagePreference<FileStorage>> {
    let storage = FileStorage::load(&context.state)
        .with_context(|| format!("failed to open state file '{}'", context.state.display()))?;
    Ok(LanguagePreference::load(
        storage,
        context.config.language_key.clone(),
        context.config.default_language,
    ))
}

fn load_catalog(overlays: &[PathBuf]) -> Result<TextCatalog> {
    let mut catalog = TextCatalog::builtin();
    for overlay in overlays {
        let merged = catalog
            .load_overlay(overlay)
            .with_context(|| format!("failed to merge overlay '{}'", overlay.display()))?;
        debug!(overlay = %overlay.display(), entries = merged, "overlay merged");
    }
    Ok(catalog)
}

fn execute_language_command(command: LanguageCommand, context: &CliState) -> Result<()> {
    let mut preference = load_preference(context)?;
    match command {
        LanguageCommand::Get => println!("{}", preference.get()),
        LanguageCommand::Set(args) => match preference.set_raw(args.code.trim())? {
            PreferenceOutcome::Stored { previous, current } => {
                println!("Language changed from {previous} to {current}");
            }
            PreferenceOutcome::Unchanged(code) => println!("Language already set to {code}"),
            PreferenceOutcome::Ignored { rejected } => {
                println!(
                    "Ignoring unsupported language '{rejected}'; keeping {}",
                    preference.get()
                );
            }
        },
    }
    Ok(())
}

fn execute_render(args: RenderArgs, context: &CliState) -> Result<()> {
    let markup = fs::read_to_string(&args.page)
        .with_context(|| format!("failed to read page '{}'", args.page.display()))?;
    let mut doc = Document::parse(&markup)
        .with_context(|| format!("failed to parse page '{}'", args.page.display()))?;
    let catalog = load_catalog(&args.overlays)?;

    let (scan, report) = match args.lang {
        Some(code) => {
            let storage = MemoryStorage::new().with_entry(context.config.language_key.clone(), code.code());
            let preference = LanguagePreference::load(storage, context.config.language_key.clone(), code);
            render_with(&mut doc, preference, catalog)
        }
        None => render_with(&mut doc, load_preference(context)?, catalog),
    };
    report_problems(&scan, &report);

    let rendered = doc.to_markup().context("failed to serialize page")?;
    match args.output {
        Some(output) => {
            fs::write(&output, rendered)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            eprintln!("Rendered {} in {} to {}", args.page.display(), report.language, output.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }
    Ok(())
}

fn render_with<S: KeyValueStorage>(
    doc: &mut Document,
    preference: LanguagePreference<S>,
    catalog: TextCatalog,
) -> (ScanReport, ApplyReport) {
    let (switcher, report) = LanguageSwitcher::init(doc, preference, catalog);
    (switcher.registry().report().clone(), report)
}

fn report_problems(scan: &ScanReport, report: &ApplyReport) {
    for incomplete in &scan.incomplete {
        eprintln!(
            "warning: element declares {} without {}",
            incomplete.present, incomplete.absent
        );
    }
    if !report.missing.is_empty() {
        eprintln!(
            "warning: {} binding(s) have no {} text",
            report.missing.len(),
            report.language
        );
        for missing in &report.missing {
            match &missing.key {
                Some(key) => eprintln!("  missing catalog key '{key}'"),
                None => eprintln!("  empty inline {:?} string", missing.target),
            }
        }
    }
}

fn execute_catalog_command(command: CatalogCommand, context: &CliState) -> Result<()> {
    match command {
        CatalogCommand::Lookup(args) => {
            let catalog = TextCatalog::builtin();
            let language = match args.lang {
                Some(code) => code,
                None => load_preference(context)?.get(),
            };
            match catalog.lookup(language, &args.key) {
                Lookup::Found(text) => println!("{text}"),
                Lookup::Missing => bail!("no '{}' entry for key '{}'", language, args.key),
            }
            Ok(())
        }
        CatalogCommand::Check(args) => {
            let catalog = load_catalog(&args.overlays)?;
            let mut any_missing = false;
            for stats in catalog.stats() {
                println!(
                    "{}: {} entries, {} missing",
                    stats.language, stats.total_entries, stats.missing_entries
                );
                for key in catalog.missing_keys(stats.language) {
                    any_missing = true;
                    println!("  missing: {key}");
                }
            }
            if args.fail_on_missing && any_missing {
                bail!("catalog has missing keys");
            }
            Ok(())
        }
    }
}

fn execute_offline_command(command: OfflineCommand) -> Result<()> {
    match command {
        OfflineCommand::Manifest(args) => {
            let manifest = match &args.manifest {
                Some(path) => CacheManifest::load(path)
                    .with_context(|| format!("failed to load manifest '{}'", path.display()))?,
                None => CacheManifest::default(),
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                println!("cache: {}", manifest.cache_name());
                for url in &manifest.urls {
                    println!("  {url}");
                }
            }
            Ok(())
        }
    }
}
