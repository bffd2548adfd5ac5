use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use voltbill_settings::{LanguageCode, TextCatalog};

const LISTED_MISSING: usize = 5;

#[derive(Debug, Parser)]
#[command(
    name = "l10n-compiler",
    about = "Validates the bill page text catalog and its overlays",
    version
)]
struct Args {
    /// 額外的字串表覆蓋檔。 / Overlay JSON files merged on top of the built-in catalog.
    #[arg(value_name = "OVERLAY")]
    overlays: Vec<PathBuf>,
    /// 遇到缺少鍵時使程序失敗。 / Fail when a language lacks keys the other one has.
    #[arg(long)]
    fail_on_missing: bool,
    /// 比對參考鍵清單確保覆蓋率。 / Optional reference key list to compare against.
    #[arg(long, value_name = "FILE")]
    reference: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("l10n-compiler error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut catalog = TextCatalog::builtin();
    for overlay in &args.overlays {
        let merged = catalog
            .load_overlay(overlay)
            .with_context(|| format!("merge overlay {}", overlay.display()))?;
        println!("Merged {} ({merged} strings)", overlay.display());
    }

    let mut total_missing = 0usize;
    for stats in catalog.stats() {
        let missing = catalog.missing_keys(stats.language);
        let mut line = format!(
            " - {} [{}]: {} strings",
            stats.language,
            stats.language.html_lang(),
            stats.total_entries
        );
        if !missing.is_empty() {
            line.push_str(&format!(", missing {} key(s)", missing.len()));
        }
        println!("{line}");
        for key in missing.iter().take(LISTED_MISSING) {
            println!("     · {key}");
        }
        if missing.len() > LISTED_MISSING {
            println!("     · ... {} more", missing.len() - LISTED_MISSING);
        }
        total_missing += missing.len();
    }

    if total_missing > 0 {
        eprintln!("Found {total_missing} key(s) present in one language only");
        if args.fail_on_missing {
            bail!("missing catalog keys detected");
        }
    }

    if let Some(reference) = args.reference.as_ref() {
        verify_reference_keys(&catalog, reference)?;
    }
    Ok(())
}

/// Key list exported from a page, e.g. every `data-i18n` value it uses.
#[derive(Debug, Deserialize)]
struct ReferenceKeys {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    language: Option<LanguageCode>,
    keys: Vec<String>,
}

fn verify_reference_keys(catalog: &TextCatalog, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read reference {}", path.display()))?;
    let reference: ReferenceKeys = serde_json::from_str(&contents)
        .with_context(|| format!("parse reference {}", path.display()))?;

    let languages = match reference.language {
        Some(language) => vec![language],
        None => LanguageCode::ALL.to_vec(),
    };
    let mut failed = false;
    for language in languages {
        let missing: Vec<&str> = reference
            .keys
            .iter()
            .map(String::as_str)
            .filter(|key| !catalog.contains(language, key))
            .collect();
        if missing.is_empty() {
            match &reference.source {
                Some(source) => println!(
                    "Reference coverage OK for '{language}' against {source} ({} keys)",
                    reference.keys.len()
                ),
                None => println!(
                    "Reference coverage OK for '{language}' ({} keys)",
                    reference.keys.len()
                ),
            }
            continue;
        }
        failed = true;
        eprintln!(
            "Reference check failed for '{language}'; missing {} key(s)",
            missing.len()
        );
        for key in missing {
            eprintln!("  · {key}");
        }
    }
    if failed {
        bail!("reference coverage mismatch detected");
    }
    Ok(())
}
