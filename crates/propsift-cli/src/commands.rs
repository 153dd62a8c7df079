use std::fs;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use propsift_engine::{export_csv, load_rules, score_all, scored_results};
use propsift_import::pipeline;
use propsift_ingest::{normalize_csv_text, parse_csv_text};
use propsift_map::{MappingState, REQUIRED_FIELDS};
use propsift_model::{ExportOptions, ResultFilter, ScoringRule};
use propsift_store::{Filter, MemoryStore, Store, TABLE_PROPERTIES, TABLE_SCORING_RULES};

use crate::cli::{ImportArgs, ResultsArgs, ScoreArgs};
use crate::fields::DESTINATION_FIELDS;
use crate::store_file::{load_store, save_store};
use crate::summary::{print_fields, print_import_summary, print_mapping, print_preview, print_results};

pub fn run_import(args: &ImportArgs) -> Result<()> {
    let csv_text = fs::read_to_string(&args.csv_file)
        .with_context(|| format!("read {}", args.csv_file.display()))?;
    let parsed = parse_csv_text(&normalize_csv_text(&csv_text));
    if parsed.headers.is_empty() {
        bail!("{} has no header row", args.csv_file.display());
    }

    let state = build_mapping(args, parsed.headers.clone())?;
    print_mapping(&state);

    let missing = state.missing_required();
    if !missing.is_empty() {
        if args.allow_incomplete {
            warn!(missing = ?missing, "importing with unmapped required fields");
        } else {
            bail!(
                "required fields unmapped: {} (use --allow-incomplete to import anyway)",
                missing.join(", ")
            );
        }
    }

    if args.dry_run {
        print_preview(&parsed);
        return Ok(());
    }

    let store = load_store(&args.store)?;
    let runtime = runtime()?;
    let bar = progress_bar(parsed.total_rows as u64, "importing");
    let report = |done: usize, _total: usize| bar.set_position(done as u64);
    let summary = runtime.block_on(pipeline::run_import(
        &store,
        &csv_text,
        &state.mappings,
        Some(&report),
    ))?;
    bar.finish_and_clear();
    runtime.block_on(save_store(&store, &args.store))?;
    print_import_summary(&summary);
    Ok(())
}

pub fn run_score(args: &ScoreArgs) -> Result<()> {
    let store = load_store(&args.store)?;
    let runtime = runtime()?;

    if let Some(path) = &args.rules {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let rules: Vec<ScoringRule> = serde_json::from_str(&text)
            .with_context(|| format!("parse rules file {}", path.display()))?;
        for rule in &rules {
            if rule.configuration_id != args.configuration_id {
                warn!(
                    rule = %rule.rule_name,
                    rule_configuration = %rule.configuration_id,
                    "rule belongs to a different configuration"
                );
            }
        }
        runtime.block_on(replace_rules(&store, &args.configuration_id, &rules))?;
        info!(count = rules.len(), "loaded rules from file");
    }

    let rules = runtime.block_on(load_rules(&store, &args.configuration_id))?;
    if rules.is_empty() {
        warn!(
            configuration_id = %args.configuration_id,
            "no rules for this configuration; every property scores 0"
        );
    }

    let total = runtime.block_on(store.count(TABLE_PROPERTIES));
    let bar = progress_bar(total as u64, "scoring");
    let report = |done: usize, _total: usize| bar.set_position(done as u64);
    let run = runtime.block_on(score_all(&store, &args.configuration_id, Some(report)))?;
    bar.finish_and_clear();
    runtime.block_on(save_store(&store, &args.store))?;
    if run.failed > 0 {
        warn!(failed = run.failed, "some properties could not be scored");
    }
    println!(
        "Scored {} properties with {} rules under configuration {}.",
        run.processed,
        rules.len(),
        args.configuration_id
    );
    Ok(())
}

pub fn run_results(args: &ResultsArgs) -> Result<()> {
    let store = load_store(&args.store)?;
    let runtime = runtime()?;
    let filter = ResultFilter {
        min_score: args.min_score,
        max_score: args.max_score,
        tags: args.tags.clone(),
        lists: args.lists.clone(),
    };
    let rows = runtime.block_on(scored_results(&store, &args.configuration_id, &filter))?;

    match &args.export {
        Some(path) => {
            let selected_fields = if args.fields.is_empty() {
                REQUIRED_FIELDS.iter().map(|f| (*f).to_string()).collect()
            } else {
                args.fields.clone()
            };
            let options = ExportOptions {
                include_headers: !args.no_headers,
                include_scores: !args.no_scores,
                include_metadata: args.include_metadata,
                selected_fields,
            };
            let csv = export_csv(&rows, &options);
            fs::write(path, csv).with_context(|| format!("write {}", path.display()))?;
            println!("Exported {} rows to {}.", rows.len(), path.display());
        }
        None => print_results(&rows),
    }
    Ok(())
}

pub fn run_fields() {
    print_fields();
}

fn build_mapping(args: &ImportArgs, columns: Vec<String>) -> Result<MappingState> {
    let fields = DESTINATION_FIELDS.iter().map(|f| (*f).to_string()).collect();
    let mut state = MappingState::new(columns, fields);
    for entry in &args.map {
        let Some((column, field)) = entry.split_once('=') else {
            bail!("invalid --map '{entry}', expected COLUMN=FIELD");
        };
        let (column, field) = (column.trim(), field.trim());
        if !state.columns.iter().any(|c| c == column) {
            bail!("--map names unknown column '{column}'");
        }
        if !DESTINATION_FIELDS.contains(&field) {
            bail!("--map names unknown destination field '{field}'");
        }
        state.assign_exclusive(column, field);
    }
    if !args.no_auto_map {
        state.run_auto_map();
    }
    for (destination, sources) in state.conflicts() {
        warn!(destination, sources = ?sources, "multiple columns map to one destination");
    }
    Ok(state)
}

async fn replace_rules(
    store: &MemoryStore,
    configuration_id: &str,
    rules: &[ScoringRule],
) -> Result<()> {
    store
        .delete(
            TABLE_SCORING_RULES,
            &[Filter::eq("configuration_id", configuration_id)],
        )
        .await?;
    let rows = rules.iter().map(ScoringRule::to_record).collect();
    store.insert(TABLE_SCORING_RULES, rows).await?;
    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("start async runtime")
}

fn progress_bar(total: u64, message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("=> "));
    bar.set_message(message);
    bar
}
