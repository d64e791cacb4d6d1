use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use twc_build::TiddlyWikiBuilder;
use twc_pipeline::{Combobulator, ExecutionMode, PipelineReport, TracingObserver};
use twc_source::{publish_folder, DispatchingResolver, TiddlyWikiCli};
use twc_types::Configuration;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Build(args) => cmd_build(args, format),
        Command::Merge(args) => cmd_merge(args, format),
        Command::Layers(args) => cmd_layers(args, format),
        Command::Check(args) => cmd_check(args, format),
    }
}

fn load(path: &Path) -> anyhow::Result<Configuration> {
    twc_config::load_file(path).with_context(|| format!("loading {}", path.display()))
}

fn combobulator(tiddlywiki: &Path, prefetch: bool) -> anyhow::Result<Combobulator> {
    // The loader has already rebased relative local paths on the config file.
    let resolver = DispatchingResolver::standard(TiddlyWikiCli::new(tiddlywiki), None)
        .context("setting up source resolvers")?;
    let mode = if prefetch {
        ExecutionMode::Prefetch
    } else {
        ExecutionMode::Sequential
    };
    Ok(Combobulator::new(Arc::new(resolver))
        .with_observer(Arc::new(TracingObserver))
        .with_mode(mode))
}

fn cmd_build(args: BuildArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load(&args.config)?;
    let builder = TiddlyWikiBuilder::new(TiddlyWikiCli::new(&args.tiddlywiki));
    let (report, artifact) = combobulator(&args.tiddlywiki, args.prefetch)?.build(&config, &builder)?;
    artifact
        .write_to(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    match format {
        OutputFormat::Json => {
            let mut value = report_json(&report);
            value["output"] = json!(args.output.display().to_string());
            value["bytes"] = json!(artifact.len());
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            print_report(&report);
            println!(
                "{} Built {} ({} bytes)",
                "✓".green().bold(),
                args.output.display().to_string().bold(),
                artifact.len()
            );
        }
    }
    Ok(())
}

fn cmd_merge(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load(&args.config)?;
    let report = combobulator(&args.tiddlywiki, args.prefetch)?.combobulate_with_report(&config)?;
    let written = publish_folder(report.merged.iter(), &args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;

    match format {
        OutputFormat::Json => {
            let mut value = report_json(&report);
            value["out"] = json!(args.out.display().to_string());
            value["files"] = json!(written);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            print_report(&report);
            println!(
                "{} Wrote {} files to {}",
                "✓".green().bold(),
                written,
                args.out.display().to_string().bold()
            );
        }
    }
    Ok(())
}

fn cmd_layers(args: LayersArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load(&args.config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&layers_json(&config))?),
        OutputFormat::Text => {
            println!("Precedence: {}", config.precedence.to_string().cyan());
            for (index, layer) in config.layers.iter().enumerate() {
                println!(
                    "  {} {} {}",
                    format!("[{index}]").yellow(),
                    layer.source.location.bold(),
                    format!("({})", layer.source.kind).dimmed()
                );
                if let Some(branch) = &layer.branch {
                    println!("      branch: {}", branch.green());
                }
                for pattern in &layer.exclude {
                    println!("      {} {}", "exclude:".red(), pattern.as_str());
                }
            }
            let order: Vec<String> = config
                .combination_order()
                .iter()
                .map(|i| i.to_string())
                .collect();
            println!("Combination order: {}", order.join(" -> "));
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load(&args.config)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "valid": true,
                "layers": config.len(),
                "precedence": config.precedence,
            }))?
        ),
        OutputFormat::Text => println!(
            "{} {} is valid: {} layers, {} precedence",
            "✓".green().bold(),
            args.config.display().to_string().bold(),
            config.len(),
            config.precedence
        ),
    }
    Ok(())
}

fn print_report(report: &PipelineReport) {
    for layer in &report.layers {
        println!(
            "  {} {} {} resolved, {} excluded, {} kept",
            format!("[{}]", layer.index).yellow(),
            layer.location.bold(),
            layer.resolved,
            layer.excluded.len(),
            layer.contributed
        );
    }
    println!(
        "Merged {} entries from {} layers, digest {}",
        report.merged.len().to_string().bold(),
        report.layers.len(),
        report.merged.digest().short_hex().cyan()
    );
}

fn report_json(report: &PipelineReport) -> serde_json::Value {
    json!({
        "precedence": report.precedence,
        "mode": report.mode,
        "entries": report.merged.len(),
        "digest": report.merged.digest().to_hex(),
        "elapsed_ms": report.elapsed.as_millis() as u64,
        "layers": report.layers,
    })
}

fn layers_json(config: &Configuration) -> serde_json::Value {
    json!({
        "precedence": config.precedence,
        "layers": config.layers.iter().enumerate().map(|(index, layer)| json!({
            "index": index,
            "source": layer.source.location,
            "kind": layer.source.kind,
            "branch": layer.branch,
            "exclude": layer.exclude.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "combination_order": config.combination_order(),
    })
}
