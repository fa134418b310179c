//! Scene validation command

use super::{load_validator, parse_context, print_json, print_result_text, RuleSelection};
use anyhow::{anyhow, Context, Result};
use placard_constraint::{scene_diff, FixMode, FixReport, Fixer, ValidateRequest, Validator};
use placard_core::CanvasContext;
use placard_scene::{load_scene, load_suggestions_string, save_scene, save_scene_string, Scene, SceneFormat};
use std::fs;

pub struct ValidateArgs {
    pub scene: String,
    pub request: bool,
    pub suggestions: bool,
    pub canvas_size: String,
    pub channel: String,
    pub alcohol: bool,
    pub fix: bool,
    pub dry_run: bool,
    pub output_diff: bool,
    pub fix_mode: String,
    pub profiles: Option<String>,
    pub rules: RuleSelection,
    pub format: String,
}

/// Where the scene came from, so a fixed scene can be written back in kind
enum Source {
    SceneFile(SceneFormat),
    Request(ValidateRequest),
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let validator = load_validator(args.profiles.as_deref(), &args.rules)?;
    let mode: FixMode = args.fix_mode.parse().map_err(|e: String| anyhow!(e))?;

    if args.suggestions {
        return run_suggestions(&args, &validator);
    }

    let (source, scene, ctx) = if args.request {
        let content = fs::read_to_string(&args.scene)
            .with_context(|| format!("reading {}", args.scene))?;
        let request = ValidateRequest::from_json(&content)?;
        let ctx = request.context()?;
        let scene = request.layout.clone();
        (Source::Request(request), scene, ctx)
    } else {
        let scene = load_scene(&args.scene)?;
        let ctx = parse_context(&args.canvas_size, &args.channel, args.alcohol)?;
        (Source::SceneFile(SceneFormat::from_path(&args.scene)), scene, ctx)
    };

    if args.fix || args.dry_run {
        let run = Fixer::new(&validator).fix_all(&scene, &ctx, mode);
        let report = &run.report;

        if args.format == "json" {
            print_json(report)?;
        } else {
            print_fix_report(report, args.dry_run);
        }

        if !report.actions.is_empty() {
            if !args.dry_run {
                write_back(&args.scene, &source, &run.scene)?;
                if args.format != "json" {
                    println!("\nScene saved to {}", args.scene);
                }
            }

            if args.output_diff {
                let before = serialize(&source, &scene)?;
                let after = serialize(&source, &run.scene)?;
                println!("\nDiff:");
                print!("{}", scene_diff(&before, &after));
            }
        }

        if !report.result.ok {
            std::process::exit(1);
        }
    } else {
        let result = validator.validate(&scene, &ctx);

        if args.format == "json" {
            print_json(&result)?;
        } else {
            print_result_text(&result, validator.resolver());
        }

        if !result.ok {
            std::process::exit(1);
        }
    }

    Ok(())
}

fn run_suggestions(args: &ValidateArgs, validator: &Validator) -> Result<()> {
    let content =
        fs::read_to_string(&args.scene).with_context(|| format!("reading {}", args.scene))?;
    let layouts = load_suggestions_string(&content)?;
    let ctx: CanvasContext = parse_context(&args.canvas_size, &args.channel, args.alcohol)?;

    let results: Vec<_> = layouts
        .iter()
        .map(|scene| (scene, validator.validate(scene, &ctx)))
        .collect();

    if args.format == "json" {
        let rows: Vec<serde_json::Value> = results
            .iter()
            .map(|(scene, result)| {
                serde_json::json!({
                    "id": scene.id,
                    "score": scene.score,
                    "result": result,
                })
            })
            .collect();
        print_json(&rows)?;
    } else {
        println!("{} suggestion(s):", results.len());
        for (scene, result) in &results {
            let verdict = if result.ok { "pass" } else { "FAIL" };
            println!(
                "  [{}] {} (score {:.2}): {}",
                verdict,
                scene.id,
                scene.score,
                result.summary()
            );
        }
    }

    if results.iter().any(|(_, result)| !result.ok) {
        std::process::exit(1);
    }
    Ok(())
}

fn print_fix_report(report: &FixReport, dry_run: bool) {
    let label = if dry_run { "Dry run results" } else { "Fix results" };
    println!(
        "{} ({} iteration(s), {} mode):",
        label,
        report.iterations,
        report.mode.as_str()
    );

    if report.actions.is_empty() {
        println!("  No fixes applied.");
    }
    for action in &report.actions {
        println!(
            "  [{}] {}: {}",
            action.strategy, action.target, action.description
        );
    }

    if !report.unresolved.is_empty() {
        println!("\n  {} issue(s) remain after fixes:", report.unresolved.len());
        for issue in &report.unresolved {
            let target = issue
                .element_index
                .map(|i| format!(" #{}", i))
                .unwrap_or_default();
            println!("  [{}]{}: {}", issue.code, target, issue.reason);
        }
    }

    if report.cycle_detected {
        println!("  Warning: Fix cycle detected.");
    }
}

fn serialize(source: &Source, scene: &Scene) -> Result<String> {
    Ok(match source {
        Source::SceneFile(format) => save_scene_string(scene, *format)?,
        Source::Request(_) => save_scene_string(scene, SceneFormat::Json)?,
    })
}

fn write_back(path: &str, source: &Source, scene: &Scene) -> Result<()> {
    match source {
        Source::SceneFile(_) => save_scene(path, scene)?,
        Source::Request(request) => {
            let mut request = request.clone();
            request.layout = scene.clone();
            let mut content = serde_json::to_string_pretty(&request)?;
            content.push('\n');
            fs::write(path, content).with_context(|| format!("writing {}", path))?;
        }
    }
    Ok(())
}
