//! Drag-and-snap command

use super::{load_validator, parse_context, print_json, RuleSelection};
use anyhow::Result;
use placard_core::geometry::to_percent;
use placard_scene::{drag_snap, load_scene, save_scene, SceneCommand};

pub struct SnapArgs {
    pub scene: String,
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub canvas_size: String,
    pub channel: String,
    pub threshold: f64,
    pub apply: bool,
    pub profiles: Option<String>,
}

pub fn run(args: SnapArgs) -> Result<()> {
    let validator = load_validator(args.profiles.as_deref(), &RuleSelection::default())?;
    let ctx = parse_context(&args.canvas_size, &args.channel, false)?;
    let zone = validator.profile_for(&ctx).safe_zone;
    let scene = load_scene(&args.scene)?;

    let snap = drag_snap(&scene, args.index, args.x, args.y, ctx.canvas, &zone, args.threshold)?;
    print_json(&serde_json::json!({
        "snap": snap,
        "x_pct": to_percent(snap.x, ctx.canvas.width),
        "y_pct": to_percent(snap.y, ctx.canvas.height),
    }))?;

    if args.apply {
        let moved = SceneCommand::Drag {
            index: args.index,
            x_px: args.x,
            y_px: args.y,
            canvas: ctx.canvas,
            safe_zone: zone,
            threshold: args.threshold,
        }
        .apply(&scene)?;
        save_scene(&args.scene, &moved)?;
        eprintln!("Scene saved to {}", args.scene);
    }

    Ok(())
}
