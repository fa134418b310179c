//! Placard CLI - check retail creatives from the command line

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{quick_check, rules, snap, validate, RuleSelection};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "placard")]
#[command(about = "Validate and auto-fix retail creative layouts", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging on stderr (overridden by PLACARD_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scene, optionally applying auto-fixes
    Validate {
        /// Path to a scene (.json or .toml)
        scene: String,

        /// Treat the file as a JSON validation request carrying its own context
        #[arg(long, conflicts_with = "suggestions")]
        request: bool,

        /// Treat the file as a JSON suggestion list and validate every layout
        #[arg(long)]
        suggestions: bool,

        /// Canvas size in pixels
        #[arg(long, default_value = "1080x1920")]
        canvas_size: String,

        /// Output channel (facebook, instagram, stories, in_store)
        #[arg(long, default_value = "stories")]
        channel: String,

        /// The creative features a regulated product such as alcohol
        #[arg(long)]
        alcohol: bool,

        /// Apply auto-fixes and save the scene
        #[arg(long)]
        fix: bool,

        /// Preview fixes without saving
        #[arg(long)]
        dry_run: bool,

        /// Show diff of changes
        #[arg(long)]
        output_diff: bool,

        /// incremental or batch
        #[arg(long, default_value = "incremental")]
        fix_mode: String,

        /// Directory holding channels/*.toml profile overrides
        #[arg(long)]
        profiles: Option<String>,

        /// Also run the advisory brand checks (logo, hierarchy, overlap, balance, palette)
        #[arg(long)]
        comprehensive: bool,

        /// Brand palette for the color check, e.g. "#E30613,#00539F"
        #[arg(long, value_delimiter = ',', requires = "comprehensive")]
        brand_colors: Vec<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check loose copy before a scene is assembled
    QuickCheck {
        #[arg(long)]
        headline: Option<String>,

        #[arg(long)]
        subhead: Option<String>,

        /// Retailer tag text
        #[arg(long)]
        tag: Option<String>,

        #[arg(long)]
        alcohol: bool,

        /// Directory holding channels/*.toml profile overrides
        #[arg(long)]
        profiles: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List every rule code with its severity
    Rules {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Snap a dragged element and print (or apply) the result
    Snap {
        /// Path to a scene (.json or .toml)
        scene: String,

        /// Index of the dragged element
        #[arg(long)]
        index: usize,

        /// Dragged left edge in pixels
        #[arg(long)]
        x: f64,

        /// Dragged top edge in pixels
        #[arg(long)]
        y: f64,

        #[arg(long, default_value = "1080x1920")]
        canvas_size: String,

        #[arg(long, default_value = "stories")]
        channel: String,

        /// Snap distance in pixels
        #[arg(long, default_value_t = placard_core::geometry::DEFAULT_SNAP_THRESHOLD)]
        threshold: f64,

        /// Write the moved element back to the scene file
        #[arg(long)]
        apply: bool,

        /// Directory holding channels/*.toml profile overrides
        #[arg(long)]
        profiles: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PLACARD_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate {
            scene,
            request,
            suggestions,
            canvas_size,
            channel,
            alcohol,
            fix,
            dry_run,
            output_diff,
            fix_mode,
            profiles,
            comprehensive,
            brand_colors,
            format,
        } => validate::run(validate::ValidateArgs {
            scene,
            request,
            suggestions,
            canvas_size,
            channel,
            alcohol,
            fix,
            dry_run,
            output_diff,
            fix_mode,
            profiles,
            rules: RuleSelection {
                comprehensive,
                brand_colors,
            },
            format,
        }),
        Commands::QuickCheck {
            headline,
            subhead,
            tag,
            alcohol,
            profiles,
            format,
        } => quick_check::run(quick_check::QuickCheckArgs {
            headline,
            subhead,
            tag,
            alcohol,
            profiles,
            format,
        }),
        Commands::Rules { format } => rules::run(&format),
        Commands::Snap {
            scene,
            index,
            x,
            y,
            canvas_size,
            channel,
            threshold,
            apply,
            profiles,
        } => snap::run(snap::SnapArgs {
            scene,
            index,
            x,
            y,
            canvas_size,
            channel,
            threshold,
            apply,
            profiles,
        }),
    }
}
