use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use legend_rs::export::{self, ExportOptions};
use legend_rs::render::FontMeasurer;
use legend_rs::{ChartInput, LegendController, MarginBook, Orientation, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "legend",
    version,
    about = "Lay out, render & toggle chart legends from a JSON chart description"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the legend layout and margin reservation.
    Layout(LayoutArgs),
    /// Paint the legend to an image.
    Render(RenderArgs),
    /// Click a legend entry and print (or write back) the updated chart.
    Toggle(ToggleArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrientationArg {
    V,
    H,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Chart description (JSON).
    #[arg(short, long)]
    input: PathBuf,
    /// Override the legend orientation.
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,
    /// Group entries by legend group.
    #[arg(long, default_value_t = false)]
    grouped: bool,
}

impl InputArgs {
    fn load(&self) -> Result<ChartInput> {
        let mut chart = storage::load_chart(&self.input)?;
        if let Some(o) = self.orientation {
            chart.legend.orientation = match o {
                OrientationArg::V => Orientation::Vertical,
                OrientationArg::H => Orientation::Horizontal,
            };
        }
        if self.grouped {
            chart.legend.grouped = true;
        }
        Ok(chart)
    }
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Save the layout (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Image path (.svg, .png, .jpg).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Image width (defaults to the chart canvas width).
    #[arg(long)]
    width: Option<f64>,
    /// Image height (defaults to the chart canvas height).
    #[arg(long)]
    height: Option<f64>,
    /// Bitmap upscaling factor.
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,
    /// Wheel deltas applied before painting (repeatable).
    #[arg(long = "scroll", allow_negative_numbers = true)]
    scroll: Vec<f64>,
    /// Print the legend as an SVG data URL.
    #[arg(long, default_value_t = false)]
    data_url: bool,
}

#[derive(Args, Debug)]
struct ToggleArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Flat index of the entry to click.
    #[arg(short, long)]
    entry: usize,
    /// Write the updated chart back to --input instead of printing it.
    #[arg(long, default_value_t = false)]
    write: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Render(args) => cmd_render(args),
        Command::Toggle(args) => cmd_toggle(args),
    }
}

fn cmd_layout(args: LayoutArgs) -> Result<()> {
    let chart = args.input.load()?;
    let mut ctl = LegendController::new("0");
    let mut margins = MarginBook::new();
    let Some(state) = ctl.redraw(&chart, &FontMeasurer, &mut margins)? else {
        eprintln!("Legend is empty or disabled; no panel");
        return Ok(());
    };

    match args.out.as_ref() {
        Some(path) => {
            let fmt = match args.format {
                Some(OutFormat::Csv) => "csv",
                Some(OutFormat::Json) => "json",
                None => path.extension().and_then(|e| e.to_str()).unwrap_or("json"),
            }
            .to_ascii_lowercase();
            match fmt.as_str() {
                "csv" => storage::save_entries_csv(state, path)?,
                "json" => storage::save_layout_json(state, path)?,
                other => anyhow::bail!("unsupported format: {}", other),
            }
            eprintln!(
                "Saved layout of {} entries to {}",
                state.layout.entry_count(),
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(state)?),
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    if args.out.is_none() && !args.data_url {
        anyhow::bail!("nothing to do: pass --out and/or --data-url");
    }
    let chart = args.input.load()?;
    let mut ctl = LegendController::new("0");
    let mut margins = MarginBook::new();
    ctl.redraw(&chart, &FontMeasurer, &mut margins)?;
    for dy in &args.scroll {
        ctl.wheel(*dy);
    }
    let Some(scene) = ctl.scene() else {
        eprintln!("Legend is empty or disabled; nothing rendered");
        return Ok(());
    };

    let opts = ExportOptions {
        width: Some(args.width.unwrap_or(chart.canvas.width)),
        height: Some(args.height.unwrap_or(chart.canvas.height)),
        pixel_ratio: args.pixel_ratio,
    };
    if let Some(path) = args.out.as_ref() {
        export::export_scene(&scene, path, &opts)?;
        eprintln!("Wrote legend to {}", path.display());
    }
    if args.data_url {
        let svg = export::render_svg(&scene, &opts)?;
        println!("{}", export::svg_data_url(&svg));
    }
    Ok(())
}

fn cmd_toggle(args: ToggleArgs) -> Result<()> {
    let mut chart = args.input.load()?;
    let mut ctl = LegendController::new("0");
    let mut margins = MarginBook::new();
    ctl.redraw(&chart, &FontMeasurer, &mut margins)?;
    let change = ctl.click_entry(args.entry, &mut chart, &FontMeasurer, &mut margins)?;
    match change {
        Some(c) => eprintln!("{}", serde_json::to_string(&c)?),
        None => eprintln!("entry {} changed nothing", args.entry),
    }
    if args.write {
        storage::save_chart(&chart, &args.input.input)?;
        eprintln!("Updated {}", args.input.input.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    }
    Ok(())
}
