use enum_derive_2018::EnumFromInner;

use timetrim::{Defragmentation, IntervalError, ManifestError, SupervisionSet};

#[derive(clap::Parser, Debug)]
/// timetrim: rewrite segment timestamps onto a defragmented timeline.
///
/// Reads a YAML manifest of the regions to keep (for example the output of
/// an activity-detection pass), cuts everything between them, and reports
/// where timestamps recorded against the original timeline end up.
struct Cli {
    /// Manifest of segments to keep, YAML
    keep: std::path::PathBuf,

    /// Manifest of supervision segments to rewrite, YAML
    #[arg(short, long)]
    supervisions: Option<std::path::PathBuf>,

    /// Individual time points (seconds) to remap
    #[arg(short, long)]
    point: Vec<f64>,

    /// Print times with this many decimal digits
    #[arg(long, default_value_t = 3)]
    digits: usize,
}

macro_attr_2018::macro_attr! {
    #[derive(Debug, EnumFromInner!)]
    enum CliError {
        Manifest(ManifestError),
        Interval(IntervalError),
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Manifest(e) => write!(f, "{}", e),
            CliError::Interval(e) => write!(f, "{}", e),
        }
    }
}

fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("timetrim: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let kept = SupervisionSet::load(&cli.keep)?;
    log::info!("keeping {} segments from {:?}", kept.len(), cli.keep);
    let defrag = Defragmentation::new(kept.extents())?;
    let kept_total: f64 = defrag.segments().iter().map(|(_, d)| d).sum();
    log::info!(
        "{} kept regions, {:.3}s of material",
        defrag.segments().len(),
        kept_total
    );

    for &point in &cli.point {
        println!(
            "{0:.2$} -> {1:.2$}",
            point,
            defrag.reverse_timestamp(point),
            cli.digits
        );
    }

    if let Some(supervisions_path) = &cli.supervisions {
        let supervisions = SupervisionSet::load(supervisions_path)?;
        for segment in supervisions.iter() {
            let (start, duration) = defrag.reverse_segment(segment.start, segment.duration);
            println!("- id: {}", segment.id);
            println!("  recording_id: {}", segment.recording_id);
            println!("  start: {:.1$}", start, cli.digits);
            println!("  duration: {:.1$}", duration, cli.digits);
            println!("  channel: {}", segment.channel);
        }
    }
    Ok(())
}
