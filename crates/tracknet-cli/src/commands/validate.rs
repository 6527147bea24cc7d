//! Validate a layout description.

use clap::Args;
use tracknet_layout::{TrackLayout, ValidationError, validate_layout};

/// Check a layout description for structural problems.
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the layout file (.json or .toml)
    pub layout: std::path::PathBuf,
}

/// Run the validate command.
pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let layout = TrackLayout::read(&args.layout)?;

    match validate_layout(&layout) {
        Ok(()) => {
            println!(
                "{}: OK ({} modules, {} trackplans, {} junctions)",
                args.layout.display(),
                layout.modules.len(),
                layout.trackplans.len(),
                layout.junctions.len()
            );
            Ok(())
        }
        Err(err) => {
            let problems = match err {
                ValidationError::Multiple(all) => all,
                one => vec![one],
            };
            eprintln!("{}: {} problem(s)", args.layout.display(), problems.len());
            for problem in &problems {
                eprintln!("  - {problem}");
            }
            anyhow::bail!("layout '{}' is invalid", layout.layout.name)
        }
    }
}
