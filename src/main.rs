use anyhow::{bail, Result};
use tracing::info;

use imposekit::{init_logging, LayoutFile, BUILD_DATE, VERSION};

/// Loads a layout file, normalizes it, prints a summary, and optionally
/// writes the normalized form back out.
fn main() -> Result<()> {
    init_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = match args.as_slice() {
        [input] => (input.clone(), None),
        [input, output] => (input.clone(), Some(output.clone())),
        _ => bail!("usage: imposekit <layout.json> [normalized-output.json]"),
    };

    info!(version = VERSION, build = BUILD_DATE, "imposekit");

    let file = LayoutFile::load_from_file(&input)?;
    let name = file.metadata.name.clone();
    let layout = file.into_layout();

    println!("Layout: {}", name);
    println!(
        "  Sheet: {} x {} mm, bleed {} mm",
        layout.sheet.width_mm, layout.sheet.height_mm, layout.sheet.default_bleed_mm
    );
    println!(
        "  Faces: {} (active: {})",
        layout.faces().len(),
        layout.active_face()
    );
    for face in layout.faces() {
        println!("    {}: {} slots", face, layout.slots_on_face(*face).count());
    }
    println!("  Works: {}", layout.works.len());
    println!("  Designs: {}", layout.designs.len());
    println!("  Engine: {}", layout.imposition_engine);

    if let Some(output) = output {
        LayoutFile::from_layout(&layout, &name).save_to_file(&output)?;
        info!(path = %output, "wrote normalized layout");
    }

    Ok(())
}
