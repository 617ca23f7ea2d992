use anyhow::Result;

use crate::{
    cli::{Cli, RenderArgs},
    guard::DateCheck,
    pipeline::{Dataset, Pipeline},
};

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let mut config = super::load_config(cli)?;
    let render = &mut config.render;
    if let Some(output) = &args.output { render.output = output.clone() }
    if let Some(width) = args.width { render.width = width }
    if let Some(height) = args.height { render.height = height }
    if let Some(rate_mode) = args.rate_mode { render.rate_mode = rate_mode }
    config.validate()?;

    let gradient_name = args.gradient.clone()
        .unwrap_or_else(|| config.render.gradient.name().to_string());

    let dataset = Dataset::load(&config)?;
    let pipeline = Pipeline::new(&dataset, &config.render);

    let map = pipeline.render(args.date, &gradient_name)?;
    match pipeline.check(args.date) {
        DateCheck::Valid => println!(
            "Rendered {} ({} municipalities, {} without data) -> {}",
            args.date, map.features.len(), map.missing_count(), config.render.output.display(),
        ),
        DateCheck::OutOfRange => println!("{} -> {}", map.title, config.render.output.display()),
    }

    if let Some(path) = &args.export_csv {
        if pipeline.export_csv(args.date, path)? {
            println!("Joined table -> {}", path.display());
        }
    }

    Ok(())
}
