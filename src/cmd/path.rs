use anyhow::Result;

const USAGE: &str = "Usage: drivepath path <path|id>";

pub fn run(args: &[String]) -> Result<()> {
    let target = super::single_arg(args, USAGE)?;
    let config = super::cli_config()?;
    let client = super::cli_client(&config)?;
    let mut resolver = super::cli_resolver(&client, &config);

    let id = resolver.secure_id(target);
    let object = resolver.get_object(&id)?;
    println!("{}", resolver.resolve_absolute_path(&object)?);
    super::log_cache_size(&resolver);
    Ok(())
}
