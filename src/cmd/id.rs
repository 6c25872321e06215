use anyhow::Result;

const USAGE: &str = "Usage: drivepath id <absolute-path>";

/// Prints the id an absolute path resolves to. Unlike the other commands a
/// literal id is not accepted here.
pub fn run(args: &[String]) -> Result<()> {
    let path = super::single_arg(args, USAGE)?;
    let config = super::cli_config()?;
    let client = super::cli_client(&config)?;
    let mut resolver = super::cli_resolver(&client, &config);

    let id = resolver.resolve_id(path)?;
    println!("{id}");
    super::log_cache_size(&resolver);
    Ok(())
}
