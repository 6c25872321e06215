use anyhow::{Result, anyhow};

const USAGE: &str =
    "Usage: drivepath mkdir [-p|--parent <path|id>]... [-d|--description <text>] <name>";

#[derive(Debug, PartialEq, Eq)]
struct MkdirArgs {
    name: String,
    description: Option<String>,
    parents: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<MkdirArgs> {
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut parents = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--parent" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--parent requires a value\n{USAGE}"))?;
                parents.push(value.clone());
                i += 1;
            }
            "-d" | "--description" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--description requires a value\n{USAGE}"))?;
                description = Some(value.clone());
                i += 1;
            }
            arg if arg.starts_with('-') => {
                return Err(anyhow!("unknown option for mkdir: {arg}\n{USAGE}"));
            }
            arg => {
                if name.is_some() {
                    return Err(anyhow!("unexpected argument: {arg}\n{USAGE}"));
                }
                name = Some(arg.to_string());
            }
        }
        i += 1;
    }

    let name = name.ok_or_else(|| anyhow!("{USAGE}"))?;
    if name.trim().is_empty() {
        return Err(anyhow!("folder name cannot be empty"));
    }
    Ok(MkdirArgs {
        name,
        description,
        parents,
    })
}

pub fn run(args: &[String]) -> Result<()> {
    let parsed = parse_args(args)?;
    let config = super::cli_config()?;
    let client = super::cli_client(&config)?;
    let mut resolver = super::cli_resolver(&client, &config);

    let parents: Vec<String> = parsed
        .parents
        .iter()
        .map(|p| resolver.secure_id(p))
        .collect();
    let created = client.create_directory(&parsed.name, parsed.description.as_deref(), &parents)?;
    println!("Directory {} created", created.id);
    super::log_cache_size(&resolver);
    Ok(())
}
