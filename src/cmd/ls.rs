use anyhow::{Result, anyhow};
use std::io;

use crate::printer::{DirectoryPrinter, ListOptions};
use crate::store::SortOrder;

const USAGE: &str = "Usage: drivepath ls [-r|--recursive] [-l|--long] [--docs|--no-docs] [-s|--sort=<field>] [path|id]\n\nSort fields: name, size, created, none";

#[derive(Debug, PartialEq, Eq)]
struct LsArgs {
    target: String,
    recursive: bool,
    long: bool,
    show_docs: Option<bool>,
    sort: Option<SortOrder>,
}

fn parse_sort_order(s: &str) -> Result<SortOrder> {
    match s {
        "name" => Ok(SortOrder::Name),
        "size" => Ok(SortOrder::Size),
        "created" => Ok(SortOrder::Created),
        "none" => Ok(SortOrder::None),
        _ => Err(anyhow!("unknown sort field: {s}\nValid fields: name, size, created, none")),
    }
}

fn parse_args(args: &[String]) -> Result<LsArgs> {
    let mut target: Option<String> = None;
    let mut recursive = false;
    let mut long = false;
    let mut show_docs = None;
    let mut sort = None;
    let mut options_done = false;
    let mut expect_sort = false;

    for arg in args {
        if expect_sort {
            sort = Some(parse_sort_order(arg)?);
            expect_sort = false;
            continue;
        }

        if !options_done {
            match arg.as_str() {
                "-r" | "--recursive" => {
                    recursive = true;
                    continue;
                }
                "-l" | "--long" => {
                    long = true;
                    continue;
                }
                "--docs" => {
                    show_docs = Some(true);
                    continue;
                }
                "--no-docs" => {
                    show_docs = Some(false);
                    continue;
                }
                "-s" | "--sort" => {
                    expect_sort = true;
                    continue;
                }
                "--" => {
                    options_done = true;
                    continue;
                }
                _ if arg.starts_with("--sort=") => {
                    sort = Some(parse_sort_order(&arg["--sort=".len()..])?);
                    continue;
                }
                _ if arg.starts_with('-') => {
                    return Err(anyhow!("unknown option for ls: {arg}\n{USAGE}"));
                }
                _ => {}
            }
        }

        if target.is_some() {
            return Err(anyhow!("ls accepts at most one path or id\n{USAGE}"));
        }
        target = Some(arg.clone());
    }

    if expect_sort {
        return Err(anyhow!("--sort requires a value\n{USAGE}"));
    }

    Ok(LsArgs {
        target: target.unwrap_or_else(|| "/".to_string()),
        recursive,
        long,
        show_docs,
        sort,
    })
}

pub fn run(args: &[String]) -> Result<()> {
    let parsed = parse_args(args)?;
    let config = super::cli_config()?;
    let client = super::cli_client(&config)?;
    let mut resolver = super::cli_resolver(&client, &config);

    let options = ListOptions {
        recursive: parsed.recursive,
        show_docs: parsed.show_docs.unwrap_or(config.show_docs),
        order: parsed.sort.unwrap_or(config.sort),
        long: parsed.long,
    };

    let id = resolver.secure_id(&parsed.target);
    let stdout = io::stdout();
    DirectoryPrinter::new(&mut resolver, stdout.lock(), options).print_directory(&id, None)?;
    super::log_cache_size(&resolver);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LsArgs, parse_args};
    use crate::store::SortOrder;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn parse_defaults_to_root() {
        assert_eq!(
            parse_args(&s(&[])).unwrap(),
            LsArgs {
                target: "/".to_string(),
                recursive: false,
                long: false,
                show_docs: None,
                sort: None,
            }
        );
    }

    #[test]
    fn parse_flags_in_any_order() {
        let parsed = parse_args(&s(&["/A", "-r", "--docs", "-l"])).unwrap();
        assert_eq!(parsed.target, "/A");
        assert!(parsed.recursive && parsed.long);
        assert_eq!(parsed.show_docs, Some(true));

        let parsed = parse_args(&s(&["--no-docs", "1AbcID"])).unwrap();
        assert_eq!(parsed.target, "1AbcID");
        assert_eq!(parsed.show_docs, Some(false));
    }

    #[test]
    fn parse_sort_field_flag() {
        assert_eq!(parse_args(&s(&["--sort=size"])).unwrap().sort, Some(SortOrder::Size));
        assert_eq!(parse_args(&s(&["-s", "none"])).unwrap().sort, Some(SortOrder::None));
        assert_eq!(
            parse_args(&s(&["--sort", "created"])).unwrap().sort,
            Some(SortOrder::Created)
        );
    }

    #[test]
    fn parse_sort_rejects_invalid_field() {
        let err = parse_args(&s(&["--sort=bogus"])).unwrap_err();
        assert!(err.to_string().contains("unknown sort field"));
    }

    #[test]
    fn parse_sort_requires_value() {
        let err = parse_args(&s(&["--sort"])).unwrap_err();
        assert!(err.to_string().contains("--sort requires a value"));
    }

    #[test]
    fn parse_double_dash_allows_dash_names() {
        assert_eq!(parse_args(&s(&["--", "-weird"])).unwrap().target, "-weird");
    }

    #[test]
    fn parse_rejects_unknown_options_and_extra_paths() {
        assert!(
            parse_args(&s(&["-a"]))
                .unwrap_err()
                .to_string()
                .contains("unknown option for ls")
        );
        assert!(
            parse_args(&s(&["/a", "/b"]))
                .unwrap_err()
                .to_string()
                .contains("at most one")
        );
    }
}
