use anyhow::Result;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

pub fn run() -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{BOLD}{CYAN}drivepath{RESET} {DIM}v{version}{RESET}  {DIM}─{RESET}  Absolute paths for an ID-addressed cloud drive"
    );
    println!();
    println!("{BOLD}Usage:{RESET}  {GREEN}drivepath{RESET} {DIM}<command> [args...]{RESET}");
    println!();
    println!("{BOLD}Commands:{RESET}");

    let commands: &[(&str, &str)] = &[
        ("ls [-r] [-l] [--docs] [path|id]", "List a folder (recursively with -r)"),
        ("id <path>",                       "Print the id of an absolute path"),
        ("path <path|id>",                  "Print the absolute path of an object"),
        ("info <path|id>",                  "Show object metadata"),
        ("mkdir [-p parent]... <name>",     "Create a folder"),
    ];

    for (cmd, desc) in commands {
        let (name, args) = match cmd.find(' ') {
            Some(i) => (&cmd[..i], &cmd[i..]),
            None => (*cmd, ""),
        };
        println!(
            "  {GREEN}{name}{RESET}{DIM}{args}{RESET}  {:>width$}{DIM}{desc}{RESET}",
            "",
            width = 34usize.saturating_sub(cmd.len()),
        );
    }

    println!();
    println!("{BOLD}Options:{RESET}");
    println!("  {GREEN}-h{RESET}, {GREEN}--help{RESET}       Show this help message");
    println!("  {GREEN}-V{RESET}, {GREEN}--version{RESET}    Show version");
    println!();
    println!("{BOLD}Environment:{RESET}");
    println!("  {GREEN}DRIVEPATH_ACCESS_TOKEN{RESET}     Bearer token (else ~/.config/drivepath/session.json)");
    println!("  {GREEN}DRIVEPATH_DRIVE_BASE_URL{RESET}   API base URL override");
    println!("  {GREEN}DRIVEPATH_LOG{RESET}              Log filter, e.g. debug");

    Ok(())
}
