use anyhow::Result;

use crate::printer::{format_date, format_size};
use crate::store::ObjectMetadata;

const USAGE: &str = "usage: drivepath info <path|id>";

pub fn run(args: &[String]) -> Result<()> {
    let target = super::single_arg(args, USAGE)?;
    let config = super::cli_config()?;
    let client = super::cli_client(&config)?;
    let mut resolver = super::cli_resolver(&client, &config);

    let id = resolver.secure_id(target);
    let object = resolver.get_object(&id)?;
    let path = resolver.resolve_absolute_path(&object)?;
    for line in info_lines(&object, &path) {
        println!("{line}");
    }
    super::log_cache_size(&resolver);
    Ok(())
}

fn info_lines(object: &ObjectMetadata, path: &str) -> Vec<String> {
    let kind = if object.is_directory() {
        "folder"
    } else if object.is_document() {
        "document"
    } else {
        "file"
    };

    let mut lines = vec![
        format!("Id:       {}", object.id),
        format!("Name:     {}", object.name),
        format!("Path:     {}", path),
        format!("Type:     {}", kind),
        format!("MIME:     {}", object.mime_type),
    ];
    if let Some(size) = object.size {
        lines.push(format!("Size:     {} ({})", format_size(size), size));
    }
    if let Some(checksum) = &object.checksum {
        lines.push(format!("MD5:      {}", checksum));
    }
    lines.push(format!("Created:  {}", format_date(&object.created_time)));
    if object.parent_ids.len() > 1 {
        lines.push(format!("Parents:  {}", object.parent_ids.join(", ")));
    }
    lines
}
