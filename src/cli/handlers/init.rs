use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::workspace_io::CONFIG_FILE;

const CARVE_TOML_TEMPLATE: &str = r##"# Source file to split, relative to this file.
source = "src/generated.ts"

# Where the per-region files go, relative to this file.
output_dir = "src/parts"

# Output files are named <key>.<extension>.
extension = "ts"

# Copy outputs a run is about to replace into this directory first, the
# same as `carve run --backup`. Relative to this file.
# backup_dir = "src/parts-backup"

[template]
# First line of every output file.
import = 'import type { Item } from "./types";'

# Optional annotation: export const <export>: <type> = ...
# type = "Item"

# Comment lines above the "Lines a-b from original document" line.
# Placeholders: {name} {key} {export} {start} {end} {source}, plus any
# key from a region's [regions.meta] table.
header = ["{name} data"]

# --- Regions ---
# One [[regions]] entry per output file. Lines are 1-indexed and inclusive.
# `export` defaults to the camel-cased key.
#
# [[regions]]
# name = "First Part"
# key = "first-part"
# start = 1
# end = 120
# export = "firstPart"
#
# [regions.meta]
# owner = "data-team"
"##;

/// Write a starter carve.toml into `dir`.
pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE);
    config_io::create_config(&path, CARVE_TOML_TEMPLATE, args.force)?;
    println!("Created {}", path.display());
    println!("Add [[regions]] entries, then run `carve check` and `carve run`.");
    Ok(0)
}
