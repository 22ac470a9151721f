use crate::cli::InitArgs;
use std::path::Path;

const TEMPLATE: &str = r#"version = "1"

# Each job renders `static_conditions` for every query type in `input` that
# derives QueryObject with #[orm(external)].
[[generate]]
input = ["src/query/*.rs"]
output = "src/query/generated.rs"
# Module the generated file imports the query types from.
module = "super"
"#;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    std::fs::write(path, TEMPLATE)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
}
