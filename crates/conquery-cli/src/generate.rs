use crate::cli::GenArgs;
use crate::config::{GenerateJob, ProjectConfig};
use crate::write::{GeneratedFile, WriteMode, sync};
use conquery_codegen::{CompileMode, Generator, QueryTypeDecl};
use conquery_convention::OperatorRegistry;
use std::path::{Path, PathBuf};

pub fn run(args: GenArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(&args.config)?;
    if project.file.generate.is_empty() {
        anyhow::bail!(
            "no [[generate]] configured in {}; run `conquery init` to create a template",
            args.config.display()
        );
    }

    let generator = Generator::new(&OperatorRegistry::SQL);
    let files = project
        .file
        .generate
        .iter()
        .map(|job| render_job(&project, job, &generator))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mode = if args.check {
        WriteMode::Check
    } else if args.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };
    let report = sync(&files, mode)?;

    match mode {
        WriteMode::Write => {
            for path in &report.stale {
                println!("wrote {}", path.display());
            }
        }
        WriteMode::DryRun => {
            for path in &report.stale {
                println!("would write {}", path.display());
            }
        }
        WriteMode::Check if !report.stale.is_empty() => {
            for path in &report.stale {
                eprintln!("stale: {}", path.display());
            }
            anyhow::bail!(
                "{} generated file(s) out of date; run `conquery gen`",
                report.stale.len()
            );
        }
        WriteMode::Check => {}
    }
    if report.stale.is_empty() {
        tracing::info!(files = files.len(), "generated files up to date");
    }
    Ok(())
}

/// Expand a job's input globs into a sorted, de-duplicated file list.
pub fn collect_inputs(project: &ProjectConfig, job: &GenerateJob) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in &job.input {
        let full = project.resolve_path(pattern);
        let full = full.to_string_lossy();
        let mut matched = false;
        for entry in glob::glob(&full)
            .map_err(|e| anyhow::anyhow!("invalid input pattern {pattern}: {e}"))?
        {
            let path = entry.map_err(|e| anyhow::anyhow!("failed to read {pattern}: {e}"))?;
            if path.is_file() {
                paths.push(path);
                matched = true;
            }
        }
        if !matched {
            anyhow::bail!("input pattern matched no files: {pattern}");
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Parse one source file and keep the `#[orm(external)]` query types, in
/// declaration order.
pub fn external_decls(source: &str, path: &Path) -> anyhow::Result<Vec<QueryTypeDecl>> {
    let file = syn::parse_file(source)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;

    let mut decls = Vec::new();
    for item in file.items {
        let syn::Item::Struct(item) = item else {
            continue;
        };
        if !QueryTypeDecl::derives_query_object(&item.attrs) {
            continue;
        }
        let name = item.ident.to_string();
        let decl = QueryTypeDecl::parse(&syn::DeriveInput::from(item))
            .map_err(|e| anyhow::anyhow!("{}: {name}: {e}", path.display()))?;
        if decl.mode == CompileMode::External {
            decls.push(decl);
        }
    }
    Ok(decls)
}

fn source_label(project: &ProjectConfig, path: &Path) -> String {
    let rel = path.strip_prefix(&project.config_dir).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn render_job(
    project: &ProjectConfig,
    job: &GenerateJob,
    generator: &Generator,
) -> anyhow::Result<GeneratedFile> {
    let inputs = collect_inputs(project, job)?;
    let output = project.resolve_path(&job.output);

    let mut sources = Vec::new();
    let mut decls = Vec::new();
    for path in &inputs {
        if *path == output {
            continue;
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        let mut found = external_decls(&raw, path)?;
        if found.is_empty() {
            continue;
        }
        tracing::debug!(file = %path.display(), types = found.len(), "collected query types");
        sources.push(source_label(project, path));
        decls.append(&mut found);
    }

    if decls.is_empty() {
        tracing::warn!(output = %output.display(), "no #[orm(external)] query types found");
    }

    let content = generator
        .render_file(&job.module, &sources, &decls)
        .map_err(|e| anyhow::anyhow!("failed to generate {}: {e}", output.display()))?;

    Ok(GeneratedFile {
        path: output,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquery_codegen::GENERATED_MARKER;

    const SOURCE: &str = r#"
use conquery::{PageQuery, QueryObject};

#[derive(Default, QueryObject)]
#[orm(external)]
pub struct UserQuery {
    pub page: PageQuery,
    pub score_lt: Option<i32>,
    pub memo_null: bool,
}

#[derive(Default, QueryObject)]
pub struct InlineQuery {
    pub id: Option<i64>,
}

#[derive(Debug)]
pub struct NotAQuery {
    pub id_in: i64,
}
"#;

    #[test]
    fn only_external_query_types_are_collected() {
        let decls = external_decls(SOURCE, Path::new("src/query.rs")).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].ident, "UserQuery");
    }

    #[test]
    fn malformed_query_type_is_reported_with_location() {
        let source = "#[derive(conquery::QueryObject)]\n#[orm(external)]\nstruct Q { id: i64 }";
        let err = external_decls(source, Path::new("src/q.rs")).unwrap_err();
        assert!(err.to_string().contains("src/q.rs: Q:"), "{err}");
    }

    #[test]
    fn render_job_is_deterministic() {
        let dir = std::env::temp_dir().join(format!("conquery-gen-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("src")).unwrap();
        std::fs::write(dir.join("src/b.rs"), SOURCE).unwrap();
        std::fs::write(dir.join("src/a.rs"), "pub struct Plain;").unwrap();

        let project = ProjectConfig::from_toml(
            &dir.join("conquery.toml"),
            "version = \"1\"\n[[generate]]\ninput = [\"src/*.rs\"]\noutput = \"src/generated.rs\"",
        )
        .unwrap();
        let job = &project.file.generate[0];

        let first = render_job(&project, job, &Generator::default()).unwrap();
        let second = render_job(&project, job, &Generator::default()).unwrap();
        assert_eq!(first.content, second.content);
        assert_eq!(first.path, dir.join("src/generated.rs"));
        assert!(first.content.starts_with(GENERATED_MARKER));
        assert!(first.content.contains("// source: src/b.rs\n"));
        assert!(!first.content.contains("src/a.rs"));
        assert!(first.content.contains("use super::*;"));
        assert!(first.content.contains("c.push(\"score < ?\""));
        syn::parse_file(&first.content).unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unmatched_pattern_is_an_error() {
        let project = ProjectConfig::from_toml(
            Path::new("/nonexistent/conquery.toml"),
            "version = \"1\"\n[[generate]]\ninput = [\"src/*.rs\"]\noutput = \"out.rs\"",
        )
        .unwrap();
        assert!(collect_inputs(&project, &project.file.generate[0]).is_err());
    }
}
