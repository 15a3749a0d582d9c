//! `reflector generate` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use reflector_config::{CliSettings, Config};
use reflector_core::{
    DiagramSyntax, FsSink, Layers, TypeDescriptor, WriteError, WriteStrategy, write_all,
};
use reflector_plantuml::PlantUml;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// JSON file with the type metadata to render.
    input: PathBuf,

    /// Path to configuration file (default: auto-discover reflector.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory documents are written to (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Grouping strategy, e.g. one-file-per-namespace (overrides config).
    #[arg(short, long)]
    strategy: Option<WriteStrategy>,

    /// Layer expression, e.g. "type-end|relationships" (overrides config).
    #[arg(short, long)]
    layers: Option<Layers>,

    /// Render attribute blocks.
    #[arg(long)]
    show_attributes: bool,

    /// Number of parallel writers (overrides config).
    #[arg(short, long)]
    parallelism: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the metadata file, or any document write fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            strategy: self.strategy,
            layers: self.layers,
            show_attributes: self.show_attributes.then_some(true),
            parallelism: self.parallelism,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let types = load_types(&self.input)?;
        if types.is_empty() {
            output.warning(&format!("No types in {}", self.input.display()));
            return Ok(());
        }

        let out = &config.output_resolved;
        output.info(&format!(
            "Rendering {} types ({}) into {}",
            types.len(),
            config.render_resolved.layers,
            out.dir.display()
        ));

        let sink = FsSink::new(&out.dir, out.extension_or(PlantUml.extension()));
        let result = write_all(
            &types,
            &PlantUml,
            config.render_resolved.layers,
            &config.build_options(),
            &sink,
            config.write_options(),
        );

        match result {
            Ok(written) => {
                output.success(&format!(
                    "Wrote {} documents ({})",
                    written.len(),
                    out.strategy
                ));
                Ok(())
            }
            Err(WriteError::Batch(failure)) => {
                for document in &failure.written {
                    output.info(&format!("  {}", document.path.display()));
                }
                Err(WriteError::Batch(failure).into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Read type metadata produced by a metadata provider.
fn load_types(path: &Path) -> Result<Vec<TypeDescriptor>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let types: Vec<TypeDescriptor> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), types = types.len(), "Loaded metadata");
    Ok(types)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const METADATA: &str = r#"[
        {
            "name": "Shape",
            "namespace": "App.Model",
            "assembly": "app",
            "is_abstract": true
        },
        {
            "name": "Circle",
            "namespace": "App.Model",
            "assembly": "app",
            "base_type": { "name": "Shape", "namespace": "App.Model" },
            "fields": [{
                "name": "radius",
                "field_type": { "name": "Double", "namespace": "System" },
                "access": { "private": true }
            }]
        }
    ]"#;

    fn args(temp: &TempDir, strategy: Option<WriteStrategy>) -> GenerateArgs {
        let input = temp.path().join("types.json");
        fs::write(&input, METADATA).unwrap();
        let config = temp.path().join("reflector.toml");
        fs::write(&config, "[output]\ndir = \"uml\"\n").unwrap();

        GenerateArgs {
            input,
            config: Some(config),
            output_dir: None,
            strategy,
            layers: None,
            show_attributes: false,
            parallelism: None,
            verbose: false,
        }
    }

    #[test]
    fn test_load_types() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("types.json");
        fs::write(&path, METADATA).unwrap();

        let types = load_types(&path).unwrap();

        assert_eq!(types.len(), 2);
        assert!(types[0].is_abstract);
        assert_eq!(types[1].fields[0].name, "radius");
    }

    #[test]
    fn test_load_types_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_types(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CliError::Input { .. }));
    }

    #[test]
    fn test_load_types_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("types.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_types(&path).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn test_generate_per_type() {
        let temp = TempDir::new().unwrap();

        args(&temp, None).execute(&Output::new()).unwrap();

        let dir = temp.path().join("uml");
        let circle = fs::read_to_string(dir.join("App_Model_Circle.puml")).unwrap();
        assert!(circle.starts_with("class \"Circle\" as App_Model_Circle"));
        assert!(circle.contains("App_Model_Circle -u-|> App_Model_Shape : extends"));
        assert!(dir.join("App_Model_Shape.puml").is_file());
    }

    #[test]
    fn test_generate_one_file_per_namespace() {
        let temp = TempDir::new().unwrap();

        args(&temp, Some(WriteStrategy::OneFilePerNamespace))
            .execute(&Output::new())
            .unwrap();

        let document = fs::read_to_string(temp.path().join("uml/App_Model.puml")).unwrap();
        let shape = document.find("as App_Model_Shape").unwrap();
        let circle = document.find("as App_Model_Circle").unwrap();
        let extends = document.find("-u-|>").unwrap();
        assert!(shape < circle && circle < extends);
    }

    #[test]
    fn test_generate_rejects_zero_parallelism() {
        let temp = TempDir::new().unwrap();
        let mut args = args(&temp, None);
        args.parallelism = Some(0);

        let err = args.execute(&Output::new()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
