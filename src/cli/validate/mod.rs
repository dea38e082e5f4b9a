//! Validate command - checks a workflow document against the schema

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::workflow_config::{
    Advisory, ValidationIssue, ValidationOptions, WorkflowConfigValidator,
};
use crate::infrastructure::logging;

/// Arguments for the validate command
#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// JSON workflow document
    pub file: PathBuf,

    /// Maximum agent nesting depth (overrides config)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Report unknown models as advisories instead of errors
    #[arg(long)]
    pub no_enforce_models: bool,

    /// TOML model catalog (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Printed result of a validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidateReport {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AcceptedWorkflow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationIssue>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcceptedWorkflow {
    pub workflows: Value,
    pub advisories: Vec<Advisory>,
}

/// Run the validate command
pub async fn run(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let report = execute(&args, &config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Validate the file named by `args`; only I/O and catalog problems are errors
pub async fn execute(args: &ValidateArgs, config: &AppConfig) -> anyhow::Result<ValidateReport> {
    let mut options = ValidationOptions::from(&config.validation);
    if let Some(max_depth) = args.max_depth {
        options = options.with_max_depth(max_depth);
    }
    if args.no_enforce_models {
        options = options.with_enforce_model_catalog(false);
    }

    let catalog_path = args
        .catalog
        .as_deref()
        .or(config.validation.catalog_path.as_deref());
    let catalog = super::resolve_catalog(catalog_path)?;
    let validator = WorkflowConfigValidator::new(catalog).with_options(options);

    info!(file = %args.file.display(), "Validating workflow document");
    let input = tokio::fs::read_to_string(&args.file).await?;

    let report = match validator.validate_str(&input) {
        Ok(validated) => {
            let (document, advisories) = validated.into_parts();
            let mut canonical = document.to_value()?;
            ValidateReport {
                success: true,
                data: Some(AcceptedWorkflow {
                    workflows: canonical["workflows"].take(),
                    advisories,
                }),
                errors: None,
            }
        }
        Err(err) => ValidateReport {
            success: false,
            data: None,
            errors: Some(err.into_issues()),
        },
    };

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow_config::{DEFAULT_MAX_DEPTH, IssueKind};
    use serde_json::json;
    use std::path::Path;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn args(file: &Path) -> ValidateArgs {
        ValidateArgs {
            file: file.to_path_buf(),
            max_depth: None,
            no_enforce_models: false,
            catalog: None,
        }
    }

    /// Superagents chained through `tools`, `depth` levels deep
    fn nested_workflow(depth: usize) -> String {
        let agent = |level: usize| {
            json!({"name": format!("level-{}", level), "llm": "GPT_4_0613", "prompt": "p"})
        };
        let mut current = agent(0);
        for level in 1..depth {
            current["use_for"] = json!("delegation");
            let mut parent = agent(level);
            parent["tools"] = json!([{ "superagent": current }]);
            current = parent;
        }
        json!({"workflows": [{"superagent": current}]}).to_string()
    }

    #[tokio::test]
    async fn test_valid_document() {
        let path = write_temp(
            "valid.json",
            r#"{"workflows": [{"llm": {"name": "a", "llm": "m", "prompt": "p"}}]}"#,
        );

        let report = execute(&args(&path), &AppConfig::default()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(report.success);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["data"]["workflows"][0]["llm"]["name"], "a");
        assert_eq!(json["data"]["advisories"][0]["kind"], "deprecated");
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_invalid_document() {
        let path = write_temp("invalid.json", r#"{"workflows": []}"#);

        let report = execute(&args(&path), &AppConfig::default()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(!report.success);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"][0]["reason"], "workflows must be non-empty");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_flags_override_config() {
        let path = write_temp(
            "flags.json",
            r#"{"workflows": [{"superagent": {"name": "a", "llm": "GPT_9", "prompt": "p"}}]}"#,
        );

        let strict = execute(&args(&path), &AppConfig::default()).await.unwrap();
        assert!(!strict.success);

        let relaxed_args = ValidateArgs {
            no_enforce_models: true,
            ..args(&path)
        };
        let relaxed = execute(&relaxed_args, &AppConfig::default()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(relaxed.success);
        assert_eq!(relaxed.data.unwrap().advisories.len(), 1);
    }

    #[tokio::test]
    async fn test_custom_catalog() {
        let catalog = write_temp(
            "catalog.toml",
            "[[providers]]\nname = \"OPENAI\"\nmodels = [{ id = \"GPT_9\" }]\n",
        );
        let path = write_temp(
            "custom.json",
            r#"{"workflows": [{"openai_assistant": {"name": "a", "llm": "GPT_9", "prompt": "p"}}]}"#,
        );

        let mut config = AppConfig::default();
        config.validation.catalog_path = Some(catalog.clone());
        let report = execute(&args(&path), &config).await.unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::remove_file(&catalog).unwrap();

        assert!(report.success);
    }

    #[tokio::test]
    async fn test_deep_nesting_reaches_depth_check() {
        let accepted = write_temp("deep-ok.json", &nested_workflow(DEFAULT_MAX_DEPTH));
        let rejected = write_temp("deep-over.json", &nested_workflow(DEFAULT_MAX_DEPTH + 1));

        let ok = execute(&args(&accepted), &AppConfig::default()).await.unwrap();
        let over = execute(&args(&rejected), &AppConfig::default()).await.unwrap();
        std::fs::remove_file(&accepted).unwrap();
        std::fs::remove_file(&rejected).unwrap();

        assert!(ok.success);
        assert!(!over.success);
        let errors = over.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, IssueKind::DepthLimit);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let missing = args(Path::new("/nonexistent/workflow.json"));
        let result = execute(&missing, &AppConfig::default()).await;
        assert!(result.is_err());
    }
}
