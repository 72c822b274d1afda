//! `appforge` binary

use anyhow::{Context, Result};
use appforge_cli::{build_orchestrator, classify, extract, init_tracing, write_output};
use appforge_core::{GenerationOptions, GenerationRequest, PipelineConfig};
use appforge_http::LlmEndpoint;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("appforge")
        .version(appforge_core::VERSION)
        .about("Turn a natural-language prompt into a multi-file source tree")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("classify")
                .about("Print the scope a prompt classifies to")
                .arg(Arg::new("prompt").required(true).help("Prompt text")),
        )
        .subcommand(
            Command::new("extract")
                .about("Run the extraction cascade over saved generator output")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding the raw generator output"),
                )
                .arg(
                    Arg::new("prompt")
                        .long("prompt")
                        .help("Original prompt, used to name the fallback file"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Run the full generation pipeline")
                .arg(Arg::new("prompt").required(true).help("Prompt text"))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Pipeline configuration (TOML)"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to write the generated project into"),
                )
                .arg(Arg::new("framework").long("framework").help("UI framework, e.g. react"))
                .arg(Arg::new("language").long("language").help("Language, e.g. typescript"))
                .arg(Arg::new("style").long("style").help("Styling approach, e.g. tailwind"))
                .arg(
                    Arg::new("no-validate")
                        .long("no-validate")
                        .action(ArgAction::SetTrue)
                        .help("Skip the validation stage"),
                )
                .arg(
                    Arg::new("no-optimize")
                        .long("no-optimize")
                        .action(ArgAction::SetTrue)
                        .help("Skip the optimization stage"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the full result as JSON"),
                ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("classify", args)) => {
            let prompt = required(args, "prompt")?;
            println!("{}", serde_json::to_string_pretty(&classify(prompt))?);
        }
        Some(("extract", args)) => {
            let input = args.get_one::<PathBuf>("input").context("--input is required")?;
            let raw = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
            let extraction = extract(&raw, args.get_one::<String>("prompt").map(String::as_str));
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
        Some(("generate", args)) => {
            if !generate(args).await? {
                std::process::exit(1);
            }
        }
        _ => {}
    }
    Ok(())
}

async fn generate(args: &ArgMatches) -> Result<bool> {
    let prompt = required(args, "prompt")?;

    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => PipelineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if args.get_flag("no-validate") {
        config = config.with_validation(false);
    }
    if args.get_flag("no-optimize") {
        config = config.with_optimization(false);
    }

    let options = GenerationOptions {
        framework: args.get_one::<String>("framework").cloned(),
        language: args.get_one::<String>("language").cloned(),
        style: args.get_one::<String>("style").cloned(),
    };
    let endpoint = LlmEndpoint::from_env();
    tracing::info!(url = %endpoint.base_url, model = %endpoint.model, "using generation endpoint");

    let orchestrator = build_orchestrator(config, endpoint);
    let result = orchestrator
        .generate(GenerationRequest::new(prompt).with_options(options))
        .await;

    if let Some(dir) = args.get_one::<PathBuf>("out") {
        if result.success {
            let written = write_output(dir, &result).with_context(|| format!("writing to {}", dir.display()))?;
            tracing::info!(files = written.len(), dir = %dir.display(), "project written");
        }
    }

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("Generated {} files (quality {:.0})", result.file_count(), result.quality_score);
        for file in &result.files {
            println!("  {}", file.path);
        }
        for warning in &result.warnings {
            println!("warning: {warning}");
        }
    } else {
        eprintln!("generation failed: {}", result.error.as_deref().unwrap_or("unknown error"));
    }
    Ok(result.success)
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("<{name}> is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let matches = cli()
            .try_get_matches_from([
                "appforge", "generate", "a todo app", "--out", "build", "--framework", "vue", "--no-validate",
                "--log-json",
            ])
            .unwrap();
        assert!(matches.get_flag("log-json"));

        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "generate");
        assert_eq!(required(args, "prompt").unwrap(), "a todo app");
        assert_eq!(args.get_one::<PathBuf>("out"), Some(&PathBuf::from("build")));
        assert_eq!(args.get_one::<String>("framework").map(String::as_str), Some("vue"));
        assert!(args.get_flag("no-validate"));
        assert!(!args.get_flag("no-optimize"));
    }

    #[test]
    fn extract_requires_input() {
        assert!(cli().try_get_matches_from(["appforge", "extract"]).is_err());
    }
}
