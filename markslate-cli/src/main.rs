// Command-line interface for markslate
//
// This binary converts documents between markdown, rich-document JSON and HTML, and shows the
// intermediate representations of the pipeline.
//
// The core capabilities live in the markslate-babel crate. This binary only reads files, loads
// configuration, sets up logging and prints results.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  markslate <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  markslate convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above
//  markslate inspect <path> [<transform>]   - Show a pipeline stage (defaults to "mdast")
//  markslate --list-transforms              - List transforms and formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format.
// Example:
//  markslate doc.md --to html --extra-standalone --extra-title "My notes"

mod transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use markslate_babel::formats::html::HtmlOptions;
use markslate_babel::{FormatRegistry, ShortcodeRegistry};
use markslate_config::{Loader, MarkslateConfig};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("markslate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between markdown, rich-document JSON and HTML")
        .long_about(
            "markslate is a command-line tool for the markdown / rich-document pipeline.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (markdown, json, html)\n  \
            - inspect: View intermediate representations (syntax tree, rich document, HTML)\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            markslate inspect notes.md                 # Syntax tree as JSON\n  \
            markslate inspect notes.md slate           # Rich document as JSON\n  \
            markslate notes.md --to json               # Markdown to rich-document JSON\n  \
            markslate doc.json --to markdown           # Rich-document JSON back to markdown\n  \
            markslate notes.md --to html -o notes.html # Generate HTML",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms and formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a markslate.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline details to stderr (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect intermediate representations of a markdown file")
                .long_about(
                    "View a markdown file at different stages of the pipeline.\n\n\
                    Transforms:\n  \
                    - mdast:  normalized syntax tree as JSON (default)\n  \
                    - slate:  rich document as JSON\n  \
                    - html:   preview HTML\n\n\
                    Components declared in [[shortcodes]] are resolved.\n\n\
                    Examples:\n  \
                    markslate inspect notes.md           # Syntax tree\n  \
                    markslate inspect notes.md html      # Preview fragment",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'mdast'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown (.md, .markdown)\n  \
                    - json:     Rich-document JSON (.json)\n  \
                    - html:     HTML (.html, .htm); importing HTML is lossy\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    markslate convert notes.md --to json         # Markdown to JSON (stdout)\n  \
                    markslate convert page.html --to markdown    # Import HTML\n  \
                    markslate notes.md --to html                 # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Available formats: markdown, json, html\n\
                            Use the format name, not the file extension.",
                        )
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    // If no subcommand is provided, inject "convert"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    init_logging(&config, matches.get_count("verbose"));

    let shortcodes = config.registry();
    debug!(shortcodes = ?shortcodes.list(), "loaded configuration");

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                fail("a path is required");
            };
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            handle_inspect_command(path, transform, &config, &shortcodes);
        }
        Some(("convert", sub_matches)) => {
            let (Some(input), Some(to)) = (
                sub_matches.get_one::<String>("input"),
                sub_matches.get_one::<String>("to"),
            ) else {
                fail("an input file and --to are required");
            };

            // Auto-detect --from if not provided
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match FormatRegistry::default().detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config, &shortcodes);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`, which wins over `[logging] level`.
fn init_logging(config: &MarkslateConfig, verbosity: u8) {
    let fallback = match verbosity {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    config: &MarkslateConfig,
    shortcodes: &ShortcodeRegistry,
) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let html_options = HtmlOptions {
        standalone: config.convert.html.standalone,
        title: None,
    };

    let output = transforms::execute_transform(&source, transform, shortcodes, &html_options)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    println!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &MarkslateConfig,
    shortcodes: &ShortcodeRegistry,
) {
    let registry = FormatRegistry::default();

    // Validate formats exist
    for name in [from, to] {
        if let Err(e) = registry.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let doc = registry.parse(&source, from, shortcodes).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let format_options = format_options_from_config(config, to, extra_params);
    let mut result = registry
        .serialize_with_options(&doc, to, shortcodes, &format_options)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });
    if !result.ends_with('\n') {
        result.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms (inspect):");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }

    println!("\nConversion formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        println!("  {format_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MarkslateConfig {
    let loader = Loader::new().with_optional_file("markslate.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Extras that map onto configuration keys are consumed here; the rest are
/// handed to the target format.
fn apply_config_overrides(config: &mut MarkslateConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("standalone") {
        config.convert.html.standalone = parse_bool_arg("standalone", &raw);
    }
    if let Some(level) = take_override(extra_params, &["log-level", "log"]) {
        config.logging.level = level;
    }
}

fn format_options_from_config(
    config: &MarkslateConfig,
    to: &str,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut options = HashMap::new();
    if to == "html" {
        options.insert(
            "standalone".to_string(),
            config.convert.html.standalone.to_string(),
        );
    }
    for (key, value) in overrides {
        options.insert(key.clone(), value.clone());
    }
    options
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_extra_args_empty() {
        let input = args(&["markslate", "inspect", "notes.md"]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(cleaned, input);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_parse_extra_args_mixed_with_regular_args() {
        let input = args(&[
            "markslate",
            "convert",
            "notes.md",
            "--to",
            "html",
            "--extra-title",
            "Notes",
            "--from",
            "markdown",
        ]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(
            cleaned,
            args(&["markslate", "convert", "notes.md", "--to", "html", "--from", "markdown"])
        );
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("title"), Some(&"Notes".to_string()));
    }

    #[test]
    fn test_parse_extra_args_boolean_flags() {
        let input = args(&[
            "markslate",
            "notes.md",
            "--extra-standalone",
            "--extras-title",
            "T",
            "--extra-verbose",
        ]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(cleaned, args(&["markslate", "notes.md"]));
        assert_eq!(extra.len(), 3);
        assert_eq!(extra.get("standalone"), Some(&"true".to_string()));
        assert_eq!(extra.get("title"), Some(&"T".to_string()));
        assert_eq!(extra.get("verbose"), Some(&"true".to_string()));
    }

    #[test]
    fn apply_config_overrides_consumes_known_flags() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("standalone".to_string(), "yes".to_string());
        extras.insert("log-level".to_string(), "debug".to_string());
        extras.insert("title".to_string(), "T".to_string());

        apply_config_overrides(&mut config, &mut extras);

        assert!(config.convert.html.standalone);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(extras.len(), 1);
        assert!(extras.contains_key("title"));
    }

    #[test]
    fn html_options_follow_config() {
        let mut config = load_cli_config(None);
        config.convert.html.standalone = true;
        let mut overrides = HashMap::new();
        overrides.insert("title".to_string(), "T".to_string());

        let options = format_options_from_config(&config, "html", &overrides);
        assert_eq!(options.get("standalone"), Some(&"true".to_string()));
        assert_eq!(options.get("title"), Some(&"T".to_string()));

        let options = format_options_from_config(&config, "markdown", &HashMap::new());
        assert!(options.is_empty());
    }

    #[test]
    fn cli_definition_is_valid() {
        build_cli().debug_assert();
    }
}
