//! map_launch CLI

use clap::{Parser, Subcommand};
use map_launch::{
    actions::ArgumentMetadata, declared_arguments, params::typed_params, parse_launch_file,
    record::RecordJson, render_map_launch, MAP_LAUNCH_XML,
};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    process,
};

#[derive(Parser)]
#[command(name = "map_launch")]
#[command(about = "Render the map-serving component container launch", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the launch description and write record.json
    Render {
        /// Launch arguments (key:=value)
        #[arg(value_parser = parse_launch_arg)]
        args: Vec<(String, String)>,

        /// Output file path, "-" for stdout
        #[arg(short, long, default_value = "record.json")]
        output: PathBuf,

        /// Evaluate this launch file instead of the bundled map launch
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List declared launch arguments with their defaults
    ShowArgs {
        /// Inspect this launch file instead of the bundled map launch
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the typed parameters each composable node would receive
    ShowParams {
        /// Launch arguments (key:=value)
        #[arg(value_parser = parse_launch_arg)]
        args: Vec<(String, String)>,

        /// Evaluate this launch file instead of the bundled map launch
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn parse_launch_arg(s: &str) -> Result<(String, String), String> {
    match s.split_once(":=") {
        Some((name, value)) if !name.is_empty() && !value.contains(":=") => {
            Ok((name.to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid launch argument format: {} (expected name:=value)", s)),
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Render { args, output, file } => {
            let cli_args: HashMap<String, String> = args.into_iter().collect();
            evaluate(file.as_deref(), cli_args).and_then(|record| write_record(&record, &output))
        }
        Commands::ShowArgs { file } => show_args(file.as_deref()),
        Commands::ShowParams { args, file } => {
            let cli_args: HashMap<String, String> = args.into_iter().collect();
            evaluate(file.as_deref(), cli_args).map(|record| show_params(&record))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn evaluate(
    file: Option<&Path>,
    cli_args: HashMap<String, String>,
) -> Result<RecordJson, Box<dyn std::error::Error>> {
    let record = match file {
        Some(path) => {
            log::info!("Evaluating launch file: {}", path.display());
            parse_launch_file(path, cli_args)?
        }
        None => render_map_launch(cli_args)?,
    };
    Ok(record)
}

fn write_record(record: &RecordJson, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = record.to_json()?;
    if output == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(output, json)?;
        log::info!("Generated record.json: {}", output.display());
    }

    log::info!(
        "  {} containers, {} composable nodes",
        record.container.len(),
        record.load_node.len()
    );
    Ok(())
}

fn show_args(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => MAP_LAUNCH_XML.to_string(),
    };

    println!("Arguments (pass arguments as '<name>:=<value>'):");
    for arg in declared_arguments(&content)? {
        print_argument(&arg);
    }
    Ok(())
}

fn print_argument(arg: &ArgumentMetadata) {
    println!();
    println!("    '{}':", arg.name);
    println!(
        "        {}",
        arg.description.as_deref().unwrap_or("no description given")
    );
    if let Some(choices) = &arg.choices {
        println!("        Valid choices are: {}", choices.join(", "));
    }
    match &arg.default {
        Some(default) => println!("        (default: '{}')", default),
        None => println!("        (required)"),
    }
}

fn show_params(record: &RecordJson) {
    for node in &record.load_node {
        println!("{}/{} [{}]", node.namespace.trim_end_matches('/'), node.node_name, node.plugin);
        for (name, value) in typed_params(&node.params) {
            println!("    {} ({}): {}", name, value.type_name(), value);
        }
        for (from, to) in &node.remaps {
            println!("    remap {} -> {}", from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_launch_arg() {
        assert_eq!(
            parse_launch_arg("map_path:=/data/map"),
            Ok(("map_path".to_string(), "/data/map".to_string()))
        );
        assert_eq!(
            parse_launch_arg("map_path:="),
            Ok(("map_path".to_string(), String::new()))
        );
    }

    #[test]
    fn test_parse_launch_arg_rejects_malformed() {
        assert!(parse_launch_arg("map_path").is_err());
        assert!(parse_launch_arg(":=/data/map").is_err());
        assert!(parse_launch_arg("a:=b:=c").is_err());
    }

    #[test]
    fn test_cli_parses_render_arguments() {
        let cli = Cli::try_parse_from([
            "map_launch",
            "render",
            "use_multithread:=true",
            "map_path:=/data/map",
            "-o",
            "-",
        ])
        .unwrap();

        match cli.command {
            Commands::Render { args, output, file } => {
                assert_eq!(
                    args,
                    vec![
                        ("use_multithread".to_string(), "true".to_string()),
                        ("map_path".to_string(), "/data/map".to_string()),
                    ]
                );
                assert_eq!(output, PathBuf::from("-"));
                assert!(file.is_none());
            }
            _ => panic!("expected render subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_launch_argument() {
        assert!(Cli::try_parse_from(["map_launch", "render", "use_multithread"]).is_err());
    }

    #[test]
    fn test_evaluate_bundled_launch() {
        let record = evaluate(
            None,
            HashMap::from([("use_multithread".to_string(), "true".to_string())]),
        )
        .unwrap();
        assert_eq!(record.node[0].executable, "component_container_mt");
        assert_eq!(record.load_node.len(), 5);
    }

    #[test]
    fn test_write_record_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("record.json");
        let record = evaluate(None, HashMap::new()).unwrap();

        write_record(&record, &output).unwrap();
        let reloaded = RecordJson::from_json(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(reloaded.container[0].name, "map_container");
    }
}
