use std::io;
use std::path::PathBuf;
use std::{env, fs};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::error::{OrdoError, Result};
use crate::graph::{find_cycles, load_order, viz, DependencyGraph};
use crate::manifest::{self, Manifest};
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "ordo")]
#[command(about = "Plugin load-order resolver", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
    #[arg(short, long)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Order(OrderArgs),
    Cycles(CyclesArgs),
    Show(ShowArgs),
    Init(InitArgs),
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CyclesArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(short, long, default_value = "flat")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Order(args) => handle_order(args, cli.manifest),
        Commands::Cycles(args) => handle_cycles(args, cli.manifest),
        Commands::Show(args) => handle_show(args, cli.manifest),
        Commands::Init(args) => handle_init(args, cli.quiet),
        Commands::Completions(args) => handle_completions(args),
    }
}

fn load_graph(manifest_path: Option<PathBuf>) -> Result<DependencyGraph<String>> {
    let manifest = load_manifest(manifest_path)?;
    Ok(manifest::build_graph(&manifest)?)
}

fn load_manifest(manifest_path: Option<PathBuf>) -> Result<Manifest> {
    let cwd = env::current_dir()?;
    let path = manifest::resolve_manifest(&cwd, manifest_path)?;
    Ok(manifest::load_manifest(&path)?)
}

fn handle_order(args: OrderArgs, manifest_path: Option<PathBuf>) -> Result<()> {
    let graph = load_graph(manifest_path)?;
    let order = load_order(graph)?;

    if args.json {
        println!("{}", to_json(&order)?);
    } else {
        for name in order {
            println!("{}", name);
        }
    }
    Ok(())
}

fn handle_cycles(args: CyclesArgs, manifest_path: Option<PathBuf>) -> Result<()> {
    let graph = load_graph(manifest_path)?;
    let cycles: Vec<Vec<String>> = find_cycles(&graph)
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|id| graph.payload(id).clone())
                .collect()
        })
        .collect();

    if args.json {
        println!("{}", to_json(&cycles)?);
        return Ok(());
    }

    if cycles.is_empty() {
        println!("no cycles detected");
        return Ok(());
    }

    for cycle in cycles {
        let mut line = String::from("[");
        for name in cycle {
            line.push_str(&name);
            line.push(' ');
        }
        line.push(']');
        println!("{}", line);
    }
    Ok(())
}

fn handle_show(args: ShowArgs, manifest_path: Option<PathBuf>) -> Result<()> {
    let graph = load_graph(manifest_path)?;
    match args.format.to_ascii_lowercase().as_str() {
        "flat" => {
            print!("{}", viz::render_flat(&graph));
            Ok(())
        }
        "dot" => {
            print!("{}", viz::render_dot(&graph));
            Ok(())
        }
        other => Err(OrdoError::Other(anyhow::anyhow!(format!(
            "unknown show format '{}'",
            other
        )))),
    }
}

fn handle_init(args: InitArgs, quiet: bool) -> Result<()> {
    let directory = match args.directory {
        Some(directory) => directory,
        None => env::current_dir()?,
    };
    if !directory.is_dir() {
        fs::create_dir_all(&directory)?;
    }

    let path = directory.join(manifest::MANIFEST_FILE);
    if path.is_file() {
        return Err(OrdoError::Other(anyhow::anyhow!(format!(
            "manifest already exists at {}",
            path.display()
        ))));
    }

    fs::write(
        &path,
        "# ordo plugin manifest\n#\n# [[plugin]]\n# name = \"core\"\n#\n# [[plugin]]\n# name = \"app\"\n# depends_on = [\"core\"]\n",
    )?;
    if !quiet {
        output::info(&format!("created {}", path.display()));
    }
    Ok(())
}

fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "ordo", &mut io::stdout());
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| OrdoError::Other(anyhow::Error::new(err)))
}
