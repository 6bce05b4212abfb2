use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use lifemap::export::{SvgConfig, render_svg};
use lifemap::geometry::{Point, ShapeKind};
use lifemap::model::{Connection, LifeMap, MapDoc};
use lifemap::palette::{self, LEGEND_COLORS};
use lifemap::routing::route_edges;
use lifemap::store::{FsBackend, LocalSlot, ProjectStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Edit, anchor, export and store Life Map diagrams", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a new map containing the starter node
    New {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
    },
    /// Add a node to a map
    Add {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
        #[arg(long, value_enum, default_value_t = KindArg::Rectangle)]
        kind: KindArg,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
        /// Hex color or legend name
        #[arg(long, default_value = palette::DEFAULT_COLOR)]
        color: String,
        #[arg(long)]
        label: Option<String>,
    },
    /// Connect two nodes by id
    Connect {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
        source: String,
        target: String,
        /// Hex color or legend name
        #[arg(long, default_value = palette::DEFAULT_COLOR)]
        color: String,
    },
    /// Print the resolved anchor points of every edge as JSON
    Anchors {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
    },
    /// Render a map to SVG
    Export {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
        #[arg(short, long, value_name = "SVG_FILE")]
        output: Utf8PathBuf,
        /// Leave the background transparent
        #[arg(long)]
        transparent: bool,
    },
    /// Convert a JSON map to a binary snapshot
    Pack {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
        #[arg(value_name = "BIN_FILE")]
        output: Utf8PathBuf,
    },
    /// Convert a binary snapshot back to JSON
    Unpack {
        #[arg(value_name = "BIN_FILE")]
        file: Utf8PathBuf,
        #[arg(value_name = "MAP_FILE")]
        output: Utf8PathBuf,
    },
    /// Manage saved projects
    Project {
        /// Project store directory
        #[arg(long, env = "LIFEMAP_STORE", default_value = "projects", global = true)]
        store: Utf8PathBuf,
        /// Owner of the projects
        #[arg(long, env = "LIFEMAP_USER", default_value = "local", global = true)]
        user: String,
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Save or restore the single local map slot
    Local {
        /// Directory holding the local slot file
        #[arg(long, env = "LIFEMAP_HOME", default_value = ".", global = true)]
        dir: Utf8PathBuf,
        #[command(subcommand)]
        action: LocalAction,
    },
    /// Print the legend of shapes and colors
    Legend,
}

#[derive(Subcommand, Debug)]
enum LocalAction {
    /// Store a map file in the local slot, replacing what was there
    Save {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
    },
    /// Write the local slot to a map file (the starter map when empty)
    Load {
        #[arg(value_name = "MAP_FILE")]
        output: Utf8PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectAction {
    /// Save a map file as a project (updates it when --id is given)
    Save {
        #[arg(value_name = "MAP_FILE")]
        file: Utf8PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        id: Option<String>,
    },
    /// List the user's projects, newest first
    List,
    /// Write a project's map as JSON to stdout or a file
    Show {
        id: String,
        #[arg(short, long, value_name = "MAP_FILE")]
        output: Option<Utf8PathBuf>,
    },
    /// Delete a project
    Delete { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Circle,
    Rectangle,
    Cloud,
}

impl From<KindArg> for ShapeKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Circle => ShapeKind::Circle,
            KindArg::Rectangle => ShapeKind::Rectangle,
            KindArg::Cloud => ShapeKind::Cloud,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::New { file } => write_map(&file, &LifeMap::starter())?,
        Command::Add {
            file,
            kind,
            x,
            y,
            color,
            label,
        } => {
            let mut map = read_map(&file)?;
            let color = parse_color(&color)?;
            let id = map.add_node(kind.into(), Point::new(x, y), &color).id.clone();
            if let Some(label) = label {
                map.set_label(&id, &label)?;
            }
            write_map(&file, &map)?;
            println!("{}", id);
        }
        Command::Connect {
            file,
            source,
            target,
            color,
        } => {
            let mut map = read_map(&file)?;
            let color = parse_color(&color)?;
            match map.connect(&Connection::new(source, target), &color)? {
                Some(edge) => println!("{}", edge.id),
                None => eprintln!("Connection already exists"),
            }
            write_map(&file, &map)?;
        }
        Command::Anchors { file } => {
            let map = read_map(&file)?;
            let routes = route_edges(&map);
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Command::Export {
            file,
            output,
            transparent,
        } => {
            let map = read_map(&file)?;
            let mut cfg = SvgConfig::default();
            if transparent {
                cfg.background = None;
            }
            std::fs::write(output.as_std_path(), render_svg(&map, &cfg))
                .with_context(|| format!("Failed to write {}", output))?;
        }
        Command::Pack { file, output } => {
            let map = read_map(&file)?;
            MapDoc { map }
                .save_to_binary(output.as_std_path())
                .with_context(|| format!("Failed to write {}", output))?;
        }
        Command::Unpack { file, output } => {
            let doc = MapDoc::load_from_binary(file.as_std_path())
                .with_context(|| format!("Failed to read {}", file))?;
            write_map(&output, &doc.map)?;
        }
        Command::Project {
            store,
            user,
            action,
        } => run_project(&store, &user, action)?,
        Command::Local { dir, action } => {
            let slot = LocalSlot::in_dir(&dir);
            match action {
                LocalAction::Save { file } => slot.save(&read_map(&file)?)?,
                LocalAction::Load { output } => {
                    let map = slot.load()?.unwrap_or_else(LifeMap::starter);
                    write_map(&output, &map)?;
                }
            }
        }
        Command::Legend => print_legend(),
    }
    Ok(())
}

fn run_project(store: &Utf8Path, user: &str, action: ProjectAction) -> Result<()> {
    let mut projects = ProjectStore::new(FsBackend::new(store)?);
    match action {
        ProjectAction::Save { file, name, id } => {
            let map = read_map(&file)?;
            let project = projects.save_project(user, &name, &map, id.as_deref())?;
            println!("{}", project.id);
        }
        ProjectAction::List => {
            for p in projects.load_projects(user)? {
                println!(
                    "{}\t{}\t{}\tupdated {}",
                    p.id,
                    p.project_name,
                    p.summary(),
                    p.updated_at
                );
            }
        }
        ProjectAction::Show { id, output } => {
            let project = projects.get_project(&id)?;
            match output {
                Some(path) => write_map(&path, &project.project_data)?,
                None => println!("{}", project.project_data.to_json_string()?),
            }
        }
        ProjectAction::Delete { id } => projects.delete_project(&id)?,
    }
    Ok(())
}

fn print_legend() {
    println!("Shapes:");
    for kind in [ShapeKind::Circle, ShapeKind::Rectangle, ShapeKind::Cloud] {
        println!("  {:<10} {}", kind.as_str(), palette::shape_meaning(kind));
    }
    println!("Colors:");
    for c in LEGEND_COLORS {
        println!("  {:<7} {}  {}", c.name, c.hex, c.meaning);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "lifemap=debug" } else { "lifemap=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_color(s: &str) -> Result<String> {
    palette::normalize_color(s).with_context(|| format!("Invalid color {:?}", s))
}

fn read_map(path: &Utf8Path) -> Result<LifeMap> {
    let text =
        std::fs::read_to_string(path.as_std_path()).with_context(|| format!("Open {}", path))?;
    LifeMap::from_json_str(&text).with_context(|| format!("Failed to parse {}", path))
}

fn write_map(path: &Utf8Path, map: &LifeMap) -> Result<()> {
    std::fs::write(path.as_std_path(), map.to_json_string()?)
        .with_context(|| format!("Failed to write {}", path))
}
