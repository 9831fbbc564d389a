//! Command-line argument parsing.

use worldgraph_core::EntityKind;

/// Environment variable naming the default snapshot file.
pub const SNAPSHOT_ENV: &str = "WORLDGRAPH_SNAPSHOT";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the relationship graph, optionally filtered to some kinds.
    Graph {
        world: String,
        kinds: Option<Vec<EntityKind>>,
    },
    /// Print ranked search results.
    Search {
        world: String,
        query: String,
        limit: Option<usize>,
    },
    /// Print every entity of a world.
    List { world: String },
    /// Print usage.
    Help,
}

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub snapshot: Option<String>,
}

/// Parse `args` (including the program name at index 0).
pub fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut snapshot = None;
    let mut limit = None;
    let mut kinds = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                return Ok(Invocation {
                    command: Command::Help,
                    snapshot,
                })
            }
            "--snapshot" => {
                let path = args.get(i + 1).ok_or("--snapshot needs a path")?;
                snapshot = Some(path.clone());
                i += 1;
            }
            "--limit" => {
                let value = args.get(i + 1).ok_or("--limit needs a number")?;
                limit = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid limit: {value}"))?,
                );
                i += 1;
            }
            "--kinds" => {
                let value = args.get(i + 1).ok_or("--kinds needs a list")?;
                kinds = Some(parse_kinds(value)?);
                i += 1;
            }
            other => positional.push(other),
        }
        i += 1;
    }

    let command = match positional.as_slice() {
        [] => Command::Help,
        ["graph", world] => Command::Graph {
            world: world.to_string(),
            kinds,
        },
        ["search", world, query @ ..] => Command::Search {
            world: world.to_string(),
            query: query.join(" "),
            limit,
        },
        ["list", world] => Command::List {
            world: world.to_string(),
        },
        [other, ..] => return Err(format!("unknown or incomplete command: {other}")),
    };

    Ok(Invocation { command, snapshot })
}

fn parse_kinds(list: &str) -> Result<Vec<EntityKind>, String> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<EntityKind>().map_err(|e| e.to_string()))
        .collect()
}

pub fn print_help() {
    println!("worldgraph - inspect the entity graph of a world snapshot");
    println!();
    println!("USAGE:");
    println!("  worldgraph [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("  graph <WORLD>            Print nodes and mention edges as JSON");
    println!("  search <WORLD> <QUERY>   Print ranked search results as JSON");
    println!("  list <WORLD>             Print every entity of the world as JSON");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help           Show this help message");
    println!("  --snapshot <PATH>    Snapshot file (default: ${SNAPSHOT_ENV})");
    println!("  --limit <N>          Maximum search results (default: 10)");
    println!("  --kinds <A,B,..>     Restrict the graph to these kinds");
    println!();
    println!("KINDS:");
    println!("  character, location, organization, item, rule, story, event");
}
