#![cfg(feature = "cli")]

use ansi_term::Colour;
use clap::Parser;
use log::{debug, info};
use prefix_gaptree::{Cidr, InsertOptions, InsertResult, Tree};

use std::error::Error;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Interactive IPv4 allocation tree: load allocated prefixes, then look for
/// free address blocks.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV file with `net,len,label` records (with a header row) to load
    /// at startup
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Do not mark a block used when both of its halves are used
    #[arg(long)]
    no_propagate: bool,

    /// Load the prefixes from the file without marking them used
    #[arg(long)]
    unused: bool,

    /// Where to keep the command history
    #[arg(long, default_value = "/tmp/prefix-gaptree-history.txt")]
    history: PathBuf,
}

const HELP: &str = "\
commands:
  i <prefix> [label]   insert a prefix
  l <prefix>           look up an inserted prefix
  f <prefix>           is the prefix entirely free?
  g <len>              find the lowest free /len
  g <prefix> <len>     find the lowest free /len inside prefix
  a <len> [label]      find the lowest free /len and mark it used
  t [prefix]           list the largest used blocks
  u [prefix]           list all used blocks
  s                    statistics
  j                    largest used blocks as JSON
  h                    this help";

fn warn(msg: impl AsRef<str>) {
    println!("{}", Colour::Yellow.paint(msg.as_ref()));
}

fn error(msg: impl AsRef<str>) {
    println!("{}", Colour::Red.paint(msg.as_ref()));
}

fn load_prefixes(
    tree: &mut Tree<String>,
    file_path: &Path,
    options: InsertOptions,
) -> Result<usize, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)?;
    let mut count = 0;
    for result in rdr.records() {
        let record = result?;
        let net = Ipv4Addr::from_str(record.get(0).unwrap_or_default())?;
        let len: u8 = record.get(1).unwrap_or_default().parse()?;
        let label = record.get(2).unwrap_or_default().to_string();

        let cidr = match Cidr::new(net, len) {
            Ok(cidr) => cidr,
            Err(_) => {
                let cidr = Cidr::new_relaxed(net, len)?;
                warn(format!(
                    "Warning: {}/{} has bits set to the right of the prefix \
                    length. Using {}.",
                    net, len, cidr
                ));
                cidr
            }
        };

        match tree.insert_cidr(cidr, label, options) {
            InsertResult::Inserted(_) => count += 1,
            InsertResult::DuplicateInsert => {
                debug!("skipping duplicate {}", cidr)
            }
        }
    }
    Ok(count)
}

fn print_node(tree: &Tree<String>, prefix: &str) -> Result<(), Box<dyn Error>> {
    let Some(id) = tree.lookup(prefix)? else {
        println!("{} not found", prefix);
        return Ok(());
    };
    if let Some(node) = tree.node(id) {
        println!("prefix :\t{}", tree.cidr(id)?);
        println!("level  :\t{}", tree.level(id)?);
        println!("path   :\t{}", tree.path(id)?);
        println!("used   :\t{}", node.is_used());
        println!("data   :\t{}", node.data().map_or("-", |d| d.as_str()));
    }
    Ok(())
}

fn print_gap(gap: Option<Cidr>) {
    match gap {
        Some(gap) => println!("{}", gap),
        None => println!("no gap"),
    }
}

fn run_command(
    tree: &mut Tree<String>,
    options: InsertOptions,
    line: &str,
) -> Result<(), Box<dyn Error>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let label = |from: usize| words.get(from..).unwrap_or_default().join(" ");

    match words.as_slice() {
        ["i", prefix, ..] => {
            match tree.insert(prefix, label(2), options)? {
                InsertResult::Inserted(id) => {
                    println!("inserted {}", tree.cidr(id)?)
                }
                InsertResult::DuplicateInsert => {
                    warn(format!("{} was inserted before", prefix))
                }
            }
        }
        ["l", prefix] => print_node(tree, prefix)?,
        ["f", prefix] => println!("{}", tree.is_free(prefix)?),
        ["g", len] => print_gap(tree.find_gap(len.parse()?)?),
        ["g", prefix, len] => {
            print_gap(tree.find_gap_from(prefix, len.parse()?)?)
        }
        ["a", len, ..] => {
            match tree.allocate(len.parse()?, label(2), options)? {
                Some(gap) => println!("allocated {}", gap),
                None => warn(format!("no /{} left", len)),
            }
        }
        ["t"] | ["u"] | ["t", _] | ["u", _] => {
            let top_used = words.first() == Some(&"t");
            let prefix = words.get(1).copied();
            for cidr in tree.iterate_nodes(prefix, top_used)? {
                println!("{}", cidr);
            }
        }
        ["s"] => print!("{}", tree.stats()),
        ["j"] => {
            let top: Vec<Cidr> = tree.top_used_prefixes().collect();
            println!("{}", serde_json::to_string_pretty(&top)?);
        }
        ["h"] => println!("{}", HELP),
        [] => {}
        _ => error(format!("Error: unknown command {:?}", line)),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let options = InsertOptions::default()
        .with_propagate_used(!args.no_propagate)
        .with_mark_used(!args.unused);

    let mut tree = Tree::<String>::new();
    if let Some(file_path) = &args.file {
        let start = std::time::Instant::now();
        let count = load_prefixes(&mut tree, file_path, options)?;
        info!("loaded {} prefixes in {:?}", count, start.elapsed());
        println!("finished loading {} prefixes...", count);
    }

    // Interactive inserts always mark used.
    let options = InsertOptions::default()
        .with_propagate_used(!args.no_propagate);

    let mut rl = DefaultEditor::new()?;
    if rl.load_history(&args.history).is_err() {
        println!("No previous history.");
    }
    loop {
        match rl.readline("(gaptree)> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                if let Err(err) = run_command(&mut tree, options, &line) {
                    error(err.to_string());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(_err) => {
                error("Error: Can't parse the command");
                continue;
            }
        }
    }
    rl.save_history(&args.history)?;
    Ok(())
}
