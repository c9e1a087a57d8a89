//! PageKV CLI
//!
//! Opens a store file and inspects or seeds it.

use clap::{Parser, Subcommand};
use pagekv::config::DEFAULT_PAGE_SIZE;
use pagekv::{Config, Item, Node, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// PageKV CLI
#[derive(Parser, Debug)]
#[command(name = "pagekv-cli")]
#[command(about = "Inspect a PageKV store file")]
#[command(version)]
struct Args {
    /// Store file path
    #[arg(short, long, default_value = "./pagekv.db")]
    path: String,

    /// Page size in bytes (must match the size the file was created with)
    #[arg(short = 's', long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Maximum nodes visited per lookup
    #[arg(short = 'd', long, default_value = "64")]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show meta and free-list state
    Info,

    /// Get a value by key
    Get {
        /// The key to look up
        key: String,
    },

    /// Write a small two-level demo tree and make it the root
    Seed,

    /// Print the leading bytes of a raw page
    Page {
        /// Page number to read
        number: u64,

        /// Number of bytes to print
        #[arg(short, long, default_value = "64")]
        len: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pagekv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("PageKV CLI v{}", pagekv::VERSION);

    if let Err(e) = run(args) {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> pagekv::Result<()> {
    let config = Config::builder()
        .path(&args.path)
        .page_size(args.page_size)
        .max_lookup_depth(args.max_depth)
        .build();

    let mut store = Store::open(config)?;

    match args.command {
        Commands::Info => {
            let meta = store.meta();
            println!("page size:     {}", store.page_size());
            println!("root:          {}", meta.root);
            println!("freelist page: {}", meta.freelist_page);
            println!("max page:      {}", store.freelist().max_page());
            println!("released:      {:?}", store.freelist().released_pages());
        }
        Commands::Get { key } => match store.get(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(not found)"),
        },
        Commands::Seed => {
            let root = seed_demo_tree(&mut store)?;
            println!("seeded demo tree, root at page {}", root);
        }
        Commands::Page { number, len } => {
            let page = store.read_page(number)?;
            let end = len.min(page.data.len());
            println!("{}", String::from_utf8_lossy(&page.data[..end]));
        }
    }

    store.close()
}

/// Two leaves split by the pivot "cherry", persisted as the new root
fn seed_demo_tree(store: &mut Store) -> pagekv::Result<u64> {
    let mut left = Node::new_leaf(vec![
        Item::new("apple", "red"),
        Item::new("banana", "yellow"),
    ])?;
    let mut right = Node::new_leaf(vec![
        Item::new("mango", "orange"),
        Item::new("plum", "purple"),
    ])?;
    let left_page = store.write_node(&mut left)?;
    let right_page = store.write_node(&mut right)?;

    let mut root = Node::new_internal(
        vec![Item::new("cherry", "dark red")],
        vec![left_page, right_page],
    )?;
    let root_page = store.write_node(&mut root)?;

    store.set_root(root_page);
    store.persist()?;
    Ok(root_page)
}
