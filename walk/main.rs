// Walks the DNS tree from the root servers to resolve a single name.
// walk [-d] [-n nameserver] -i {hostname or IPv4 address}
use clap::Parser;
use log::debug;
use rootwalk::{MatchAgainst, NameServer, Resolver, ResolverConfig};
use std::process;
use std::time::Duration;

// A simple type alias so as to DRY.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "walk")]
#[command(about = "Resolve a name by walking the delegations down from the root servers")]
struct Args {
    /// Log every query and response
    #[arg(short = 'd')]
    debug: bool,

    /// Ask this nameserver first, instead of the root servers
    #[arg(short = 'n', value_name = "NAMESERVER")]
    nameserver: Option<String>,

    /// Hostname, or dotted IPv4 address to look up in reverse
    #[arg(short = 'i', value_name = "TARGET")]
    target: String,

    /// File listing the root server addresses, one per line
    #[arg(long, value_name = "FILE", default_value = "root-servers.txt")]
    roots: String,

    /// Which name an A record must belong to (original-name or current-alias)
    #[arg(long, default_value_t = MatchAgainst::CurrentAlias)]
    match_against: MatchAgainst,

    /// Milliseconds to wait for each nameserver
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn seeds(args: &Args) -> Result<Vec<NameServer>> {
    if let Some(ns) = &args.nameserver {
        return Ok(vec![NameServer::from_address(ns.as_str())]);
    }

    let seeds = rootwalk::seed::load(&args.roots)?;
    debug!("Loaded {} root servers from {}", seeds.len(), args.roots);
    Ok(seeds)
}

fn run(args: &Args, seeds: Vec<NameServer>) -> Result<String> {
    let config = ResolverConfig {
        timeout: Duration::from_millis(args.timeout_ms),
        match_against: args.match_against,
        verbose: args.debug,
        ..Default::default()
    };

    let resolver = Resolver::with_config(seeds, config);
    Ok(resolver.resolve(&args.target)?)
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let seeds = match seeds(&args) {
        Ok(seeds) => seeds,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match run(&args, seeds) {
        Ok(answer) => println!("{} resolves to {}", args.target, answer),
        Err(e) => {
            debug!("{}", e);
            println!("Could not resolve the name {}", args.target);
            process::exit(1);
        }
    }
}
