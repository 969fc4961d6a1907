use clap::Parser as ClapParser;
use log::LevelFilter;

use proto::{Runtime, RuntimeCreateInfo, send, unary};

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Unary numbers on a prototype object runtime", long_about = None)]
struct Cli {
    /// How many times to send `inc` to zero
    #[arg(short, long, default_value_t = 8)]
    count: usize,

    /// Extra messages to send to the resulting number, in order
    #[arg(long = "send", value_name = "NAME")]
    sends: Vec<String>,

    /// Finish by sending `quit` to the resulting number
    #[arg(long)]
    quit: bool,

    /// Exit status used when `quit` is sent
    #[arg(long, default_value_t = 0)]
    exit_code: i32,

    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = Runtime::new(RuntimeCreateInfo {
        quit_code: cli.exit_code,
        ..Default::default()
    });

    let zero = unary::zero(&runtime.root());
    let Some(number) = unary::nth(&zero, cli.count) else {
        eprintln!("could not build {} from zero", cli.count);
        std::process::exit(1);
    };

    send(&number, "print", None);

    for name in &cli.sends {
        if send(&number, name, None).is_none() {
            log::info!("`{name}` answered null");
        }
    }

    if cli.quit {
        send(&number, "quit", None);
    }
}
