use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "meds",
    about = "MEDS post-quantum signatures: key generation, signing and verification",
    version
)]
struct Cli {
    /// Log scheme internals (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair
    Keygen {
        /// Parameter set, e.g. 9923
        #[arg(long, default_value_t = 9923)]
        set: u32,
        /// Directory receiving `meds_key` and `meds_key.pub`
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Sign a file, writing `<file>.signed`
    Sign {
        #[arg(long, default_value_t = 9923)]
        set: u32,
        /// File to sign
        #[arg(long)]
        msg: PathBuf,
        /// Secret key file
        #[arg(long, default_value = commands::SECRET_KEY_FILE)]
        key: PathBuf,
    },
    /// Verify a signed file
    Verify {
        #[arg(long, default_value_t = 9923)]
        set: u32,
        /// Signed file produced by `meds sign`
        #[arg(long)]
        signed: PathBuf,
        /// Public key file
        #[arg(long, default_value = commands::PUBLIC_KEY_FILE)]
        key: PathBuf,
        /// Write the recovered message here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print parameter sets and their derived sizes as JSON
    Params {
        /// Only this set
        #[arg(long)]
        set: Option<u32>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("meds_sign=debug,meds_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Keygen { set, dir } => {
            let (sk_path, pk_path) = commands::keygen(set, &dir)?;
            println!("Secret key written to {}", sk_path.display());
            println!("Public key written to {}", pk_path.display());
            Ok(true)
        }
        Commands::Sign { set, msg, key } => {
            let out = commands::sign(set, &msg, &key)?;
            println!("Signed message written to {}", out.display());
            Ok(true)
        }
        Commands::Verify {
            set,
            signed,
            key,
            out,
        } => {
            let valid = commands::verify(set, &signed, &key, out.as_deref())?;
            println!("{}", if valid { "Valid Signature" } else { "Invalid Signature" });
            Ok(valid)
        }
        Commands::Params { set } => {
            println!("{}", commands::params_json(set)?);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
