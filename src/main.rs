//! licensekit CLI
//!
//! Three workflows against the mini license curve:
//! - `gen`: create a key pair and salt (once per product release)
//! - `sign`: derive the hash of license text and print the unlock code
//! - `open`: check an unlock code against license text
//!
//! Plus `compose`, which builds the canonical `first&last&email` text.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use num_bigint::BigInt;
use rand::rngs::OsRng;
use serde::Serialize;

use licensekit::crypto::curves::GENERATOR_MINI;
use licensekit::crypto::generate_keypair;
use licensekit::keystore;
use licensekit::license::{compose_text, compute_hash, encode_code, parse_code, Salt};
use licensekit::utils::logging;

#[derive(Parser)]
#[command(
    name = "licensekit",
    about = "ECDSA license code generator and validator",
    version
)]
struct Cli {
    /// Directory holding the key and salt files
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Log debug detail to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a fresh key pair and salt; writes secret_key.txt,
    /// public_key.txt, and salt_key.txt. Don't lose these, and generate
    /// them only once per software release.
    Gen,
    /// Sign license text and print the unlock code
    Sign {
        /// License text, e.g. the output of `compose`
        text: String,
    },
    /// Check an unlock code against license text
    Open {
        /// Unlock code in the form 0123456789-0123456789
        code: String,
        /// The same license text that was signed
        text: String,
    },
    /// Compose canonical license text from holder details
    Compose {
        first: String,
        last: String,
        email: String,
    },
}

#[derive(Serialize)]
struct GenOutput {
    fingerprint: String,
    public_x: String,
    public_y: String,
    files: [&'static str; 3],
}

#[derive(Serialize)]
struct SignOutput {
    code: String,
    hash: u64,
}

#[derive(Serialize)]
struct OpenOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        logging::enable_debug();
    }
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            logging::error("cli", format!("{err:#}")).log();
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Gen => gen(cli),
        Command::Sign { text } => sign(cli, text),
        Command::Open { code, text } => open(cli, code, text),
        Command::Compose { first, last, email } => {
            println!("{}", compose_text(first, last, email));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn gen(cli: &Cli) -> Result<ExitCode> {
    if !cli.json {
        println!("generating keys...");
    }
    let key = generate_keypair(&GENERATOR_MINI, &mut OsRng).context("key generation failed")?;
    let salt = Salt::generate(&mut OsRng);

    keystore::save_secret_key(&cli.dir, &key).context("writing secret key")?;
    keystore::save_public_key(&cli.dir, key.public_key()).context("writing public key")?;
    keystore::save_salt(&cli.dir, &salt).context("writing salt")?;

    let (x, y) = key.public_key().coordinates();
    let fingerprint = key.public_key().fingerprint();
    logging::debug("gen", "key pair written")
        .field("fingerprint", &fingerprint)
        .field("secret_multiplier", key.secret_multiplier())
        .log();

    if cli.json {
        let out = GenOutput {
            fingerprint,
            public_x: x.to_str_radix(10),
            public_y: y.to_str_radix(10),
            files: [
                keystore::SECRET_KEY_FILE,
                keystore::PUBLIC_KEY_FILE,
                keystore::SALT_FILE,
            ],
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("public key fingerprint: {}", fingerprint);
        println!(
            "wrote {}, {}, {}",
            keystore::SECRET_KEY_FILE,
            keystore::PUBLIC_KEY_FILE,
            keystore::SALT_FILE
        );
        println!("done.");
    }
    Ok(ExitCode::SUCCESS)
}

fn sign(cli: &Cli, text: &str) -> Result<ExitCode> {
    let key = keystore::load_secret_key(&cli.dir, &GENERATOR_MINI)
        .context("loading secret key (run `gen` first?)")?;
    let salt = keystore::load_salt(&cli.dir).context("loading salt")?;

    let hash = compute_hash(text, &salt);
    logging::debug("sign", "derived message hash")
        .field("hash", hash)
        .log();

    let signature = key
        .sign_with_rng(&BigInt::from(hash), &mut OsRng)
        .context("signing failed")?;
    let code = encode_code(&signature);
    logging::debug("sign", "issued license code")
        .field("code", &code)
        .log();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&SignOutput { code, hash })?);
    } else {
        println!("{}", code);
    }
    Ok(ExitCode::SUCCESS)
}

fn open(cli: &Cli, code: &str, text: &str) -> Result<ExitCode> {
    // Malformed codes are rejected before any curve arithmetic runs.
    let signature = match parse_code(code) {
        Ok(signature) => signature,
        Err(_) => {
            if cli.json {
                let out = OpenOutput {
                    valid: false,
                    error: Some("malformed code"),
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("ERROR: expected license code in format 0123456789-0123456789");
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let public_key = keystore::load_public_key(&cli.dir, &GENERATOR_MINI)
        .context("loading public key (run `gen` first?)")?;
    let salt = keystore::load_salt(&cli.dir).context("loading salt")?;

    let hash = compute_hash(text, &salt);
    logging::debug("open", "checking license code")
        .field("code", code)
        .field("hash", hash)
        .field("key", public_key.fingerprint())
        .log();

    let valid = public_key.verify(&BigInt::from(hash), &signature);
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&OpenOutput { valid, error: None })?
        );
    } else if valid {
        println!("SUCCESSFULLY OPENED - CORRECT SIGNATURE");
    } else {
        println!("FAIL TO OPEN - WRONG SIGNATURE");
    }
    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
