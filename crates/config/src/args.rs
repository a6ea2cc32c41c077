use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to .env file (e.g., .env.chronos)
    #[arg(short, long, default_value = ".env")]
    pub env_file: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a raw transaction trace and its action payloads
    Decode {
        /// File holding the raw trace bytes
        #[arg(long)]
        trace: PathBuf,

        /// Block the trace was produced in
        #[arg(long)]
        block_num: u32,

        /// Block time, RFC 3339
        #[arg(long)]
        block_time: String,

        /// Directory of account schemas laid out as `<account>/<block_num>.abi`
        #[arg(long)]
        schema_dir: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a schema document (JSON or binary) and print a summary
    Schema {
        #[arg(long)]
        file: PathBuf,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decode_command() {
        let args = Args::try_parse_from([
            "chronos-decoder",
            "decode",
            "--trace",
            "trace.bin",
            "--block-num",
            "1200",
            "--block-time",
            "2020-01-01T00:00:00Z",
            "--schema-dir",
            "abis",
        ])
        .unwrap();

        assert_eq!(args.env_file, ".env");
        match args.command {
            Command::Decode {
                block_num, pretty, ..
            } => {
                assert_eq!(block_num, 1200);
                assert!(!pretty);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_decode_requires_block_num() {
        let result = Args::try_parse_from([
            "chronos-decoder",
            "decode",
            "--trace",
            "trace.bin",
            "--block-time",
            "2020-01-01T00:00:00Z",
            "--schema-dir",
            "abis",
        ]);
        assert!(result.is_err());
    }
}
