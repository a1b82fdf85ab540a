use clap::{Parser as ClapParser, Subcommand};
use jpath::cli::{self, CliError, Command, RunOptions, RunResult};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "jpath")]
#[command(about = "jpath - get, set, and delete values in JSON documents with path expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every value the path matches, as an array
    Get {
        /// The path expression
        path: String,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Print the first value the path matches
    First {
        /// The path expression
        path: String,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Print whether the path matches anything
    Has {
        /// The path expression
        path: String,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Assign a JSON value at the path and print the updated document
    Set {
        /// The path expression
        path: String,

        /// The JSON value to assign
        value: String,

        #[command(flatten)]
        io: IoArgs,

        /// Only change the first match
        #[arg(long)]
        one: bool,
    },

    /// Delete the matches and print the updated document
    Del {
        /// The path expression
        path: String,

        #[command(flatten)]
        io: IoArgs,

        /// Only delete the first match
        #[arg(long)]
        one: bool,
    },

    /// Validate a path and print its normalized form
    Check {
        /// The path expression
        path: String,
    },
}

#[derive(clap::Args)]
struct IoArgs {
    /// JSON input (reads from stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Get { path, io } => run(path, Command::Get, io, false),
        Commands::First { path, io } => run(path, Command::First, io, false),
        Commands::Has { path, io } => run(path, Command::Has, io, false),
        Commands::Set {
            path,
            value,
            io,
            one,
        } => run(path, Command::Set { value }, io, one),
        Commands::Del { path, io, one } => run(path, Command::Del, io, one),
        Commands::Check { path } => run(
            path,
            Command::Check,
            IoArgs {
                input: None,
                pretty: false,
            },
            false,
        ),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(path: String, command: Command, io_args: IoArgs, one: bool) -> Result<(), CliError> {
    let input = match io_args.input {
        Some(s) => Some(s),
        None if command != Command::Check && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RunOptions {
        path,
        command,
        input,
        one,
    };

    match cli::execute(&options)? {
        RunResult::SyntaxValid(normalized) => println!("Syntax is valid: {}", normalized),
        RunResult::Output(output) => {
            let json = if io_args.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
